//! # Schema Walker
//!
//! Recursive traversal of the field tree. Every function here is pure: it
//! borrows the field list and returns a new structure, never mutating
//! shared state along the way.
//!
//! - [`flatten`] — every leaf field with its full path, depth-first, in
//!   document order. Sections contribute their children, not themselves.
//! - [`initialize_defaults`] — a fresh record holding each leaf's initial
//!   value at its path.
//! - [`find_field`] — resolve a dot-path back to its field definition.
//! - [`derive_top_level_sections`] — the sections directly under the root,
//!   in order, with their section-only index.

use dynform_core::{FieldPath, FormRecord};
use serde_json::Value;

use crate::schema::{Field, FieldKind};
use crate::value::is_present;

/// A leaf field paired with its fully-qualified path.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatField<'a> {
    pub path: FieldPath,
    pub field: &'a Field,
}

/// Expand `fields` into leaves with their paths.
pub fn flatten(fields: &[Field]) -> Vec<FlatField<'_>> {
    flatten_under(fields, None)
}

/// Like [`flatten`], with every path prefixed by `parent`.
pub fn flatten_under<'a>(fields: &'a [Field], parent: Option<&FieldPath>) -> Vec<FlatField<'a>> {
    let mut out = Vec::new();
    collect_leaves(fields, parent, &mut out);
    out
}

fn collect_leaves<'a>(fields: &'a [Field], parent: Option<&FieldPath>, out: &mut Vec<FlatField<'a>>) {
    for field in fields {
        let path = FieldPath::join(parent, &field.name);
        match field.section_fields() {
            Some(children) => collect_leaves(children, Some(&path), out),
            None => out.push(FlatField { path, field }),
        }
    }
}

/// The value a leaf starts out with.
///
/// An explicit `defaultValue` wins. Otherwise checkboxes start unchecked,
/// selects start on their first option (or empty when that option's value
/// is empty or there are no options), and everything else starts as an
/// empty string.
pub fn default_value(field: &Field) -> Value {
    if let Some(value) = &field.default_value {
        return value.clone();
    }
    match &field.kind {
        FieldKind::Checkbox { .. } => Value::Bool(false),
        FieldKind::Select { options } => options
            .first()
            .map(|o| &o.value)
            .filter(|v| is_present(Some(v)))
            .cloned()
            .unwrap_or_else(|| Value::String(String::new())),
        _ => Value::String(String::new()),
    }
}

/// Build the initial record for `fields`.
///
/// Sections never receive a value of their own; a section whose subtree
/// has no leaves leaves no trace in the record.
pub fn initialize_defaults(fields: &[Field]) -> FormRecord {
    let mut record = FormRecord::new();
    for leaf in flatten(fields) {
        record.insert(&leaf.path, default_value(leaf.field));
    }
    record
}

/// Resolve `path` to its field definition.
///
/// Segment `i` of the path must equal the `name` of the field at depth `i`.
/// At each depth the first sibling with a matching name is taken: if the
/// path ends there, that field is the answer; if it is a section, the
/// search descends into it and its answer is final; a matching leaf with
/// path segments left over is skipped in favour of later siblings.
pub fn find_field<'a>(fields: &'a [Field], path: &FieldPath) -> Option<&'a Field> {
    find_in(fields, path.segments())
}

fn find_in<'a>(fields: &'a [Field], segments: &[String]) -> Option<&'a Field> {
    let (head, rest) = segments.split_first()?;
    for field in fields.iter().filter(|f| &f.name == head) {
        if rest.is_empty() {
            return Some(field);
        }
        if let Some(children) = field.section_fields() {
            return find_in(children, rest);
        }
    }
    None
}

/// A section directly under the schema root.
#[derive(Debug, Clone, PartialEq)]
pub struct TopLevelSection<'a> {
    /// Stable identifier: the section's `name`.
    pub id: &'a str,
    /// Position among top-level sections only.
    pub index: usize,
    /// Position in the full top-level field list.
    pub position: usize,
    pub field: &'a Field,
}

/// The top-level sections of `fields`, in order.
pub fn derive_top_level_sections(fields: &[Field]) -> Vec<TopLevelSection<'_>> {
    fields
        .iter()
        .enumerate()
        .filter(|(_, f)| f.is_section())
        .enumerate()
        .map(|(index, (position, field))| TopLevelSection {
            id: &field.name,
            index,
            position,
            field,
        })
        .collect()
}
