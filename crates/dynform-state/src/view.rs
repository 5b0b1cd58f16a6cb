//! # Presentation Views
//!
//! Read-only snapshots a presentation layer renders from. Views borrow
//! from the session, so they are rebuilt after every event rather than
//! kept around.
//!
//! Layout: top-level fields that are not sections come first, in document
//! order. Top-level sections follow in their current order. A section's
//! items keep document order; nested sections appear as their own items
//! with a label, description and children.

use dynform_core::FieldPath;
use dynform_schema::Field;
use serde::Serialize;
use serde_json::Value;

/// Everything needed to render one leaf input.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldView<'a> {
    pub path: FieldPath,
    pub field: &'a Field,
    pub value: Option<&'a Value>,
    pub touched: bool,
    /// Current validation error, whether or not it should be shown yet.
    pub error: Option<&'a str>,
    /// Placeholder text for a field whose type is not supported.
    pub unsupported: Option<String>,
}

impl<'a> FieldView<'a> {
    /// The error to display: only once the field has been touched.
    pub fn visible_error(&self) -> Option<&'a str> {
        if self.touched {
            self.error
        } else {
            None
        }
    }
}

/// One entry of a section, in document order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SectionItem<'a> {
    Field(FieldView<'a>),
    Section(NestedSectionView<'a>),
}

/// A section inside another section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NestedSectionView<'a> {
    pub path: FieldPath,
    pub label: &'a str,
    pub description: Option<&'a str>,
    pub items: Vec<SectionItem<'a>>,
}

/// A top-level section and its contents.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionView<'a> {
    /// The section's name; stable across reorders.
    pub id: &'a str,
    /// Position among top-level sections, as passed to reorder calls.
    pub index: usize,
    pub label: &'a str,
    pub description: Option<&'a str>,
    pub items: Vec<SectionItem<'a>>,
}

impl<'a> SectionView<'a> {
    /// Every leaf under this section, nested ones included, in document order.
    pub fn fields(&self) -> Vec<&FieldView<'a>> {
        let mut out = Vec::new();
        collect_leaves(&self.items, &mut out);
        out
    }

    /// Consume the section into its leaves, in document order.
    pub fn into_fields(self) -> Vec<FieldView<'a>> {
        let mut out = Vec::new();
        drain_leaves(self.items, &mut out);
        out
    }
}

fn collect_leaves<'s, 'a>(items: &'s [SectionItem<'a>], out: &mut Vec<&'s FieldView<'a>>) {
    for item in items {
        match item {
            SectionItem::Field(view) => out.push(view),
            SectionItem::Section(nested) => collect_leaves(&nested.items, out),
        }
    }
}

fn drain_leaves<'a>(items: Vec<SectionItem<'a>>, out: &mut Vec<FieldView<'a>>) {
    for item in items {
        match item {
            SectionItem::Field(view) => out.push(view),
            SectionItem::Section(nested) => drain_leaves(nested.items, out),
        }
    }
}

/// The whole form, ready to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderPlan<'a> {
    pub title: &'a str,
    pub submit_label: &'a str,
    /// Top-level leaves outside any section.
    pub fields: Vec<FieldView<'a>>,
    pub sections: Vec<SectionView<'a>>,
}

impl<'a> RenderPlan<'a> {
    /// Every leaf view in render order.
    pub fn field_views(&self) -> impl Iterator<Item = &FieldView<'a>> {
        self.fields
            .iter()
            .chain(self.sections.iter().flat_map(|s| s.fields()))
    }
}
