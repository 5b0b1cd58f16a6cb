//! # dynform-schema — Form Schema Model & Validation
//!
//! Everything that can be said about a form without a live session: the
//! schema tree itself, how it is loaded, how it is walked, and how one
//! field's value is judged.
//!
//! ## Loading (`document`)
//!
//! [`FormSchema::from_json_str`], [`FormSchema::from_yaml_str`] and
//! [`FormSchema::from_value`] parse a document, check it against the
//! embedded `form.schema.json`, compile field patterns, and decode it into
//! the typed model in [`schema`]. Rejections are
//! [`MalformedSchemaError`](dynform_core::MalformedSchemaError)s.
//!
//! ## Walking (`walk`)
//!
//! - [`flatten`] — leaves with their dot-paths, in document order.
//! - [`initialize_defaults`] — the initial form record.
//! - [`find_field`] — path → field definition.
//! - [`derive_top_level_sections`] — sections directly under the root.
//!
//! ## Validation (`validate`, `custom`)
//!
//! [`validate`] applies the built-in rules (required, email, password
//! length, numeric range, pattern) and then any named custom validator
//! from a [`ValidatorRegistry`]. [`validate_all`] runs every leaf.
//!
//! ## Reordering (`reorder`)
//!
//! [`reorder_top_level_section`] moves one top-level section to another
//! section's slot and returns the new field list.
//!
//! ## Crate Policy
//!
//! - Depends only on `dynform-core` internally.
//! - Every operation is pure. Nothing here owns mutable session state.
//! - The embedded meta-schema and the typed model must accept the same
//!   documents; change both together.

pub mod custom;
pub mod document;
pub mod reorder;
pub mod schema;
pub mod validate;
pub mod value;
pub mod walk;

pub use custom::{CustomValidator, ValidatorRegistry};
pub use document::{check_shape, FORM_META_SCHEMA};
pub use reorder::{reorder_matching, reorder_top_level_section};
pub use schema::{
    Field, FieldDecodeError, FieldKind, FieldPattern, FormSchema, RawField, Section, SelectOption,
    DEFAULT_SUBMIT_LABEL,
};
pub use validate::{validate, validate_all, FieldError};
pub use walk::{
    default_value, derive_top_level_sections, find_field, flatten, flatten_under,
    initialize_defaults, FlatField, TopLevelSection,
};
