//! # dynform-state — Form Session State
//!
//! Holds the mutable side of a dynamic form. A [`FormSession`] owns one
//! schema and the values, touched flags and validation errors that user
//! events build up against it.
//!
//! ## Event Model
//!
//! Presentation code calls into the session; the session never calls back.
//!
//! - [`FormSession::on_field_change`] — write a value, touch the field,
//!   re-validate that field only.
//! - [`FormSession::on_field_blur`] — touch the field.
//! - [`FormSession::on_submit`] — touch every leaf and sweep-validate. A
//!   clean form goes to a [`SubmissionSink`] and the session resets.
//! - [`FormSession::on_schema_replace`] — discard everything and start
//!   over against a new schema. Malformed documents are rejected up front.
//! - [`FormSession::reorder_section`] — move a top-level section.
//!
//! ## Views
//!
//! [`FormSession::render_plan`] and [`FormSession::field_views`] return
//! borrowed snapshots ([`RenderPlan`], [`SectionView`], [`FieldView`]).
//!
//! ## Crate Policy
//!
//! - Single-threaded and synchronous. Each session is owned by exactly one
//!   form; nothing is shared between sessions.
//! - Failures never leave a session half-updated.

pub mod session;
pub mod sink;
pub mod view;

pub use session::{FormSession, SubmitOutcome};
pub use sink::SubmissionSink;
pub use view::{FieldView, NestedSectionView, RenderPlan, SectionItem, SectionView};
