//! # dynform-core — Foundational Types for dynform
//!
//! The leaf of the workspace DAG. Defines the nested data model that form
//! values live in and the vocabulary the other crates share.
//!
//! ## Key Types
//!
//! - [`FieldPath`] — dot-separated address of a field (`address.city`).
//! - [`FormRecord`] — nested mapping of values, addressed by `FieldPath`.
//!   Writes produce fresh records; nothing is aliased across updates.
//! - [`DynformError`], [`MalformedSchemaError`], [`PersistenceError`] —
//!   the error hierarchy. None of these are fatal.
//! - [`Timestamp`] — UTC, millisecond precision, ISO 8601 with `Z`.
//! - [`SessionId`] — per-session identifier for log correlation.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `dynform-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod path;
pub mod record;
pub mod temporal;

pub use error::{DynformError, MalformedSchemaError, PersistenceError};
pub use identity::SessionId;
pub use path::FieldPath;
pub use record::FormRecord;
pub use temporal::{Timestamp, TimestampParseError};
