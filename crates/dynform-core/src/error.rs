//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types shared across the dynform crates. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Nothing here is fatal. A rejected schema leaves the previous session
//!   active; a failed save leaves in-memory values untouched.
//! - Per-field validation failures are *not* errors in this sense. They are
//!   plain data collected into a session's error map.
//! - Unknown field types are not errors either; they load as an
//!   "unsupported" field kind that validates as always-valid.

use thiserror::Error;

/// Top-level error type for dynform.
#[derive(Error, Debug)]
pub enum DynformError {
    /// A schema document was rejected.
    #[error("malformed schema: {0}")]
    MalformedSchema(#[from] MalformedSchemaError),

    /// The persistence collaborator failed.
    #[error("persistence failure: {0}")]
    Persistence(#[from] PersistenceError),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A schema document could not be accepted.
///
/// Returned by schema loading and by session schema replacement. The caller
/// keeps whatever schema it had before.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MalformedSchemaError {
    /// The document text is not valid JSON.
    #[error("invalid JSON: {reason}")]
    InvalidJson {
        /// Parser message.
        reason: String,
    },

    /// The document text is not valid YAML.
    #[error("invalid YAML: {reason}")]
    InvalidYaml {
        /// Parser message.
        reason: String,
    },

    /// The document has no `fields` sequence (at the root or in a section).
    #[error("schema is missing a `fields` sequence")]
    MissingFields,

    /// The document failed the structural shape check.
    #[error("schema shape check failed:\n{}", .violations.join("\n"))]
    ShapeViolation {
        /// One line per violation, `<instance path>: <message>`.
        violations: Vec<String>,
    },

    /// A field's `pattern` is not a valid regular expression.
    #[error("invalid pattern for field '{path}': {reason}")]
    InvalidPattern {
        /// Dot-path of the offending field.
        path: String,
        /// Regex compiler message.
        reason: String,
    },

    /// A field could not be decoded into the typed model.
    #[error("invalid field: {reason}")]
    InvalidField {
        /// Decoder message.
        reason: String,
    },
}

/// Error in the persistence collaborator.
///
/// In-memory session state is never modified as a consequence of one of
/// these; callers can retry or surface the failure.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Reading the stored value failed.
    #[error("failed to load '{key}': {reason}")]
    Load {
        /// Storage key.
        key: String,
        /// Underlying cause.
        reason: String,
    },

    /// Writing the stored value failed.
    #[error("failed to save '{key}': {reason}")]
    Save {
        /// Storage key.
        key: String,
        /// Underlying cause.
        reason: String,
    },

    /// The stored value exists but is not a sequence of records.
    #[error("stored value under '{key}' is corrupt: {reason}")]
    Corrupt {
        /// Storage key.
        key: String,
        /// Decoder message.
        reason: String,
    },

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
