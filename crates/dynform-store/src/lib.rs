//! # dynform-store — Submission Persistence
//!
//! The persistence collaborator for dynform sessions.
//!
//! - [`RecordStore`] — key → text storage, with [`MemoryStore`] and the
//!   directory-backed [`FileStore`].
//! - [`SubmissionLog`] — the append-only log of submitted records, stored
//!   as one JSON array. Implements
//!   [`SubmissionSink`](dynform_state::SubmissionSink), so it can be passed
//!   straight to [`FormSession::on_submit`](dynform_state::FormSession::on_submit).
//! - [`StoreConfig`] — backend and key selection from the environment or
//!   YAML.
//!
//! ## Crate Policy
//!
//! - A persistence failure never changes in-memory state: failed appends
//!   are rolled back, and sessions keep their values.
//! - A corrupt stored log is reported through `tracing` and replaced on
//!   the next successful append.

pub mod config;
pub mod log;
pub mod store;

pub use config::{ConfigError, StoreBackend, StoreConfig, ENV_STORE_DIR, ENV_STORE_KEY};
pub use log::{SubmissionLog, SubmittedRecord, DEFAULT_LOG_KEY, SUBMITTED_AT_KEY};
pub use store::{is_valid_key, FileStore, MemoryStore, RecordStore};
