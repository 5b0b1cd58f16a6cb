//! Where finalized submissions go.
//!
//! The session does not persist anything itself. On a valid submit it hands
//! the record to a [`SubmissionSink`]; the `dynform-store` crate provides a
//! sink that appends to a persisted log.

use dynform_core::{FormRecord, PersistenceError};

/// Receiver for finalized form records.
pub trait SubmissionSink {
    /// Take ownership of one submitted record.
    ///
    /// An error leaves the session's values as they were, so the user can
    /// retry without re-entering anything.
    fn accept(&mut self, record: &FormRecord) -> Result<(), PersistenceError>;
}

/// Collects submissions in memory.
impl SubmissionSink for Vec<FormRecord> {
    fn accept(&mut self, record: &FormRecord) -> Result<(), PersistenceError> {
        self.push(record.clone());
        Ok(())
    }
}

impl<S: SubmissionSink + ?Sized> SubmissionSink for &mut S {
    fn accept(&mut self, record: &FormRecord) -> Result<(), PersistenceError> {
        (**self).accept(record)
    }
}

impl<S: SubmissionSink + ?Sized> SubmissionSink for Box<S> {
    fn accept(&mut self, record: &FormRecord) -> Result<(), PersistenceError> {
        (**self).accept(record)
    }
}
