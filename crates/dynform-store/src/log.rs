//! # Submission Log
//!
//! Append-only history of submitted forms, kept as a single JSON array
//! under one store key. Each entry is the submitted values with a
//! `submittedAt` timestamp merged in at the top level:
//!
//! ```json
//! [{"email": "a@b.com", "address": {"city": "Lahore"}, "submittedAt": "2024-03-01T09:30:00.000Z"}]
//! ```
//!
//! The timestamp always wins: a form field that is itself named
//! `submittedAt` is dropped from the entry, so every entry carries the key
//! exactly once.
//!
//! The in-memory copy and the store never disagree: an append whose save
//! fails is rolled back before the error is returned.

use dynform_core::{FormRecord, PersistenceError, Timestamp};
use dynform_state::SubmissionSink;
use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::store::RecordStore;

/// Storage key used when none is configured.
pub const DEFAULT_LOG_KEY: &str = "submittedFormData";

/// Key of the timestamp merged into every entry.
pub const SUBMITTED_AT_KEY: &str = "submittedAt";

/// One entry of the log.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmittedRecord {
    /// Submitted values, never holding a top-level `submittedAt`.
    pub values: FormRecord,
    pub submitted_at: Timestamp,
}

impl SubmittedRecord {
    /// Stamp `values`, dropping any top-level `submittedAt` field.
    pub fn new(values: FormRecord, submitted_at: Timestamp) -> Self {
        let mut map = values.into_map();
        map.remove(SUBMITTED_AT_KEY);
        Self {
            values: FormRecord::from_map(map),
            submitted_at,
        }
    }
}

impl Serialize for SubmittedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (key, value) in self.values.as_map() {
            if key != SUBMITTED_AT_KEY {
                map.serialize_entry(key, value)?;
            }
        }
        map.serialize_entry(SUBMITTED_AT_KEY, &self.submitted_at)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for SubmittedRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Repeated keys resolve to the last occurrence.
        let mut map = Map::<String, Value>::deserialize(deserializer)?;
        let stamp = map
            .remove(SUBMITTED_AT_KEY)
            .ok_or_else(|| de::Error::missing_field(SUBMITTED_AT_KEY))?;
        let submitted_at = Timestamp::deserialize(stamp).map_err(de::Error::custom)?;
        Ok(Self {
            values: FormRecord::from_map(map),
            submitted_at,
        })
    }
}

/// Submission history backed by a [`RecordStore`].
#[derive(Debug)]
pub struct SubmissionLog<S> {
    store: S,
    key: String,
    records: Vec<SubmittedRecord>,
}

impl<S: RecordStore> SubmissionLog<S> {
    /// Load the log stored under `key`.
    ///
    /// A missing key is an empty log. A stored value that does not decode
    /// is logged and treated as empty; the next append overwrites it. A
    /// store that cannot be read at all is an error.
    pub fn open(store: S, key: impl Into<String>) -> Result<Self, PersistenceError> {
        let key = key.into();
        let records = match store.load(&key)? {
            None => Vec::new(),
            Some(text) => match serde_json::from_str::<Vec<SubmittedRecord>>(&text) {
                Ok(records) => records,
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "stored submission log is corrupt, starting empty");
                    Vec::new()
                }
            },
        };
        tracing::debug!(key = %key, records = records.len(), "submission log opened");
        Ok(Self {
            store,
            key,
            records,
        })
    }

    /// Open the log under [`DEFAULT_LOG_KEY`].
    pub fn open_default(store: S) -> Result<Self, PersistenceError> {
        Self::open(store, DEFAULT_LOG_KEY)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Every entry, oldest first.
    pub fn records(&self) -> &[SubmittedRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&SubmittedRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append `values` stamped with the current time and persist the log.
    pub fn append(&mut self, values: &FormRecord) -> Result<&SubmittedRecord, PersistenceError> {
        self.append_at(values.clone(), Timestamp::now())
    }

    /// Append with an explicit timestamp.
    pub fn append_at(
        &mut self,
        values: FormRecord,
        submitted_at: Timestamp,
    ) -> Result<&SubmittedRecord, PersistenceError> {
        self.records.push(SubmittedRecord::new(values, submitted_at));
        if let Err(e) = self.persist() {
            self.records.pop();
            tracing::warn!(key = %self.key, error = %e, "submission not persisted");
            return Err(e);
        }
        tracing::info!(
            key = %self.key,
            records = self.records.len(),
            submitted_at = %submitted_at,
            "submission appended"
        );
        self.records
            .last()
            .ok_or_else(|| PersistenceError::Save {
                key: self.key.clone(),
                reason: "appended record missing from log".to_string(),
            })
    }

    /// Remove every entry, in the store and in memory.
    pub fn clear(&mut self) -> Result<(), PersistenceError> {
        self.store.remove(&self.key)?;
        let dropped = self.records.len();
        self.records.clear();
        tracing::info!(key = %self.key, dropped, "submission log cleared");
        Ok(())
    }

    /// The whole log as indented JSON, for display.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.records)
    }

    fn persist(&mut self) -> Result<(), PersistenceError> {
        let text = serde_json::to_string(&self.records).map_err(|e| PersistenceError::Save {
            key: self.key.clone(),
            reason: e.to_string(),
        })?;
        self.store.save(&self.key, &text)
    }
}

impl<S: RecordStore> SubmissionSink for SubmissionLog<S> {
    fn accept(&mut self, record: &FormRecord) -> Result<(), PersistenceError> {
        self.append(record).map(|_| ())
    }
}
