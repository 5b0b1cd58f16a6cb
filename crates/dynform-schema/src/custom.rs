//! # Custom Validators
//!
//! A schema cannot carry executable code, so a field's `validation`
//! attribute is a *name*. The host registers the code under that name in a
//! [`ValidatorRegistry`] and hands the registry to the session. At
//! validation time the name is looked up and the validator is called with
//! the field's value and the whole form record, which lets rules such as
//! "confirm password must match password" see sibling values.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use dynform_core::FormRecord;
use serde_json::Value;

/// Host-supplied validation rule.
pub trait CustomValidator: Send + Sync {
    /// Return an error message, or `None` when the value is acceptable.
    fn validate(&self, value: Option<&Value>, record: &FormRecord) -> Option<String>;
}

impl<F> CustomValidator for F
where
    F: Fn(Option<&Value>, &FormRecord) -> Option<String> + Send + Sync,
{
    fn validate(&self, value: Option<&Value>, record: &FormRecord) -> Option<String> {
        self(value, record)
    }
}

/// Name → validator lookup table.
#[derive(Clone, Default)]
pub struct ValidatorRegistry {
    validators: HashMap<String, Arc<dyn CustomValidator>>,
}

impl ValidatorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `validator` under `name`, replacing any earlier entry.
    pub fn register(&mut self, name: impl Into<String>, validator: impl CustomValidator + 'static) -> &mut Self {
        self.validators.insert(name.into(), Arc::new(validator));
        self
    }

    /// Register a closure under `name`.
    pub fn register_fn<F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(Option<&Value>, &FormRecord) -> Option<String> + Send + Sync + 'static,
    {
        self.register(name, f)
    }

    /// Look up a validator.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn CustomValidator>> {
        self.validators.get(name)
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.validators.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.validators.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorRegistry")
            .field("names", &self.names())
            .finish()
    }
}
