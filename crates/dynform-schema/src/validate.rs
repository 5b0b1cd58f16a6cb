//! # Field Validation
//!
//! Pure per-field validation. Rules run in a fixed order and the first
//! failure wins:
//!
//! 1. **Required** — a required field fails when its value is absent,
//!    `null`, an empty string, or an empty array. A checkbox holding
//!    `false` is *not* empty.
//! 2. **Email** — a non-empty email value must look like `local@domain.tld`.
//! 3. **Password length** — a non-empty password must have at least
//!    `minLength` characters.
//! 4. **Numeric** — any number-field value other than `""` must read as a
//!    number and fall within `min`/`max`.
//! 5. **Pattern** — a non-empty value must match the field's pattern.
//! 6. **Custom** — the named host validator, if registered, decides.
//!
//! Sections are never validated directly, and fields of an unsupported
//! type always pass.
//!
//! Whole-form validation ([`validate_all`]) runs every leaf, with no
//! short-circuit across fields, and returns failures in document order.

use std::sync::OnceLock;

use dynform_core::{FieldPath, FormRecord};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::custom::ValidatorRegistry;
use crate::schema::{Field, FieldKind};
use crate::value::{as_number, as_text, is_blank, is_present};
use crate::walk::flatten;

pub const INVALID_EMAIL: &str = "Please enter a valid email address";
pub const INVALID_NUMBER: &str = "Please enter a valid number";
pub const PATTERN_MISMATCH: &str = "Value does not match the required pattern";

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

fn email_regex() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(EMAIL_PATTERN).ok())
        .as_ref()
}

/// A failed validation for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub path: FieldPath,
    pub message: String,
}

/// Validate one field's value.
///
/// `record` is the whole form, passed through to custom validators.
pub fn validate(
    field: &Field,
    value: Option<&Value>,
    record: &FormRecord,
    validators: &ValidatorRegistry,
) -> Option<String> {
    if matches!(field.kind, FieldKind::Section(_) | FieldKind::Unsupported { .. }) {
        return None;
    }

    if field.required && is_blank(value) {
        return Some(format!("{} is required", field.label));
    }

    let text = value
        .filter(|v| is_present(Some(*v)))
        .and_then(as_text);

    match &field.kind {
        FieldKind::Email { .. } => {
            if let Some(text) = &text {
                if !email_regex().is_some_and(|re| re.is_match(text)) {
                    return Some(INVALID_EMAIL.to_string());
                }
            }
        }
        FieldKind::Password {
            min_length: Some(min_length),
            ..
        } if *min_length > 0 => {
            if let Some(text) = &text {
                if text.chars().count() < *min_length {
                    return Some(format!("Password must be at least {min_length} characters"));
                }
            }
        }
        FieldKind::Number { min, max, .. } => {
            if let Some(message) = check_number(value, *min, *max) {
                return Some(message);
            }
        }
        _ => {}
    }

    if let (Some(pattern), Some(text)) = (&field.pattern, &text) {
        if !pattern.is_match(text) {
            return Some(
                pattern
                    .message()
                    .unwrap_or(PATTERN_MISMATCH)
                    .to_string(),
            );
        }
    }

    let name = field.validation.as_deref()?;
    match validators.get(name) {
        Some(validator) => validator.validate(value, record),
        None => {
            tracing::warn!(field = %field.name, validator = %name, "custom validator not registered, skipping");
            None
        }
    }
}

fn check_number(value: Option<&Value>, min: Option<f64>, max: Option<f64>) -> Option<String> {
    if matches!(value, Some(Value::String(s)) if s.is_empty()) {
        return None;
    }
    let Some(n) = as_number(value) else {
        return Some(INVALID_NUMBER.to_string());
    };
    if let Some(min) = min {
        if n < min {
            return Some(format!("Value must be at least {min}"));
        }
    }
    if let Some(max) = max {
        if n > max {
            return Some(format!("Value must be at most {max}"));
        }
    }
    None
}

/// Validate every leaf of `fields` against `record`.
pub fn validate_all(
    fields: &[Field],
    record: &FormRecord,
    validators: &ValidatorRegistry,
) -> Vec<FieldError> {
    flatten(fields)
        .into_iter()
        .filter_map(|leaf| {
            validate(leaf.field, record.get(&leaf.path), record, validators).map(|message| {
                FieldError {
                    path: leaf.path,
                    message,
                }
            })
        })
        .collect()
}
