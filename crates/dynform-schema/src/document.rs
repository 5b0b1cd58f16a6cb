//! # Schema Documents
//!
//! Loads form schemas from JSON or YAML text. Every document goes through
//! the same pipeline before a [`FormSchema`] is handed out:
//!
//! 1. Parse the text into a `serde_json::Value` (YAML is parsed straight
//!    into the JSON data model).
//! 2. Require an object root with a `fields` key.
//! 3. Check the document against the embedded `form.schema.json`
//!    (Draft 2020-12). All violations are reported together.
//! 4. Compile every `pattern`, reporting the dot-path of the first field
//!    whose pattern does not compile.
//! 5. Deserialize into the typed model.
//!
//! Unknown field types pass every step and load as unsupported fields.

use std::sync::OnceLock;

use dynform_core::{FieldPath, MalformedSchemaError};
use fancy_regex::Regex;
use jsonschema::Validator;
use serde_json::Value;

use crate::schema::FormSchema;

/// Shape definition for form schema documents.
pub const FORM_META_SCHEMA: &str = include_str!("../schemas/form.schema.json");

fn meta_validator() -> Result<&'static Validator, MalformedSchemaError> {
    static VALIDATOR: OnceLock<Result<Validator, String>> = OnceLock::new();
    let compiled = VALIDATOR.get_or_init(|| {
        let meta: Value = serde_json::from_str(FORM_META_SCHEMA).map_err(|e| e.to_string())?;
        jsonschema::options()
            .with_draft(jsonschema::Draft::Draft202012)
            .build(&meta)
            .map_err(|e| e.to_string())
    });
    compiled.as_ref().map_err(|reason| MalformedSchemaError::ShapeViolation {
        violations: vec![format!("form meta-schema failed to compile: {reason}")],
    })
}

impl FormSchema {
    /// Load a schema from JSON text, as typed into a schema editor.
    pub fn from_json_str(text: &str) -> Result<Self, MalformedSchemaError> {
        let value: Value = serde_json::from_str(text).map_err(|e| MalformedSchemaError::InvalidJson {
            reason: e.to_string(),
        })?;
        Self::from_value(value)
    }

    /// Load a schema from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self, MalformedSchemaError> {
        let value: Value = serde_yaml::from_str(text).map_err(|e| MalformedSchemaError::InvalidYaml {
            reason: e.to_string(),
        })?;
        Self::from_value(value)
    }

    /// Load a schema from an already-parsed document.
    pub fn from_value(value: Value) -> Result<Self, MalformedSchemaError> {
        check_shape(&value)?;
        check_patterns(&value)?;
        let schema: FormSchema =
            serde_json::from_value(value).map_err(|e| MalformedSchemaError::InvalidField {
                reason: e.to_string(),
            })?;
        tracing::debug!(
            title = %schema.title,
            fields = schema.fields.len(),
            "loaded form schema"
        );
        Ok(schema)
    }

    /// Pretty-printed JSON, the format the schema editor shows.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Structural checks on a parsed document.
pub fn check_shape(value: &Value) -> Result<(), MalformedSchemaError> {
    let Some(root) = value.as_object() else {
        return Err(MalformedSchemaError::ShapeViolation {
            violations: vec![": document root must be an object".to_string()],
        });
    };
    if !root.contains_key("fields") {
        return Err(MalformedSchemaError::MissingFields);
    }

    let violations: Vec<String> = meta_validator()?
        .iter_errors(value)
        .map(|e| format!("{}: {}", e.instance_path, e))
        .collect();
    if violations.is_empty() {
        Ok(())
    } else {
        tracing::debug!(count = violations.len(), "schema shape check failed");
        Err(MalformedSchemaError::ShapeViolation { violations })
    }
}

fn check_patterns(value: &Value) -> Result<(), MalformedSchemaError> {
    match value.get("fields").and_then(Value::as_array) {
        Some(fields) => check_field_patterns(fields, None),
        None => Ok(()),
    }
}

fn check_field_patterns(fields: &[Value], parent: Option<&FieldPath>) -> Result<(), MalformedSchemaError> {
    for field in fields {
        let name = field.get("name").and_then(Value::as_str).unwrap_or_default();
        let path = FieldPath::join(parent, name);
        if let Some(source) = field.get("pattern").and_then(Value::as_str) {
            Regex::new(source).map_err(|e| MalformedSchemaError::InvalidPattern {
                path: path.to_string(),
                reason: e.to_string(),
            })?;
        }
        if let Some(children) = field.get("fields").and_then(Value::as_array) {
            check_field_patterns(children, Some(&path))?;
        }
    }
    Ok(())
}
