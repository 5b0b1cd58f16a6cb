//! # Schema Data Model
//!
//! A form schema is a tree. The root carries a title, an optional submit
//! button label, and an ordered list of [`Field`]s. A field is either a
//! leaf input (text, email, number, ...) or a section holding its own
//! ordered list of fields, nested to any depth.
//!
//! ## Wire Format
//!
//! Schemas travel as JSON (or YAML) with camelCase keys and a `type` tag
//! on every field:
//!
//! ```json
//! {
//!   "title": "Sign up",
//!   "fields": [
//!     { "name": "email", "type": "email", "label": "Email", "required": true },
//!     { "name": "address", "type": "section", "label": "Address",
//!       "fields": [{ "name": "city", "type": "text", "label": "City" }] }
//!   ]
//! }
//! ```
//!
//! Decoding goes through [`RawField`], a flat mirror of the wire shape, and
//! is then narrowed into the typed [`FieldKind`]. A `type` that is not one
//! of the known variants decodes to [`FieldKind::Unsupported`] instead of
//! failing, so one unknown field never takes the whole form down.

use fancy_regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Label used when a schema does not set `submitButtonText`.
pub const DEFAULT_SUBMIT_LABEL: &str = "Submit";

/// Root of a form schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSchema {
    /// Heading shown above the form.
    #[serde(default)]
    pub title: String,
    /// Submit button label; see [`FormSchema::submit_label`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submit_button_text: Option<String>,
    /// Top-level fields, sections included, in document order.
    pub fields: Vec<Field>,
}

impl FormSchema {
    /// Build a schema from a title and field list.
    pub fn new(title: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            title: title.into(),
            submit_button_text: None,
            fields,
        }
    }

    /// The submit button label, falling back to [`DEFAULT_SUBMIT_LABEL`].
    pub fn submit_label(&self) -> &str {
        self.submit_button_text
            .as_deref()
            .unwrap_or(DEFAULT_SUBMIT_LABEL)
    }
}

/// One node of the schema tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawField", into = "RawField")]
pub struct Field {
    /// Identifier, unique among siblings. Forms one segment of the path.
    pub name: String,
    /// Human-readable label. Defaults to `name` when the schema omits it.
    pub label: String,
    /// Whether an empty value fails validation.
    pub required: bool,
    /// Whether the input is rendered read-only.
    pub disabled: bool,
    /// Hint rendered below the input.
    pub help_text: Option<String>,
    /// Initial value; overrides the per-type default.
    pub default_value: Option<Value>,
    /// Regular expression the value must match, with its failure message.
    pub pattern: Option<FieldPattern>,
    /// Name of a host-registered custom validator.
    pub validation: Option<String>,
    /// Type tag and type-specific attributes.
    pub kind: FieldKind,
}

/// Type-specific part of a [`Field`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Text {
        placeholder: Option<String>,
    },
    Email {
        placeholder: Option<String>,
    },
    Password {
        placeholder: Option<String>,
        /// Minimum character count for a non-empty value.
        min_length: Option<usize>,
    },
    Number {
        placeholder: Option<String>,
        min: Option<f64>,
        max: Option<f64>,
    },
    Textarea {
        placeholder: Option<String>,
        rows: Option<u32>,
    },
    Select {
        options: Vec<SelectOption>,
    },
    Checkbox {
        /// Text next to the box; the field label is used when absent.
        checkbox_label: Option<String>,
    },
    Radio {
        options: Vec<SelectOption>,
    },
    File {
        accept: Option<String>,
        multiple: bool,
    },
    Date {
        /// Earliest selectable date, passed through to the picker.
        min: Option<String>,
        /// Latest selectable date, passed through to the picker.
        max: Option<String>,
    },
    /// A group of nested fields. Never holds a value of its own.
    Section(Section),
    /// A `type` this crate does not know. Always validates.
    Unsupported {
        type_name: String,
    },
}

impl FieldKind {
    /// The wire `type` tag.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Text { .. } => "text",
            Self::Email { .. } => "email",
            Self::Password { .. } => "password",
            Self::Number { .. } => "number",
            Self::Textarea { .. } => "textarea",
            Self::Select { .. } => "select",
            Self::Checkbox { .. } => "checkbox",
            Self::Radio { .. } => "radio",
            Self::File { .. } => "file",
            Self::Date { .. } => "date",
            Self::Section(_) => "section",
            Self::Unsupported { type_name } => type_name,
        }
    }
}

/// Children of a section field.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Section {
    pub fields: Vec<Field>,
    pub description: Option<String>,
}

/// One choice of a select or radio field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl SelectOption {
    /// An option whose label is its value.
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            label: None,
        }
    }

    /// Set the display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// A compiled `pattern` with its optional failure message.
///
/// Patterns support look-around and backreferences.
#[derive(Debug, Clone)]
pub struct FieldPattern {
    regex: Regex,
    message: Option<String>,
}

impl FieldPattern {
    /// Compile `source`.
    pub fn new(source: &str, message: Option<String>) -> Result<Self, fancy_regex::Error> {
        Ok(Self {
            regex: Regex::new(source)?,
            message,
        })
    }

    /// The pattern text as written in the schema.
    pub fn source(&self) -> &str {
        self.regex.as_str()
    }

    /// The schema's `patternMessage`, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Whether `text` contains a match (unanchored). A match that exceeds
    /// the backtracking limit counts as a mismatch.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text).unwrap_or(false)
    }
}

impl PartialEq for FieldPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source() == other.source() && self.message == other.message
    }
}

impl Field {
    /// A leaf or section field with the given name and kind; everything
    /// else at its default. The label starts out equal to the name.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            required: false,
            disabled: false,
            help_text: None,
            default_value: None,
            pattern: None,
            validation: None,
            kind,
        }
    }

    /// Shorthand for a plain text field.
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Text { placeholder: None })
    }

    /// Shorthand for a section wrapping `fields`.
    pub fn section(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self::new(
            name,
            FieldKind::Section(Section {
                fields,
                description: None,
            }),
        )
    }

    /// Set the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Mark as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the default value.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Attach a custom validator by name.
    pub fn with_validation(mut self, name: impl Into<String>) -> Self {
        self.validation = Some(name.into());
        self
    }

    /// Whether this node is a section.
    pub fn is_section(&self) -> bool {
        matches!(self.kind, FieldKind::Section(_))
    }

    /// The children, if this node is a section.
    pub fn section_fields(&self) -> Option<&[Field]> {
        match &self.kind {
            FieldKind::Section(section) => Some(&section.fields),
            _ => None,
        }
    }

    /// The unknown `type` tag, if this field's type is unsupported.
    pub fn unsupported_type(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::Unsupported { type_name } => Some(type_name),
            _ => None,
        }
    }

    /// The wire `type` tag.
    pub fn type_name(&self) -> &str {
        self.kind.type_name()
    }
}

// ─── Wire Mirror ─────────────────────────────────────────────────────

/// Flat mirror of a field as it appears on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub disabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<SelectOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accept: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiple: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkbox_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<Field>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Error narrowing a [`RawField`] into a [`Field`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldDecodeError {
    #[error("section '{name}' is missing a `fields` sequence")]
    SectionWithoutFields { name: String },

    #[error("field '{name}': invalid pattern: {reason}")]
    InvalidPattern { name: String, reason: String },

    #[error("field '{name}': `{attribute}` must be {expected}")]
    InvalidAttribute {
        name: String,
        attribute: &'static str,
        expected: &'static str,
    },
}

fn numeric_bound(
    name: &str,
    attribute: &'static str,
    raw: Option<Value>,
) -> Result<Option<f64>, FieldDecodeError> {
    let invalid = || FieldDecodeError::InvalidAttribute {
        name: name.to_string(),
        attribute,
        expected: "a number",
    };
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_f64().map(Some).ok_or_else(invalid),
        Some(Value::String(s)) => s.trim().parse::<f64>().map(Some).map_err(|_| invalid()),
        Some(_) => Err(invalid()),
    }
}

fn date_bound(raw: Option<Value>) -> Option<String> {
    match raw {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

impl TryFrom<RawField> for Field {
    type Error = FieldDecodeError;

    fn try_from(raw: RawField) -> Result<Self, Self::Error> {
        let name = raw.name;
        let kind = match raw.field_type.as_str() {
            "text" => FieldKind::Text {
                placeholder: raw.placeholder,
            },
            "email" => FieldKind::Email {
                placeholder: raw.placeholder,
            },
            "password" => FieldKind::Password {
                placeholder: raw.placeholder,
                min_length: raw.min_length,
            },
            "number" => FieldKind::Number {
                placeholder: raw.placeholder,
                min: numeric_bound(&name, "min", raw.min)?,
                max: numeric_bound(&name, "max", raw.max)?,
            },
            "textarea" => FieldKind::Textarea {
                placeholder: raw.placeholder,
                rows: raw.rows,
            },
            "select" => FieldKind::Select {
                options: raw.options.unwrap_or_default(),
            },
            "checkbox" => FieldKind::Checkbox {
                checkbox_label: raw.checkbox_label,
            },
            "radio" => FieldKind::Radio {
                options: raw.options.unwrap_or_default(),
            },
            "file" => FieldKind::File {
                accept: raw.accept,
                multiple: raw.multiple.unwrap_or(false),
            },
            "date" => FieldKind::Date {
                min: date_bound(raw.min),
                max: date_bound(raw.max),
            },
            "section" => FieldKind::Section(Section {
                fields: raw
                    .fields
                    .ok_or_else(|| FieldDecodeError::SectionWithoutFields { name: name.clone() })?,
                description: raw.description,
            }),
            other => FieldKind::Unsupported {
                type_name: other.to_string(),
            },
        };

        let pattern = match raw.pattern {
            Some(source) => Some(FieldPattern::new(&source, raw.pattern_message).map_err(|e| {
                FieldDecodeError::InvalidPattern {
                    name: name.clone(),
                    reason: e.to_string(),
                }
            })?),
            None => None,
        };

        Ok(Field {
            label: raw.label.unwrap_or_else(|| name.clone()),
            name,
            required: raw.required,
            disabled: raw.disabled,
            help_text: raw.help_text,
            default_value: raw.default_value,
            pattern,
            validation: raw.validation,
            kind,
        })
    }
}

impl From<Field> for RawField {
    fn from(field: Field) -> Self {
        let mut raw = RawField {
            field_type: field.kind.type_name().to_string(),
            label: Some(field.label),
            required: field.required,
            disabled: field.disabled,
            help_text: field.help_text,
            default_value: field.default_value,
            validation: field.validation,
            ..RawField::default()
        };
        if let Some(pattern) = field.pattern {
            raw.pattern = Some(pattern.source().to_string());
            raw.pattern_message = pattern.message;
        }
        match field.kind {
            FieldKind::Text { placeholder } | FieldKind::Email { placeholder } => {
                raw.placeholder = placeholder;
            }
            FieldKind::Password {
                placeholder,
                min_length,
            } => {
                raw.placeholder = placeholder;
                raw.min_length = min_length;
            }
            FieldKind::Number {
                placeholder,
                min,
                max,
            } => {
                raw.placeholder = placeholder;
                raw.min = min.map(Value::from);
                raw.max = max.map(Value::from);
            }
            FieldKind::Textarea { placeholder, rows } => {
                raw.placeholder = placeholder;
                raw.rows = rows;
            }
            FieldKind::Select { options } | FieldKind::Radio { options } => {
                raw.options = Some(options);
            }
            FieldKind::Checkbox { checkbox_label } => raw.checkbox_label = checkbox_label,
            FieldKind::File { accept, multiple } => {
                raw.accept = accept;
                raw.multiple = multiple.then_some(true);
            }
            FieldKind::Date { min, max } => {
                raw.min = min.map(Value::String);
                raw.max = max.map(Value::String);
            }
            FieldKind::Section(section) => {
                raw.fields = Some(section.fields);
                raw.description = section.description;
            }
            FieldKind::Unsupported { .. } => {}
        }
        raw.name = field.name;
        raw
    }
}
