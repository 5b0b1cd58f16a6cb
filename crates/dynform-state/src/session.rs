//! # Form Session
//!
//! One live form: a schema plus the values, touched flags and errors that
//! user events accumulate against it. The session is a plain reducer. Each
//! event method runs to completion and leaves the session consistent;
//! nothing is deferred or shared.
//!
//! ## Events
//!
//! | Event                         | values        | touched        | errors                  |
//! |-------------------------------|---------------|----------------|-------------------------|
//! | [`on_field_change`]           | set at path   | + path         | path re-validated       |
//! | [`on_field_blur`]             | —             | + path         | —                       |
//! | [`on_submit`] (invalid)       | —             | + every leaf   | full sweep              |
//! | [`on_submit`] (valid)         | reset         | cleared        | cleared                 |
//! | [`on_schema_replace`]         | new defaults  | cleared        | cleared                 |
//! | [`reorder_section`]           | —             | —              | —                       |
//!
//! A field change validates only the changed field, never its siblings.
//! The submit sweep is the only whole-form validation.
//!
//! [`on_field_change`]: FormSession::on_field_change
//! [`on_field_blur`]: FormSession::on_field_blur
//! [`on_submit`]: FormSession::on_submit
//! [`on_schema_replace`]: FormSession::on_schema_replace
//! [`reorder_section`]: FormSession::reorder_section

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use dynform_core::{FieldPath, FormRecord, MalformedSchemaError, PersistenceError, SessionId};
use dynform_schema::{
    derive_top_level_sections, find_field, flatten, initialize_defaults,
    reorder_top_level_section, validate, validate_all, Field, FieldError, FieldKind, FormSchema,
    ValidatorRegistry,
};
use serde_json::Value;

use crate::sink::SubmissionSink;
use crate::view::{FieldView, NestedSectionView, RenderPlan, SectionItem, SectionView};

/// Result of a submit attempt that reached the validation stage.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The record passed validation and the sink accepted it.
    Submitted { record: FormRecord },
    /// Validation failed. Errors are in document order.
    Invalid { errors: Vec<FieldError> },
}

impl SubmitOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, Self::Submitted { .. })
    }

    /// The field the presentation layer should focus: the first failure.
    pub fn first_error_path(&self) -> Option<&FieldPath> {
        match self {
            Self::Invalid { errors } => errors.first().map(|e| &e.path),
            Self::Submitted { .. } => None,
        }
    }

    /// Every failing path, in document order.
    pub fn errored_paths(&self) -> Vec<&FieldPath> {
        match self {
            Self::Invalid { errors } => errors.iter().map(|e| &e.path).collect(),
            Self::Submitted { .. } => Vec::new(),
        }
    }
}

/// State of one active form.
#[derive(Debug, Clone)]
pub struct FormSession {
    id: SessionId,
    schema: FormSchema,
    values: FormRecord,
    touched: BTreeSet<FieldPath>,
    errors: BTreeMap<FieldPath, String>,
    section_order: Vec<String>,
    validators: Arc<ValidatorRegistry>,
}

impl FormSession {
    /// Start a session with no custom validators.
    pub fn new(schema: FormSchema) -> Self {
        Self::with_validators(schema, ValidatorRegistry::new())
    }

    /// Start a session whose fields may name validators in `validators`.
    pub fn with_validators(schema: FormSchema, validators: impl Into<Arc<ValidatorRegistry>>) -> Self {
        let session = Self {
            id: SessionId::new(),
            values: initialize_defaults(&schema.fields),
            touched: BTreeSet::new(),
            errors: BTreeMap::new(),
            section_order: section_names(&schema.fields),
            validators: validators.into(),
            schema,
        };
        tracing::debug!(
            session_id = %session.id,
            title = %session.schema.title,
            sections = session.section_order.len(),
            "form session started"
        );
        session
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn values(&self) -> &FormRecord {
        &self.values
    }

    pub fn value(&self, path: &FieldPath) -> Option<&Value> {
        self.values.get(path)
    }

    pub fn touched(&self) -> &BTreeSet<FieldPath> {
        &self.touched
    }

    pub fn is_touched(&self, path: &FieldPath) -> bool {
        self.touched.contains(path)
    }

    pub fn errors(&self) -> &BTreeMap<FieldPath, String> {
        &self.errors
    }

    pub fn error(&self, path: &FieldPath) -> Option<&str> {
        self.errors.get(path).map(String::as_str)
    }

    /// An error is shown only after its field has been touched.
    pub fn visible_error(&self, path: &FieldPath) -> Option<&str> {
        self.error(path).filter(|_| self.is_touched(path))
    }

    /// Names of the top-level sections, in current order.
    pub fn section_order(&self) -> &[String] {
        &self.section_order
    }

    pub fn validators(&self) -> &ValidatorRegistry {
        &self.validators
    }

    // ── Events ───────────────────────────────────────────────────────

    /// Record a new value for `path` and re-validate that field alone.
    ///
    /// The values are replaced by a fresh record; earlier snapshots keep
    /// their contents.
    pub fn on_field_change(&mut self, path: &FieldPath, value: Value) {
        self.values = self.values.with_value(path, value);
        self.touched.insert(path.clone());

        let Some(field) = find_field(&self.schema.fields, path) else {
            tracing::debug!(session_id = %self.id, path = %path, "change for a path with no field definition");
            return;
        };
        match validate(field, self.values.get(path), &self.values, &self.validators) {
            Some(message) => {
                self.errors.insert(path.clone(), message);
            }
            None => {
                self.errors.remove(path);
            }
        }
        tracing::debug!(
            session_id = %self.id,
            path = %path,
            valid = !self.errors.contains_key(path),
            "field changed"
        );
    }

    /// Mark `path` touched.
    pub fn on_field_blur(&mut self, path: &FieldPath) {
        self.touched.insert(path.clone());
    }

    /// Touch every leaf and validate the whole form, replacing the error
    /// map. Returns the failures in document order.
    pub fn validate_all(&mut self) -> Vec<FieldError> {
        let leaves = flatten(&self.schema.fields);
        self.touched.extend(leaves.into_iter().map(|leaf| leaf.path));

        let failures = validate_all(&self.schema.fields, &self.values, &self.validators);
        self.errors = failures
            .iter()
            .map(|e| (e.path.clone(), e.message.clone()))
            .collect();
        failures
    }

    /// Validate everything and, if the form is clean, hand the values to
    /// `sink` and reset the session.
    ///
    /// An invalid form never reaches the sink and keeps its values. A sink
    /// failure is returned as `Err` and also keeps the values, so nothing
    /// the user typed is lost.
    pub fn on_submit<S>(&mut self, sink: &mut S) -> Result<SubmitOutcome, PersistenceError>
    where
        S: SubmissionSink + ?Sized,
    {
        let errors = self.validate_all();
        if !errors.is_empty() {
            tracing::debug!(
                session_id = %self.id,
                errors = errors.len(),
                "submit blocked by validation errors"
            );
            return Ok(SubmitOutcome::Invalid { errors });
        }

        let record = self.values.clone();
        if let Err(e) = sink.accept(&record) {
            tracing::warn!(session_id = %self.id, error = %e, "submission could not be saved");
            return Err(e);
        }

        tracing::info!(session_id = %self.id, "form submitted");
        self.reset();
        Ok(SubmitOutcome::Submitted { record })
    }

    /// Swap in a new schema, discarding all session state.
    ///
    /// The session gets a fresh identifier.
    pub fn on_schema_replace(&mut self, schema: FormSchema) {
        let previous = self.id;
        self.id = SessionId::new();
        self.section_order = section_names(&schema.fields);
        self.schema = schema;
        self.reset();
        tracing::info!(
            session_id = %self.id,
            previous_session_id = %previous,
            title = %self.schema.title,
            "form schema replaced"
        );
    }

    /// Replace the schema from a parsed document. A malformed document is
    /// rejected and the session is left exactly as it was.
    pub fn on_schema_replace_value(&mut self, document: Value) -> Result<(), MalformedSchemaError> {
        let schema = FormSchema::from_value(document).map_err(|e| self.reject_schema(e))?;
        self.on_schema_replace(schema);
        Ok(())
    }

    /// Replace the schema from JSON editor text.
    pub fn on_schema_replace_str(&mut self, text: &str) -> Result<(), MalformedSchemaError> {
        let schema = FormSchema::from_json_str(text).map_err(|e| self.reject_schema(e))?;
        self.on_schema_replace(schema);
        Ok(())
    }

    fn reject_schema(&self, error: MalformedSchemaError) -> MalformedSchemaError {
        tracing::warn!(session_id = %self.id, error = %error, "schema replace rejected");
        error
    }

    /// Move the top-level section at `from` to the slot of the section at
    /// `to`. Indices count sections only. `None` or `from == to` is a no-op.
    pub fn reorder_section(&mut self, from: usize, to: Option<usize>) {
        let fields = reorder_top_level_section(&self.schema.fields, from, to);
        if fields == self.schema.fields {
            return;
        }
        self.schema.fields = fields;
        self.section_order = section_names(&self.schema.fields);
        tracing::debug!(
            session_id = %self.id,
            from,
            to = ?to,
            order = ?self.section_order,
            "sections reordered"
        );
    }

    /// Back to schema defaults with nothing touched and no errors.
    pub fn reset(&mut self) {
        self.values = initialize_defaults(&self.schema.fields);
        self.touched.clear();
        self.errors.clear();
    }

    // ── Views ────────────────────────────────────────────────────────

    /// Snapshot of the form for rendering.
    pub fn render_plan(&self) -> RenderPlan<'_> {
        let fields = self
            .schema
            .fields
            .iter()
            .filter(|f| !f.is_section())
            .map(|f| self.field_view(FieldPath::root(f.name.as_str()), f))
            .collect();

        let sections = derive_top_level_sections(&self.schema.fields)
            .into_iter()
            .map(|section| {
                let base = FieldPath::root(section.id);
                let children = section.field.section_fields().unwrap_or_default();
                SectionView {
                    id: section.id,
                    index: section.index,
                    label: &section.field.label,
                    description: section_description(section.field),
                    items: self.section_items(children, &base),
                }
            })
            .collect();

        RenderPlan {
            title: &self.schema.title,
            submit_label: self.schema.submit_label(),
            fields,
            sections,
        }
    }

    /// Every leaf view in render order: loose fields, then each section.
    pub fn field_views(&self) -> Vec<FieldView<'_>> {
        let plan = self.render_plan();
        let RenderPlan {
            mut fields,
            sections,
            ..
        } = plan;
        fields.extend(sections.into_iter().flat_map(SectionView::into_fields));
        fields
    }

    fn section_items<'a>(&'a self, children: &'a [Field], base: &FieldPath) -> Vec<SectionItem<'a>> {
        children
            .iter()
            .map(|child| {
                let path = FieldPath::join(Some(base), &child.name);
                match child.section_fields() {
                    Some(grandchildren) => SectionItem::Section(NestedSectionView {
                        label: &child.label,
                        description: section_description(child),
                        items: self.section_items(grandchildren, &path),
                        path,
                    }),
                    None => SectionItem::Field(self.field_view(path, child)),
                }
            })
            .collect()
    }

    fn field_view<'a>(&'a self, path: FieldPath, field: &'a Field) -> FieldView<'a> {
        FieldView {
            value: self.values.get(&path),
            touched: self.touched.contains(&path),
            error: self.errors.get(&path).map(String::as_str),
            unsupported: field
                .unsupported_type()
                .map(|t| format!("Unsupported field type: {t}")),
            path,
            field,
        }
    }
}

fn section_description(field: &Field) -> Option<&str> {
    match &field.kind {
        FieldKind::Section(s) => s.description.as_deref(),
        _ => None,
    }
}

fn section_names(fields: &[Field]) -> Vec<String> {
    derive_top_level_sections(fields)
        .into_iter()
        .map(|s| s.id.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dynform_schema::SelectOption;
    use serde_json::json;

    fn signup() -> FormSchema {
        FormSchema::from_value(json!({
            "title": "Sign up",
            "fields": [
                {"name": "email", "type": "email", "label": "Email", "required": true},
                {"name": "address", "type": "section", "label": "Address", "fields": [
                    {"name": "city", "type": "text", "label": "City", "required": true}
                ]}
            ]
        }))
        .unwrap()
    }

    // ── Construction ─────────────────────────────────────────────────

    #[test]
    fn test_new_session_starts_at_defaults() {
        let session = FormSession::new(signup());
        assert_eq!(
            session.values().clone().into_value(),
            json!({"email": "", "address": {"city": ""}})
        );
        assert!(session.touched().is_empty());
        assert!(session.errors().is_empty());
        assert_eq!(session.section_order(), ["address".to_string()]);
    }

    // ── Field events ─────────────────────────────────────────────────

    #[test]
    fn test_change_sets_value_and_validates() {
        let mut session = FormSession::new(signup());
        let path = FieldPath::parse("email");
        session.on_field_change(&path, json!("nope"));
        assert_eq!(session.value(&path), Some(&json!("nope")));
        assert!(session.is_touched(&path));
        assert_eq!(session.error(&path), Some("Please enter a valid email address"));

        session.on_field_change(&path, json!("a@b.com"));
        assert_eq!(session.error(&path), None);
    }

    #[test]
    fn test_change_does_not_validate_siblings() {
        let mut session = FormSession::new(signup());
        session.on_field_change(&"email".into(), json!("a@b.com"));
        assert_eq!(session.error(&"address.city".into()), None);
        assert!(!session.is_touched(&"address.city".into()));
    }

    #[test]
    fn test_change_nested_path() {
        let mut session = FormSession::new(signup());
        let city = FieldPath::parse("address.city");
        session.on_field_change(&city, json!(""));
        assert_eq!(session.error(&city), Some("City is required"));
        session.on_field_change(&city, json!("Lahore"));
        assert_eq!(
            session.values().clone().into_value(),
            json!({"email": "", "address": {"city": "Lahore"}})
        );
        assert_eq!(session.error(&city), None);
    }

    #[test]
    fn test_change_unknown_path_only_stores_value() {
        let mut session = FormSession::new(signup());
        let path = FieldPath::parse("ghost");
        session.on_field_change(&path, json!(1));
        assert_eq!(session.value(&path), Some(&json!(1)));
        assert!(session.errors().is_empty());
    }

    #[test]
    fn test_change_leaves_earlier_snapshot_intact() {
        let mut session = FormSession::new(signup());
        let before = session.values().clone();
        session.on_field_change(&"address.city".into(), json!("Lahore"));
        assert_eq!(before.get(&"address.city".into()), Some(&json!("")));
        assert_eq!(session.value(&"address.city".into()), Some(&json!("Lahore")));
    }

    #[test]
    fn test_blur_touches_without_validating() {
        let mut session = FormSession::new(signup());
        let path = FieldPath::parse("email");
        session.on_field_blur(&path);
        assert!(session.is_touched(&path));
        assert!(session.errors().is_empty());
    }

    #[test]
    fn test_sweep_errors_are_visible() {
        let mut session = FormSession::new(signup());
        session.validate_all();
        let path = FieldPath::parse("email");
        assert_eq!(session.visible_error(&path), Some("Email is required"));
    }

    #[test]
    fn test_custom_validator_sees_updated_record() {
        let schema = FormSchema::new(
            "Reset password",
            vec![
                Field::text("password"),
                Field::text("confirm").with_validation("matchesPassword"),
            ],
        );
        let mut registry = ValidatorRegistry::new();
        registry.register_fn("matchesPassword", |value, record| {
            (value != record.get(&"password".into())).then(|| "Passwords do not match".to_string())
        });
        let mut session = FormSession::with_validators(schema, registry);
        session.on_field_change(&"password".into(), json!("s3cret!"));
        session.on_field_change(&"confirm".into(), json!("s3cret"));
        assert_eq!(session.error(&"confirm".into()), Some("Passwords do not match"));
        session.on_field_change(&"confirm".into(), json!("s3cret!"));
        assert_eq!(session.error(&"confirm".into()), None);
    }

    // ── Submit ───────────────────────────────────────────────────────

    #[test]
    fn test_submit_valid_hands_off_and_resets() {
        let mut session = FormSession::new(signup());
        session.on_field_change(&"email".into(), json!("a@b.com"));
        session.on_field_change(&"address.city".into(), json!("Karachi"));

        let mut sink: Vec<FormRecord> = Vec::new();
        let outcome = session.on_submit(&mut sink).unwrap();
        assert!(outcome.is_submitted());
        assert_eq!(
            sink[0].clone().into_value(),
            json!({"email": "a@b.com", "address": {"city": "Karachi"}})
        );
        assert_eq!(
            session.values().clone().into_value(),
            json!({"email": "", "address": {"city": ""}})
        );
        assert!(session.touched().is_empty());
    }

    #[test]
    fn test_submit_invalid_blocks_sink() {
        let mut session = FormSession::new(signup());
        session.on_field_change(&"email".into(), json!("a@b.com"));
        let mut sink: Vec<FormRecord> = Vec::new();
        let outcome = session.on_submit(&mut sink).unwrap();
        assert!(!outcome.is_submitted());
        assert_eq!(outcome.first_error_path(), Some(&FieldPath::parse("address.city")));
        assert!(sink.is_empty());
        assert_eq!(session.value(&"email".into()), Some(&json!("a@b.com")));
    }

    struct FailingSink;

    impl SubmissionSink for FailingSink {
        fn accept(&mut self, _record: &FormRecord) -> Result<(), PersistenceError> {
            Err(PersistenceError::Save {
                key: "submittedFormData".into(),
                reason: "quota exceeded".into(),
            })
        }
    }

    #[test]
    fn test_sink_failure_keeps_values() {
        let mut session = FormSession::new(signup());
        session.on_field_change(&"email".into(), json!("a@b.com"));
        session.on_field_change(&"address.city".into(), json!("Quetta"));
        let err = session.on_submit(&mut FailingSink).unwrap_err();
        assert!(matches!(err, PersistenceError::Save { .. }));
        assert_eq!(session.value(&"address.city".into()), Some(&json!("Quetta")));
    }

    // ── Schema replace ───────────────────────────────────────────────

    #[test]
    fn test_schema_replace_resets_everything() {
        let mut session = FormSession::new(signup());
        let old_id = session.id();
        session.on_field_change(&"email".into(), json!("x"));
        session.on_schema_replace(FormSchema::new("Other", vec![Field::text("name")]));
        assert_ne!(session.id(), old_id);
        assert_eq!(session.values().clone().into_value(), json!({"name": ""}));
        assert!(session.touched().is_empty());
        assert!(session.errors().is_empty());
        assert!(session.section_order().is_empty());
    }

    #[test]
    fn test_malformed_replace_keeps_session() {
        let mut session = FormSession::new(signup());
        session.on_field_change(&"email".into(), json!("x"));
        let before = session.clone();

        let err = session.on_schema_replace_str("{\"title\": ").unwrap_err();
        assert!(matches!(err, MalformedSchemaError::InvalidJson { .. }));
        let err = session.on_schema_replace_value(json!({"title": "no fields"})).unwrap_err();
        assert_eq!(err, MalformedSchemaError::MissingFields);

        assert_eq!(session.id(), before.id());
        assert_eq!(session.schema(), before.schema());
        assert_eq!(session.values(), before.values());
        assert_eq!(session.errors(), before.errors());
    }

    // ── Reorder ──────────────────────────────────────────────────────

    fn three_sections() -> FormSchema {
        FormSchema::new(
            "Profile",
            vec![
                Field::text("name"),
                Field::section("A", vec![Field::text("a1")]),
                Field::section("B", vec![Field::text("b1")]),
                Field::section("C", vec![Field::text("c1")]),
            ],
        )
    }

    #[test]
    fn test_reorder_updates_order_and_schema() {
        let mut session = FormSession::new(three_sections());
        session.reorder_section(2, Some(0));
        assert_eq!(session.section_order(), ["C", "A", "B"]);
        let names: Vec<&str> = session.schema().fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["name", "C", "A", "B"]);
    }

    #[test]
    fn test_reorder_keeps_values() {
        let mut session = FormSession::new(three_sections());
        session.on_field_change(&"B.b1".into(), json!("kept"));
        session.reorder_section(1, Some(0));
        assert_eq!(session.value(&"B.b1".into()), Some(&json!("kept")));
    }

    #[test]
    fn test_reorder_noop() {
        let mut session = FormSession::new(three_sections());
        session.reorder_section(1, None);
        session.reorder_section(1, Some(1));
        assert_eq!(session.section_order(), ["A", "B", "C"]);
    }

    // ── Views ────────────────────────────────────────────────────────

    #[test]
    fn test_render_plan_layout() {
        let schema = FormSchema::new(
            "Mixed",
            vec![
                Field::section("S", vec![Field::text("inner")]),
                Field::text("loose"),
                Field::new(
                    "plan",
                    FieldKind::Select {
                        options: vec![SelectOption::new("free")],
                    },
                ),
            ],
        );
        let session = FormSession::new(schema);
        let plan = session.render_plan();
        assert_eq!(plan.submit_label, "Submit");
        let loose: Vec<String> = plan.fields.iter().map(|v| v.path.to_string()).collect();
        assert_eq!(loose, vec!["loose", "plan"]);
        assert_eq!(plan.sections.len(), 1);
        assert_eq!(plan.sections[0].fields()[0].path.to_string(), "S.inner");

        let order: Vec<String> = session.field_views().iter().map(|v| v.path.to_string()).collect();
        assert_eq!(order, vec!["loose", "plan", "S.inner"]);
        assert_eq!(session.field_views()[1].value, Some(&json!("free")));
    }

    #[test]
    fn test_render_plan_keeps_nested_sections() {
        let schema = FormSchema::from_value(json!({
            "fields": [
                {"name": "profile", "type": "section", "label": "Profile", "fields": [
                    {"name": "name", "type": "text"},
                    {"name": "address", "type": "section", "label": "Address",
                     "description": "Where we send mail", "fields": [
                        {"name": "city", "type": "text"}
                    ]},
                    {"name": "bio", "type": "textarea"}
                ]}
            ]
        }))
        .unwrap();
        let session = FormSession::new(schema);
        let plan = session.render_plan();
        let profile = &plan.sections[0];
        assert_eq!(profile.items.len(), 3);
        match &profile.items[1] {
            SectionItem::Section(nested) => {
                assert_eq!(nested.path.to_string(), "profile.address");
                assert_eq!(nested.label, "Address");
                assert_eq!(nested.description, Some("Where we send mail"));
                assert_eq!(nested.items.len(), 1);
            }
            other => panic!("expected nested section, got {other:?}"),
        }

        let leaves: Vec<String> = profile.fields().iter().map(|v| v.path.to_string()).collect();
        assert_eq!(leaves, vec!["profile.name", "profile.address.city", "profile.bio"]);
        let order: Vec<String> = session.field_views().iter().map(|v| v.path.to_string()).collect();
        assert_eq!(order, leaves);
    }

    #[test]
    fn test_unsupported_view_placeholder() {
        let schema = FormSchema::from_value(json!({
            "fields": [{"name": "fav", "type": "color"}]
        }))
        .unwrap();
        let session = FormSession::new(schema);
        let views = session.field_views();
        assert_eq!(views[0].unsupported.as_deref(), Some("Unsupported field type: color"));
    }

    #[test]
    fn test_view_error_visibility() {
        let mut session = FormSession::new(signup());
        session.validate_all();
        let views = session.field_views();
        assert!(views.iter().all(|v| v.visible_error().is_some()));
    }
}
