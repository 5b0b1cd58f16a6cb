//! # Form Session Lifecycle Tests
//!
//! End-to-end checks of a session driven only through its public events:
//! - Submitting an untouched form reports every required failure at once
//! - An invalid submit never reaches the sink and keeps the values
//! - A schema swap always lands on a clean session at the new defaults

use dynform_core::{FieldPath, FormRecord};
use dynform_schema::{initialize_defaults, FormSchema};
use dynform_state::{FormSession, SubmitOutcome};
use proptest::prelude::*;
use serde_json::{json, Value};

fn signup_schema() -> FormSchema {
    FormSchema::from_value(json!({
        "fields": [
            {"name": "email", "type": "email", "required": true},
            {"name": "address", "type": "section", "fields": [
                {"name": "city", "type": "text", "required": true}
            ]}
        ]
    }))
    .expect("signup schema loads")
}

// ── Required-field scenario ──────────────────────────────────────────

#[test]
fn untouched_submit_reports_every_required_field() {
    let mut session = FormSession::new(signup_schema());
    assert_eq!(
        session.values().clone().into_value(),
        json!({"email": "", "address": {"city": ""}})
    );

    let mut sink: Vec<FormRecord> = Vec::new();
    let outcome = session.on_submit(&mut sink).unwrap();

    let SubmitOutcome::Invalid { errors } = outcome else {
        panic!("expected an invalid submit");
    };
    let paths: Vec<String> = errors.iter().map(|e| e.path.to_string()).collect();
    assert_eq!(paths, vec!["email", "address.city"]);
    assert!(session.error(&"email".into()).unwrap().ends_with("is required"));
    assert!(session.error(&"address.city".into()).unwrap().ends_with("is required"));
    assert_eq!(session.errors().len(), 2);
    assert!(sink.is_empty());
}

#[test]
fn invalid_submit_keeps_values_and_skips_sink() {
    let schema = FormSchema::from_value(json!({
        "fields": [
            {"name": "name", "type": "text", "required": true},
            {"name": "notes", "type": "textarea"}
        ]
    }))
    .unwrap();
    let mut session = FormSession::new(schema);
    session.on_field_change(&"notes".into(), json!("draft"));

    let mut sink: Vec<FormRecord> = Vec::new();
    let outcome = session.on_submit(&mut sink).unwrap();

    assert!(!outcome.is_submitted());
    assert_eq!(outcome.errored_paths(), vec![&FieldPath::parse("name")]);
    assert_eq!(session.value(&"notes".into()), Some(&json!("draft")));
    assert!(sink.is_empty());
}

#[test]
fn fix_and_resubmit() {
    let mut session = FormSession::new(signup_schema());
    let mut sink: Vec<FormRecord> = Vec::new();
    assert!(!session.on_submit(&mut sink).unwrap().is_submitted());

    session.on_field_change(&"email".into(), json!("ops@example.com"));
    session.on_field_change(&"address.city".into(), json!("Gwadar"));
    assert!(session.errors().is_empty());

    let outcome = session.on_submit(&mut sink).unwrap();
    assert!(outcome.is_submitted());
    assert_eq!(sink.len(), 1);
    assert_eq!(
        sink[0].get(&"address.city".into()),
        Some(&json!("Gwadar"))
    );
    assert_eq!(session.values(), &initialize_defaults(&session.schema().fields));
}

// ── Schema replace ───────────────────────────────────────────────────

#[test]
fn editor_text_replaces_schema() {
    let mut session = FormSession::new(signup_schema());
    session
        .on_schema_replace_str(r#"{"title": "Feedback", "fields": [{"name": "rating", "type": "number", "min": 1, "max": 5}]}"#)
        .unwrap();
    assert_eq!(session.schema().title, "Feedback");
    assert_eq!(session.values().clone().into_value(), json!({"rating": ""}));
}

fn arbitrary_edits() -> impl Strategy<Value = Vec<(bool, String, String)>> {
    prop::collection::vec(
        (any::<bool>(), prop::sample::select(vec!["email", "address.city", "other"]).prop_map(String::from), "[a-z@.]{0,12}"),
        0..12,
    )
}

proptest! {
    /// Whatever happened before, a schema swap lands on a clean session.
    #[test]
    fn schema_swap_always_resets(edits in arbitrary_edits(), submit in any::<bool>()) {
        let mut session = FormSession::new(signup_schema());
        for (blur_only, path, text) in edits {
            let path = FieldPath::parse(&path);
            if blur_only {
                session.on_field_blur(&path);
            } else {
                session.on_field_change(&path, Value::String(text));
            }
        }
        if submit {
            let mut sink: Vec<FormRecord> = Vec::new();
            let _ = session.on_submit(&mut sink);
        }

        let replacement = FormSchema::from_value(json!({
            "fields": [
                {"name": "subscribe", "type": "checkbox"},
                {"name": "prefs", "type": "section", "fields": [
                    {"name": "plan", "type": "select", "options": [{"value": "free"}, {"value": "pro"}]}
                ]}
            ]
        }))
        .unwrap();
        session.on_schema_replace(replacement.clone());

        prop_assert!(session.touched().is_empty());
        prop_assert!(session.errors().is_empty());
        let expected_values = initialize_defaults(&replacement.fields);
        prop_assert_eq!(session.values(), &expected_values);
        let expected_order = ["prefs".to_string()];
        prop_assert_eq!(session.section_order(), expected_order.as_slice());
    }
}
