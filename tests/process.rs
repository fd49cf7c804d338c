use prefforms::{
    ConfigFile, ConfigHandle, FieldDescriptor, FormDefinition, FormList, FormRegistry, Submission,
    ValueRule,
};
use serde_json::{Value, json};

fn export_registry() -> FormRegistry {
    FormRegistry::new().register(
        FormDefinition::new("Export").field(FieldDescriptor::choice(
            "format",
            &["csv", "sql"],
            "sql",
        )),
    )
}

fn mixed_registry() -> FormRegistry {
    FormRegistry::new().register(
        FormDefinition::new("Sql")
            .field(FieldDescriptor::string("default_charset", "utf-8"))
            .field(FieldDescriptor::integer("max_rows", 25).with_rule(ValueRule::range(1, 5000))),
    )
}

fn fresh_store() -> ConfigHandle {
    ConfigFile::new().into_handle()
}

#[test]
fn no_submission_marker_is_a_no_op_success() {
    let store = fresh_store();
    let mut list = FormList::new(&export_registry(), store.clone());

    // values present but no save marker
    let submission = Submission::new().with_value("Export/format", json!("csv"));
    assert!(list.process(&submission, true, true));
    assert!(!list.has_errors());
    assert!(store.borrow().values().is_empty());
}

#[test]
fn ignoring_the_marker_processes_anyway() {
    let store = fresh_store();
    let mut list = FormList::new(&export_registry(), store.clone());

    let submission = Submission::new().with_value("Export/format", json!("csv"));
    assert!(list.process(&submission, true, false));
    assert_eq!(store.borrow().get("Export/format"), json!("csv"));
}

#[test]
fn partial_save_persists_valid_fields_but_reports_failure() {
    let store = fresh_store();
    let mut list = FormList::new(&mixed_registry(), store.clone());

    let submission = Submission::submitted()
        .with_value("Sql/default_charset", json!("latin1"))
        .with_value("Sql/max_rows", json!("lots"));

    assert!(!list.process(&submission, true, true));
    assert!(list.has_errors());
    assert_eq!(store.borrow().get("Sql/default_charset"), json!("latin1"));
    // the invalid field keeps its default; nothing was written for it
    assert_eq!(store.borrow().get("Sql/max_rows"), json!(25));
    assert!(!store.borrow().values().contains_key("Sql/max_rows"));
}

#[test]
fn without_partial_save_nothing_is_persisted() {
    let store = fresh_store();
    let mut list = FormList::new(&mixed_registry(), store.clone());

    let submission = Submission::submitted()
        .with_value("Sql/default_charset", json!("latin1"))
        .with_value("Sql/max_rows", json!("lots"));

    assert!(!list.process(&submission, false, true));
    assert!(list.has_errors());
    assert!(store.borrow().values().is_empty());
}

#[test]
fn export_scenario_rejects_then_fixes_to_default() {
    let store = fresh_store();
    let mut list = FormList::new(&export_registry(), store.clone());

    let submission = Submission::submitted().with_value("Export/format", json!("xml"));
    assert!(!list.process(&submission, false, true));
    assert!(list.has_errors());
    let errors = list.display_errors();
    assert!(errors.contains("format"));
    assert!(errors.contains("is not one of: csv, sql"));
    assert!(store.borrow().values().is_empty());

    list.fix_errors();
    assert!(!list.has_errors());
    assert_eq!(list.display_errors(), "");
    assert_eq!(store.borrow().get("Export/format"), json!("sql"));
}

#[test]
fn fix_errors_twice_leaves_the_store_unchanged() {
    let store = fresh_store();
    let mut list = FormList::new(&export_registry(), store.clone());

    let submission = Submission::submitted().with_value("Export/format", json!("xml"));
    assert!(!list.process(&submission, false, true));

    list.fix_errors();
    let after_first = store.borrow().values().clone();
    list.fix_errors();
    assert_eq!(store.borrow().values(), &after_first);
}

#[test]
fn absent_checkbox_saves_false_when_marker_present() {
    let registry = FormRegistry::new().register(
        FormDefinition::new("Features").field(FieldDescriptor::bool("version_check", true)),
    );
    let store = fresh_store();
    let mut list = FormList::new(&registry, store.clone());

    assert!(list.process(&Submission::submitted(), true, true));
    assert_eq!(store.borrow().get("Features/version_check"), json!(false));
}

#[test]
fn absent_non_boolean_fields_are_left_unchanged() {
    let store = fresh_store();
    let mut list = FormList::new(&mixed_registry(), store.clone());

    let submission = Submission::submitted().with_value("Sql/max_rows", json!(100));
    assert!(list.process(&submission, true, true));
    assert_eq!(store.borrow().get("Sql/max_rows"), json!(100));
    assert!(!store.borrow().values().contains_key("Sql/default_charset"));
    assert_eq!(store.borrow().get("Sql/default_charset"), json!("utf-8"));
}

#[test]
fn gated_field_is_skipped_until_its_sibling_matches() {
    let registry = FormRegistry::new().register(
        FormDefinition::new("Export")
            .field(FieldDescriptor::choice("format", &["csv", "sql"], "csv"))
            .field(FieldDescriptor::bool("lock_tables", false).when("format", json!("sql"))),
    );
    let store = fresh_store();
    let mut list = FormList::new(&registry, store.clone());

    // format stays csv, so lock_tables is gated off: neither saved nor errored
    let submission = Submission::submitted()
        .with_value("Export/format", json!("csv"))
        .with_value("Export/lock_tables", json!("on"));
    assert!(list.process(&submission, true, true));
    assert!(!store.borrow().values().contains_key("Export/lock_tables"));

    // switching format to sql in the same submission opens the gate,
    // because the gate reads the sibling's staged value
    let submission = Submission::submitted()
        .with_value("Export/format", json!("sql"))
        .with_value("Export/lock_tables", json!("on"));
    assert!(list.process(&submission, true, true));
    assert_eq!(store.borrow().get("Export/lock_tables"), json!(true));
}

#[test]
fn rule_violations_record_exactly_one_error_per_field() {
    let store = fresh_store();
    let mut list = FormList::new(&mixed_registry(), store);

    let submission = Submission::submitted().with_value("Sql/max_rows", json!(0));
    assert!(!list.process(&submission, true, true));
    let form = &list.forms()[0];
    let errors = form.error_map();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors["max_rows"], vec!["value must be at least 1"]);
}

#[test]
fn pattern_and_list_rules_are_enforced() {
    let registry = FormRegistry::new().register(
        FormDefinition::new("Features")
            .field(
                FieldDescriptor::string("default_charset", "utf-8").with_rule(ValueRule::Pattern(
                    regex::Regex::new("^[a-z0-9-]+$").unwrap(),
                )),
            )
            .field(FieldDescriptor::list("favorites").with_rule(ValueRule::MaxItems(2))),
    );
    let store = fresh_store();
    let mut list = FormList::new(&registry, store.clone());

    let submission = Submission::submitted()
        .with_value("Features/default_charset", json!("UTF 8"))
        .with_value("Features/favorites", json!("a, b, c"));
    assert!(!list.process(&submission, true, true));
    assert!(list.has_errors());
    assert!(store.borrow().values().is_empty());

    let submission = Submission::submitted()
        .with_value("Features/default_charset", json!("latin1"))
        .with_value("Features/favorites", json!("a, b"));
    assert!(list.process(&submission, true, true));
    assert_eq!(store.borrow().get("Features/favorites"), json!(["a", "b"]));
}

#[test]
fn store_never_sees_raw_unvalidated_values() {
    let store = fresh_store();
    let mut list = FormList::new(&export_registry(), store.clone());

    let submission = Submission::submitted().with_value("Export/format", json!("xml"));
    list.process(&submission, true, true);
    for value in store.borrow().values().values() {
        assert_ne!(value, &Value::String("xml".to_string()));
    }
}
