use dcat_harvest_core::{munge_title_to_name, resolve_guid, NameRegistry, Record, NAME_TRUNCATE_LENGTH};
use pretty_assertions::assert_eq;
use serde_json::json;

fn init_logging() {
    harvest_logging::initialize_for_tests();
}

fn record(value: serde_json::Value) -> Record {
    value.as_object().cloned().unwrap_or_default()
}

#[test]
fn munging_is_idempotent() {
    init_logging();
    let once = munge_title_to_name("Cohort: Ageing & Health / Wave 3");
    let twice = munge_title_to_name("Cohort: Ageing & Health / Wave 3");
    assert_eq!(once, twice);
    assert_eq!(once, "cohort-ageing-health-wave-3");
    assert_eq!(munge_title_to_name(&once), once);
}

#[test]
fn repeated_titles_get_sequence_suffixes() {
    init_logging();
    let mut registry = NameRegistry::new();
    let mut names = Vec::new();
    for _ in 0..3 {
        let mut rec = record(json!({ "title": "Title" }));
        names.push(registry.assign_name(&mut rec).unwrap());
        assert_eq!(rec["name"], json!(names.last().unwrap()));
    }
    assert_eq!(names, vec!["title", "title-2", "title-3"]);
}

#[test]
fn registries_do_not_share_names() {
    let mut first = NameRegistry::new();
    let mut second = NameRegistry::new();
    assert_eq!(first.register("survey"), "survey");
    assert_eq!(second.register("survey"), "survey");
}

#[test]
fn truncation_keeps_trailing_year() {
    let title = format!("{} 2023", "Longitudinal imaging study of rare diseases ".repeat(4));
    let name = munge_title_to_name(&title);
    assert!(name.len() <= NAME_TRUNCATE_LENGTH, "{} chars", name.len());
    assert!(name.ends_with("-2023"), "{name}");
    assert!(!name.contains("--"), "{name}");
}

#[test]
fn truncation_without_year_is_exact() {
    let title = "Longitudinal imaging study of rare diseases ".repeat(4);
    let name = munge_title_to_name(&title);
    assert_eq!(name.len(), NAME_TRUNCATE_LENGTH);
    assert!(name.starts_with("longitudinal-imaging-study"));
}

#[test]
fn guid_prefers_uri_over_identifier() {
    let rec = record(json!({
        "uri": "https://fdp.example.org/dataset/42",
        "identifier": "ds-42",
        "name": "forty-two"
    }));
    assert_eq!(
        resolve_guid(&rec, None).as_deref(),
        Some("https://fdp.example.org/dataset/42")
    );
}

#[test]
fn guid_falls_back_to_identifier_in_extras() {
    let rec = record(json!({
        "name": "forty-two",
        "extras": [
            {"key": "uri", "value": ""},
            {"key": "identifier", "value": "ds-42"}
        ]
    }));
    assert_eq!(resolve_guid(&rec, None).as_deref(), Some("ds-42"));
}

#[test]
fn guid_joins_source_url_and_name() {
    let rec = record(json!({ "name": "forty-two" }));
    assert_eq!(
        resolve_guid(&rec, Some("https://fdp.example.org/catalog/")).as_deref(),
        Some("https://fdp.example.org/catalog/forty-two")
    );
    assert_eq!(resolve_guid(&rec, None).as_deref(), Some("forty-two"));
}

#[test]
fn guid_is_none_without_any_candidate() {
    let mut rec = record(json!({ "notes": "no title here" }));
    let mut registry = NameRegistry::new();
    assert_eq!(registry.assign_name(&mut rec), None);
    assert_eq!(resolve_guid(&rec, None), None);
    assert!(registry.is_empty());
}
