//! End-to-end tests driving the parser service over real files on disk.

use serde_json::json;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

use harvest_core::{HarParserService, LocalHarParserService};

fn har_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write fixture");
    file
}

fn har_with_entry_texts(texts: &[&str]) -> NamedTempFile {
    let entries: Vec<_> = texts
        .iter()
        .map(|text| {
            json!({
                "request": {"method": "POST", "url": "https://example.com/api/graphql/"},
                "response": {"content": {"text": text}}
            })
        })
        .collect();
    let doc = json!({"log": {"version": "1.2", "entries": entries}});
    har_file(&doc.to_string())
}

#[tokio::test]
async fn empty_entries_parse_to_success_with_no_events() {
    let file = har_file(r#"{"log": {"version": "1.2", "entries": []}}"#);
    let result = LocalHarParserService::new()
        .parse_har_file(file.path(), false)
        .await;
    assert!(result.success);
    assert!(result.events.is_empty());
    assert_eq!(result.event_count, 0);
    assert!(result.error_message.is_empty());
}

#[tokio::test]
async fn bad_entry_payload_does_not_fail_the_document() {
    let good = json!({
        "items": [{"__typename": "Event", "name": "Kept"}]
    })
    .to_string();
    let file = har_with_entry_texts(&["for (;;);{broken", &good]);
    let result = LocalHarParserService::new()
        .parse_har_file(file.path(), false)
        .await;
    assert!(result.success);
    assert_eq!(result.event_count, 1);
    assert_eq!(result.events[0].name, "Kept");
}

#[tokio::test]
async fn concatenated_json_bodies_are_recovered() {
    let text = "{\"data\": {\"node\": {\"__typename\": \"Event\", \"name\": \"Event A\"}}}\n\
                {\"data\": {\"node\": {\"__typename\": \"Event\", \"name\": \"Event B\"}}}";
    let file = har_with_entry_texts(&[text]);
    let result = LocalHarParserService::new()
        .parse_har_file(file.path(), false)
        .await;
    assert!(result.success);
    let names: Vec<_> = result.events.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Event A", "Event B"]);
}

#[tokio::test]
async fn fixed_path_takes_precedence_over_traversal() {
    let text = json!({
        "data": {
            "viewer": {"suggested_events": {"events": {"edges": [
                {"node": {"__typename": "Event", "name": "Edge One"}},
                {"node": {"__typename": "Event", "name": "Edge Two"}}
            ]}}},
            "sidebar": {"__typename": "Event", "name": "Decoy"}
        }
    })
    .to_string();
    let file = har_with_entry_texts(&[&text]);
    let result = LocalHarParserService::new()
        .parse_har_file(file.path(), false)
        .await;
    assert!(result.success);
    let names: Vec<_> = result.events.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Edge One", "Edge Two"]);
}

#[tokio::test]
async fn sparse_event_node_gets_defaults() {
    let text = json!({
        "node": {"__typename": "Event", "name": "Sparse"}
    })
    .to_string();
    let file = har_with_entry_texts(&[&text]);
    let result = LocalHarParserService::new()
        .parse_har_file(file.path(), false)
        .await;
    assert!(result.success);
    let event = &result.events[0];
    assert_eq!(event.link, "");
    assert_eq!(event.location, "");
    assert_eq!(event.details, "");
    assert_eq!(event.datetime, "");
}

#[tokio::test]
async fn parsing_twice_is_identical() {
    let text = json!({
        "items": [
            {"__typename": "Event", "name": "A", "start_timestamp": 1_700_000_000},
            {"name": "B", "eventUrl": "https://example.com/e/2"}
        ]
    })
    .to_string();
    let file = har_with_entry_texts(&[&text]);
    let service = LocalHarParserService::new();
    let first = service.parse_har_file(file.path(), false).await;
    let second = service.parse_har_file(file.path(), false).await;
    assert!(first.success);
    assert_eq!(first, second);
}

#[tokio::test]
async fn debug_flag_does_not_change_results() {
    let text = json!({
        "items": [{"__typename": "Event", "name": "Same"}]
    })
    .to_string();
    let file = har_with_entry_texts(&[&text]);
    let service = LocalHarParserService::new();
    let quiet = service.parse_har_file(file.path(), false).await;
    let loud = service.parse_har_file(file.path(), true).await;
    assert_eq!(quiet, loud);
}

#[tokio::test]
async fn validate_matrix() {
    let service = LocalHarParserService::new();
    assert!(
        !service
            .validate_har_file(Path::new("/no/such/file.har"))
            .await
    );
    assert!(!service.validate_har_file(har_file("").path()).await);
    assert!(!service.validate_har_file(har_file("not json").path()).await);
    assert!(!service.validate_har_file(har_file("[]").path()).await);
    assert!(
        !service
            .validate_har_file(har_file(r#"{"log": {}}"#).path())
            .await
    );
    assert!(
        service
            .validate_har_file(har_file(r#"{"log": {"version": "1.2", "entries": []}}"#).path())
            .await
    );
}

#[tokio::test]
async fn events_preserve_entry_order_across_entries() {
    let first = json!({"e": {"__typename": "Event", "name": "From entry 1"}}).to_string();
    let second = json!({"e": {"__typename": "Event", "name": "From entry 2"}}).to_string();
    let file = har_with_entry_texts(&[&first, &second]);
    let result = LocalHarParserService::new()
        .parse_har_file(file.path(), false)
        .await;
    let names: Vec<_> = result.events.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["From entry 1", "From entry 2"]);
}
