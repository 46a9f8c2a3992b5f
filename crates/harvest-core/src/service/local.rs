//! In-process parser service.
//!
//! Wraps the parser module directly. Suited to local development and
//! single-instance deployments where no network hop is wanted.

use async_trait::async_trait;
use std::path::Path;

use crate::har;
use crate::parser;

use super::{HarParserService, ParseResult, ServiceInfo, SERVICE_LOCAL};

/// Local implementation calling the parser in-process.
#[derive(Debug, Default)]
pub struct LocalHarParserService;

impl LocalHarParserService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl HarParserService for LocalHarParserService {
    async fn parse_har_file(&self, har_path: &Path, debug: bool) -> ParseResult {
        match parser::parse_har_file(har_path, debug).await {
            Ok(events) => ParseResult::ok(events),
            Err(e) => ParseResult::error(e.to_string()),
        }
    }

    async fn validate_har_file(&self, har_path: &Path) -> bool {
        har::validate_har_file(har_path).await
    }

    async fn service_info(&self) -> ServiceInfo {
        ServiceInfo {
            name: "Local HAR Parser Service".to_string(),
            service_type: SERVICE_LOCAL.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            description: "Direct in-process integration with the parser module".to_string(),
            capabilities: vec![
                "parse_events".to_string(),
                "timezone_conversion".to_string(),
                "json_output".to_string(),
                "debug_mode".to_string(),
            ],
            base_url: None,
            error: None,
            extra: serde_json::Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn har_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write fixture");
        file
    }

    #[tokio::test]
    async fn test_parse_success_with_zero_events() {
        let file = har_file(r#"{"log": {"version": "1.2", "entries": []}}"#);
        let result = LocalHarParserService::new()
            .parse_har_file(file.path(), false)
            .await;
        assert!(result.success);
        assert_eq!(result.event_count, 0);
        assert!(result.events.is_empty());
    }

    #[tokio::test]
    async fn test_parse_missing_file_reports_not_found() {
        let result = LocalHarParserService::new()
            .parse_har_file(Path::new("/no/such/file.har"), false)
            .await;
        assert!(!result.success);
        assert!(result.error_message.contains("not found"));
    }

    #[tokio::test]
    async fn test_parse_invalid_json_reports_malformed() {
        let file = har_file("definitely not json");
        let result = LocalHarParserService::new()
            .parse_har_file(file.path(), false)
            .await;
        assert!(!result.success);
        assert!(!result.error_message.is_empty());
    }

    #[tokio::test]
    async fn test_parse_extracts_events_end_to_end() {
        let text = json!({
            "data": {"viewer": {"suggested_events": {"events": {"edges": [
                {"node": {"__typename": "Event", "name": "Edge Event", "id": "7"}}
            ]}}}}
        })
        .to_string();
        let doc = json!({
            "log": {"version": "1.2", "entries": [
                {"response": {"content": {"text": text}}}
            ]}
        });
        let file = har_file(&doc.to_string());
        let result = LocalHarParserService::new()
            .parse_har_file(file.path(), false)
            .await;
        assert!(result.success);
        assert_eq!(result.event_count, 1);
        assert_eq!(result.events[0].name, "Edge Event");
        assert_eq!(result.events[0].event_id, "7");
    }

    #[tokio::test]
    async fn test_validate_delegates_to_structural_check() {
        let good = har_file(r#"{"log": {"version": "1.2", "entries": []}}"#);
        let bad = har_file(r#"{"log": {}}"#);
        let service = LocalHarParserService::new();
        assert!(service.validate_har_file(good.path()).await);
        assert!(!service.validate_har_file(bad.path()).await);
    }
}
