//! Pluggable parser service layer.
//!
//! Callers go through the [`HarParserService`] trait so the in-process
//! parser and a remote HTTP parser are interchangeable without code changes.
//! Implementations are looked up by a service-type tag in a process-wide
//! registry populated once at startup; after that the registry is
//! read-only, so no locking discipline is needed around it.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::config::ParserConfig;
use crate::events::EventRecord;
use crate::Error;

mod local;
mod remote;

pub use local::LocalHarParserService;
pub use remote::ApiHarParserService;

/// Registry tag for the in-process implementation.
pub const SERVICE_LOCAL: &str = "local";
/// Registry tag for the remote HTTP implementation.
pub const SERVICE_API: &str = "api";

/// Standardized result envelope for HAR parsing operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseResult {
    pub success: bool,
    #[serde(default)]
    pub events: Vec<EventRecord>,
    #[serde(default)]
    pub event_count: usize,
    #[serde(default)]
    pub error_message: String,
}

impl ParseResult {
    /// Successful result; `event_count` tracks the event list.
    pub fn ok(events: Vec<EventRecord>) -> Self {
        let event_count = events.len();
        Self {
            success: true,
            events,
            event_count,
            error_message: String::new(),
        }
    }

    /// Failed result with a human-readable message.
    pub fn error<S: Into<String>>(message: S) -> Self {
        let mut error_message = message.into();
        if error_message.is_empty() {
            error_message = "Unknown parsing error".to_string();
        }
        Self {
            success: false,
            events: Vec::new(),
            event_count: 0,
            error_message,
        }
    }
}

/// Descriptor for a parser service implementation.
///
/// Remote services report whatever their info endpoint returns; fields the
/// endpoint omits fall back to defaults, and descriptor keys outside the
/// known set are carried through `extra` rather than dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub service_type: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub capabilities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Any further descriptor fields the service reports
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Contract every parser service implementation fulfills.
///
/// Implementations never panic or propagate transport errors past this
/// boundary; failures surface as `ParseResult::error` or `false`.
#[async_trait]
pub trait HarParserService: Send + Sync {
    /// Parse a HAR file and return structured event data.
    async fn parse_har_file(&self, har_path: &Path, debug: bool) -> ParseResult;

    /// Structural check that a file is a proper HAR document.
    async fn validate_har_file(&self, har_path: &Path) -> bool;

    /// Describe this service implementation.
    async fn service_info(&self) -> ServiceInfo;
}

type ServiceConstructor = fn(&ParserConfig) -> crate::Result<Box<dyn HarParserService>>;

static REGISTRY: Lazy<BTreeMap<&'static str, ServiceConstructor>> = Lazy::new(|| {
    let mut services: BTreeMap<&'static str, ServiceConstructor> = BTreeMap::new();
    services.insert(SERVICE_LOCAL, |_config| {
        Ok(Box::new(LocalHarParserService::new()))
    });
    services.insert(SERVICE_API, |config| {
        let service = ApiHarParserService::new(
            &config.base_url,
            config.api_key.as_deref(),
            config.timeout_secs,
        )?;
        Ok(Box::new(service))
    });
    services
});

/// Construct the parser service selected by `config.service_type`.
pub fn create_parser(config: &ParserConfig) -> crate::Result<Box<dyn HarParserService>> {
    let constructor = REGISTRY.get(config.service_type.as_str()).ok_or_else(|| {
        Error::config(format!(
            "Unknown service type '{}'. Available: {}",
            config.service_type,
            list_available_services().join(", ")
        ))
    })?;
    constructor(config)
}

/// Registered service-type tags, in stable order.
pub fn list_available_services() -> Vec<&'static str> {
    REGISTRY.keys().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_counts_events() {
        let result = ParseResult::ok(Vec::new());
        assert!(result.success);
        assert_eq!(result.event_count, 0);
        assert!(result.error_message.is_empty());
    }

    #[test]
    fn test_error_never_has_empty_message() {
        assert_eq!(ParseResult::error("").error_message, "Unknown parsing error");
        assert_eq!(ParseResult::error("boom").error_message, "boom");
    }

    #[test]
    fn test_service_info_carries_unknown_descriptor_fields() {
        let raw = serde_json::json!({
            "name": "Fleet Parser",
            "version": "2.0.0",
            "region": "us-east-1",
            "uptime_secs": 42
        });
        let info: ServiceInfo = serde_json::from_value(raw).expect("descriptor");
        assert_eq!(info.name, "Fleet Parser");
        assert_eq!(info.extra.get("region"), Some(&serde_json::json!("us-east-1")));

        let back = serde_json::to_value(&info).expect("serialize");
        assert_eq!(back.get("uptime_secs"), Some(&serde_json::json!(42)));
    }

    #[test]
    fn test_registry_lists_both_services() {
        assert_eq!(list_available_services(), vec![SERVICE_API, SERVICE_LOCAL]);
    }

    #[tokio::test]
    async fn test_create_local_parser() -> crate::Result<()> {
        let parser = create_parser(&ParserConfig::default())?;
        assert_eq!(parser.service_info().await.service_type, SERVICE_LOCAL);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_api_parser() -> crate::Result<()> {
        let config = ParserConfig {
            service_type: SERVICE_API.to_string(),
            ..ParserConfig::default()
        };
        let parser = create_parser(&config)?;
        assert_eq!(parser.service_info().await.service_type, SERVICE_API);
        Ok(())
    }

    #[test]
    fn test_unknown_service_type_is_config_error() {
        let config = ParserConfig {
            service_type: "microservice".to_string(),
            ..ParserConfig::default()
        };
        assert!(matches!(create_parser(&config), Err(Error::Config(_))));
    }
}
