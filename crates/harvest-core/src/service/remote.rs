//! Remote HTTP parser service.
//!
//! Forwards the raw HAR content to a parser deployed behind an HTTP API,
//! for microservice and distributed deployments. Transport failures are
//! mapped into `ParseResult` messages; nothing propagates past the service
//! boundary. Timeout, connection-refused, and non-2xx responses each
//! produce a distinct message so operators can tell them apart.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::Deserialize;
use serde_json::json;
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use url::Url;

use crate::events::EventRecord;
use crate::Error;

use super::{HarParserService, ParseResult, ServiceInfo, SERVICE_API};

/// Remote implementation backed by a parser HTTP API.
#[derive(Debug)]
pub struct ApiHarParserService {
    base_url: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

/// Wire shape of a successful `/api/v1/parse-har` response.
#[derive(Debug, Deserialize)]
struct ApiParseResponse {
    #[serde(default)]
    events: Vec<EventRecord>,
}

/// Wire shape of a `/api/v1/validate-har` response.
#[derive(Debug, Deserialize)]
struct ApiValidateResponse {
    #[serde(default)]
    valid: bool,
}

impl ApiHarParserService {
    /// Build a service against `base_url`, with an optional bearer token
    /// and a per-request timeout in seconds.
    pub fn new(base_url: &str, api_key: Option<&str>, timeout_secs: u64) -> crate::Result<Self> {
        Url::parse(base_url)
            .map_err(|e| Error::config(format!("Invalid parser API URL '{base_url}': {e}")))?;

        let mut headers = HeaderMap::new();
        if let Some(key) = api_key {
            let value = HeaderValue::from_str(&format!("Bearer {key}"))
                .map_err(|e| Error::config(format!("Invalid API key: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Read the HAR file that will be forwarded in the request body.
    async fn read_har_content(&self, har_path: &Path) -> Result<String, ParseResult> {
        match fs::read_to_string(har_path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ParseResult::error(
                format!("HAR file not found: {}", har_path.display()),
            )),
            Err(e) => Err(ParseResult::error(format!(
                "Failed to read HAR file {}: {}",
                har_path.display(),
                e
            ))),
        }
    }

    fn transport_error(&self, e: reqwest::Error) -> ParseResult {
        if e.is_timeout() {
            ParseResult::error(format!(
                "API request timed out after {} seconds",
                self.timeout_secs
            ))
        } else if e.is_connect() {
            ParseResult::error(format!(
                "Could not connect to parser API at {}",
                self.base_url
            ))
        } else {
            ParseResult::error(format!("Unexpected error calling parser API: {e}"))
        }
    }
}

#[async_trait]
impl HarParserService for ApiHarParserService {
    async fn parse_har_file(&self, har_path: &Path, debug: bool) -> ParseResult {
        let har_content = match self.read_har_content(har_path).await {
            Ok(content) => content,
            Err(failure) => return failure,
        };

        let payload = json!({
            "har_content": har_content,
            "debug": debug,
            "format": "json",
        });

        let response = match self
            .client
            .post(self.endpoint("api/v1/parse-har"))
            .json(&payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return self.transport_error(e),
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return ParseResult::error(format!("API error {}: {}", status.as_u16(), body));
        }

        match response.json::<ApiParseResponse>().await {
            Ok(body) => ParseResult::ok(body.events),
            Err(e) => ParseResult::error(format!("Invalid response from parser API: {e}")),
        }
    }

    async fn validate_har_file(&self, har_path: &Path) -> bool {
        let Ok(har_content) = fs::read_to_string(har_path).await else {
            return false;
        };

        let response = self
            .client
            .post(self.endpoint("api/v1/validate-har"))
            .json(&json!({ "har_content": har_content }))
            .send()
            .await;

        match response {
            Ok(response) if response.status().is_success() => response
                .json::<ApiValidateResponse>()
                .await
                .map(|body| body.valid)
                .unwrap_or(false),
            _ => false,
        }
    }

    async fn service_info(&self) -> ServiceInfo {
        let fetched = async {
            let response = self
                .client
                .get(self.endpoint("api/v1/info"))
                .send()
                .await
                .map_err(|e| e.to_string())?;
            let status = response.status();
            if !status.is_success() {
                return Err(format!("API info request failed: {}", status.as_u16()));
            }
            response
                .json::<ServiceInfo>()
                .await
                .map_err(|e| e.to_string())
        }
        .await;

        match fetched {
            Ok(mut info) => {
                info.service_type = SERVICE_API.to_string();
                info.base_url = Some(self.base_url.clone());
                info
            }
            Err(error) => ServiceInfo {
                name: "API HAR Parser Service".to_string(),
                service_type: SERVICE_API.to_string(),
                version: "unknown".to_string(),
                description: "Remote API parser service (connection failed)".to_string(),
                capabilities: vec![
                    "parse_events".to_string(),
                    "remote_processing".to_string(),
                ],
                base_url: Some(self.base_url.clone()),
                error: Some(error),
                extra: serde_json::Map::new(),
            },
        }
    }
}
