//! HAR document model and validation.
//!
//! Only the slice of HAR 1.2 that event extraction needs is modelled: the
//! `log.entries` sequence, each entry's request line, and the response body
//! text that holds the embedded GraphQL payload. Everything else in the
//! capture is ignored.

use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use tokio::fs;

use crate::Error;

/// Top level structure of a HAR file.
#[derive(Debug, Deserialize)]
pub struct Har {
    pub log: HarLog,
}

/// The `log` object of a HAR file.
#[derive(Debug, Deserialize)]
pub struct HarLog {
    #[serde(default)]
    pub entries: Vec<HarEntry>,
}

/// One captured HTTP transaction.
#[derive(Debug, Deserialize)]
pub struct HarEntry {
    #[serde(default)]
    pub request: Option<HarRequest>,
    #[serde(default)]
    pub response: Option<HarResponse>,
}

/// Request line of a captured transaction.
#[derive(Debug, Deserialize)]
pub struct HarRequest {
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub url: String,
}

/// Response of a captured transaction.
#[derive(Debug, Deserialize)]
pub struct HarResponse {
    #[serde(default)]
    pub content: Option<HarContent>,
}

/// Response body holder; `text` carries the embedded JSON payload.
#[derive(Debug, Deserialize)]
pub struct HarContent {
    #[serde(default)]
    pub text: Option<String>,
}

impl Har {
    /// Load and decode a HAR file from disk.
    pub async fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path).await?;
        serde_json::from_str(&content)
            .map_err(|e| Error::har(format!("{}: {}", path.display(), e)))
    }

    /// Response body text of each entry, in document order.
    pub fn entry_texts(&self) -> impl Iterator<Item = Option<&str>> {
        self.log.entries.iter().map(|entry| {
            entry
                .response
                .as_ref()
                .and_then(|response| response.content.as_ref())
                .and_then(|content| content.text.as_deref())
        })
    }
}

/// Structural HAR check over a decoded JSON value.
///
/// True when the value is an object whose `log` object carries both
/// `version` and `entries`. Event content is never inspected.
pub fn validate_har_structure(value: &Value) -> bool {
    let Some(log) = value
        .as_object()
        .and_then(|root| root.get("log"))
        .and_then(Value::as_object)
    else {
        return false;
    };
    log.contains_key("version") && log.contains_key("entries")
}

/// Structural HAR check for a file on disk.
///
/// False for a missing path, an empty file, invalid JSON, or a JSON value
/// failing [`validate_har_structure`]; true otherwise.
pub async fn validate_har_file<P: AsRef<Path>>(path: P) -> bool {
    let path = path.as_ref();
    let Ok(metadata) = fs::metadata(path).await else {
        return false;
    };
    if metadata.len() == 0 {
        return false;
    }
    let Ok(content) = fs::read_to_string(path).await else {
        return false;
    };
    let Ok(value) = serde_json::from_str::<Value>(&content) else {
        return false;
    };
    validate_har_structure(&value)
}
