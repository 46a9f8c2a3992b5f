//! HAR entry scanning and the top-level parse entry point.
//!
//! Each HAR entry's response body text is decoded and searched for events.
//! Well-formed API responses are handled through the known GraphQL path
//! (`data.viewer.suggested_events.events.edges`); anything else falls back
//! to the generic duck-typed tree walk. A single undecodable entry never
//! fails the document.

use serde_json::Value;
use std::path::Path;
use tracing::debug;

use crate::events::{extract_event, find_event_nodes, EventRecord};
use crate::har::Har;

/// Decode an entry's response body text into JSON values.
///
/// The primary strategy decodes the whole text as one JSON document. Some
/// captures instead hold several JSON values concatenated by newlines; when
/// the single-document decode fails, each non-blank line is decoded
/// independently and whichever lines parse are kept. This recovery is
/// best-effort by design: lines that still fail to parse are dropped
/// silently, and a legitimately multi-line single document that was already
/// rejected cannot be recovered here.
pub fn decode_response_text(text: &str) -> Vec<Value> {
    match serde_json::from_str(text) {
        Ok(value) => vec![value],
        Err(_) => text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect(),
    }
}

/// The fixed GraphQL path to the suggested-events connection, when present.
fn suggested_event_edges(data: &Value) -> Option<&Vec<Value>> {
    data.get("data")?
        .get("viewer")?
        .get("suggested_events")?
        .get("events")?
        .get("edges")?
        .as_array()
}

/// Extract events from one decoded response value.
///
/// The fixed path takes precedence: when it resolves to a non-empty edge
/// list, only those edge nodes are extracted and the generic traversal is
/// skipped for this value.
fn collect_events_from_value(data: &Value, debug: bool, records: &mut Vec<EventRecord>) {
    if let Some(edges) = suggested_event_edges(data) {
        if !edges.is_empty() {
            if debug {
                debug!(edge_count = edges.len(), "found event edges via direct path");
            }
            for edge in edges {
                records.push(extract_event(edge.get("node").unwrap_or(&Value::Null)));
            }
            return;
        }
    }
    if debug {
        debug!("falling back to recursive event search");
    }
    for node in find_event_nodes(data) {
        records.push(extract_event(node));
    }
}

/// Scan every entry of a HAR document for events, in document order.
///
/// `debug` gates per-entry diagnostics (emitted through `tracing` at debug
/// level); the returned events are the same either way.
pub fn scan_entries(har: &Har, debug: bool) -> Vec<EventRecord> {
    let mut records = Vec::new();
    for (idx, entry) in har.log.entries.iter().enumerate() {
        if debug {
            if let Some(request) = &entry.request {
                debug!(idx, method = %request.method, url = %request.url, "scanning entry");
            }
        }
        let text = entry
            .response
            .as_ref()
            .and_then(|response| response.content.as_ref())
            .and_then(|content| content.text.as_deref());
        let Some(text) = text.filter(|text| !text.is_empty()) else {
            if debug {
                debug!(idx, "entry has no response text, skipping");
            }
            continue;
        };

        let values = decode_response_text(text);
        if values.is_empty() {
            if debug {
                debug!(idx, "entry response text is not decodable JSON, skipping");
            }
            continue;
        }

        let before = records.len();
        for value in &values {
            collect_events_from_value(value, debug, &mut records);
        }
        if debug {
            debug!(idx, matched = records.len() - before, "entry scanned");
        }
    }
    records
}

/// Parse a HAR file and return every extracted event.
///
/// Fails when the file is missing or the top-level document is not a valid
/// HAR (no `log` object); entries with missing or undecodable response
/// bodies are skipped without error. Zero events is a successful outcome.
/// `debug` raises additional diagnostics through `tracing` at debug level
/// (visible when the subscriber enables it, e.g. `RUST_LOG=debug`) without
/// changing the returned events.
pub async fn parse_har_file<P: AsRef<Path>>(path: P, debug: bool) -> crate::Result<Vec<EventRecord>> {
    let path = path.as_ref();
    let har = Har::from_file(path).await?;
    if debug {
        debug!(
            har = %path.display(),
            entries = har.log.entries.len(),
            "loaded HAR file"
        );
    }
    Ok(scan_entries(&har, debug))
}
