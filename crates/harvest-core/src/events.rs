//! Event node discovery and field extraction.
//!
//! The GraphQL payloads embedded in HAR captures carry no usable schema, so
//! event discovery is duck-typed: any JSON object whose key set looks like an
//! event is treated as one, regardless of where it sits in the tree. The
//! traversal deliberately keeps descending through matched nodes, so an event
//! nested inside another event (a "related events" edge, say) is reported as
//! well.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::timestamp::central_time_from_value;

/// One extracted event in canonical form.
///
/// Every field defaults to an empty string when the source payload omits it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Event title
    #[serde(default)]
    pub name: String,

    /// Formatted local start time, e.g. `2025-10-04 9:00 PM CDT`
    #[serde(default)]
    pub datetime: String,

    /// Human-readable place name
    #[serde(default)]
    pub location: String,

    /// Accessibility caption of the cover photo, used as a description
    #[serde(default)]
    pub details: String,

    /// Canonical URL for the event page
    #[serde(default)]
    pub link: String,

    /// Upstream event identifier
    #[serde(default)]
    pub event_id: String,
}

/// Decide whether a JSON node is event-shaped.
///
/// A node matches when it carries `__typename == "Event"`, or `name`
/// alongside either `eventUrl` or `start_timestamp`. Some payloads omit
/// `eventUrl` at the matched level, hence the third criterion.
pub fn is_event_node(node: &Value) -> bool {
    let Some(map) = node.as_object() else {
        return false;
    };
    if map.get("__typename").and_then(Value::as_str) == Some("Event") {
        return true;
    }
    map.contains_key("name")
        && (map.contains_key("eventUrl") || map.contains_key("start_timestamp"))
}

/// Collect every event-shaped node in an arbitrary JSON tree.
///
/// Depth-first pre-order: a node is reported at the point it is visited, and
/// traversal continues into its children either way. No deduplication.
pub fn find_event_nodes(root: &Value) -> Vec<&Value> {
    let mut found = Vec::new();
    collect_event_nodes(root, &mut found);
    found
}

fn collect_event_nodes<'a>(node: &'a Value, found: &mut Vec<&'a Value>) {
    match node {
        Value::Object(map) => {
            if is_event_node(node) {
                found.push(node);
            }
            for value in map.values() {
                collect_event_nodes(value, found);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_event_nodes(item, found);
            }
        }
        _ => {}
    }
}

/// Find the first non-null occurrence of `key` anywhere under `node`,
/// in pre-order.
pub fn find_first_key<'a>(node: &'a Value, key: &str) -> Option<&'a Value> {
    match node {
        Value::Object(map) => {
            if let Some(value) = map.get(key) {
                if !value.is_null() {
                    return Some(value);
                }
            }
            map.values().find_map(|value| find_first_key(value, key))
        }
        Value::Array(items) => items.iter().find_map(|item| find_first_key(item, key)),
        _ => None,
    }
}

/// Map one event-shaped node into an [`EventRecord`].
///
/// Missing fields and missing intermediate objects resolve to defaults; this
/// never fails. The start timestamp is taken from the node itself when
/// present, otherwise from the nearest descendant carrying one.
pub fn extract_event(node: &Value) -> EventRecord {
    let location = node
        .get("event_place")
        .and_then(|place| place.get("contextual_name"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let details = node
        .get("cover_photo")
        .and_then(|cover| cover.get("photo"))
        .and_then(|photo| photo.get("accessibility_caption"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let datetime = node
        .get("start_timestamp")
        .filter(|ts| !ts.is_null())
        .or_else(|| find_first_key(node, "start_timestamp"))
        .map(central_time_from_value)
        .unwrap_or_default();

    EventRecord {
        name: string_field(node, "name"),
        datetime,
        location,
        details,
        link: string_field(node, "eventUrl"),
        event_id: string_field(node, "id"),
    }
}

/// Read a scalar field as a string; numeric identifiers are stringified.
fn string_field(node: &Value, key: &str) -> String {
    match node.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}
