//! Serialization of extracted events for downstream consumers.
//!
//! Two formats: a JSON array of event records, and CSV with a fixed header
//! row. CSV fields are quoted only when they contain the separator, quotes,
//! or line breaks, with embedded quotes doubled.

use crate::events::EventRecord;

/// CSV header row, matching the field order of [`EventRecord`].
pub const CSV_HEADER: [&str; 6] = ["Name", "DateTime", "Location", "Details", "Link", "Event ID"];

/// Serialize events as a pretty-printed JSON array.
pub fn events_to_json(events: &[EventRecord]) -> crate::Result<String> {
    Ok(serde_json::to_string_pretty(events)?)
}

/// Serialize events as CSV with a header row.
pub fn events_to_csv(events: &[EventRecord]) -> String {
    let mut out = String::new();
    write_csv_row(&mut out, &CSV_HEADER.map(str::to_string));
    for event in events {
        write_csv_row(
            &mut out,
            &[
                event.name.clone(),
                event.datetime.clone(),
                event.location.clone(),
                event.details.clone(),
                event.link.clone(),
                event.event_id.clone(),
            ],
        );
    }
    out
}

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

fn write_csv_row(out: &mut String, row: &[String]) {
    let mut first = true;
    for cell in row {
        if !first {
            out.push(',');
        } else {
            first = false;
        }
        if needs_quotes(cell) {
            out.push('"');
            out.push_str(&cell.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(cell);
        }
    }
    out.push('\n');
}
