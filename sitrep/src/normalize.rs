//! Raw record normalization: turn whatever the feed adapter printed into a
//! uniform batch of `RawItem`s, skipping anything unparsable.

use chrono::{DateTime, Utc};
use serde_json::Value;

/// Display text is clipped to this many characters before any further use.
pub const MAX_TEXT_LEN: usize = 100;

/// One normalized record from the external feed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawItem {
    pub text: String,
    /// Native id of the record at the source, when it carries one.
    pub source_id: Option<String>,
    /// Authoring account, without the leading `@`.
    pub handle: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Normalize adapter output into a batch of items. Accepts either a single
/// JSON array or newline-delimited JSON objects; malformed lines and records
/// without usable text are skipped, never fatal.
pub fn normalize(input: &str) -> Vec<RawItem> {
    if input.trim_start().starts_with('[')
        && let Ok(Value::Array(records)) = serde_json::from_str::<Value>(input)
    {
        return records.iter().filter_map(item_from_value).collect();
    }

    input
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            if line.is_empty() {
                return None;
            }
            match serde_json::from_str::<Value>(line) {
                Ok(value) => item_from_value(&value),
                Err(_) => {
                    tracing::debug!("skipping malformed feed line: {line:.60}");
                    None
                }
            }
        })
        .collect()
}

fn item_from_value(value: &Value) -> Option<RawItem> {
    let record = value.as_object()?;

    let text = ["text", "full_text", "title"]
        .iter()
        .find_map(|key| record.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|t| !t.is_empty())?;

    let source_id = record
        .get("id")
        .or_else(|| record.get("id_str"))
        .and_then(|v| match v {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        });

    let handle = record
        .get("author")
        .or_else(|| record.get("user"))
        .and_then(Value::as_object)
        .and_then(|author| {
            author
                .get("username")
                .or_else(|| author.get("screen_name"))
                .and_then(Value::as_str)
        })
        .map(str::to_string);

    let timestamp = record
        .get("createdAt")
        .or_else(|| record.get("created_at"))
        .or_else(|| record.get("time"))
        .and_then(Value::as_str)
        .and_then(parse_timestamp);

    Some(RawItem {
        text: truncate_chars(text, MAX_TEXT_LEN),
        source_id,
        handle,
        timestamp,
    })
}

/// RFC 3339, or the legacy `Wed Oct 05 18:23:00 +0000 2022` form.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%a %b %d %H:%M:%S %z %Y"))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

/// Char-boundary-safe clip.
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        text.chars().take(max).collect()
    }
}
