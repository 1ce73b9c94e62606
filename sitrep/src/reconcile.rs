//! Idempotent merge of normalized feed batches into the event document,
//! plus the wholesale ticker/template refresh.

use std::collections::HashSet;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use xxhash_rust::xxh32::xxh32;

use crate::classify;
use crate::event::{Event, EventTemplate};
use crate::normalize::{RawItem, truncate_chars};
use crate::store::EventStore;

/// Rolling ticker is a bounded snapshot, never a log.
pub const MAX_TICKER: usize = 10;
pub const MAX_TICKER_LEN: usize = 100;
pub const TICKER_MARK: &str = "⚡";

/// Simulated-append pool size.
pub const MAX_TEMPLATES: usize = 10;

const MAX_TITLE_LEN: usize = 50;

static URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://\S+").unwrap());

/// Merge a batch into the store. Existing events keep their position and
/// content; their `isNew` flag is cleared (it survives exactly one cycle).
/// Candidates whose id is already present are dropped, so replaying a batch
/// is a no-op. New events are prepended, newest first.
pub fn reconcile(mut store: EventStore, items: Vec<RawItem>, now: DateTime<Utc>) -> EventStore {
    for event in &mut store.events {
        event.is_new = false;
    }

    let known: HashSet<&str> = store.events.iter().map(|e| e.id.as_str()).collect();
    let mut fresh: Vec<Event> = Vec::new();
    for item in &items {
        let candidate = candidate_event(item, now);
        if known.contains(candidate.id.as_str()) {
            continue;
        }
        // Colliding ids within one batch: last one wins.
        if let Some(existing) = fresh.iter_mut().find(|e| e.id == candidate.id) {
            *existing = candidate;
        } else {
            fresh.push(candidate);
        }
    }

    if !fresh.is_empty() {
        fresh.append(&mut store.events);
        store.events = fresh;
    }
    store
}

/// Replace the ticker wholesale. Empty input means an explicitly empty
/// ticker, not "keep the old one". Entries are capped, clipped, and carry
/// the marker glyph.
pub fn update_ticker(mut store: EventStore, new_texts: Vec<String>) -> EventStore {
    store.ticker_texts = new_texts
        .into_iter()
        .take(MAX_TICKER)
        .map(|text| {
            let marked = if text.starts_with(TICKER_MARK) {
                text
            } else {
                format!("{TICKER_MARK} {text}")
            };
            truncate_chars(&marked, MAX_TICKER_LEN)
        })
        .collect();
    store
}

/// Format a batch into ticker lines, deduplicating within the batch by a
/// normalized prefix key.
pub fn build_ticker(items: &[RawItem]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut lines = Vec::new();

    for item in items {
        let Some(key) = dedup_key(&item.text) else {
            continue;
        };
        if !seen.insert(key) {
            continue;
        }

        let line = match &item.handle {
            Some(handle) => format!("{TICKER_MARK} @{handle}: {}", truncate_chars(&item.text, 80)),
            None => format!("{TICKER_MARK} {}", &item.text),
        };
        lines.push(truncate_chars(&line, MAX_TICKER_LEN));
        if lines.len() == MAX_TICKER {
            break;
        }
    }
    lines
}

/// Prefix key for in-batch ticker dedup: URLs stripped, whitespace
/// collapsed, lowercased, first 40 chars. Keys under 10 chars carry too
/// little signal to keep.
fn dedup_key(text: &str) -> Option<String> {
    let stripped = URL_RE.replace_all(text, "");
    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    let key: String = collapsed.to_lowercase().chars().take(40).collect();
    if key.chars().count() < 10 { None } else { Some(key) }
}

/// Rebuild the simulated-append pool: the first event per distinct
/// (kind, country) pair, capped.
pub fn templates_from_events(events: &[Event]) -> Vec<EventTemplate> {
    let mut seen = HashSet::new();
    let mut templates = Vec::new();
    for event in events {
        if !seen.insert((event.kind, event.country.clone())) {
            continue;
        }
        templates.push(EventTemplate::from(event));
        if templates.len() == MAX_TEMPLATES {
            break;
        }
    }
    templates
}

/// Build the candidate event for a raw item. The id is the item's native
/// source id when present, else a content hash, so re-fetching the same
/// underlying record always maps to the same id.
pub fn candidate_event(item: &RawItem, now: DateTime<Utc>) -> Event {
    let kind = classify::classify(&item.text);
    let country = classify::detect_country(&item.text);
    let (location, place) = classify::locate(&item.text, &country);
    let location_name = place
        .map(str::to_string)
        .unwrap_or_else(|| country.to_uppercase());

    Event {
        id: event_id(item),
        kind,
        country,
        title: title_from_text(&item.text),
        desc: item.text.clone(),
        location,
        location_name,
        time: item.timestamp.unwrap_or(now),
        source: item
            .handle
            .as_deref()
            .map(|h| format!("@{h}"))
            .unwrap_or_else(|| "unknown".to_string()),
        is_new: true,
        extra: serde_json::Map::new(),
    }
}

/// Stable dedup key for a raw item.
pub fn event_id(item: &RawItem) -> String {
    if let Some(id) = &item.source_id {
        return id.clone();
    }
    let stamp = item
        .timestamp
        .map(|t| t.to_rfc3339())
        .unwrap_or_default();
    let seed = format!("{}|{stamp}", item.text);
    format!("evt-{:08x}", xxh32(seed.as_bytes(), 0))
}

/// First 50 chars, preferring a word boundary once past 30.
fn title_from_text(text: &str) -> String {
    if text.chars().count() <= MAX_TITLE_LEN {
        return text.trim().to_string();
    }
    let head: String = text.chars().take(MAX_TITLE_LEN).collect();
    let head = head.trim();
    match head.rfind(' ') {
        Some(cut) if cut > 30 => format!("{}...", &head[..cut]),
        _ => head.to_string(),
    }
}
