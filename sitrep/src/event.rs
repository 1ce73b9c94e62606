use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category of a reported occurrence. Unrecognized strings in older
/// documents deserialize as `Unknown` rather than failing the whole load.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Strike,
    Blockade,
    Airspace,
    Intel,
    Diplomatic,
    #[serde(other)]
    Unknown,
}

/// The closed enumeration, in display order. `Unknown` is a decode
/// fallback, not a member.
pub const EVENT_KINDS: [EventKind; 5] = [
    EventKind::Strike,
    EventKind::Blockade,
    EventKind::Airspace,
    EventKind::Intel,
    EventKind::Diplomatic,
];

/// Marker presentation for an event kind: list/map glyph + style class.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Marker {
    pub symbol: &'static str,
    pub class: &'static str,
}

impl EventKind {
    /// Total over the enumeration; anything unrecognized gets the default marker.
    pub fn marker(self) -> Marker {
        match self {
            EventKind::Strike => Marker { symbol: "✸", class: "strike" },
            EventKind::Blockade => Marker { symbol: "⚓", class: "blockade" },
            EventKind::Airspace => Marker { symbol: "✈", class: "airspace" },
            EventKind::Intel => Marker { symbol: "◉", class: "intel" },
            EventKind::Diplomatic => Marker { symbol: "✉", class: "diplomatic" },
            EventKind::Unknown => Marker { symbol: "•", class: "default" },
        }
    }

    pub fn label(self) -> &'static str {
        self.marker().class
    }
}

/// One reported occurrence. Field names follow the persisted document
/// (camelCase, `type` for the kind).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub country: String,
    pub title: String,
    pub desc: String,
    /// `[lat, lon]`
    pub location: (f64, f64),
    pub location_name: String,
    pub time: DateTime<Utc>,
    pub source: String,
    #[serde(default)]
    pub is_new: bool,
    /// Keys written by earlier versions (`tweetId`, `url`, `translations`, …)
    /// ride along untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Pruned event used as the simulated-append pool.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTemplate {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub country: String,
    pub location: (f64, f64),
    pub location_name: String,
    pub source: String,
    pub title: String,
    pub desc: String,
}

impl From<&Event> for EventTemplate {
    fn from(ev: &Event) -> Self {
        Self {
            kind: ev.kind,
            country: ev.country.clone(),
            location: ev.location,
            location_name: ev.location_name.clone(),
            source: ev.source.clone(),
            title: ev.title.clone(),
            desc: ev.desc.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&EventKind::Strike).unwrap(),
            "\"strike\""
        );
        assert_eq!(
            serde_json::to_string(&EventKind::Diplomatic).unwrap(),
            "\"diplomatic\""
        );
    }

    #[test]
    fn unknown_kind_falls_back() {
        let kind: EventKind = serde_json::from_str("\"cyberattack\"").unwrap();
        assert_eq!(kind, EventKind::Unknown);
        assert_eq!(kind.marker().class, "default");
    }

    #[test]
    fn marker_is_total() {
        for kind in EVENT_KINDS {
            let marker = kind.marker();
            assert!(!marker.symbol.is_empty());
            assert_ne!(marker.class, "default");
        }
    }

    #[test]
    fn event_round_trip_preserves_extra_keys() {
        let raw = serde_json::json!({
            "id": "1234",
            "type": "strike",
            "country": "israel",
            "title": "t",
            "desc": "d",
            "location": [32.0, 35.0],
            "locationName": "Tel Aviv",
            "time": "2026-06-20T10:00:00Z",
            "source": "@somebody",
            "isNew": false,
            "tweetId": "1234",
            "url": "https://example.com/1234",
        });
        let ev: Event = serde_json::from_value(raw).unwrap();
        assert_eq!(ev.kind, EventKind::Strike);
        assert_eq!(ev.extra["tweetId"], "1234");

        let back = serde_json::to_value(&ev).unwrap();
        assert_eq!(back["url"], "https://example.com/1234");
        assert_eq!(back["locationName"], "Tel Aviv");
        assert_eq!(back["type"], "strike");
    }

    #[test]
    fn missing_is_new_defaults_false() {
        let raw = serde_json::json!({
            "id": "x",
            "type": "intel",
            "country": "iran",
            "title": "t",
            "desc": "d",
            "location": [32.0, 53.0],
            "locationName": "IRAN",
            "time": "2026-06-20T10:00:00Z",
            "source": "@src",
        });
        let ev: Event = serde_json::from_value(raw).unwrap();
        assert!(!ev.is_new);
    }
}
