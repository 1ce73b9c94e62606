//! Keyword classification of raw record text: event kind, actor country,
//! and map coordinates.

use std::sync::LazyLock;

use regex::Regex;

use crate::event::EventKind;

/// Kind patterns, checked in order; first hit wins.
static KIND_PATTERNS: LazyLock<Vec<(EventKind, Regex)>> = LazyLock::new(|| {
    [
        (
            EventKind::Strike,
            r"(?i)airstrike|strike|explosion|attack|bombing|rocket|missile|drone",
        ),
        (
            EventKind::Blockade,
            r"(?i)blockade|intercept|seiz[uo]re|boarding|vessel.*not.*allowed|shipping.*warning|maritime.*alert|naval.*warning|strait.*closed|waterway.*closed|transit.*banned|shipping.*lane.*closed",
        ),
        (EventKind::Airspace, r"(?i)no.?fly|airspace|air.?defen[cs]e"),
        (
            EventKind::Intel,
            r"(?i)intelligence|satellite|reconnaissance|radar",
        ),
        (
            EventKind::Diplomatic,
            r"(?i)protest|negotiat|diplomat|statement|condemn|warn",
        ),
    ]
    .into_iter()
    .map(|(kind, pat)| (kind, Regex::new(pat).unwrap()))
    .collect()
});

/// Keyword → actor country. Neighbouring theatres map onto the principal
/// actors, matching the upstream feed conventions.
const COUNTRY_KEYWORDS: &[(&str, &str)] = &[
    ("israel", "israel"),
    ("tel aviv", "israel"),
    ("gaza", "israel"),
    ("lebanon", "israel"),
    ("iran", "iran"),
    ("tehran", "iran"),
    ("yemen", "iran"),
    ("syria", "iran"),
    ("usa", "usa"),
    ("saudi", "usa"),
    ("uae", "usa"),
];

/// Named locations with coordinates, matched as substrings of the text.
const LOCATIONS: &[(&str, (f64, f64))] = &[
    ("gaza", (31.5, 34.47)),
    ("tel aviv", (32.08, 34.78)),
    ("jerusalem", (31.77, 35.22)),
    ("haifa", (32.82, 34.98)),
    ("tehran", (35.69, 51.39)),
    ("hormuz", (26.56, 56.27)),
    ("red sea", (20.0, 38.0)),
    ("beirut", (33.89, 35.49)),
    ("damascus", (33.51, 36.29)),
    ("persian gulf", (27.0, 52.0)),
    ("baghdad", (33.31, 44.36)),
    ("sanaa", (15.37, 47.61)),
    ("riyadh", (24.71, 46.68)),
    ("doha", (25.29, 51.53)),
];

/// Per-country fallback coordinates when no named location matches.
const COUNTRY_COORDS: &[(&str, (f64, f64))] = &[
    ("israel", (32.0, 35.0)),
    ("iran", (32.0, 53.0)),
    ("usa", (28.5, 45.0)),
    ("saudi", (24.0, 45.0)),
    ("uae", (24.0, 54.0)),
    ("yemen", (15.5, 48.0)),
    ("syria", (35.0, 38.0)),
    ("lebanon", (34.0, 36.0)),
    ("turkey", (39.0, 35.0)),
    ("iraq", (33.0, 44.0)),
    ("jordan", (31.0, 36.0)),
    ("egypt", (27.0, 30.0)),
];

/// Region center, the last-resort coordinate.
const REGION_CENTER: (f64, f64) = (28.0, 43.0);

const DEFAULT_COUNTRY: &str = "iran";

/// Classify record text into an event kind. Defaults to `Intel` when
/// nothing matches.
pub fn classify(text: &str) -> EventKind {
    for (kind, pattern) in KIND_PATTERNS.iter() {
        if pattern.is_match(text) {
            return *kind;
        }
    }
    EventKind::Intel
}

/// Detect the actor country from keywords in the text.
pub fn detect_country(text: &str) -> String {
    let lower = text.to_lowercase();
    for (keyword, country) in COUNTRY_KEYWORDS {
        if lower.contains(keyword) {
            return (*country).to_string();
        }
    }
    DEFAULT_COUNTRY.to_string()
}

/// Resolve coordinates for the text: the longest matching named location,
/// else the country fallback, else the region center. Returns the matched
/// location name when one was found.
pub fn locate(text: &str, country: &str) -> ((f64, f64), Option<&'static str>) {
    let lower = text.to_lowercase();
    let best = LOCATIONS
        .iter()
        .filter(|(name, _)| lower.contains(name))
        .max_by_key(|(name, _)| name.len());
    if let Some((name, coords)) = best {
        return (*coords, Some(name));
    }
    let fallback = COUNTRY_COORDS
        .iter()
        .find(|(c, _)| *c == country)
        .map(|(_, coords)| *coords)
        .unwrap_or(REGION_CENTER);
    (fallback, None)
}
