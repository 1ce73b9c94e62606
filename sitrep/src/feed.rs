//! The live feed view model: an owned, in-memory projection of the store
//! with active filters and a simulated-append pool. Derived state
//! (`visible`, `stats_by_kind`) is recomputed in full after every mutation
//! rather than patched incrementally.
//!
//! Nothing here touches the persisted document; simulated appends exist
//! only to keep the view animated between real reconciliation cycles.

use chrono::{DateTime, Utc};

use crate::event::{EVENT_KINDS, Event, EventKind, EventTemplate};
use crate::store::EventStore;

/// A simulated append fires every this-many ticks (driven by the caller's
/// timer).
pub const SIM_INTERVAL_TICKS: u64 = 30;

/// How many ticks a simulated event keeps its "new" badge.
pub const NEW_BADGE_TICKS: u64 = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedState {
    /// Before the first store snapshot is applied.
    Loading,
    /// Filters and the simulated timer are active. No way back.
    Ready,
}

pub struct FeedModel {
    state: FeedState,
    events: Vec<Event>,
    ticker: Vec<String>,
    templates: Vec<EventTemplate>,
    country_filter: Option<String>,
    kind_filter: Option<EventKind>,
    /// Indices into `events`, canonical order. Filtering never reorders.
    visible: Vec<usize>,
    stats: Vec<(EventKind, usize)>,
    clock: u64,
    /// (event id, clock at which its badge clears)
    badge_expiry: Vec<(String, u64)>,
    sim_count: u64,
}

impl FeedModel {
    pub fn new() -> Self {
        Self {
            state: FeedState::Loading,
            events: Vec::new(),
            ticker: Vec::new(),
            templates: Vec::new(),
            country_filter: None,
            kind_filter: None,
            visible: Vec::new(),
            stats: Vec::new(),
            clock: 0,
            badge_expiry: Vec::new(),
            sim_count: 0,
        }
    }

    pub fn state(&self) -> FeedState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == FeedState::Ready
    }

    /// Apply the first store snapshot and go `Ready`. Applies exactly once;
    /// later snapshots are ignored (the in-memory copy is now the truth for
    /// this session).
    pub fn apply_snapshot(&mut self, store: &EventStore) {
        if self.is_ready() {
            tracing::debug!("snapshot ignored: feed already live");
            return;
        }
        self.events = store.events.clone();
        self.ticker = store.ticker_texts.clone();
        self.templates = store.templates.clone();
        self.state = FeedState::Ready;
        self.recompute();
    }

    /// Pure state update; recomputes the derived view. No I/O.
    pub fn set_filter(&mut self, country: Option<&str>, kind: Option<EventKind>) {
        self.country_filter = country.map(str::to_string);
        self.kind_filter = kind;
        self.recompute();
    }

    pub fn country_filter(&self) -> Option<&str> {
        self.country_filter.as_deref()
    }

    pub fn kind_filter(&self) -> Option<EventKind> {
        self.kind_filter
    }

    /// Canonical event list, insertion order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn ticker(&self) -> &[String] {
        &self.ticker
    }

    /// Events passing the active filters, canonical order.
    pub fn visible(&self) -> impl Iterator<Item = &Event> {
        self.visible.iter().map(|&i| &self.events[i])
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    /// Visible counts per kind. Sums to `visible_len`.
    pub fn stats_by_kind(&self) -> &[(EventKind, usize)] {
        &self.stats
    }

    /// Distinct countries in canonical order, for filter cycling.
    pub fn countries(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for event in &self.events {
            if !seen.contains(&event.country.as_str()) {
                seen.push(event.country.as_str());
            }
        }
        seen
    }

    pub fn simulated_count(&self) -> u64 {
        self.sim_count
    }

    /// Synthesize an event from the template pool and prepend it to the
    /// in-memory list. Presentation only: the persisted store is never
    /// touched. Returns false (and changes nothing) when there is no pool
    /// or the feed is not live yet.
    pub fn simulate_append(&mut self, template_idx: usize, now: DateTime<Utc>) -> bool {
        if !self.is_ready() {
            tracing::debug!("simulated append skipped: feed not live");
            return false;
        }
        if self.templates.is_empty() {
            tracing::debug!("simulated append skipped: empty template pool");
            return false;
        }

        let template = &self.templates[template_idx % self.templates.len()];
        let id = format!("sim-{}", uuid::Uuid::new_v4());
        let event = Event {
            id: id.clone(),
            kind: template.kind,
            country: template.country.clone(),
            title: template.title.clone(),
            desc: template.desc.clone(),
            location: template.location,
            location_name: template.location_name.clone(),
            time: now,
            source: template.source.clone(),
            is_new: true,
            extra: serde_json::Map::new(),
        };

        self.badge_expiry.push((id, self.clock + NEW_BADGE_TICKS));
        self.events.insert(0, event);
        self.sim_count += 1;
        self.recompute();
        true
    }

    /// Advance the model clock and clear expired "new" badges.
    pub fn tick(&mut self) {
        self.clock += 1;
        let clock = self.clock;
        let (expired, live): (Vec<_>, Vec<_>) = std::mem::take(&mut self.badge_expiry)
            .into_iter()
            .partition(|(_, at)| *at <= clock);
        self.badge_expiry = live;
        if expired.is_empty() {
            return;
        }
        for (id, _) in expired {
            if let Some(event) = self.events.iter_mut().find(|e| e.id == id) {
                event.is_new = false;
            }
        }
        self.recompute();
    }

    pub fn clock(&self) -> u64 {
        self.clock
    }

    /// Full recompute of the derived view: filtered indices in canonical
    /// order, then per-kind counts over them.
    fn recompute(&mut self) {
        self.visible = self
            .events
            .iter()
            .enumerate()
            .filter(|(_, event)| self.matches(event))
            .map(|(i, _)| i)
            .collect();

        self.stats = EVENT_KINDS
            .iter()
            .map(|&kind| {
                let count = self
                    .visible
                    .iter()
                    .filter(|&&i| self.events[i].kind == kind)
                    .count();
                (kind, count)
            })
            .collect();
        let unknown = self
            .visible
            .iter()
            .filter(|&&i| self.events[i].kind == EventKind::Unknown)
            .count();
        if unknown > 0 {
            self.stats.push((EventKind::Unknown, unknown));
        }
    }

    fn matches(&self, event: &Event) -> bool {
        if let Some(country) = &self.country_filter
            && !event.country.eq_ignore_ascii_case(country)
        {
            return false;
        }
        if let Some(kind) = self.kind_filter
            && event.kind != kind
        {
            return false;
        }
        true
    }
}

impl Default for FeedModel {
    fn default() -> Self {
        Self::new()
    }
}
