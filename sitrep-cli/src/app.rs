use chrono::Utc;
use rand::Rng;

use sitrep_core::{EVENT_KINDS, EventKind, EventStore, FeedModel, SIM_INTERVAL_TICKS};

/// Watch-mode application state: the feed model plus scroll/marquee chrome.
pub struct App {
    pub feed: FeedModel,
    pub scroll_offset: usize,
    pub ticker_offset: usize,
}

impl App {
    pub fn new(snapshot: &EventStore) -> Self {
        let mut feed = FeedModel::new();
        feed.apply_snapshot(snapshot);
        Self {
            feed,
            scroll_offset: 0,
            ticker_offset: 0,
        }
    }

    /// One timer tick: advance the marquee and the model clock; every
    /// `SIM_INTERVAL_TICKS` ticks, append one simulated event to keep the
    /// view alive between real fetches.
    pub fn on_tick(&mut self) {
        self.ticker_offset = self.ticker_offset.wrapping_add(1);
        self.feed.tick();
        if self.feed.clock() % SIM_INTERVAL_TICKS == 0 {
            let pick = rand::rng().random::<u32>() as usize;
            self.feed.simulate_append(pick, Utc::now());
        }
    }

    /// Cycle the country filter through the distinct countries, then off.
    pub fn cycle_country(&mut self) {
        let countries: Vec<String> =
            self.feed.countries().iter().map(|c| c.to_string()).collect();
        let next = match self.feed.country_filter() {
            None => countries.first().cloned(),
            Some(current) => countries
                .iter()
                .position(|c| c.eq_ignore_ascii_case(current))
                .and_then(|i| countries.get(i + 1).cloned()),
        };
        let kind = self.feed.kind_filter();
        self.feed.set_filter(next.as_deref(), kind);
        self.scroll_offset = 0;
    }

    /// Cycle the kind filter through the enumeration, then off.
    pub fn cycle_kind(&mut self) {
        let next = match self.feed.kind_filter() {
            None => Some(EVENT_KINDS[0]),
            Some(current) => EVENT_KINDS
                .iter()
                .position(|&k| k == current)
                .and_then(|i| EVENT_KINDS.get(i + 1).copied()),
        };
        let country = self.feed.country_filter().map(str::to_string);
        self.feed.set_filter(country.as_deref(), next);
        self.scroll_offset = 0;
    }

    pub fn clear_filters(&mut self) {
        self.feed.set_filter(None, None);
        self.scroll_offset = 0;
    }

    pub fn scroll_up(&mut self, amount: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(amount);
    }

    pub fn scroll_down(&mut self, amount: usize, viewport_height: usize) {
        let max_scroll = self.feed.visible_len().saturating_sub(viewport_height);
        self.scroll_offset = self.scroll_offset.saturating_add(amount).min(max_scroll);
    }

    /// Kind label for the status bar, or "all".
    pub fn kind_filter_label(&self) -> &'static str {
        self.feed.kind_filter().map(EventKind::label).unwrap_or("all")
    }
}
