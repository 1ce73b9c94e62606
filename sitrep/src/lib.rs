pub mod classify;
pub mod config;
pub mod event;
pub mod feed;
pub mod normalize;
pub mod reconcile;
pub mod source;
pub mod store;

// Re-exports
pub use config::TrackerConfig;
pub use event::{EVENT_KINDS, Event, EventKind, EventTemplate, Marker};
pub use feed::{FeedModel, FeedState, NEW_BADGE_TICKS, SIM_INTERVAL_TICKS};
pub use normalize::{MAX_TEXT_LEN, RawItem, normalize};
pub use reconcile::{
    build_ticker, candidate_event, event_id, reconcile, templates_from_events, update_ticker,
};
pub use source::{FeedCommand, FeedSource, SourceError};
pub use store::{EventStore, StoreError};
