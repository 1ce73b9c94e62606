use crossterm::event::Event as TermEvent;

/// Unified event type for the watch loop.
pub enum AppEvent {
    Terminal(TermEvent),
    Tick,
}
