use ratatui::style::{Color, Modifier, Style};

use sitrep_core::EventKind;

// ── Formwork: near-black backgrounds ───────────────────────────────
pub const FORM: Color = Color::Rgb(12, 12, 14);
pub const FORM_RAISED: Color = Color::Rgb(22, 22, 26);

// ── Text hierarchy ─────────────────────────────────────────────────
pub const CHALK: Color = Color::Rgb(228, 226, 214);
pub const CHALK_DIM: Color = Color::Rgb(128, 126, 118);
pub const ASH: Color = Color::Rgb(70, 70, 66);

// ── Accents ────────────────────────────────────────────────────────
pub const SODIUM: Color = Color::Rgb(232, 163, 60);
pub const ALERT: Color = Color::Rgb(214, 72, 56);
pub const HARBOR: Color = Color::Rgb(98, 160, 188);
pub const SKY: Color = Color::Rgb(140, 190, 220);
pub const VIOLET: Color = Color::Rgb(168, 130, 196);
pub const LICHEN: Color = Color::Rgb(138, 158, 108);

/// Marker color per event kind; anything unrecognized renders grey.
pub fn kind_color(kind: EventKind) -> Color {
    match kind {
        EventKind::Strike => ALERT,
        EventKind::Blockade => HARBOR,
        EventKind::Airspace => SKY,
        EventKind::Intel => VIOLET,
        EventKind::Diplomatic => LICHEN,
        EventKind::Unknown => CHALK_DIM,
    }
}

/// "sitrep" title in the status bar
pub fn app_title() -> Style {
    Style::default().fg(SODIUM).add_modifier(Modifier::BOLD)
}

/// Status bar and help bar background
pub fn bar_bg() -> Style {
    Style::default().bg(FORM_RAISED)
}

/// Dim chrome text (separators, counts, timestamps)
pub fn dim() -> Style {
    Style::default().fg(CHALK_DIM)
}

/// Body text
pub fn text() -> Style {
    Style::default().fg(CHALK)
}

/// Active filter value
pub fn filter_value() -> Style {
    Style::default().fg(SODIUM)
}

/// Ticker line
pub fn ticker() -> Style {
    Style::default().fg(SODIUM).bg(FORM_RAISED)
}

/// Empty-ticker placeholder ("no trending data")
pub fn ticker_empty() -> Style {
    Style::default().fg(ASH).bg(FORM_RAISED)
}

/// "NEW" badge on freshly appended events
pub fn badge_new() -> Style {
    Style::default().fg(ALERT).add_modifier(Modifier::BOLD)
}

/// Help bar key labels
pub fn help_key() -> Style {
    Style::default().fg(SODIUM).add_modifier(Modifier::BOLD)
}

/// Help bar descriptions
pub fn help_desc() -> Style {
    Style::default().fg(CHALK_DIM)
}
