use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use sitrep_core::FeedState;

use crate::app::App;
use crate::theme;

const TICKER_SEP: &str = "   •   ";

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(1), // status bar
        Constraint::Length(1), // ticker marquee
        Constraint::Min(3),    // event list
        Constraint::Length(1), // stats bar
        Constraint::Length(1), // help bar
    ])
    .split(frame.area());

    draw_status_bar(frame, app, chunks[0]);
    draw_ticker(frame, app, chunks[1]);
    draw_events(frame, app, chunks[2]);
    draw_stats(frame, app, chunks[3]);
    draw_help_bar(frame, chunks[4]);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled(" sitrep", theme::app_title()),
        Span::styled(" · ", theme::dim()),
    ];

    match app.feed.state() {
        FeedState::Loading => spans.push(Span::styled("loading", theme::dim())),
        FeedState::Ready => {
            spans.push(Span::styled(
                format!("{} events", app.feed.events().len()),
                theme::text(),
            ));
            spans.push(Span::styled(" · country ", theme::dim()));
            spans.push(Span::styled(
                app.feed.country_filter().unwrap_or("all").to_string(),
                theme::filter_value(),
            ));
            spans.push(Span::styled(" · type ", theme::dim()));
            spans.push(Span::styled(
                app.kind_filter_label(),
                theme::filter_value(),
            ));
            if app.feed.simulated_count() > 0 {
                spans.push(Span::styled(
                    format!(" · {} simulated", app.feed.simulated_count()),
                    theme::dim(),
                ));
            }
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).style(theme::bar_bg()), area);
}

fn draw_ticker(frame: &mut Frame, app: &App, area: Rect) {
    let texts = app.feed.ticker();
    let widget = if texts.is_empty() {
        Paragraph::new(" — no trending data — ").style(theme::ticker_empty())
    } else {
        let window = marquee(texts, app.ticker_offset, area.width as usize);
        Paragraph::new(window).style(theme::ticker())
    };
    frame.render_widget(widget, area);
}

/// Rotate the joined ticker through a window of `width` chars.
fn marquee(texts: &[String], offset: usize, width: usize) -> String {
    if texts.is_empty() {
        return String::new();
    }
    let joined = format!("{}{TICKER_SEP}", texts.join(TICKER_SEP));
    let chars: Vec<char> = joined.chars().collect();
    let start = offset % chars.len();
    chars.iter().cycle().skip(start).take(width).collect()
}

fn draw_events(frame: &mut Frame, app: &App, area: Rect) {
    let viewport = area.height as usize;
    let max_scroll = app.feed.visible_len().saturating_sub(viewport);
    let scroll = app.scroll_offset.min(max_scroll);

    let mut lines: Vec<Line> = Vec::with_capacity(viewport);
    for event in app.feed.visible().skip(scroll).take(viewport) {
        let marker = event.kind.marker();
        let color = theme::kind_color(event.kind);

        let mut spans = vec![
            Span::styled(format!(" {} ", marker.symbol), Style::default().fg(color)),
            Span::styled(
                event.time.format("%m-%d %H:%M ").to_string(),
                theme::dim(),
            ),
            Span::styled(format!("{:<8} ", event.country), Style::default().fg(color)),
            Span::styled(&event.title, theme::text()),
        ];
        if event.is_new {
            spans.push(Span::styled("  NEW", theme::badge_new()));
        }
        spans.push(Span::styled(
            format!("  {} · {}", event.location_name, event.source),
            theme::dim(),
        ));
        lines.push(Line::from(spans));
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            " no events match the active filters",
            theme::dim(),
        )));
    }

    frame.render_widget(
        Paragraph::new(lines).style(Style::default().bg(theme::FORM)),
        area,
    );
}

fn draw_stats(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(" visible ", theme::dim())];
    spans.push(Span::styled(
        app.feed.visible_len().to_string(),
        theme::text(),
    ));
    for (kind, count) in app.feed.stats_by_kind() {
        let marker = kind.marker();
        spans.push(Span::styled(" · ", theme::dim()));
        spans.push(Span::styled(
            format!("{} {} ", marker.symbol, marker.class),
            Style::default().fg(theme::kind_color(*kind)),
        ));
        spans.push(Span::styled(count.to_string(), theme::text()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)).style(theme::bar_bg()), area);
}

fn draw_help_bar(frame: &mut Frame, area: Rect) {
    let help = Line::from(vec![
        Span::styled(" c", theme::help_key()),
        Span::styled(" country  ", theme::help_desc()),
        Span::styled("t", theme::help_key()),
        Span::styled(" type  ", theme::help_desc()),
        Span::styled("x", theme::help_key()),
        Span::styled(" clear  ", theme::help_desc()),
        Span::styled("↑↓", theme::help_key()),
        Span::styled(" scroll  ", theme::help_desc()),
        Span::styled("q", theme::help_key()),
        Span::styled(" quit", theme::help_desc()),
    ]);
    frame.render_widget(Paragraph::new(help).style(theme::bar_bg()), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marquee_wraps_around() {
        let texts = vec!["abc".to_string()];
        // joined = "abc   •   " (10 chars)
        let w0 = marquee(&texts, 0, 5);
        assert_eq!(w0, "abc  ");
        let w_wrap = marquee(&texts, 8, 5);
        assert_eq!(w_wrap.chars().count(), 5);
        assert!(w_wrap.contains('a'));
    }

    #[test]
    fn marquee_empty_input() {
        assert_eq!(marquee(&[], 3, 10), "");
    }
}
