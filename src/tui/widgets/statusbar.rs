use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::theme;

pub const DASHBOARD_HINTS: &[(&str, &str)] = &[
    ("[↑↓]", " select  "),
    ("[Space]", " toggle  "),
    ("[c]", " calendar  "),
    ("[r]", " reload  "),
    ("[?]", " help  "),
    ("[Esc]", " quit"),
];

pub const CALENDAR_HINTS: &[(&str, &str)] = &[
    ("[← →]", " prev/next  "),
    ("[w]", " week/month  "),
    ("[t]", " today  "),
    ("[c]", " dashboard  "),
    ("[?]", " help  "),
    ("[Esc]", " back"),
];

/// Key hints, or the pending status message (errors, loading) when there is one.
pub fn render(frame: &mut Frame, area: Rect, hints: &[(&str, &str)], status: Option<&str>) {
    let line = match status {
        Some(msg) => Line::from(Span::styled(msg.to_string(), theme::destructive())),
        None => {
            let mut spans = Vec::new();
            for (key, label) in hints {
                spans.push(Span::styled(key.to_string(), theme::accent()));
                spans.push(Span::styled(label.to_string(), theme::dim()));
            }
            Line::from(spans)
        }
    };

    let paragraph = Paragraph::new(line).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}
