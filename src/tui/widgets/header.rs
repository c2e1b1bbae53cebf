use chrono::NaiveDate;
use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, today: NaiveDate, subtitle: &str) {
    let title_line = Line::from(vec![
        Span::styled("  نماز  ", theme::primary().add_modifier(Modifier::BOLD)),
        Span::styled("namaz", theme::primary()),
    ]);

    let date_line = Line::from(vec![
        Span::styled(today.format("%A, %b %d, %Y").to_string(), theme::dim()),
        Span::styled("  ·  ", theme::dim()),
        Span::styled(subtitle.to_string(), theme::accent()),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::primary())
        .style(theme::base());

    let paragraph = Paragraph::new(vec![title_line, date_line])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
