use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Gauge, Paragraph},
    Frame,
};

use crate::models::WeeklyTotals;
use crate::tui::theme;

/// Weekly completion: a gauge plus "n of 35 prayers".
pub fn render(frame: &mut Frame, area: Rect, weekly: &WeeklyTotals) {
    let block = Block::default()
        .title(Span::styled(" This Week's Progress ", theme::primary()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border(false))
        .style(theme::surface());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(inner);

    let gauge = Gauge::default()
        .gauge_style(theme::primary().bg(theme::MUTED))
        .ratio(weekly.percentage as f64 / 100.0)
        .label(Span::styled(
            format!("{}% Complete", weekly.percentage),
            theme::bold(),
        ));
    frame.render_widget(gauge, rows[0]);

    let caption = Paragraph::new(Line::from(vec![
        Span::styled(
            format!("  {}", weekly.completed),
            theme::primary().add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" of {} prayers", weekly.possible), theme::dim()),
    ]));
    frame.render_widget(caption, rows[2]);
}
