use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::models::WeekWindow;
use crate::tui::theme;
use crate::utils::format::{band, band_icon};

/// Seven-day strip: day name, "n of 5" and a status dot per day.
pub fn render(frame: &mut Frame, area: Rect, week: &WeekWindow) {
    let block = Block::default()
        .title(Span::styled(" This Week Overview ", theme::primary()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border(false))
        .style(theme::surface());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 7); 7])
        .split(inner);

    for (cell, column) in week.cells.iter().zip(columns.iter()) {
        let b = band(cell.completion_percentage);
        let name_style = if cell.is_today {
            theme::accent().add_modifier(Modifier::BOLD)
        } else {
            theme::dim()
        };
        let lines = vec![
            Line::from(Span::styled(cell.day_name, name_style)),
            Line::from(Span::styled(cell.completed.to_string(), theme::bold())),
            Line::from(Span::styled("of 5", theme::dim())),
            Line::from(Span::styled(band_icon(b), theme::band(b))),
        ];
        frame.render_widget(
            Paragraph::new(lines).alignment(Alignment::Center),
            *column,
        );
    }
}
