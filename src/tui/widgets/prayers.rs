use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem},
    Frame,
};

use crate::config::DisplayConfig;
use crate::models::DailyRecord;
use crate::tui::theme;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    record: &DailyRecord,
    display: &DisplayConfig,
    focused_idx: usize,
    focused: bool,
) {
    let block = Block::default()
        .title(Span::styled(" Today's Prayers ", theme::primary()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border(focused))
        .style(theme::surface());

    let items: Vec<ListItem> = record
        .entries()
        .enumerate()
        .map(|(i, (prayer, done))| {
            let is_focused = focused && i == focused_idx;

            let (checkbox, check_style) = if done {
                ("[✓]", theme::primary().add_modifier(Modifier::BOLD))
            } else {
                ("[ ]", theme::dim())
            };

            let name_style = if is_focused {
                theme::accent().add_modifier(Modifier::BOLD)
            } else {
                theme::bold()
            };

            let line = Line::from(vec![
                Span::styled(if is_focused { " › " } else { "   " }, theme::accent()),
                Span::styled(format!("{:<9}", prayer.display_name()), name_style),
                Span::styled(format!("{:<18}", prayer.subtitle()), theme::dim()),
                Span::styled(format!("{:<7}", display.time_for(prayer)), theme::dim()),
                Span::styled(checkbox, check_style),
            ]);

            ListItem::new(line)
        })
        .collect();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}
