use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::tracker::Snapshot;
use crate::tui::theme;
use crate::utils::format::{plural, progress_bar};

pub fn render(frame: &mut Frame, area: Rect, snap: &Snapshot) {
    let block = Block::default()
        .title(Span::styled(" Quick Stats ", theme::primary()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border(false))
        .style(theme::surface());

    let row = |label: &str, value: String, style| {
        Line::from(vec![
            Span::styled(format!("  {:<17}", label), theme::dim()),
            Span::styled(value, style),
        ])
    };

    // Streak bar fills over a month
    let bar = progress_bar(snap.streak.current.min(30), 30, 12);

    let qaza_style = if snap.qaza == 0 {
        theme::primary()
    } else {
        theme::destructive().add_modifier(Modifier::BOLD)
    };

    let lines = vec![
        Line::from(""),
        row(
            "Today's Prayers",
            format!("{}/5", snap.today_record.completed_count()),
            theme::primary().add_modifier(Modifier::BOLD),
        ),
        row(
            "Current Streak",
            plural(snap.streak.current, "day", "days"),
            theme::secondary().add_modifier(Modifier::BOLD),
        ),
        Line::from(vec![
            Span::styled(" ".repeat(19), theme::dim()),
            Span::styled(bar, theme::secondary()),
            Span::styled(format!("  best {}", snap.streak.best), theme::dim()),
        ]),
        row(
            "Qaza Counter",
            plural(snap.qaza, "prayer", "prayers"),
            qaza_style,
        ),
        row(
            "Weekly Progress",
            format!("{}%", snap.weekly.percentage),
            theme::accent(),
        ),
        row(
            "Monthly Progress",
            format!("{}%", snap.monthly.percentage),
            theme::accent(),
        ),
    ];

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}
