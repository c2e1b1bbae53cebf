use chrono::Weekday;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Row, Table},
    Frame,
};

use crate::models::{CalendarCell, MonthWindow, Totals, WeekWindow};
use crate::tui::theme;
use crate::utils::date::{month_name, week_header};
use crate::utils::format::{band, band_icon, center};

const CELL_WIDTH: usize = 9;

fn day_cell(cell: &CalendarCell) -> Cell<'static> {
    if !cell.is_current_month {
        return Cell::from(vec![
            Line::from(Span::styled(center(&cell.day_number.to_string(), CELL_WIDTH), theme::dim())),
            Line::from(""),
        ]);
    }

    let b = band(cell.completion_percentage);
    let number_style = if cell.is_today {
        theme::accent().add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        theme::bold()
    };
    let detail = format!("{} {}%", band_icon(b), cell.completion_percentage);
    Cell::from(vec![
        Line::from(Span::styled(center(&cell.day_number.to_string(), CELL_WIDTH), number_style)),
        Line::from(Span::styled(center(&detail, CELL_WIDTH), theme::band(b))),
    ])
}

fn header_row(first: Weekday) -> Row<'static> {
    Row::new(
        week_header(first)
            .into_iter()
            .map(|name| Cell::from(Span::styled(center(name, CELL_WIDTH), theme::dim()))),
    )
    .height(1)
    .bottom_margin(1)
}

fn totals_title(label: &str, totals: &Totals) -> Span<'static> {
    Span::styled(
        format!(
            " {}  ·  {}% ({} of {}) ",
            label, totals.percentage, totals.completed, totals.possible
        ),
        theme::primary(),
    )
}

fn table<'a>(rows: Vec<Row<'a>>, first: Weekday, title: Span<'a>) -> Table<'a> {
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border(true))
        .style(theme::surface());

    Table::new(rows, [Constraint::Ratio(1, 7); 7])
        .header(header_row(first))
        .block(block)
        .style(Style::default())
}

pub fn render_month(
    frame: &mut Frame,
    area: Rect,
    month: &MonthWindow,
    totals: &Totals,
    first: Weekday,
) {
    let rows: Vec<Row> = month
        .rows()
        .map(|week| Row::new(week.iter().map(day_cell)).height(2).bottom_margin(1))
        .collect();
    let label = format!("{} {}", month_name(month.month), month.year);
    frame.render_widget(table(rows, first, totals_title(&label, totals)), area);
}

pub fn render_week(
    frame: &mut Frame,
    area: Rect,
    week: &WeekWindow,
    totals: &Totals,
    first: Weekday,
) {
    let row = Row::new(week.cells.iter().map(day_cell)).height(2);
    let label = format!(
        "Week of {} – {}",
        week.start.format("%b %d"),
        week.end().format("%b %d, %Y")
    );
    frame.render_widget(table(vec![row], first, totals_title(&label, totals)), area);
}
