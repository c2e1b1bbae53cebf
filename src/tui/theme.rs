use ratatui::style::{Color, Modifier, Style};

use crate::utils::format::Band;

pub const BG: Color = Color::Rgb(16, 18, 22);
pub const SURFACE: Color = Color::Rgb(24, 28, 34);
pub const BORDER: Color = Color::Rgb(48, 56, 66);
pub const TEXT: Color = Color::Rgb(226, 230, 236);
pub const TEXT_DIM: Color = Color::Rgb(120, 130, 142);
pub const PRIMARY: Color = Color::Rgb(72, 170, 140);
pub const SECONDARY: Color = Color::Rgb(110, 150, 210);
pub const ACCENT: Color = Color::Rgb(212, 170, 80);
pub const DESTRUCTIVE: Color = Color::Rgb(200, 90, 80);
pub const MUTED: Color = Color::Rgb(60, 66, 76);

pub fn base() -> Style {
    Style::default().fg(TEXT).bg(BG)
}

pub fn surface() -> Style {
    Style::default().fg(TEXT).bg(SURFACE)
}

pub fn dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub fn primary() -> Style {
    Style::default().fg(PRIMARY)
}

pub fn secondary() -> Style {
    Style::default().fg(SECONDARY)
}

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn destructive() -> Style {
    Style::default().fg(DESTRUCTIVE)
}

pub fn bold() -> Style {
    Style::default().fg(TEXT).add_modifier(Modifier::BOLD)
}

pub fn border(focused: bool) -> Style {
    if focused {
        primary()
    } else {
        Style::default().fg(BORDER)
    }
}

/// Status dot colour: 100 / >=80 / >=50 / >0 / 0.
pub fn band(b: Band) -> Style {
    match b {
        Band::Full => primary(),
        Band::High => secondary(),
        Band::Half => accent(),
        Band::Low => destructive(),
        Band::Empty => Style::default().fg(MUTED),
    }
}
