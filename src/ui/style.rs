use ratatui::style::{Color, Style, Stylize};

use crate::theme::Theme;

/// Colors derived from the active theme, shared by the shell chrome and
/// the built-in panels.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub accent: Color,
    pub text: Color,
    pub dim: Color,
    pub highlight_bg: Color,
    pub highlight_fg: Color,
    pub note_marker: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                accent: Color::Blue,
                text: Color::Black,
                dim: Color::DarkGray,
                highlight_bg: Color::Blue,
                highlight_fg: Color::White,
                note_marker: Color::Green,
            },
            Theme::Dark => Self {
                accent: Color::Cyan,
                text: Color::White,
                dim: Color::Gray,
                highlight_bg: Color::Cyan,
                highlight_fg: Color::Black,
                note_marker: Color::Yellow,
            },
        }
    }
}

pub fn dim_unless_focused(is_focused: bool, style: Style) -> Style {
    if is_focused { style.bold() } else { style.dim() }
}
