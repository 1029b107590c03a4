//! Colour palette shared by every pane

use ratatui::style::Color;

pub struct Theme {
    // Pane chrome
    pub fg: Color,
    pub muted: Color,
    pub border_focused: Color,
    pub border_normal: Color,
    pub selection_bg: Color,
    pub cursor: Color,

    // Source highlighting
    pub keyword: Color,
    pub type_name: Color,
    pub routine: Color,
    pub literal: Color,
    pub punctuation: Color,

    // Diagnostics
    pub success: Color,
    pub error: Color,
}

pub const DEFAULT_THEME: Theme = Theme {
    fg: Color::Rgb(205, 214, 244),
    muted: Color::Rgb(108, 112, 134),
    border_focused: Color::Rgb(249, 226, 175),
    border_normal: Color::Rgb(108, 112, 134),
    selection_bg: Color::Rgb(50, 50, 70),
    cursor: Color::Rgb(250, 179, 135),

    keyword: Color::Rgb(203, 166, 247), // Mauve
    type_name: Color::Rgb(148, 226, 213),
    routine: Color::Rgb(249, 226, 175),
    literal: Color::Rgb(250, 179, 135),
    punctuation: Color::Rgb(137, 180, 250),

    success: Color::Rgb(166, 227, 161),
    error: Color::Rgb(243, 139, 168),
};
