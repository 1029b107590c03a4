//! Scrollable text listing pane (symbol tables, intermediate code)

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph},
    Frame,
};

/// Style for one listing line: section headers stand out, the rest is plain.
fn line_style(line: &str) -> Style {
    if line.starts_with("=====") {
        Style::default()
            .fg(DEFAULT_THEME.punctuation)
            .add_modifier(Modifier::BOLD)
    } else if line.trim_start().starts_with("</") || line.trim_start().starts_with('<') {
        Style::default().fg(DEFAULT_THEME.type_name)
    } else {
        Style::default().fg(DEFAULT_THEME.fg)
    }
}

/// Render a titled list of lines with a clamped scroll offset
pub fn render_listing_pane(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    lines: &[String],
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(border_style);

    if lines.is_empty() {
        let paragraph = Paragraph::new("(empty)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.muted));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let total_items = lines.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders, min 1

    // Clamp scroll offset only if content exceeds visible area
    if total_items > visible_height {
        *scroll_offset = (*scroll_offset).min(total_items - visible_height);
    } else {
        *scroll_offset = 0;
    }

    let visible_items: Vec<ListItem> = lines
        .iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|line| ListItem::new(line.as_str()).style(line_style(line)))
        .collect();

    let list = List::new(visible_items).block(block);
    frame.render_widget(list, area);
}
