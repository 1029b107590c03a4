//! Syntax error list pane

use crate::errors::SyntaxError;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

/// Render the error list, highlighting `selected`
pub fn render_diagnostics_pane(
    frame: &mut Frame,
    area: Rect,
    errors: &[SyntaxError],
    selected: usize,
    is_focused: bool,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(format!(" Syntax Errors ({}) ", errors.len()))
        .borders(Borders::ALL)
        .border_style(border_style);

    if errors.is_empty() {
        let paragraph = Paragraph::new("No syntax errors.")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.success));
        frame.render_widget(paragraph, area);
        return;
    }

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    let offset = (selected + 1).saturating_sub(visible_height);

    let items: Vec<ListItem> = errors
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible_height)
        .map(|(idx, error)| {
            let location = Span::styled(
                format!("{:>4}:{:<3} ", error.location.line, error.location.column),
                Style::default().fg(DEFAULT_THEME.muted),
            );
            let message = Span::styled(
                error.kind.message(),
                Style::default().fg(DEFAULT_THEME.error),
            );
            let at = Span::styled(
                format!("  at '{}'", error.token_text),
                Style::default().fg(DEFAULT_THEME.fg),
            );

            let mut line = Line::from(vec![location, message, at]);
            if idx == selected {
                line = line.style(
                    Style::default()
                        .bg(DEFAULT_THEME.selection_bg)
                        .add_modifier(Modifier::BOLD),
                );
            }
            ListItem::new(line)
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
