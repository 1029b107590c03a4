//! Source code pane rendering with syntax highlighting
//!
//! Displays the SubC program with line numbers, marks every line that
//! carries a syntax error, and keeps the selected line in view.
//!
//! The pane uses a simple character-by-character tokenizer to apply syntax
//! highlighting styles without going through the scanner.

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Simple syntax highlighting for one SubC line
fn highlight_source_code(line: &str) -> Line<'_> {
    let mut spans = Vec::new();
    let mut current_word = String::new();

    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        // Comments and preprocessor lines run to the end of the line
        if (c == '/' && chars.get(i + 1) == Some(&'/')) || (c == '#' && i == 0) {
            if !current_word.is_empty() {
                spans.push(Span::raw(std::mem::take(&mut current_word)));
            }
            let rest: String = chars[i..].iter().collect();
            spans.push(Span::styled(rest, Style::default().fg(DEFAULT_THEME.muted)));
            break;
        }

        // String and character literals
        if c == '"' || c == '\'' {
            if !current_word.is_empty() {
                spans.push(Span::raw(std::mem::take(&mut current_word)));
            }
            let mut end = i + 1;
            while end < chars.len() && chars[end] != c {
                end += if chars[end] == '\\' { 2 } else { 1 };
            }
            let end = (end + 1).min(chars.len());
            let literal: String = chars[i..end].iter().collect();
            spans.push(Span::styled(literal, Style::default().fg(DEFAULT_THEME.literal)));
            i = end;
            continue;
        }

        // Delimiters end the current word
        if !c.is_alphanumeric() && c != '_' && !(c == '.' && is_number(&current_word)) {
            if !current_word.is_empty() {
                let style = get_word_style(&current_word, c == '(');
                spans.push(Span::styled(std::mem::take(&mut current_word), style));
            }

            let style = match c {
                '{' | '}' | '(' | ')' | '[' | ']' => Style::default().fg(DEFAULT_THEME.punctuation),
                _ => Style::default().fg(DEFAULT_THEME.fg),
            };
            spans.push(Span::styled(c.to_string(), style));
            i += 1;
            continue;
        }

        current_word.push(c);
        i += 1;
    }

    if !current_word.is_empty() {
        let style = get_word_style(&current_word, false);
        spans.push(Span::styled(current_word, style));
    }

    Line::from(spans)
}

fn is_number(word: &str) -> bool {
    word.chars().next().is_some_and(|c| c.is_ascii_digit())
}

fn get_word_style(word: &str, is_routine: bool) -> Style {
    match word {
        "int" | "char" | "void" | "float" | "double" | "struct" | "union" | "typedef"
        | "const" => Style::default().fg(DEFAULT_THEME.type_name),
        "return" | "if" | "else" | "while" | "do" => Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD),
        _ if is_number(word) => Style::default().fg(DEFAULT_THEME.literal),
        _ if is_routine => Style::default().fg(DEFAULT_THEME.routine),
        _ => Style::default().fg(DEFAULT_THEME.fg),
    }
}

/// Render the source code pane.
///
/// `selected_line` is 1-based; 0 selects nothing. `error_lines` holds the
/// lines that carry at least one syntax error.
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    source_code: &str,
    selected_line: usize,
    error_lines: &[usize],
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
        .title(" Source Code ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let lines: Vec<&str> = source_code.lines().collect();
    let total_lines = lines.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders, min 1

    // Keep the selected line inside the window
    if selected_line > 0 {
        let idx = selected_line - 1;
        if idx < *scroll_offset {
            *scroll_offset = idx;
        } else if idx >= *scroll_offset + visible_height {
            *scroll_offset = idx + 1 - visible_height;
        }
    }
    *scroll_offset = (*scroll_offset).min(total_lines.saturating_sub(visible_height));

    let visible_lines: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|(idx, line)| {
            let line_num = idx + 1;
            let has_error = error_lines.contains(&line_num);
            let is_selected = line_num == selected_line;

            let (marker, num_style) = if has_error {
                (
                    '!',
                    Style::default()
                        .fg(DEFAULT_THEME.error)
                        .add_modifier(Modifier::BOLD),
                )
            } else if is_selected {
                (
                    '>',
                    Style::default()
                        .fg(DEFAULT_THEME.cursor)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                (' ', Style::default().fg(DEFAULT_THEME.muted))
            };

            let mut content_line = highlight_source_code(line);
            if is_selected {
                let background = Style::default().bg(DEFAULT_THEME.selection_bg);
                for span in &mut content_line.spans {
                    span.style = span.style.patch(background);
                }
            }

            let mut final_spans = vec![Span::styled(format!("{:4}{} ", line_num, marker), num_style)];
            final_spans.extend(content_line.spans);
            Line::from(final_spans)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(line: &Line) -> Vec<String> {
        line.spans.iter().map(|s| s.content.to_string()).collect()
    }

    #[test]
    fn test_highlight_splits_words_and_literals() {
        let line = highlight_source_code("x = 1.5; // done");
        let parts = texts(&line);
        assert_eq!(parts[0], "x");
        assert!(parts.contains(&"1.5".to_string()));
        assert_eq!(parts.last().unwrap(), "// done");
    }

    #[test]
    fn test_routine_names_use_function_color() {
        let line = highlight_source_code("f(2)");
        assert_eq!(line.spans[0].style.fg, Some(DEFAULT_THEME.routine));
        assert_eq!(line.spans[2].style.fg, Some(DEFAULT_THEME.literal));
    }
}
