//! Main TUI application state and logic

use crate::icode::printer;
use crate::parser::CompilationUnit;
use crate::symtab::xref;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Diagnostics,
    Symbols,
    ICode,
}

impl FocusedPane {
    /// Move focus to the next pane (clockwise: source -> diagnostics -> symbols -> icode)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Diagnostics,
            FocusedPane::Diagnostics => FocusedPane::Symbols,
            FocusedPane::Symbols => FocusedPane::ICode,
            FocusedPane::ICode => FocusedPane::Source,
        }
    }

    /// Move focus to the previous pane (counter-clockwise)
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::ICode,
            FocusedPane::Diagnostics => FocusedPane::Source,
            FocusedPane::Symbols => FocusedPane::Diagnostics,
            FocusedPane::ICode => FocusedPane::Symbols,
        }
    }
}

/// The main application state
pub struct App {
    /// The compiled unit being browsed
    pub unit: CompilationUnit,

    /// The source code that was compiled
    pub source_code: String,

    /// Pre-rendered listings
    pub symbol_lines: Vec<String>,
    pub icode_lines: Vec<String>,

    /// Lines carrying at least one error, sorted
    pub error_lines: Vec<usize>,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub source_scroll: usize,
    pub symbols_scroll: usize,
    pub icode_scroll: usize,

    /// Index of the selected error in the diagnostics pane
    pub selected_error: usize,

    /// Source line to highlight (1-based, 0 = none)
    pub selected_line: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,
}

impl App {
    /// Create a new app for a compiled unit and its source code
    pub fn new(unit: CompilationUnit, source_code: String) -> Self {
        let symbol_lines = xref::listing(&unit.symtab);
        let icode_lines = printer::print_routines(&unit.symtab);

        let mut error_lines: Vec<usize> = unit.errors.iter().map(|e| e.location.line).collect();
        error_lines.sort_unstable();
        error_lines.dedup();

        let selected_line = unit.errors.first().map_or(0, |e| e.location.line);

        App {
            unit,
            source_code,
            symbol_lines,
            icode_lines,
            error_lines,
            focused_pane: FocusedPane::Source,
            source_scroll: 0,
            symbols_scroll: 0,
            icode_scroll: 0,
            selected_error: 0,
            selected_line,
            should_quit: false,
            status_message: String::from("Ready!"),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // 4 panes in 2 columns, plus status bar at bottom
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(main_chunks[0]);

        // Left column: Source (top) | Diagnostics (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(columns[0]);

        // Right column: Symbols (top) | Intermediate code (bottom)
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(columns[1]);

        super::panes::render_source_pane(
            frame,
            left_rows[0],
            &self.source_code,
            self.selected_line,
            &self.error_lines,
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        super::panes::render_diagnostics_pane(
            frame,
            left_rows[1],
            &self.unit.errors,
            self.selected_error,
            self.focused_pane == FocusedPane::Diagnostics,
        );

        super::panes::render_listing_pane(
            frame,
            right_rows[0],
            "Symbol Tables",
            &self.symbol_lines,
            self.focused_pane == FocusedPane::Symbols,
            &mut self.symbols_scroll,
        );

        super::panes::render_listing_pane(
            frame,
            right_rows[1],
            "Intermediate Code",
            &self.icode_lines,
            self.focused_pane == FocusedPane::ICode,
            &mut self.icode_scroll,
        );

        super::panes::render_status_bar(
            frame,
            main_chunks[1],
            &self.status_message,
            &self.unit.summary,
        );
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Source => {
                    self.selected_line = self.selected_line.saturating_sub(1).max(1);
                }
                FocusedPane::Diagnostics => {
                    self.select_error(self.selected_error.saturating_sub(1));
                }
                FocusedPane::Symbols => {
                    self.symbols_scroll = self.symbols_scroll.saturating_sub(1);
                }
                FocusedPane::ICode => {
                    self.icode_scroll = self.icode_scroll.saturating_sub(1);
                }
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Source => {
                    let last = self.source_code.lines().count().max(1);
                    self.selected_line = (self.selected_line + 1).min(last);
                }
                FocusedPane::Diagnostics => {
                    self.select_error(self.selected_error + 1);
                }
                FocusedPane::Symbols => {
                    self.symbols_scroll = self.symbols_scroll.saturating_add(1);
                }
                FocusedPane::ICode => {
                    self.icode_scroll = self.icode_scroll.saturating_add(1);
                }
            },
            KeyCode::Enter => {
                self.select_error(self.selected_error);
                self.focused_pane = FocusedPane::Source;
            }
            _ => {}
        }
    }

    /// Select error `index` (clamped) and move the source cursor to its line
    fn select_error(&mut self, index: usize) {
        let Some(last) = self.unit.errors.len().checked_sub(1) else {
            self.status_message = "No syntax errors".to_string();
            return;
        };

        self.selected_error = index.min(last);
        let error = &self.unit.errors[self.selected_error];
        self.selected_line = error.location.line;
        self.status_message = format!(
            "Error {}/{}: {}",
            self.selected_error + 1,
            self.unit.errors.len(),
            error.kind
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;
    use crossterm::event::KeyModifiers;

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_focus_cycles_through_panes() {
        let source = "int x;".to_string();
        let mut app = App::new(parse_source(&source).unwrap(), source);

        for _ in 0..4 {
            press(&mut app, KeyCode::Tab);
        }
        assert_eq!(app.focused_pane, FocusedPane::Source);

        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focused_pane, FocusedPane::ICode);
    }

    #[test]
    fn test_selecting_errors_moves_source_line() {
        let source = "void p() {\n  int x;\n  x = 1.5;\n  x = 'c';\n}".to_string();
        let mut app = App::new(parse_source(&source).unwrap(), source);
        assert_eq!(app.error_lines, vec![3, 4]);
        assert_eq!(app.selected_line, 3);

        app.focused_pane = FocusedPane::Diagnostics;
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected_error, 1);
        assert_eq!(app.selected_line, 4);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.focused_pane, FocusedPane::Source);
    }

    #[test]
    fn test_quit_key() {
        let source = String::new();
        let mut app = App::new(parse_source(&source).unwrap(), source);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
