//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! Browses one compiled unit: the source with its error lines, the syntax
//! error list, the symbol table listing, and the intermediate code.
//!
//! - **[`app`]**: application state, keyboard event loop, pane focus
//! - **[`panes`]**: stateless render functions for each visible pane
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! The entry point for consumers is [`App`]: construct it with a
//! [`CompilationUnit`] and call [`App::run`] to start the event loop.
//!
//! [`CompilationUnit`]: crate::parser::CompilationUnit
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
