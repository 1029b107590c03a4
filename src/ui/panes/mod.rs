//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`source`]: Source code display with syntax highlighting and error markers
//! - [`diagnostics`]: Syntax error list with the selected error highlighted
//! - [`listing`]: Scrollable text for the symbol tables and intermediate code
//! - [`status`]: Status bar with keybindings and the parse summary
//!
//! Each pane module exports one stateless `render_*` function; scroll and
//! selection state lives in [`App`](super::App).

pub mod diagnostics;
pub mod listing;
pub mod source;
pub mod status;

// Re-export render functions for convenience
pub use diagnostics::render_diagnostics_pane;
pub use listing::render_listing_pane;
pub use source::render_source_pane;
pub use status::render_status_bar;
