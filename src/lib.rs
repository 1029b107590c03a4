//! # Introduction
//!
//! subcc is the top-down front end of a compiler for SubC, a small C-like
//! language. It scans and parses a source file, builds nested symbol tables
//! for every scope, type-checks declarations and statements, and produces a
//! typed intermediate-code tree for each routine. Syntax errors are
//! collected without stopping the parse.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Scanner → Parser → Symbol tables + Intermediate code → Listings / TUI
//! ```
//!
//! 1. [`parser`]: tokens, scanner, and the recursive descent parser.
//! 2. [`symtab`]: scope stack, symbol entries, cross-reference listing.
//! 3. [`types`]: type specifications and compatibility checks.
//! 4. [`icode`]: intermediate-code nodes and their printer.
//! 5. [`errors`]: error kinds, the error handler, fatal parse errors.
//! 6. [`ui`]: ratatui-based browser; not part of the stable library API.
//!
//! ## Example
//!
//! ```
//! let unit = subcc::parse_source("int x; int main() { x = 3; }").unwrap();
//! assert_eq!(unit.error_count(), 0);
//! ```

pub mod constants;
pub mod errors;
pub mod icode;
pub mod parser;
pub mod symtab;
pub mod types;
pub mod ui;

pub use parser::{parse_source, CompilationUnit};
