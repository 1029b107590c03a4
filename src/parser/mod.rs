//! SubC source parser
//!
//! This module turns SubC source text into symbol tables and typed
//! intermediate code:
//! - [`token`]: Token model and synchronization sets
//! - [`lexer`]: Scanning (source text → tokens)
//! - [`parse`]: Parser state, cursor, error recovery and the driver
//! - `declarations`, `routines`, `statements`, `expressions`: the productions
//!
//! # Supported Subset
//!
//! - Types: `int`, `float`, `double`, `char`, `void`; `typedef` names
//! - Declarations: constants, variables, procedures, functions, forwards
//! - Statements: assignment, call, compound, `if`/`else`, `while`,
//!   `do`-`while`, `return`
//! - Preprocessor lines are skipped
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent. Syntax errors never stop the parse: each
//! one is recorded and the parser resynchronizes on a token set.

mod declarations;
mod expressions;
pub mod lexer;
pub mod parse;
mod routines;
mod statements;
pub mod token;

pub use parse::{CompilationUnit, ParseSummary, Parser};

use crate::errors::ParseError;

/// Parse a whole SubC source string.
pub fn parse_source(source: &str) -> Result<CompilationUnit, ParseError> {
    Parser::from_source(source)?.parse_program()
}
