//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct, the [`TokenCursor`] it reads
//! through, the synchronization primitive every production uses for error
//! recovery, and the [`Parser::parse_program`] entry point.
//!
//! # Parser Architecture
//!
//! The Parser is a top-down recursive descent parser. All mutable state of
//! one compilation (cursor, symbol table stack, error handler) lives in the
//! `Parser` value and is threaded through every production as `&mut self`:
//!
//! - This module: Parser struct, cursor, helpers, and the driver
//! - `declarations`: constants, typedefs, variables, type specifications
//! - `routines`: procedure/function declarations and formal parameters
//! - `statements`: statement dispatch and statement lists
//! - `expressions`: typed expressions and calls
//!
//! Productions return `Result<_, ParseError>`; the only `Err` is a failure
//! to read the token source. Syntax errors are flagged and parsing goes on.

use super::lexer::{Scanner, TokenSource};
use super::token::{Token, TokenKind, TokenSet};
use crate::constants::DUMMY_PROGRAM_NAME;
use crate::errors::{ErrorHandler, ErrorKind, ParseError, SourceError, SyntaxError};
use crate::symtab::{
    initialize_predefined, Definition, DefinitionKind, EntryId, RoutineInfo, SymbolTable,
};
use crate::types::TypeSpec;
use std::time::{Duration, Instant};

/// One-token-lookahead cursor over a [`TokenSource`].
pub struct TokenCursor {
    source: Box<dyn TokenSource>,
    current: Token,
    lookahead: Option<Token>,
    position: usize,
}

impl TokenCursor {
    /// Read the first token.
    pub fn new(mut source: Box<dyn TokenSource>) -> Result<Self, SourceError> {
        let current = source.next_token()?;
        Ok(Self {
            source,
            current,
            lookahead: None,
            position: 0,
        })
    }

    pub fn current(&self) -> &Token {
        &self.current
    }

    /// The token after the current one, without consuming anything.
    pub fn peek(&mut self) -> Result<&Token, SourceError> {
        if self.lookahead.is_none() {
            let next = if self.current.is_eof() {
                self.current.clone()
            } else {
                self.source.next_token()?
            };
            self.lookahead = Some(next);
        }
        Ok(self.lookahead.as_ref().unwrap_or(&self.current))
    }

    /// Move to the next token. End of file is sticky.
    pub fn advance(&mut self) -> Result<&Token, SourceError> {
        if !self.current.is_eof() {
            self.current = match self.lookahead.take() {
                Some(token) => token,
                None => self.source.next_token()?,
            };
            self.position += 1;
        }
        Ok(&self.current)
    }

    /// Number of tokens consumed so far
    pub fn position(&self) -> usize {
        self.position
    }
}

/// Parser summary event: last line reached, errors, and time spent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParseSummary {
    pub line_count: usize,
    pub error_count: usize,
    pub elapsed: Duration,
}

/// Everything one compilation produces.
#[derive(Debug)]
pub struct CompilationUnit {
    pub symtab: SymbolTable,
    pub program: EntryId,
    pub errors: Vec<SyntaxError>,
    pub summary: ParseSummary,
}

impl CompilationUnit {
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Number of errors of one kind
    pub fn count_of(&self, kind: ErrorKind) -> usize {
        self.errors.iter().filter(|e| e.kind == kind).count()
    }

    /// Entries named `name` in any scope, in creation order
    pub fn entries_named(&self, name: &str) -> Vec<EntryId> {
        let key = name.to_lowercase();
        self.symtab
            .entries()
            .filter(|(_, e)| e.name() == key)
            .map(|(id, _)| id)
            .collect()
    }

    /// The routine entry named `name`, if one was declared
    pub fn routine(&self, name: &str) -> Option<EntryId> {
        self.entries_named(name)
            .into_iter()
            .find(|id| self.symtab.entry(*id).kind().is_routine())
    }
}

/// Recursive descent parser for SubC
pub struct Parser {
    cursor: TokenCursor,
    pub(crate) symtab: SymbolTable,
    pub(crate) errors: ErrorHandler,
    pub(crate) dummy_counter: usize,
}

impl Parser {
    pub fn new(source: Box<dyn TokenSource>) -> Result<Self, ParseError> {
        let cursor =
            TokenCursor::new(source).map_err(|e| ParseError::abort(ErrorKind::IoError, 1, e))?;
        let mut parser = Self {
            cursor,
            symtab: SymbolTable::new(),
            errors: ErrorHandler::new(),
            dummy_counter: 0,
        };
        parser.flag_scan_error();
        Ok(parser)
    }

    /// Parser over an in-memory source string.
    pub fn from_source(source: &str) -> Result<Self, ParseError> {
        Self::new(Box::new(Scanner::from_source(source)))
    }

    /// Parse a whole compilation unit: a sequence of declarations and
    /// routines inside the program scope.
    pub fn parse_program(mut self) -> Result<CompilationUnit, ParseError> {
        let start = Instant::now();

        initialize_predefined(&mut self.symtab);
        let program = self.enter_or_detach(DUMMY_PROGRAM_NAME);
        self.symtab.set_program_id(program);

        let scope = self.symtab.push();
        self.symtab.entry_mut(program).definition = Definition::Program(RoutineInfo {
            scope: Some(scope),
            ..RoutineInfo::default()
        });

        self.parse_declarations(program)?;
        self.symtab.pop();

        let summary = ParseSummary {
            line_count: self.current().line(),
            error_count: self.errors.error_count(),
            elapsed: start.elapsed(),
        };

        Ok(CompilationUnit {
            symtab: self.symtab,
            program,
            errors: self.errors.into_errors(),
            summary,
        })
    }

    // ===== Cursor helpers =====

    pub(crate) fn current(&self) -> &Token {
        self.cursor.current()
    }

    pub(crate) fn current_kind(&self) -> TokenKind {
        self.cursor.current().kind
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    pub(crate) fn position(&self) -> usize {
        self.cursor.position()
    }

    fn abort(&self, err: SourceError) -> ParseError {
        ParseError::abort(ErrorKind::IoError, self.current().line(), err)
    }

    /// Consume the current token and return the new current one.
    pub(crate) fn next_token(&mut self) -> Result<Token, ParseError> {
        if let Err(e) = self.cursor.advance() {
            return Err(self.abort(e));
        }
        self.flag_scan_error();
        Ok(self.current().clone())
    }

    /// Consume the current token if it is `kind`.
    pub(crate) fn match_token(&mut self, kind: TokenKind) -> Result<bool, ParseError> {
        if self.check(kind) {
            self.next_token()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub(crate) fn peek_kind(&mut self) -> Result<TokenKind, ParseError> {
        match self.cursor.peek() {
            Ok(token) => Ok(token.kind),
            Err(e) => Err(self.abort(e)),
        }
    }

    /// Scanner error tokens are reported as soon as they become current.
    fn flag_scan_error(&mut self) {
        if let Some(err) = self.current().scan_error() {
            let token = self.current().clone();
            self.errors.flag(&token, ErrorKind::from(err));
        }
    }

    /// Flag an error at the current token.
    pub(crate) fn flag(&mut self, kind: ErrorKind) {
        let token = self.cursor.current().clone();
        self.errors.flag(&token, kind);
    }

    pub(crate) fn flag_at(&mut self, token: &Token, kind: ErrorKind) {
        self.errors.flag(token, kind);
    }

    /// Make sure the current token is in `set`.
    ///
    /// If it is not, flag it as unexpected and skip tokens until one in
    /// `set` or end of file. Skipped tokens are never re-parsed. A scanner
    /// error token was already flagged and is skipped silently.
    pub(crate) fn synchronize(&mut self, set: TokenSet) -> Result<Token, ParseError> {
        if set.contains(self.current_kind()) {
            return Ok(self.current().clone());
        }

        if !self.check(TokenKind::Error) {
            self.flag(ErrorKind::UnexpectedToken);
        }
        let mut token = self.next_token()?;
        while !token.is_eof() && !set.contains(token.kind) {
            token = self.next_token()?;
        }
        Ok(token)
    }

    // ===== Symbol helpers =====

    /// Enter `name` locally, or create an unbound entry when the name is
    /// already taken so callers always get an entry back.
    pub(crate) fn enter_or_detach(&mut self, name: &str) -> EntryId {
        match self.symtab.enter_local(name) {
            Some(id) => id,
            None => self
                .symtab
                .create_detached(name, Definition::Undefined, TypeSpec::UNDEFINED),
        }
    }

    pub(crate) fn entry_kind(&self, id: EntryId) -> DefinitionKind {
        self.symtab.entry(id).kind()
    }

    pub(crate) fn next_dummy_name(&mut self, prefix: &str) -> String {
        self.dummy_counter += 1;
        format!("{}{:03}", prefix, self.dummy_counter)
    }
}
