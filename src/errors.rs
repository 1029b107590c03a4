//! Syntax error kinds, the error handler, and the fatal parse error
//!
//! Two classes of failure exist:
//!
//! - Recoverable errors ([`ErrorKind`]) are recorded by the [`ErrorHandler`]
//!   with their source position and counted. Parsing always continues.
//! - Fatal errors ([`ParseError`]) happen only when the token source itself
//!   cannot be read. They are returned as `Err` and end the parse.

use crate::parser::token::{ScanError, SourceLocation, Token};
use std::fmt;
use std::io;
use thiserror::Error;

/// Every error kind the front end can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    AlreadyForwarded,
    IdentifierRedefined,
    IdentifierUndefined,
    IncompatibleTypes,
    InvalidAssignToVoid,
    InvalidCharacter,
    InvalidConstant,
    InvalidNumber,
    InvalidType,
    MissingComma,
    MissingEquals,
    MissingExpression,
    MissingIdentifier,
    MissingLeftParen,
    MissingRightBrace,
    MissingRightParen,
    MissingSemicolon,
    MissingWhile,
    RangeInteger,
    RangeReal,
    UnexpectedEof,
    UnexpectedToken,
    WrongNumberOfParms,

    // Fatal
    IoError,
}

impl ErrorKind {
    pub fn message(self) -> &'static str {
        match self {
            ErrorKind::AlreadyForwarded => "Forward declaration does not match",
            ErrorKind::IdentifierRedefined => "Redefined identifier",
            ErrorKind::IdentifierUndefined => "Undefined identifier",
            ErrorKind::IncompatibleTypes => "Incompatible types",
            ErrorKind::InvalidAssignToVoid => "Cannot return a value from a void routine",
            ErrorKind::InvalidCharacter => "Invalid character",
            ErrorKind::InvalidConstant => "Invalid constant",
            ErrorKind::InvalidNumber => "Invalid number",
            ErrorKind::InvalidType => "Invalid type",
            ErrorKind::MissingComma => "Missing ,",
            ErrorKind::MissingEquals => "Missing =",
            ErrorKind::MissingExpression => "Missing expression",
            ErrorKind::MissingIdentifier => "Missing identifier",
            ErrorKind::MissingLeftParen => "Missing (",
            ErrorKind::MissingRightBrace => "Missing }",
            ErrorKind::MissingRightParen => "Missing )",
            ErrorKind::MissingSemicolon => "Missing ;",
            ErrorKind::MissingWhile => "Missing while",
            ErrorKind::RangeInteger => "Integer literal out of range",
            ErrorKind::RangeReal => "Real literal out of range",
            ErrorKind::UnexpectedEof => "Unexpected end of file",
            ErrorKind::UnexpectedToken => "Unexpected token",
            ErrorKind::WrongNumberOfParms => "Wrong number of actual parameters",
            ErrorKind::IoError => "Object I/O error",
        }
    }

    pub fn is_fatal(self) -> bool {
        matches!(self, ErrorKind::IoError)
    }
}

impl From<ScanError> for ErrorKind {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::InvalidCharacter => ErrorKind::InvalidCharacter,
            ScanError::InvalidNumber => ErrorKind::InvalidNumber,
            ScanError::RangeInteger => ErrorKind::RangeInteger,
            ScanError::RangeReal => ErrorKind::RangeReal,
            ScanError::UnexpectedEof => ErrorKind::UnexpectedEof,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// One recorded occurrence of a recoverable error.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxError {
    pub kind: ErrorKind,
    pub location: SourceLocation,
    pub token_text: String,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}  {}",
            self.location.line, self.location.column, self.kind
        )?;
        if !self.token_text.is_empty() {
            write!(f, " [at '{}']", self.token_text)?;
        }
        Ok(())
    }
}

/// Central counter of syntax errors for one compilation.
#[derive(Debug, Default)]
pub struct ErrorHandler {
    errors: Vec<SyntaxError>,
}

impl ErrorHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one error at `token`. Never aborts.
    pub fn flag(&mut self, token: &Token, kind: ErrorKind) {
        self.errors.push(SyntaxError {
            kind,
            location: token.location,
            token_text: token.text.clone(),
        });
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    /// Number of recorded errors of one kind
    pub fn count_of(&self, kind: ErrorKind) -> usize {
        self.errors.iter().filter(|e| e.kind == kind).count()
    }

    pub fn into_errors(self) -> Vec<SyntaxError> {
        self.errors
    }
}

/// Failure of the token source (scanner input).
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read source: {0}")]
    Io(#[from] io::Error),
}

/// Unrecoverable failure that aborts translation.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{kind} at line {line}: {source}")]
    Aborted {
        kind: ErrorKind,
        line: usize,
        #[source]
        source: SourceError,
    },
}

impl ParseError {
    /// Abort translation with a fatal `kind`.
    pub fn abort(kind: ErrorKind, line: usize, source: SourceError) -> Self {
        ParseError::Aborted { kind, line, source }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::Aborted { kind, .. } => *kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::token::TokenKind;

    #[test]
    fn test_flag_counts_without_aborting() {
        let mut handler = ErrorHandler::new();
        let token = Token::new(TokenKind::Identifier, "x", SourceLocation::new(3, 5));

        handler.flag(&token, ErrorKind::IdentifierUndefined);
        handler.flag(&token, ErrorKind::MissingSemicolon);

        assert_eq!(handler.error_count(), 2);
        assert_eq!(handler.count_of(ErrorKind::MissingSemicolon), 1);
        assert_eq!(handler.errors()[0].location.line, 3);
    }

    #[test]
    fn test_syntax_error_display() {
        let err = SyntaxError {
            kind: ErrorKind::MissingEquals,
            location: SourceLocation::new(7, 2),
            token_text: "3".to_string(),
        };
        assert_eq!(err.to_string(), "7:2  Missing = [at '3']");
    }

    #[test]
    fn test_scan_errors_map_to_kinds() {
        assert_eq!(
            ErrorKind::from(ScanError::RangeInteger),
            ErrorKind::RangeInteger
        );
        assert!(ErrorKind::IoError.is_fatal());
        assert!(!ErrorKind::UnexpectedToken.is_fatal());
    }
}
