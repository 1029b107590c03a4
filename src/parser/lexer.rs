//! Scanner for SubC source text
//!
//! Converts source text into [`Token`]s one at a time through the
//! [`TokenSource`] trait, which is the only thing the parser depends on.
//! The scanner reads its input line by line, so a read failure in the middle
//! of a file reaches the parser as a [`SourceError`] (the fatal path) rather
//! than being hidden behind an up-front read.
//!
//! Characters that cannot start any token, malformed literals, and literals
//! out of range become `Error` tokens carrying a [`ScanError`]; they are not
//! fatal.

use super::token::{ScanError, SourceLocation, Token, TokenKind, TokenValue};
use crate::errors::SourceError;
use std::io::{BufRead, Cursor};

/// Pull-based producer of tokens.
///
/// Returns a distinguished `EndOfFile` token at the end of input, and keeps
/// returning it on further calls.
pub trait TokenSource {
    fn next_token(&mut self) -> Result<Token, SourceError>;
}

/// Scanner over any buffered reader
pub struct Scanner<R> {
    reader: R,
    line: Vec<char>,
    line_num: usize,
    position: usize,
    at_eof: bool,
}

impl Scanner<Cursor<String>> {
    /// Scanner over an in-memory source string.
    pub fn from_source(source: &str) -> Self {
        Scanner::new(Cursor::new(source.to_string()))
    }
}

impl<R: BufRead> Scanner<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: Vec::new(),
            line_num: 0,
            position: 0,
            at_eof: false,
        }
    }

    /// Current character; every line ends in `'\n'`, `None` is end of input.
    fn current_char(&mut self) -> Result<Option<char>, SourceError> {
        while self.position >= self.line.len() {
            if self.at_eof || !self.read_line()? {
                return Ok(None);
            }
        }
        Ok(Some(self.line[self.position]))
    }

    fn next_char(&mut self) -> Result<Option<char>, SourceError> {
        self.position += 1;
        self.current_char()
    }

    /// Character after the current one, within the current line.
    fn peek_char(&self) -> Option<char> {
        self.line.get(self.position + 1).copied()
    }

    fn read_line(&mut self) -> Result<bool, SourceError> {
        let mut buf = String::new();
        if self.reader.read_line(&mut buf)? == 0 {
            self.at_eof = true;
            self.line.clear();
            self.position = 0;
            return Ok(false);
        }
        if !buf.ends_with('\n') {
            buf.push('\n');
        }
        self.line = buf.chars().filter(|&c| c != '\r').collect();
        self.line_num += 1;
        self.position = 0;
        Ok(true)
    }

    fn location(&self) -> SourceLocation {
        SourceLocation::new(self.line_num.max(1), self.position + 1)
    }

    /// Skip whitespace, comments and preprocessor lines
    fn skip_whitespace(&mut self) -> Result<(), SourceError> {
        loop {
            let Some(ch) = self.current_char()? else {
                return Ok(());
            };

            if ch.is_whitespace() {
                self.next_char()?;
            } else if ch == '#' && self.line[..self.position].iter().all(|c| c.is_whitespace()) {
                // Preprocessor directives are not part of the language
                self.position = self.line.len();
            } else if ch == '/' && self.peek_char() == Some('/') {
                self.position = self.line.len();
            } else if ch == '/' && self.peek_char() == Some('*') {
                self.next_char()?;
                let mut current = self.next_char()?;
                loop {
                    match current {
                        None => return Ok(()),
                        Some('*') if self.peek_char() == Some('/') => {
                            self.next_char()?;
                            self.next_char()?;
                            break;
                        }
                        Some(_) => current = self.next_char()?,
                    }
                }
            } else {
                return Ok(());
            }
        }
    }

    fn extract_token(&mut self) -> Result<Token, SourceError> {
        self.skip_whitespace()?;

        let location = self.location();
        let Some(ch) = self.current_char()? else {
            return Ok(Token::eof(location));
        };

        match ch {
            'a'..='z' | 'A'..='Z' | '_' => self.word(location),
            '0'..='9' => self.number(location),
            '\'' => self.character(location),
            '"' => self.string(location),
            _ => self.special_symbol(ch, location),
        }
    }

    /// Identifier or reserved word
    fn word(&mut self, location: SourceLocation) -> Result<Token, SourceError> {
        let mut text = String::new();
        while let Some(ch) = self.current_char()? {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                text.push(ch);
                self.next_char()?;
            } else {
                break;
            }
        }

        let kind = TokenKind::reserved_word(&text).unwrap_or(TokenKind::Identifier);
        Ok(Token::new(kind, text, location))
    }

    fn digits(&mut self, text: &mut String) -> Result<usize, SourceError> {
        let mut count = 0;
        while let Some(ch) = self.current_char()? {
            if !ch.is_ascii_digit() {
                break;
            }
            text.push(ch);
            count += 1;
            self.next_char()?;
        }
        Ok(count)
    }

    /// Integer or real literal
    fn number(&mut self, location: SourceLocation) -> Result<Token, SourceError> {
        let mut text = String::new();
        let mut is_real = false;
        let mut malformed = false;

        self.digits(&mut text)?;

        if self.current_char()? == Some('.')
            && self.peek_char().is_some_and(|c| c.is_ascii_digit())
        {
            is_real = true;
            text.push('.');
            self.next_char()?;
            self.digits(&mut text)?;
        }

        if matches!(self.current_char()?, Some('e' | 'E')) {
            is_real = true;
            text.push('e');
            if let Some(sign @ ('+' | '-')) = self.next_char()? {
                text.push(sign);
                self.next_char()?;
            }
            if self.digits(&mut text)? == 0 {
                malformed = true;
            }
        }

        let value = if malformed {
            TokenValue::Error(ScanError::InvalidNumber)
        } else if is_real {
            match text.parse::<f64>() {
                Ok(v) if v.is_finite() => TokenValue::Real(v),
                _ => TokenValue::Error(ScanError::RangeReal),
            }
        } else {
            match text.parse::<i64>() {
                Ok(v) if v <= i64::from(i32::MAX) => TokenValue::Integer(v),
                _ => TokenValue::Error(ScanError::RangeInteger),
            }
        };

        let kind = match value {
            TokenValue::Error(_) => TokenKind::Error,
            TokenValue::Real(_) => TokenKind::Real,
            _ => TokenKind::Integer,
        };
        Ok(Token::new(kind, text, location).with_value(value))
    }

    fn escape(ch: char) -> Option<char> {
        match ch {
            'n' => Some('\n'),
            't' => Some('\t'),
            'r' => Some('\r'),
            '0' => Some('\0'),
            '\\' => Some('\\'),
            '\'' => Some('\''),
            '"' => Some('"'),
            _ => None,
        }
    }

    fn character(&mut self, location: SourceLocation) -> Result<Token, SourceError> {
        let mut text = String::from('\'');
        let mut value = None;

        match self.next_char()? {
            Some('\\') => {
                text.push('\\');
                if let Some(escaped) = self.next_char()? {
                    text.push(escaped);
                    value = Self::escape(escaped);
                    self.next_char()?;
                }
            }
            Some(ch) if ch != '\'' && ch != '\n' => {
                text.push(ch);
                value = Some(ch);
                self.next_char()?;
            }
            _ => {}
        }

        if self.current_char()? == Some('\'') {
            text.push('\'');
            self.next_char()?;
        } else {
            value = None;
        }

        let token = match value {
            Some(ch) => Token::new(TokenKind::Character, text, location)
                .with_value(TokenValue::Character(ch)),
            None => Token::new(TokenKind::Error, text, location)
                .with_value(TokenValue::Error(ScanError::InvalidCharacter)),
        };
        Ok(token)
    }

    fn string(&mut self, location: SourceLocation) -> Result<Token, SourceError> {
        let mut text = String::from('"');
        let mut value = String::new();
        let mut current = self.next_char()?;

        loop {
            match current {
                Some('"') => {
                    text.push('"');
                    self.next_char()?;
                    return Ok(Token::new(TokenKind::String, text, location)
                        .with_value(TokenValue::String(value)));
                }
                // Strings do not span lines
                None | Some('\n') => {
                    return Ok(Token::new(TokenKind::Error, text, location)
                        .with_value(TokenValue::Error(ScanError::UnexpectedEof)));
                }
                Some('\\') => {
                    text.push('\\');
                    match self.next_char()? {
                        Some(escaped) if escaped != '\n' => {
                            text.push(escaped);
                            value.push(Self::escape(escaped).unwrap_or(escaped));
                            current = self.next_char()?;
                        }
                        other => current = other,
                    }
                }
                Some(ch) => {
                    text.push(ch);
                    value.push(ch);
                    current = self.next_char()?;
                }
            }
        }
    }

    fn special_symbol(
        &mut self,
        ch: char,
        location: SourceLocation,
    ) -> Result<Token, SourceError> {
        let next = self.peek_char();
        let (kind, width) = match (ch, next) {
            ('+', Some('+')) => (TokenKind::Increment, 2),
            ('+', Some('=')) => (TokenKind::PlusEquals, 2),
            ('+', _) => (TokenKind::Plus, 1),
            ('-', Some('-')) => (TokenKind::Decrement, 2),
            ('-', Some('=')) => (TokenKind::MinusEquals, 2),
            ('-', _) => (TokenKind::Minus, 1),
            ('*', Some('=')) => (TokenKind::StarEquals, 2),
            ('*', _) => (TokenKind::Star, 1),
            ('/', Some('=')) => (TokenKind::SlashEquals, 2),
            ('/', _) => (TokenKind::Slash, 1),
            ('=', Some('=')) => (TokenKind::EqualEquals, 2),
            ('=', _) => (TokenKind::Equals, 1),
            ('!', Some('=')) => (TokenKind::NotEquals, 2),
            ('!', _) => (TokenKind::Not, 1),
            ('<', Some('=')) => (TokenKind::LessEquals, 2),
            ('<', _) => (TokenKind::LessThan, 1),
            ('>', Some('=')) => (TokenKind::GreaterEquals, 2),
            ('>', _) => (TokenKind::GreaterThan, 1),
            ('&', Some('&')) => (TokenKind::And, 2),
            ('&', _) => (TokenKind::Ampersand, 1),
            ('|', Some('|')) => (TokenKind::Or, 2),
            ('|', _) => (TokenKind::VerticalBar, 1),
            ('%', Some('=')) => (TokenKind::ModEquals, 2),
            ('%', _) => (TokenKind::Mod, 1),
            ('.', _) => (TokenKind::Dot, 1),
            (',', _) => (TokenKind::Comma, 1),
            (';', _) => (TokenKind::Semicolon, 1),
            (':', _) => (TokenKind::Colon, 1),
            ('~', _) => (TokenKind::Tilde, 1),
            ('(', _) => (TokenKind::LeftParen, 1),
            (')', _) => (TokenKind::RightParen, 1),
            ('?', _) => (TokenKind::Question, 1),
            ('[', _) => (TokenKind::LeftBracket, 1),
            (']', _) => (TokenKind::RightBracket, 1),
            ('{', _) => (TokenKind::LeftBrace, 1),
            ('}', _) => (TokenKind::RightBrace, 1),
            ('^', _) => (TokenKind::Caret, 1),
            _ => {
                self.next_char()?;
                return Ok(Token::new(TokenKind::Error, ch.to_string(), location)
                    .with_value(TokenValue::Error(ScanError::InvalidCharacter)));
            }
        };

        for _ in 0..width {
            self.next_char()?;
        }
        Ok(Token::new(kind, kind.text(), location))
    }
}

impl<R: BufRead> TokenSource for Scanner<R> {
    fn next_token(&mut self) -> Result<Token, SourceError> {
        self.extract_token()
    }
}
