//! Token model shared by the scanner and the parser
//!
//! A [`Token`] is an immutable value: a [`TokenKind`], the literal source
//! text, an optional decoded [`TokenValue`], and the [`SourceLocation`] of
//! its first character. [`TokenSet`] is the synchronization-set type used by
//! every parser recovery point.

use std::fmt;

/// Line/column position of a token (both 1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Terminal classes of the SubC grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenKind {
    // Reserved words
    Auto,
    Double,
    Int,
    Struct,
    Break,
    Else,
    Long,
    Switch,
    Case,
    Enum,
    Register,
    Typedef,
    Char,
    Extern,
    Return,
    Union,
    Const,
    Float,
    Short,
    Unsigned,
    Continue,
    For,
    Signed,
    Void,
    Default,
    Goto,
    Sizeof,
    Volatile,
    Do,
    If,
    Static,
    While,

    // Special symbols
    Plus,
    PlusEquals,
    Increment,
    Minus,
    MinusEquals,
    Decrement,
    Star,
    StarEquals,
    Slash,
    SlashEquals,
    Equals,
    EqualEquals,
    Not,
    NotEquals,
    LessThan,
    LessEquals,
    GreaterEquals,
    GreaterThan,
    Ampersand,
    And,
    VerticalBar,
    Or,
    Mod,
    ModEquals,
    Dot,
    Comma,
    Semicolon,
    Colon,
    Tilde,
    LeftParen,
    RightParen,
    Question,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    Caret,

    // Classified literals
    Identifier,
    Integer,
    Real,
    Character,
    String,

    Error,
    EndOfFile,
}

impl TokenKind {
    /// Reserved word for `word`, if it is one. Reserved words are case-sensitive.
    pub fn reserved_word(word: &str) -> Option<TokenKind> {
        let kind = match word {
            "auto" => TokenKind::Auto,
            "double" => TokenKind::Double,
            "int" => TokenKind::Int,
            "struct" => TokenKind::Struct,
            "break" => TokenKind::Break,
            "else" => TokenKind::Else,
            "long" => TokenKind::Long,
            "switch" => TokenKind::Switch,
            "case" => TokenKind::Case,
            "enum" => TokenKind::Enum,
            "register" => TokenKind::Register,
            "typedef" => TokenKind::Typedef,
            "char" => TokenKind::Char,
            "extern" => TokenKind::Extern,
            "return" => TokenKind::Return,
            "union" => TokenKind::Union,
            "const" => TokenKind::Const,
            "float" => TokenKind::Float,
            "short" => TokenKind::Short,
            "unsigned" => TokenKind::Unsigned,
            "continue" => TokenKind::Continue,
            "for" => TokenKind::For,
            "signed" => TokenKind::Signed,
            "void" => TokenKind::Void,
            "default" => TokenKind::Default,
            "goto" => TokenKind::Goto,
            "sizeof" => TokenKind::Sizeof,
            "volatile" => TokenKind::Volatile,
            "do" => TokenKind::Do,
            "if" => TokenKind::If,
            "static" => TokenKind::Static,
            "while" => TokenKind::While,
            _ => return None,
        };
        Some(kind)
    }

    /// Source text of a reserved word or special symbol.
    pub fn text(self) -> &'static str {
        match self {
            TokenKind::Auto => "auto",
            TokenKind::Double => "double",
            TokenKind::Int => "int",
            TokenKind::Struct => "struct",
            TokenKind::Break => "break",
            TokenKind::Else => "else",
            TokenKind::Long => "long",
            TokenKind::Switch => "switch",
            TokenKind::Case => "case",
            TokenKind::Enum => "enum",
            TokenKind::Register => "register",
            TokenKind::Typedef => "typedef",
            TokenKind::Char => "char",
            TokenKind::Extern => "extern",
            TokenKind::Return => "return",
            TokenKind::Union => "union",
            TokenKind::Const => "const",
            TokenKind::Float => "float",
            TokenKind::Short => "short",
            TokenKind::Unsigned => "unsigned",
            TokenKind::Continue => "continue",
            TokenKind::For => "for",
            TokenKind::Signed => "signed",
            TokenKind::Void => "void",
            TokenKind::Default => "default",
            TokenKind::Goto => "goto",
            TokenKind::Sizeof => "sizeof",
            TokenKind::Volatile => "volatile",
            TokenKind::Do => "do",
            TokenKind::If => "if",
            TokenKind::Static => "static",
            TokenKind::While => "while",
            TokenKind::Plus => "+",
            TokenKind::PlusEquals => "+=",
            TokenKind::Increment => "++",
            TokenKind::Minus => "-",
            TokenKind::MinusEquals => "-=",
            TokenKind::Decrement => "--",
            TokenKind::Star => "*",
            TokenKind::StarEquals => "*=",
            TokenKind::Slash => "/",
            TokenKind::SlashEquals => "/=",
            TokenKind::Equals => "=",
            TokenKind::EqualEquals => "==",
            TokenKind::Not => "!",
            TokenKind::NotEquals => "!=",
            TokenKind::LessThan => "<",
            TokenKind::LessEquals => "<=",
            TokenKind::GreaterEquals => ">=",
            TokenKind::GreaterThan => ">",
            TokenKind::Ampersand => "&",
            TokenKind::And => "&&",
            TokenKind::VerticalBar => "|",
            TokenKind::Or => "||",
            TokenKind::Mod => "%",
            TokenKind::ModEquals => "%=",
            TokenKind::Dot => ".",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::Colon => ":",
            TokenKind::Tilde => "~",
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::Question => "?",
            TokenKind::LeftBracket => "[",
            TokenKind::RightBracket => "]",
            TokenKind::LeftBrace => "{",
            TokenKind::RightBrace => "}",
            TokenKind::Caret => "^",
            TokenKind::Identifier => "identifier",
            TokenKind::Integer => "integer literal",
            TokenKind::Real => "real literal",
            TokenKind::Character => "character literal",
            TokenKind::String => "string literal",
            TokenKind::Error => "error",
            TokenKind::EndOfFile => "end of file",
        }
    }

    const fn bit(self) -> u128 {
        1u128 << (self as u32)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Scanner-level classification failures carried by `Error` tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanError {
    InvalidCharacter,
    InvalidNumber,
    RangeInteger,
    RangeReal,
    UnexpectedEof,
}

/// Decoded literal payload.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    Integer(i64),
    Real(f64),
    Character(char),
    String(String),
    Error(ScanError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub value: Option<TokenValue>,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind,
            text: text.into(),
            value: None,
            location,
        }
    }

    pub fn with_value(mut self, value: TokenValue) -> Self {
        self.value = Some(value);
        self
    }

    pub fn eof(location: SourceLocation) -> Self {
        Self::new(TokenKind::EndOfFile, "", location)
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::EndOfFile
    }

    pub fn line(&self) -> usize {
        self.location.line
    }

    /// The scanner error carried by an `Error` token.
    pub fn scan_error(&self) -> Option<ScanError> {
        match self.value {
            Some(TokenValue::Error(e)) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Identifier => write!(f, "identifier '{}'", self.text),
            TokenKind::Integer
            | TokenKind::Real
            | TokenKind::Character
            | TokenKind::String => write!(f, "{} {}", self.kind, self.text),
            TokenKind::EndOfFile => write!(f, "end of file"),
            TokenKind::Error => write!(f, "invalid token '{}'", self.text),
            _ => write!(f, "'{}'", self.kind.text()),
        }
    }
}

/// A set of token kinds, built at compile time for synchronization points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenSet(u128);

impl TokenSet {
    pub const EMPTY: TokenSet = TokenSet(0);

    pub const fn of(kinds: &[TokenKind]) -> Self {
        let mut bits = 0u128;
        let mut i = 0;
        while i < kinds.len() {
            bits |= kinds[i].bit();
            i += 1;
        }
        TokenSet(bits)
    }

    pub const fn with(self, kind: TokenKind) -> Self {
        TokenSet(self.0 | kind.bit())
    }

    pub const fn without(self, kind: TokenKind) -> Self {
        TokenSet(self.0 & !kind.bit())
    }

    pub const fn union(self, other: TokenSet) -> Self {
        TokenSet(self.0 | other.0)
    }

    pub const fn contains(self, kind: TokenKind) -> bool {
        self.0 & kind.bit() != 0
    }
}
