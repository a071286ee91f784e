use std::fmt;

use crate::value::Value;

/// Location of a token in its source, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    /// Name of the source (a file name, or any label given by the host)
    pub source: String,
    /// 1-based line
    pub line: usize,
    /// 1-based column
    pub column: usize,
}

impl Position {
    pub fn new(source: impl Into<String>) -> Self {
        Position {
            source: source.into(),
            line: 1,
            column: 1,
        }
    }

    /// Formats a message as `source:line:column: message`.
    pub fn error_message(&self, message: impl fmt::Display) -> String {
        format!("{}: {}", self, message)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.source, self.line, self.column)
    }
}

/// Token discriminant used by the parser for dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Input exhausted
    End,

    /// Lexical error; the value is a `Value::Error`
    Error,

    /// `,`
    Comma,

    /// `(`
    OpenParen,

    /// `)`
    CloseParen,

    /// Bare dotted field reference
    ///
    /// # Examples
    /// ```text
    /// user.name
    /// items[1].price
    /// ```
    Field,

    /// Function name, introduced by `@`
    ///
    /// # Examples
    /// ```text
    /// @print
    /// @str.upper
    /// ```
    Func,

    /// `#` through end of line
    Comment,

    /// Integer, float, string or JSON literal
    ///
    /// # Examples
    /// ```text
    /// 42
    /// -0.5
    /// 'it\'s'
    /// {"a": [1, 2]}
    /// ```
    Literal,

    /// Newline, the statement separator
    Eol,
}

/// A lexical unit: where it was found, what kind it is and its value.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub position: Position,
    pub kind: TokenKind,
    pub value: Value,
}

impl Token {
    pub fn new(position: Position, kind: TokenKind, value: Value) -> Self {
        Token {
            position,
            kind,
            value,
        }
    }

    /// Builds an `Error` token whose message carries the position.
    pub fn error(position: Position, message: impl fmt::Display) -> Self {
        let value = Value::Error(position.error_message(message));
        Token::new(position, TokenKind::Error, value)
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::End => write!(f, "end of input"),
            TokenKind::Eol => write!(f, "new line"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::OpenParen => write!(f, "("),
            TokenKind::CloseParen => write!(f, ")"),
            _ => write!(f, "{}", self.value),
        }
    }
}
