use std::io::Read;

use tracing::trace;

use crate::ast::{Position, Token, TokenKind};
use crate::value::{FieldName, Value};

/// Converts Suela source text into tokens, one at a time.
///
/// The lexer never fails: malformed input produces a token of kind
/// [`TokenKind::Error`], and exhausted input keeps producing
/// [`TokenKind::End`].
pub struct Lexer {
    input: Vec<char>,
    index: usize,
    position: Position,
    lookahead: Option<Token>,
    read_error: Option<String>,
}

impl Lexer {
    /// Creates a lexer over `input`; `source` only names it in diagnostics.
    pub fn new(source: &str, input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            index: 0,
            position: Position::new(source),
            lookahead: None,
            read_error: None,
        }
    }

    /// Creates a lexer reading all of `reader` up front. A read failure is
    /// reported as the first token.
    pub fn from_reader(source: &str, mut reader: impl Read) -> Self {
        let mut input = String::new();
        match reader.read_to_string(&mut input) {
            Ok(_) => Lexer::new(source, &input),
            Err(e) => {
                let mut lexer = Lexer::new(source, "");
                lexer.read_error = Some(format!("read failure: {}", e));
                lexer
            }
        }
    }

    /// Current position of the lexer in its input.
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Returns the next token without consuming it.
    pub fn peek_token(&mut self) -> &Token {
        let token = match self.lookahead.take() {
            Some(token) => token,
            None => self.lex(),
        };
        self.lookahead.insert(token)
    }

    /// Consumes and returns the next token.
    pub fn next_token(&mut self) -> Token {
        match self.lookahead.take() {
            Some(token) => token,
            None => self.lex(),
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.index).copied()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.index += 1;
            if ch == '\n' {
                self.position.line += 1;
                self.position.column = 1;
            } else {
                self.position.column += 1;
            }
        }
    }

    fn skip_blanks(&mut self) {
        while let Some(' ' | '\t') = self.current_char() {
            self.advance();
        }
    }

    fn read_field_body(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || matches!(ch, '.' | '_' | '[' | ']') {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn lex_comment(&mut self, start: Position) -> Token {
        self.advance(); // Consume '#'
        let mut text = String::new();
        loop {
            match self.current_char() {
                None => return Token::error(start, "unterminated comment"),
                Some('\n') => return Token::new(start, TokenKind::Comment, Value::Comment(text)),
                Some(ch) => {
                    text.push(ch);
                    self.advance();
                }
            }
        }
    }

    fn lex_func_name(&mut self, start: Position) -> Token {
        self.advance(); // Consume '@'
        let name = self.read_field_body();
        if name.is_empty() {
            return Token::error(start, "missing function name after '@'");
        }
        Token::new(start, TokenKind::Func, Value::FuncName(name))
    }

    fn lex_field_name(&mut self, start: Position) -> Token {
        let name = self.read_field_body();
        Token::new(start, TokenKind::Field, Value::FieldName(FieldName::parse(&name)))
    }

    /// Slices a balanced `{...}` span; braces inside double-quoted strings
    /// do not count.
    fn lex_json(&mut self, start: Position) -> Token {
        let mut text = String::new();
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;

        loop {
            let Some(ch) = self.current_char() else {
                return Token::error(start, "unterminated JSON literal");
            };
            text.push(ch);
            self.advance();

            if in_string {
                if escaped {
                    escaped = false;
                } else if ch == '\\' {
                    escaped = true;
                } else if ch == '"' {
                    in_string = false;
                }
                continue;
            }

            match ch {
                '"' => in_string = true,
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Token::new(start, TokenKind::Literal, Value::Json(text.into_bytes()));
                    }
                }
                _ => {}
            }
        }
    }

    fn lex_string(&mut self, start: Position) -> Token {
        self.advance(); // Consume opening quote
        let mut result = String::new();

        loop {
            match self.current_char() {
                None => return Token::error(start, "unterminated string"),
                Some('\'') => {
                    self.advance();
                    return Token::new(start, TokenKind::Literal, Value::String(result));
                }
                Some('\\') => {
                    self.advance(); // Consume backslash
                    match self.current_char() {
                        Some('n') => result.push('\n'),
                        Some('r') => result.push('\r'),
                        Some(ch) => result.push(ch),
                        None => return Token::error(start, "unterminated string"),
                    }
                    self.advance();
                }
                Some(ch) => {
                    result.push(ch);
                    self.advance();
                }
            }
        }
    }

    fn lex_number(&mut self, start: Position) -> Token {
        let mut number = String::new();
        let mut is_float = false;
        let mut extra_point = false;

        if self.current_char() == Some('-') {
            number.push('-');
            self.advance();
        }

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
            } else if ch == '.' {
                extra_point |= is_float;
                is_float = true;
                number.push(ch);
            } else {
                break;
            }
            self.advance();
        }

        if extra_point {
            return Token::error(start, format!("more than one floating point in {}", number));
        }

        let value = if is_float {
            number.parse::<f64>().map(Value::Float).map_err(|e| e.to_string())
        } else {
            number.parse::<i64>().map(Value::Int).map_err(|e| e.to_string())
        };

        match value {
            Ok(value) => Token::new(start, TokenKind::Literal, value),
            Err(e) => Token::error(start, format!("invalid number '{}': {}", number, e)),
        }
    }

    fn punctuation(&mut self, start: Position, kind: TokenKind, ch: char) -> Token {
        self.advance();
        Token::new(start, kind, Value::String(ch.to_string()))
    }

    fn lex(&mut self) -> Token {
        if let Some(message) = self.read_error.take() {
            return Token::error(self.position.clone(), message);
        }

        self.skip_blanks();
        let start = self.position.clone();

        let token = match self.current_char() {
            None => Token::new(start, TokenKind::End, Value::Nil),
            Some('\n') => {
                self.advance();
                Token::new(start, TokenKind::Eol, Value::Nil)
            }
            Some('#') => self.lex_comment(start),
            Some('@') => self.lex_func_name(start),
            Some('{') => self.lex_json(start),
            Some('\'') => self.lex_string(start),
            Some(ch) if ch.is_ascii_digit() || ch == '-' => self.lex_number(start),
            Some(ch @ '(') => self.punctuation(start, TokenKind::OpenParen, ch),
            Some(ch @ ')') => self.punctuation(start, TokenKind::CloseParen, ch),
            Some(ch @ ',') => self.punctuation(start, TokenKind::Comma, ch),
            Some(ch) if ch.is_alphabetic() => self.lex_field_name(start),
            Some(ch) => Token::error(start, format!("unexpected character {:?}", ch)),
        };

        trace!(kind = ?token.kind, position = %token.position, "lexed token");
        token
    }
}

#[test]
fn test_peek_is_idempotent() {
    let mut lexer = Lexer::new("test", "1 2");
    assert_eq!(lexer.peek_token().value, Value::Int(1));
    assert_eq!(lexer.peek_token().value, Value::Int(1));
    assert_eq!(lexer.next_token().value, Value::Int(1));
    assert_eq!(lexer.next_token().value, Value::Int(2));
    assert_eq!(lexer.next_token().kind, TokenKind::End);
    assert_eq!(lexer.next_token().kind, TokenKind::End);
}

#[test]
fn test_positions() {
    let mut lexer = Lexer::new("pos", "@a(\n  x)");
    let func = lexer.next_token();
    assert_eq!((func.position.line, func.position.column), (1, 1));
    let open = lexer.next_token();
    assert_eq!((open.position.line, open.position.column), (1, 3));
    assert_eq!(lexer.next_token().kind, TokenKind::Eol);
    let field = lexer.next_token();
    assert_eq!((field.position.line, field.position.column), (2, 3));
    assert_eq!(field.position.to_string(), "pos:2:3");
}
