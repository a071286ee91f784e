//! Recursive-descent parser for Suela scripts.
//!
//! ```text
//! Script    = { Statement } End
//! Statement = Comment | Expr
//! Expr      = FuncName "(" [ Arg { "," Arg } ] ")"
//! Arg       = Literal | FieldName | Expr
//! ```
//!
//! Parsing never aborts: a failure becomes an `Error` node placed where it
//! happened, and the first one ends the parse.

use std::fmt::Display;

use thiserror::Error;
use tracing::debug;

use crate::{
    ast::{Ast, AstKind, Position, Token, TokenKind},
    lexer::Lexer,
};

/// A parse failure extracted from a tree by [`Parser::parse_checked`].
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct SyntaxError {
    /// Where the offending token starts
    pub position: Position,
    /// Full `source:line:column: message` text
    pub message: String,
}

pub struct Parser {
    lexer: Lexer,
    failed: bool,
}

impl Parser {
    pub fn new(lexer: Lexer) -> Self {
        Parser {
            lexer,
            failed: false,
        }
    }

    /// Creates a parser over `input`; `source` names it in diagnostics.
    pub fn from_source(source: &str, input: &str) -> Self {
        Parser::new(Lexer::new(source, input))
    }

    pub fn peek_token(&mut self) -> &Token {
        self.lexer.peek_token()
    }

    pub fn next_token(&mut self) -> Token {
        self.lexer.next_token()
    }

    /// Builds an `Error` node for `token` and stops the parse. Lexer errors
    /// are passed through unchanged.
    fn fail(&mut self, token: Token, message: impl Display) -> Ast {
        self.failed = true;
        let token = match token.kind {
            TokenKind::Error => token,
            _ => Token::error(token.position, message),
        };
        Ast::from_token(AstKind::Error, token)
    }

    /// Parse a function call: `@name(arg, ...)`
    pub fn parse_expr(&mut self) -> Ast {
        let token = self.next_token();
        if !token.is(TokenKind::Func) {
            let message = format!("expected @function name, got {}", token);
            return self.fail(token, message);
        }
        let mut call = Ast::from_token(AstKind::Call, token);

        let token = self.next_token();
        if !token.is(TokenKind::OpenParen) {
            let message = format!("expected (, got {}", token);
            return self.fail(token, message);
        }

        if self.peek_token().is(TokenKind::CloseParen) {
            self.next_token();
            return call;
        }

        loop {
            let arg = self.parse_arg();
            call.children.push(arg);
            if self.failed {
                return call;
            }

            let token = self.next_token();
            match token.kind {
                TokenKind::CloseParen => return call,
                TokenKind::Comma => continue,
                _ => {
                    let message = format!("expected , or ), got {}", token);
                    let error = self.fail(token, message);
                    call.children.push(error);
                    return call;
                }
            }
        }
    }

    /// Parse one call argument: a literal, a field or a nested call
    pub fn parse_arg(&mut self) -> Ast {
        let kind = self.peek_token().kind;
        match kind {
            TokenKind::Field | TokenKind::Literal => {
                Ast::from_token(AstKind::Arg, self.next_token())
            }
            TokenKind::Func => {
                let call = self.parse_expr();
                if call.is_error() {
                    call
                } else {
                    Ast::nested_arg(call)
                }
            }
            _ => {
                let token = self.next_token();
                let message = format!(
                    "expected a field, string, int, float, json, or expression, got {}",
                    token
                );
                self.fail(token, message)
            }
        }
    }

    /// Parse a statement: a comment or a function call
    pub fn parse_statement(&mut self) -> Ast {
        let kind = self.peek_token().kind;
        match kind {
            TokenKind::Comment => Ast::from_token(AstKind::Comment, self.next_token()),
            TokenKind::Func => self.parse_expr(),
            _ => {
                let token = self.next_token();
                let message = format!(
                    "expected a comment, or a function call expression, got {}",
                    token
                );
                self.fail(token, message)
            }
        }
    }

    /// Parse a complete script.
    ///
    /// Always returns a `Script` root; on failure its last statement is,
    /// or contains, an `Error` node.
    pub fn parse(&mut self) -> Ast {
        let mut script = Ast::script(Vec::new());

        loop {
            let kind = self.peek_token().kind;
            match kind {
                TokenKind::End => break,
                TokenKind::Eol => {
                    self.next_token(); // Skip blank line
                    continue;
                }
                _ => {}
            }

            let statement = self.parse_statement();
            script.children.push(statement);
            if self.failed {
                break;
            }

            let token = self.next_token();
            match token.kind {
                TokenKind::Eol => continue,
                TokenKind::End => break,
                _ => {
                    let message = format!("expected new line, got {}", token);
                    let error = self.fail(token, message);
                    script.children.push(error);
                    break;
                }
            }
        }

        if let Some(error) = script.find_error() {
            debug!(error = %error.value(), "parse stopped");
        }
        script
    }

    /// Parse a complete script, returning the first syntax error as `Err`.
    pub fn parse_checked(&mut self) -> Result<Ast, SyntaxError> {
        let script = self.parse();
        match script.find_error() {
            Some(error) => Err(SyntaxError {
                position: error
                    .token
                    .as_ref()
                    .map(|t| t.position.clone())
                    .unwrap_or_else(|| self.lexer.position().clone()),
                message: error.value().to_string(),
            }),
            None => Ok(script),
        }
    }
}
