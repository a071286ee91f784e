//! Suela: a small embeddable scripting language.
//!
//! A script is a list of lines, each a `#` comment or a function call whose
//! arguments are literals, field references or nested calls:
//!
//! ```
//! use suela::{Environment, Value};
//!
//! let mut env = Environment::with_stdlib();
//! let script = suela::parse("example", "@set(total, @sum(2, 3))\n@get(total)");
//! assert_eq!(env.eval(&script), Value::Int(5));
//! ```
pub mod ast;
pub mod cli;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod stdlib;
pub mod value;

pub use ast::{Ast, AstKind, Position, Token, TokenKind};
pub use evaluator::{Environment, EvalError, Function, Resolver};
pub use lexer::Lexer;
pub use parser::{Parser, SyntaxError};
pub use value::{FieldName, Value};

/// Parses `input` into a tree; `source` names it in diagnostics.
pub fn parse(source: &str, input: &str) -> Ast {
    Parser::from_source(source, input).parse()
}
