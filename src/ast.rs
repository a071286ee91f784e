//! # Suela - Tokens and Abstract Syntax Tree
//!
//! A Suela script is a sequence of lines, each a comment or a function call:
//!
//! ```text
//! # greet everybody
//! @printf('%s %s', 'Hello', user.name)
//! @set('total', @sum(price, 3, -0.5))
//! ```
//!
//! ## Submodules
//!
//! - **[tokens]** - Positions and tokens produced by the lexer
//! - **[node]** - Tree nodes produced by the parser
//!
//! ## Tree shape
//!
//! The parser builds a `Script` root whose children are `Call` and `Comment`
//! nodes. A `Call` holds one `Arg` per argument; an `Arg` is either a leaf
//! carrying a literal or field token, or wraps exactly one nested `Call`.
//! Parse failures are `Error` nodes placed where the failure happened.
//!
//! [`Ast::describe`] renders a tree as an S-expression:
//!
//! ```text
//! @set(a, @sum(2,3))
//! (T () (C (@set) (A (a)) (A () (C (@sum) (A (2)) (A (3))))))
//! ```
pub mod node;
pub mod tokens;

pub use node::{Ast, AstKind};
pub use tokens::{Position, Token, TokenKind};
