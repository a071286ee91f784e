use std::fmt;

use crate::ast::Token;
use crate::value::Value;

static NIL: Value = Value::Nil;

/// Node discriminant, rendered as a single character by [`Ast::describe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AstKind {
    /// Parse failure, carrying an `Error` token
    Error,
    /// Call argument: a literal/field leaf, or a wrapper around one nested call
    Arg,
    /// Group of statements evaluated in order
    Statement,
    /// Root of a parsed script
    Script,
    /// Function call; the token holds the `FuncName`
    Call,
    /// Comment line
    Comment,
}

impl AstKind {
    pub fn code(self) -> char {
        match self {
            AstKind::Error => 'E',
            AstKind::Arg => 'A',
            AstKind::Statement => 'S',
            AstKind::Script => 'T',
            AstKind::Call => 'C',
            AstKind::Comment => '#',
        }
    }
}

/// A node of the syntax tree.
///
/// Each node owns its children; synthetic nodes (the script root, argument
/// wrappers around nested calls) carry no token.
#[derive(Debug, Clone, PartialEq)]
pub struct Ast {
    pub kind: AstKind,
    pub token: Option<Token>,
    pub children: Vec<Ast>,
}

impl Ast {
    pub fn from_token(kind: AstKind, token: Token) -> Self {
        Ast {
            kind,
            token: Some(token),
            children: Vec::new(),
        }
    }

    pub fn composite(kind: AstKind, children: Vec<Ast>) -> Self {
        Ast {
            kind,
            token: None,
            children,
        }
    }

    pub fn script(children: Vec<Ast>) -> Self {
        Ast::composite(AstKind::Script, children)
    }

    /// Groups several statements (or whole scripts) so they run as one.
    pub fn statement(children: Vec<Ast>) -> Self {
        Ast::composite(AstKind::Statement, children)
    }

    /// Wraps a nested call so it can sit in an argument position.
    pub fn nested_arg(call: Ast) -> Self {
        Ast::composite(AstKind::Arg, vec![call])
    }

    /// The value carried by this node's token, `Nil` for synthetic nodes.
    pub fn value(&self) -> &Value {
        self.token.as_ref().map(|t| &t.value).unwrap_or(&NIL)
    }

    pub fn is_error(&self) -> bool {
        self.kind == AstKind::Error
    }

    /// Finds the first `Error` node, depth first.
    pub fn find_error(&self) -> Option<&Ast> {
        if self.is_error() {
            return Some(self);
        }
        self.children.iter().find_map(Ast::find_error)
    }

    /// Returns the S-expression form of this tree, e.g. `(C (@nil))`.
    pub fn describe(&self) -> String {
        let mut res = format!("({} (", self.kind.code());
        if let Some(token) = &self.token {
            res.push_str(&token.value.to_string());
        }
        res.push(')');
        for child in &self.children {
            res.push(' ');
            res.push_str(&child.describe());
        }
        res.push(')');
        res
    }
}

impl fmt::Display for Ast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}
