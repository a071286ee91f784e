use std::{collections::HashMap, rc::Rc};

use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    ast::{Ast, AstKind},
    value::{FieldName, Value},
};

/// A host function callable from scripts as `@name(...)`.
///
/// Any `Fn(&mut Environment, &[Value]) -> Value` closure is a `Function`.
/// Arguments arrive unresolved: a field reference is a [`Value::FieldName`]
/// (see [`Environment::resolve`]). A returned `Value::Error` is ordinary
/// data to the rest of the script.
pub trait Function {
    fn call(&self, env: &mut Environment, args: &[Value]) -> Value;
}

impl<F> Function for F
where
    F: Fn(&mut Environment, &[Value]) -> Value,
{
    fn call(&self, env: &mut Environment, args: &[Value]) -> Value {
        self(env, args)
    }
}

/// A host callback resolving a field path. `None` lets the next resolver try.
pub type Resolver = Box<dyn Fn(&FieldName) -> Option<Value>>;

/// Errors surfaced by [`Environment::try_eval`].
///
/// Both variants display as the bare message so that a rendered error and
/// the `Value::Error` returned by [`Environment::eval`] read the same.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// The tree carries a lexical or syntax error
    #[error("{0}")]
    Syntax(String),

    /// The script's result is an error value from a host function
    #[error("{0}")]
    Host(String),
}

impl EvalError {
    pub fn message(&self) -> &str {
        match self {
            EvalError::Syntax(message) | EvalError::Host(message) => message,
        }
    }
}

impl From<EvalError> for Value {
    fn from(e: EvalError) -> Self {
        match e {
            EvalError::Syntax(message) | EvalError::Host(message) => Value::Error(message),
        }
    }
}

/// The evaluation context supplied by the host.
///
/// Holds the function registry, the variable table and the field resolvers.
/// Scripts never change any of these by themselves; only host calls (and
/// host functions) do.
///
/// # Examples
///
/// ```
/// use suela::{Environment, Parser, Value};
///
/// let mut env = Environment::new();
/// env.register("double", |env: &mut Environment, args: &[Value]| {
///     match env.resolve_args(args).first() {
///         Some(Value::Int(n)) => Value::Int(n * 2),
///         _ => Value::Nil,
///     }
/// });
/// env.set_var("x", Value::Int(21));
///
/// let script = Parser::from_source("doc", "@double(x)").parse();
/// assert_eq!(env.eval(&script), Value::Int(42));
/// ```
#[derive(Default)]
pub struct Environment {
    functions: HashMap<String, Rc<dyn Function>>,
    variables: HashMap<String, Value>,
    resolvers: Vec<Resolver>,
}

impl Environment {
    /// Creates an environment with no functions, variables or resolvers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a closure under `name`, replacing any previous function.
    pub fn register<F>(&mut self, name: impl Into<String>, function: F)
    where
        F: Fn(&mut Environment, &[Value]) -> Value + 'static,
    {
        self.functions.insert(name.into(), Rc::new(function));
    }

    /// Registers any [`Function`] implementation under `name`.
    pub fn register_function(&mut self, name: impl Into<String>, function: impl Function + 'static) {
        self.functions.insert(name.into(), Rc::new(function));
    }

    pub fn function(&self, name: &str) -> Option<Rc<dyn Function>> {
        self.functions.get(name).cloned()
    }

    pub fn set_var(&mut self, name: impl Into<String>, value: Value) {
        self.variables.insert(name.into(), value);
    }

    pub fn var(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    pub fn add_resolver(&mut self, resolver: impl Fn(&FieldName) -> Option<Value> + 'static) {
        self.resolvers.push(Box::new(resolver));
    }

    /// Resolves a field reference.
    ///
    /// The first key names a variable and the rest walk into it; when that
    /// fails the resolvers are asked in registration order. An unresolved
    /// field is `Nil`.
    pub fn resolve_field(&self, field: &FieldName) -> Value {
        if let Some(value) = self.lookup_variable(field) {
            return value;
        }
        for resolver in &self.resolvers {
            if let Some(value) = resolver(field) {
                return value;
            }
        }
        debug!(field = %field, "unresolved field evaluates to nil");
        Value::Nil
    }

    fn lookup_variable(&self, field: &FieldName) -> Option<Value> {
        let keys = field.keys();
        let (name, path) = keys.split_first()?;
        self.variables.get(*name)?.walk(path.iter().copied())
    }

    /// Calls a registered function by name. Unregistered names yield `Nil`.
    pub fn call(&mut self, name: &str, args: &[Value]) -> Value {
        match self.function(name) {
            Some(function) => {
                trace!(function = %name, args = args.len(), "calling function");
                function.call(self, args)
            }
            None => {
                debug!(function = %name, "call to unregistered function evaluates to nil");
                Value::Nil
            }
        }
    }

    /// Resolves a field argument to its value; other values pass through.
    ///
    /// Field arguments reach host functions as [`Value::FieldName`], so a
    /// function can use the name itself (`@set(a, 1)`) or ask for its value.
    pub fn resolve(&self, value: &Value) -> Value {
        match value {
            Value::FieldName(field) => self.resolve_field(field),
            other => other.clone(),
        }
    }

    /// [`Environment::resolve`] applied to every argument.
    pub fn resolve_args(&self, args: &[Value]) -> Vec<Value> {
        args.iter().map(|arg| self.resolve(arg)).collect()
    }

    /// Evaluates a tree. A syntax error in the tree is returned as its
    /// `Value::Error`.
    pub fn eval(&mut self, ast: &Ast) -> Value {
        self.eval_node(ast).unwrap_or_else(Value::from)
    }

    /// Evaluates a tree, returning `Err` when it carries a syntax error or
    /// when the result itself is an error value.
    ///
    /// Error values produced along the way are ordinary data: they are
    /// passed to functions and later statements still run.
    pub fn try_eval(&mut self, ast: &Ast) -> Result<Value, EvalError> {
        match self.eval_node(ast)? {
            Value::Error(message) => Err(EvalError::Host(message)),
            value => Ok(value),
        }
    }

    /// Only `Error` nodes stop the walk.
    fn eval_node(&mut self, node: &Ast) -> Result<Value, EvalError> {
        match node.kind {
            AstKind::Error => Err(EvalError::Syntax(node.value().to_string())),
            AstKind::Comment => Ok(node.value().clone()),
            AstKind::Arg if node.children.is_empty() => Ok(node.value().clone()),
            AstKind::Arg | AstKind::Statement | AstKind::Script => {
                let mut result = Value::Nil;
                for child in &node.children {
                    result = self.eval_node(child)?;
                }
                Ok(result)
            }
            AstKind::Call => self.eval_call(node),
        }
    }

    fn eval_call(&mut self, node: &Ast) -> Result<Value, EvalError> {
        let mut args = Vec::with_capacity(node.children.len());
        for child in &node.children {
            args.push(self.eval_node(child)?);
        }

        let Value::FuncName(name) = node.value() else {
            // The parser only builds calls from function name tokens
            debug!(node = %node.describe(), "call node without a function name evaluates to nil");
            return Ok(Value::Nil);
        };
        Ok(self.call(name, &args))
    }
}
