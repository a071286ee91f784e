//! Standard host functions.
//!
//! Nothing here is part of the language itself: a host opts in with
//! [`Environment::with_stdlib`] or [`register`], and may replace any entry.
//!
//! | Function | Result |
//! |----------|--------|
//! | `@nil()` | `nil` |
//! | `@print(a, ...)` | prints the arguments separated by spaces, `nil` |
//! | `@printf(fmt, a, ...)` | prints the formatted text, `nil` |
//! | `@sprintf(fmt, a, ...)` | the formatted text |
//! | `@list(a, ...)` | a list of the arguments |
//! | `@map(k, v, ...)` | a map from string keys to values |
//! | `@get(name)` | the value of field `name`, or `nil` |
//! | `@set(name, v)` | stores `v` as variable `name`, returns `v` |
//! | `@sum(n, ...)` | sum of the numbers |
//! | `@concat(a, ...)` | the arguments' text joined together |
//! | `@len(v)` | length of a string, list or map |
//! | `@type(v)` | the type name of `v` |
//! | `@json(v)` | a JSON blob or string decoded into lists and maps |
//! | `@matches(text, pattern)` | `1` if the regex matches, else `0` |
//!
//! `get` and `set` take a name, either bare (`@set(a, 1)`) or quoted
//! (`@set('a', 1)`). Every other argument is resolved to its value before
//! the function sees it.

use std::collections::HashMap;

use regex::Regex;
use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};

use crate::{
    evaluator::Environment,
    value::{FieldName, Value},
};

impl Environment {
    /// Creates an environment with the standard functions registered.
    pub fn with_stdlib() -> Self {
        let mut env = Environment::new();
        register(&mut env);
        env
    }
}

/// Registers every standard function into `env`.
pub fn register(env: &mut Environment) {
    register_resolved(env, "nil", |_| Value::Nil);
    register_resolved(env, "print", print);
    register_resolved(env, "printf", printf);
    register_resolved(env, "sprintf", sprintf);
    register_resolved(env, "list", |args| Value::List(args.to_vec()));
    register_resolved(env, "map", map);
    env.register("get", get);
    env.register("set", set);
    register_resolved(env, "sum", sum);
    register_resolved(env, "concat", concat);
    register_resolved(env, "len", len);
    register_resolved(env, "type", type_of);
    register_resolved(env, "json", json);
    register_resolved(env, "matches", matches);
}

/// Registers a function that only ever sees resolved argument values.
fn register_resolved(env: &mut Environment, name: &str, function: fn(&[Value]) -> Value) {
    env.register(name, move |env: &mut Environment, args: &[Value]| {
        function(&env.resolve_args(args))
    });
}

fn error(function: &str, message: impl std::fmt::Display) -> Value {
    Value::Error(format!("@{}: {}", function, message))
}

fn print(args: &[Value]) -> Value {
    let line: Vec<String> = args.iter().map(Value::as_text).collect();
    println!("{}", line.join(" "));
    Value::Nil
}

fn printf(args: &[Value]) -> Value {
    match sprintf(args) {
        Value::String(text) => {
            print!("{}", text);
            Value::Nil
        }
        other => other,
    }
}

/// Formats with `%s` (text), `%d` (integer), `%v` (canonical form) and `%%`.
fn sprintf(args: &[Value]) -> Value {
    let Some((format, mut rest)) = args.split_first() else {
        return error("sprintf", "missing format string");
    };
    let Value::String(format) = format else {
        return error("sprintf", format!("format must be a string, got {}", format.type_name()));
    };

    let mut out = String::new();
    let mut chars = format.chars();
    while let Some(ch) = chars.next() {
        if ch != '%' {
            out.push(ch);
            continue;
        }
        let verb = match chars.next() {
            Some('%') => {
                out.push('%');
                continue;
            }
            Some(verb @ ('s' | 'd' | 'v')) => verb,
            Some(other) => return error("sprintf", format!("unknown verb %{}", other)),
            None => return error("sprintf", "format ends with a lone %"),
        };
        let Some((arg, remaining)) = rest.split_first() else {
            return error("sprintf", format!("missing argument for %{}", verb));
        };
        rest = remaining;
        match (verb, arg) {
            ('d', Value::Int(n)) => out.push_str(&n.to_string()),
            ('d', Value::Float(n)) => out.push_str(&(n.trunc() as i64).to_string()),
            ('d', other) => {
                return error("sprintf", format!("%d expects a number, got {}", other.type_name()));
            }
            ('v', arg) => out.push_str(&arg.to_string()),
            (_, arg) => out.push_str(&arg.as_text()),
        }
    }
    Value::String(out)
}

fn map(args: &[Value]) -> Value {
    if args.len() % 2 != 0 {
        return error("map", "expects key/value pairs");
    }
    let mut result = HashMap::new();
    for pair in args.chunks(2) {
        let Value::String(key) = &pair[0] else {
            return error("map", format!("keys must be strings, got {}", pair[0].type_name()));
        };
        result.insert(key.clone(), pair[1].clone());
    }
    Value::Map(result)
}

/// The field a `@get`/`@set` name argument refers to.
fn target(name: &Value) -> Option<FieldName> {
    match name {
        Value::FieldName(field) => Some(field.clone()),
        Value::String(text) => Some(FieldName::parse(text)),
        _ => None,
    }
}

fn get(env: &mut Environment, args: &[Value]) -> Value {
    match args {
        [name] => match target(name) {
            Some(field) => env.resolve_field(&field),
            None => error("get", format!("expects a name, got {}", name.type_name())),
        },
        _ => error("get", "expects one name argument"),
    }
}

fn set(env: &mut Environment, args: &[Value]) -> Value {
    let [name, value] = args else {
        return error("set", "expects a name and a value");
    };
    let Some(field) = target(name) else {
        return error("set", format!("expects a name, got {}", name.type_name()));
    };
    let value = env.resolve(value);
    env.set_var(field.to_string(), value.clone());
    value
}

/// Running sum: integers while they fit, then decimals so that mixed
/// integer/float sums don't pick up binary rounding noise.
enum Total {
    Int(i64),
    Decimal(Decimal),
    Float(f64),
}

impl Total {
    fn as_f64(&self) -> f64 {
        match self {
            Total::Int(n) => *n as f64,
            Total::Decimal(d) => d.to_f64().unwrap_or(f64::NAN),
            Total::Float(f) => *f,
        }
    }

    fn add_inexact(self, exact: Option<Decimal>, approx: f64) -> Total {
        let current = match &self {
            Total::Int(n) => Some(Decimal::from(*n)),
            Total::Decimal(d) => Some(*d),
            Total::Float(_) => None,
        };
        if let (Some(a), Some(b)) = (current, exact) {
            if let Some(sum) = a.checked_add(b) {
                return Total::Decimal(sum);
            }
        }
        Total::Float(self.as_f64() + approx)
    }

    fn add(self, value: &Value) -> Result<Total, String> {
        match (self, value) {
            (Total::Int(a), Value::Int(b)) => a
                .checked_add(*b)
                .map(Total::Int)
                .ok_or_else(|| "integer overflow".to_string()),
            (total, Value::Int(b)) => Ok(total.add_inexact(Some(Decimal::from(*b)), *b as f64)),
            (total, Value::Float(b)) => Ok(total.add_inexact(Decimal::from_f64(*b), *b)),
            (_, other) => Err(format!("expects numbers, got {}", other.type_name())),
        }
    }

    fn into_value(self) -> Value {
        match self {
            Total::Int(n) => Value::Int(n),
            total => Value::Float(total.as_f64()),
        }
    }
}

fn sum(args: &[Value]) -> Value {
    let mut total = Total::Int(0);
    for arg in args {
        total = match total.add(arg) {
            Ok(total) => total,
            Err(message) => return error("sum", message),
        };
    }
    total.into_value()
}

fn concat(args: &[Value]) -> Value {
    Value::String(args.iter().map(Value::as_text).collect())
}

fn len(args: &[Value]) -> Value {
    let length = match args {
        [Value::String(s)] => s.chars().count(),
        [Value::List(items)] => items.len(),
        [Value::Map(map)] => map.len(),
        [other] => return error("len", format!("no length for {}", other.type_name())),
        _ => return error("len", "expects one argument"),
    };
    Value::Int(length as i64)
}

fn type_of(args: &[Value]) -> Value {
    match args {
        [value] => Value::String(value.type_name().to_string()),
        _ => error("type", "expects one argument"),
    }
}

fn json(args: &[Value]) -> Value {
    let decoded = match args {
        [Value::Json(raw)] => Value::decode_json(raw),
        [Value::String(text)] => Value::decode_json(text.as_bytes()),
        [other] => return error("json", format!("cannot decode {}", other.type_name())),
        _ => return error("json", "expects one argument"),
    };
    decoded.unwrap_or_else(|e| error("json", e))
}

fn matches(args: &[Value]) -> Value {
    let [text, Value::String(pattern)] = args else {
        return error("matches", "expects a value and a string pattern");
    };
    let re = match Regex::new(pattern) {
        Ok(re) => re,
        Err(e) => return error("matches", format!("invalid regex: {}", e)),
    };
    match text {
        Value::String(s) => Value::Int(re.is_match(s) as i64),
        _ => Value::Int(0),
    }
}
