use std::collections::HashMap;

use pretty_assertions::assert_eq;
use suela::{Environment, Value, parse};

fn eval(script: &str) -> Value {
    Environment::with_stdlib().eval(&parse("stdlib_tests.rs", script))
}

fn is_error_containing(value: &Value, needle: &str) -> bool {
    matches!(value, Value::Error(message) if message.contains(needle))
}

#[test]
fn test_nil() {
    assert_eq!(eval("@nil()"), Value::Nil);
}

#[test]
fn test_set_and_get() {
    assert_eq!(eval("@set('total', @sum(2, 3))\n@get('total')"), Value::Int(5));
    assert_eq!(eval("@get('unset')"), Value::Nil);

    let mut env = Environment::with_stdlib();
    env.eval(&parse("t", "@set('greeting', 'hi')"));
    assert_eq!(env.var("greeting"), Some(&Value::String("hi".into())));
    // A set variable is also reachable as a field
    assert_eq!(env.eval(&parse("t", "@concat(greeting, '!')")), Value::String("hi!".into()));
}

#[test]
fn test_set_with_bare_name() {
    assert_eq!(eval("@set(a, @sum(2,3))\n@nil()"), Value::Nil);
    assert_eq!(eval("@set(a, @sum(2,3))\n@sum(a, 1)"), Value::Int(6));
    assert_eq!(eval("@set(a, 1)\n@set(b, a)\n@get(b)"), Value::Int(1));

    let mut env = Environment::with_stdlib();
    env.set_var("user", Value::Json(br#"{"name": "Ann"}"#.to_vec()));
    assert_eq!(env.eval(&parse("t", "@get(user.name)")), Value::String("Ann".into()));
    assert_eq!(env.eval(&parse("t", "@get('user.name')")), Value::String("Ann".into()));

    assert!(is_error_containing(&eval("@set(1, 2)"), "expects a name, got int"));
    assert!(is_error_containing(&eval("@set(a)"), "expects a name and a value"));
    assert!(is_error_containing(&eval("@get()"), "expects one name argument"));
}

#[test]
fn test_sum() {
    assert_eq!(eval("@sum()"), Value::Int(0));
    assert_eq!(eval("@sum(1, 2, -3, 10)"), Value::Int(10));
    assert_eq!(eval("@sum(1, 2.5)"), Value::Float(3.5));
    assert_eq!(eval("@sum(0.5, 0.25, 1)"), Value::Float(1.75));
    assert!(is_error_containing(&eval("@sum(9223372036854775807, 1)"), "integer overflow"));
    assert!(is_error_containing(&eval("@sum(1, 'two')"), "expects numbers, got string"));
}

#[test]
fn test_sprintf() {
    assert_eq!(
        eval("@sprintf('%s %s', 'Hello world', field)"),
        Value::String("Hello world nil".into())
    );
    assert_eq!(
        eval("@sprintf('%d%% of %v', 42.9, 'x')"),
        Value::String("42% of 'x'".into())
    );
    assert!(is_error_containing(&eval("@sprintf('%s')"), "missing argument for %s"));
    assert!(is_error_containing(&eval("@sprintf('%q', 1)"), "unknown verb %q"));
    assert!(is_error_containing(&eval("@sprintf(1)"), "format must be a string"));
}

#[test]
fn test_printf_returns_nil() {
    assert_eq!(eval("@printf('%s\\n', 'printed')"), Value::Nil);
    assert_eq!(eval("@print('a', 1)"), Value::Nil);
}

#[test]
fn test_list_and_map() {
    assert_eq!(
        eval("@list(1, 'a', @list())"),
        Value::List(vec![Value::Int(1), Value::String("a".into()), Value::List(vec![])])
    );

    let mut expected = HashMap::new();
    expected.insert("a".to_string(), Value::Int(1));
    expected.insert("b".to_string(), Value::List(vec![Value::Int(2)]));
    let map = eval("@map('b', @list(2), 'a', 1)");
    assert_eq!(map, Value::Map(expected));
    assert_eq!(map.to_string(), "@map('a',1,'b',@list(2))");

    assert!(is_error_containing(&eval("@map('a')"), "key/value pairs"));
    assert!(is_error_containing(&eval("@map(1, 2)"), "keys must be strings"));
}

#[test]
fn test_len_and_type() {
    assert_eq!(eval("@len('日本')"), Value::Int(2));
    assert_eq!(eval("@len(@list(1, 2, 3))"), Value::Int(3));
    assert_eq!(eval("@len(@map('k', 1))"), Value::Int(1));
    assert!(is_error_containing(&eval("@len(1)"), "no length for int"));

    assert_eq!(eval("@type(1)"), Value::String("int".into()));
    assert_eq!(eval("@type(1.0)"), Value::String("float".into()));
    assert_eq!(eval(r#"@type({"a": 1})"#), Value::String("json".into()));
    assert_eq!(eval("@type(@nil())"), Value::String("nil".into()));
}

#[test]
fn test_json_decoding() {
    let mut expected = HashMap::new();
    expected.insert(
        "ok".to_string(),
        Value::List(vec![Value::Int(1), Value::Float(2.5), Value::Nil, Value::Int(1)]),
    );
    assert_eq!(eval(r#"@json({"ok": [1, 2.5, null, true]})"#), Value::Map(expected));
    assert_eq!(eval("@json('[1, \"x\"]')"), Value::List(vec![Value::Int(1), Value::String("x".into())]));
    assert!(is_error_containing(&eval("@json({\"a\" 1})"), "@json:"));
}

#[test]
fn test_matches() {
    assert_eq!(eval(r"@matches('abc123', '^[a-z]+\\d+$')"), Value::Int(1));
    assert_eq!(eval("@matches('abc', '^\\\\d+$')"), Value::Int(0));
    assert_eq!(eval("@matches(1, 'x')"), Value::Int(0));
    assert!(is_error_containing(&eval("@matches('a', '(')"), "invalid regex"));
}

#[test]
fn test_concat() {
    assert_eq!(eval("@concat('a', 1, 2.5, @list(1))"), Value::String("a12.5@list(1)".into()));
}
