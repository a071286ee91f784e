// tests/lexer_tests.rs

use std::io::{self, Read};

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use suela::ast::TokenKind;
use suela::lexer::Lexer;
use suela::value::{FieldName, Value};

fn first(input: &str) -> (TokenKind, Value) {
    let mut lexer = Lexer::new("lexer_tests.rs", input);
    let token = lexer.next_token();
    (token.kind, token.value)
}

fn kinds(input: &str) -> Vec<TokenKind> {
    let mut lexer = Lexer::new("lexer_tests.rs", input);
    let mut result = Vec::new();
    loop {
        let token = lexer.next_token();
        result.push(token.kind);
        if matches!(token.kind, TokenKind::End | TokenKind::Error) {
            return result;
        }
    }
}

// ============================================================================
// Single tokens
// ============================================================================

#[test]
fn test_empty_input_is_end() {
    assert_eq!(first("").0, TokenKind::End);
    assert_eq!(first(" \t ").0, TokenKind::End);
}

#[test]
fn test_punctuation() {
    assert_eq!(first(",,").0, TokenKind::Comma);
    assert_eq!(first(")(").0, TokenKind::CloseParen);
    assert_eq!(first("()").0, TokenKind::OpenParen);
}

#[test]
fn test_names() {
    assert_eq!(first("foo"), (TokenKind::Field, Value::FieldName(FieldName::parse("foo"))));
    assert_eq!(first("  \t  foo"), (TokenKind::Field, Value::FieldName(FieldName::parse("foo"))));
    assert_eq!(first("@foo"), (TokenKind::Func, Value::FuncName("foo".into())));
    assert_eq!(
        first("foo.bar.baz"),
        (TokenKind::Field, Value::FieldName(FieldName::parse("foo.bar.baz")))
    );
    assert_eq!(first("@foo.bar.baz"), (TokenKind::Func, Value::FuncName("foo.bar.baz".into())));
}

#[test]
fn test_field_segments_keep_indices() {
    let (kind, value) = first("items[1].name_2");
    assert_eq!(kind, TokenKind::Field);
    let Value::FieldName(field) = value else {
        panic!("expected a field name, got {:?}", value);
    };
    assert_eq!(field.segments(), ["items[1]", "name_2"]);
}

#[test]
fn test_comment() {
    assert_eq!(first("#foo\n"), (TokenKind::Comment, Value::Comment("foo".into())));
    assert_eq!(kinds("# note\n"), vec![TokenKind::Comment, TokenKind::Eol, TokenKind::End]);
}

#[test]
fn test_string_escapes() {
    assert_eq!(
        first(r"'hello\'\n日本'"),
        (TokenKind::Literal, Value::String("hello'\n日本".into()))
    );
    assert_eq!(first(r"'a\rb\\c\qd'").1, Value::String("a\rb\\cqd".into()));
    assert_eq!(first("''").1, Value::String(String::new()));
}

#[test]
fn test_numbers() {
    assert_eq!(first("1234"), (TokenKind::Literal, Value::Int(1234)));
    assert_eq!(first("0.1234"), (TokenKind::Literal, Value::Float(0.1234)));
    assert_eq!(first("-567890"), (TokenKind::Literal, Value::Int(-567890)));
    assert_eq!(first("-5678.90"), (TokenKind::Literal, Value::Float(-5678.90)));
}

#[test]
fn test_json_literals() {
    let simple = r#"{"hello":"world"}"#;
    assert_eq!(first(simple), (TokenKind::Literal, Value::Json(simple.as_bytes().to_vec())));

    let tricky = r#"{"hello}}}}":"wo{{{{\"\"rld", "foo": 3}"#;
    assert_eq!(first(tricky).1, Value::Json(tricky.as_bytes().to_vec()));

    let nested = r#"{"a": {"b": [1, {"c": "\\"}]}}"#;
    let mut lexer = Lexer::new("t", &format!("{} rest", nested));
    assert_eq!(lexer.next_token().value, Value::Json(nested.as_bytes().to_vec()));
    assert_eq!(lexer.next_token().kind, TokenKind::Field);
}

#[test]
fn test_call_line() {
    assert_eq!(
        kinds("@printf('%s', x, 1.5)\n@nil()"),
        vec![
            TokenKind::Func,
            TokenKind::OpenParen,
            TokenKind::Literal,
            TokenKind::Comma,
            TokenKind::Field,
            TokenKind::Comma,
            TokenKind::Literal,
            TokenKind::CloseParen,
            TokenKind::Eol,
            TokenKind::Func,
            TokenKind::OpenParen,
            TokenKind::CloseParen,
            TokenKind::End,
        ]
    );
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_errors_are_tagged() {
    for input in [
        "-5678.90.0",
        "#no newline",
        "'unterminated",
        "'trailing escape\\",
        r#"{"open": 1"#,
        "99999999999999999999",
        "-",
        "@",
        "$",
    ] {
        let (kind, value) = first(input);
        assert_eq!(kind, TokenKind::Error, "input: {}", input);
        assert!(value.is_error(), "input: {}", input);
    }
}

#[test]
fn test_error_message_format() {
    let mut lexer = Lexer::new("script.su", "@a(\n  $)");
    for _ in 0..3 {
        lexer.next_token();
    }
    let token = lexer.next_token();
    assert_eq!(token.kind, TokenKind::Error);
    assert_eq!(token.value, Value::Error("script.su:2:3: unexpected character '$'".into()));
}

#[test]
fn test_two_points_message() {
    let (_, value) = first("-5678.90.0");
    assert_eq!(
        value,
        Value::Error("lexer_tests.rs:1:1: more than one floating point in -5678.90.0".into())
    );
}

struct FailingReader;

impl Read for FailingReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::other("disk on fire"))
    }
}

#[test]
fn test_read_failure_is_error_token() {
    let mut lexer = Lexer::from_reader("broken", FailingReader);
    let token = lexer.next_token();
    assert_eq!(token.kind, TokenKind::Error);
    assert_eq!(token.value, Value::Error("broken:1:1: read failure: disk on fire".into()));
    assert_eq!(lexer.next_token().kind, TokenKind::End);
}

#[test]
fn test_from_reader() {
    let mut lexer = Lexer::from_reader("mem", "@a(1)".as_bytes());
    assert_eq!(lexer.next_token().value, Value::FuncName("a".into()));
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn integers_lex_as_int(n in any::<i64>()) {
        prop_assert_eq!(first(&n.to_string()), (TokenKind::Literal, Value::Int(n)));
    }

    #[test]
    fn one_point_lexes_as_float(whole in 0u32..1_000_000, frac in 0u32..1_000_000, negative in any::<bool>()) {
        let text = format!("{}{}.{}", if negative { "-" } else { "" }, whole, frac);
        let expected: f64 = text.parse().unwrap();
        prop_assert_eq!(first(&text), (TokenKind::Literal, Value::Float(expected)));
    }

    #[test]
    fn two_points_are_errors(a in 0u32..1000, b in 0u32..1000, c in 0u32..1000) {
        let (kind, value) = first(&format!("{}.{}.{}", a, b, c));
        prop_assert_eq!(kind, TokenKind::Error);
        prop_assert!(value.is_error());
    }

    #[test]
    fn json_spans_are_verbatim(key in "[a-z{}\"\\\\ ]{0,12}", text in "[a-z{}\"\\\\ ]{0,16}") {
        let mut inner = serde_json::Map::new();
        inner.insert(key, serde_json::Value::String(text));
        let blob = serde_json::to_string(&serde_json::json!({ "outer": inner })).unwrap();
        let mut lexer = Lexer::new("prop", &format!("{}, x", blob));
        prop_assert_eq!(lexer.next_token().value, Value::Json(blob.into_bytes()));
        prop_assert_eq!(lexer.next_token().kind, TokenKind::Comma);
    }

    #[test]
    fn field_names_split_and_rejoin(segments in prop::collection::vec("[a-z][a-z0-9_]{0,6}", 1..5)) {
        let path = segments.join(".");
        prop_assert_eq!(FieldName::parse(&path).to_string(), path.clone());
        let (kind, value) = first(&path);
        prop_assert_eq!(kind, TokenKind::Field);
        prop_assert_eq!(value, Value::FieldName(FieldName::from_segments(segments)));
    }
}
