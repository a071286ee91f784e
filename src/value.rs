use std::collections::HashMap;
use std::fmt;

/// A runtime value flowing through the Suela pipeline.
///
/// The same type is carried by lexer tokens, AST nodes and evaluation
/// results, so a parse failure and a host function result can be inspected
/// the same way: by matching on the variant.
///
/// # Examples
///
/// ```
/// use suela::{FieldName, Value};
///
/// let int = Value::Int(42);
/// let text = Value::String("hello".to_string());
/// let field = Value::FieldName(FieldName::parse("user.name"));
///
/// assert_eq!(int.to_string(), "42");
/// assert_eq!(text.to_string(), "'hello'");
/// assert_eq!(field.to_string(), "user.name");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absence of a value; also the result of lenient failures
    Nil,

    /// 64-bit signed integer
    Int(i64),

    /// Floating-point number
    Float(f64),

    /// UTF-8 string
    String(String),

    /// Comment text, without the leading `#`
    Comment(String),

    /// Dotted function name, without the leading `@`
    FuncName(String),

    /// Dotted field reference, split into segments
    FieldName(FieldName),

    /// Raw, undecoded JSON literal
    Json(Vec<u8>),

    /// Ordered sequence of values
    List(Vec<Value>),

    /// Mapping from name to value
    Map(HashMap<String, Value>),

    /// Error message, already carrying its source position when it has one
    Error(String),
}

/// A dotted field path such as `user.address.city` or `items[1].name`.
///
/// Segments are the dot-separated parts of the path; bracketed index
/// suffixes stay attached to their segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FieldName(Vec<String>);

impl FieldName {
    pub fn parse(path: &str) -> Self {
        FieldName(path.split('.').map(str::to_string).collect())
    }

    pub fn from_segments(segments: Vec<String>) -> Self {
        FieldName(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Splits every segment into its name and bracketed indices, yielding
    /// the flat list of keys used to walk nested values.
    ///
    /// `items[1].name` yields `items`, `1`, `name`.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys = Vec::new();
        for segment in &self.0 {
            let (name, indices) = split_segment(segment);
            if !name.is_empty() {
                keys.push(name);
            }
            keys.extend(indices);
        }
        keys
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

impl From<&str> for FieldName {
    fn from(path: &str) -> Self {
        FieldName::parse(path)
    }
}

fn split_segment(segment: &str) -> (&str, Vec<&str>) {
    match segment.find('[') {
        Some(start) => {
            let indices = segment[start..]
                .split('[')
                .skip(1)
                .map(|part| part.trim_end_matches(']'))
                .collect();
            (&segment[..start], indices)
        }
        None => (segment, Vec::new()),
    }
}

impl Value {
    /// Returns a human-readable type name
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Comment(_) => "comment",
            Value::FuncName(_) => "funcname",
            Value::FieldName(_) => "fieldname",
            Value::Json(_) => "json",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Error(_) => "error",
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// Get as integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as float, widening integers
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Renders the value for display to a user: strings and comments
    /// without their quoting, everything else canonically.
    pub fn as_text(&self) -> String {
        match self {
            Value::String(s) | Value::Comment(s) => s.clone(),
            _ => self.to_string(),
        }
    }

    /// Looks up one key inside a container value.
    ///
    /// Maps are keyed by name, lists by a decimal index and JSON blobs are
    /// decoded first. Anything else has no children.
    pub fn child(&self, key: &str) -> Option<Value> {
        match self {
            Value::Map(map) => map.get(key).cloned(),
            Value::List(items) => key.parse::<usize>().ok().and_then(|i| items.get(i).cloned()),
            Value::Json(raw) => Value::decode_json(raw).ok()?.child(key),
            _ => None,
        }
    }

    /// Walks a sequence of keys down from this value.
    ///
    /// A JSON blob met on the way is decoded once and the rest of the walk
    /// runs over the decoded tree.
    pub fn walk<'a>(&self, keys: impl IntoIterator<Item = &'a str>) -> Option<Value> {
        let mut current = self.clone();
        for key in keys {
            if let Value::Json(raw) = &current {
                current = Value::decode_json(raw).ok()?;
            }
            current = current.child(key)?;
        }
        Some(current)
    }

    /// Decodes a raw JSON blob into a value tree.
    pub fn decode_json(raw: &[u8]) -> Result<Value, serde_json::Error> {
        serde_json::from_slice::<serde_json::Value>(raw).map(Value::from_json)
    }

    /// Converts a `serde_json::Value` into a Suela value.
    ///
    /// There is no boolean variant, so booleans become `Int(1)`/`Int(0)`.
    pub fn from_json(v: serde_json::Value) -> Value {
        match v {
            serde_json::Value::Null => Value::Nil,
            serde_json::Value::Bool(b) => Value::Int(b as i64),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map(Value::Float).unwrap_or(Value::Nil),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(arr) => {
                Value::List(arr.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(obj) => {
                Value::Map(obj.into_iter().map(|(k, v)| (k, Value::from_json(v))).collect())
            }
        }
    }

    /// Converts a Suela value into a `serde_json::Value`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Nil => serde_json::Value::Null,
            Value::Int(i) => serde_json::Value::Number((*i).into()),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) | Value::Comment(s) => serde_json::Value::String(s.clone()),
            Value::FuncName(_) | Value::FieldName(_) => serde_json::Value::String(self.to_string()),
            Value::Json(raw) => match serde_json::from_slice(raw) {
                Ok(decoded) => decoded,
                Err(_) => serde_json::Value::String(String::from_utf8_lossy(raw).into_owned()),
            },
            Value::List(items) => serde_json::Value::Array(items.iter().map(Value::to_json).collect()),
            Value::Map(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
            Value::Error(message) => {
                let mut obj = serde_json::Map::new();
                obj.insert("error".to_string(), serde_json::Value::String(message.clone()));
                serde_json::Value::Object(obj)
            }
        }
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    write!(f, "'")?;
    for ch in s.chars() {
        match ch {
            '\'' => write!(f, "\\'")?,
            '\\' => write!(f, "\\\\")?,
            '\n' => write!(f, "\\n")?,
            '\r' => write!(f, "\\r")?,
            c => write!(f, "{}", c)?,
        }
    }
    write!(f, "'")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Int(n) => write!(f, "{}", n),
            // Keep the point so a rendered float lexes back as a float.
            Value::Float(n) if n.is_finite() && n.fract() == 0.0 => write!(f, "{:.1}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::String(s) => write_quoted(f, s),
            Value::Comment(s) => write!(f, "#{}", s),
            Value::FuncName(name) => write!(f, "@{}", name),
            Value::FieldName(field) => write!(f, "{}", field),
            Value::Json(raw) => write!(f, "{}", String::from_utf8_lossy(raw)),
            Value::List(items) => {
                write!(f, "@list(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
            Value::Map(map) => {
                // Sort keys for deterministic output
                let mut keys: Vec<_> = map.keys().collect();
                keys.sort();
                write!(f, "@map(")?;
                for (i, key) in keys.into_iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write_quoted(f, key)?;
                    write!(f, ",{}", map[key])?;
                }
                write!(f, ")")
            }
            Value::Error(message) => write!(f, "{}", message),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}
