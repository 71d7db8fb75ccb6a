use std::{cmp::Ordering, collections::HashMap};

/// One input or output row: an open mapping from column name to value.
///
/// Missing keys are not an error anywhere in the engine; they read as
/// [`Value::Null`].
pub type Record = HashMap<String, Value>;

/// A loosely-typed value held by a [`Record`].
///
/// Integers and floats are kept apart so that whole-number results (counts,
/// sums of integer columns) come back as integers.
///
/// # Examples
///
/// ```
/// use rowql::Value;
/// use std::collections::HashMap;
///
/// let null = Value::Null;
/// let age = Value::Integer(42);
/// let ratio = Value::Float(0.5);
/// let name = Value::String("Ann".to_string());
///
/// let mut obj = HashMap::new();
/// obj.insert("city".to_string(), Value::String("Oslo".to_string()));
/// let address = Value::Object(obj);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null, and the value of any absent column
    Null,

    /// Boolean (true/false)
    Boolean(bool),

    /// Floating-point number
    Float(f64),

    /// Integer number (preserved separately from floats)
    Integer(i64),

    /// UTF-8 string
    String(String),

    /// Sequence of values
    Array(Vec<Value>),

    /// Nested mapping
    Object(HashMap<String, Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get as float, for numeric variants only
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric coercion used by aggregates and ORDER BY.
    ///
    /// Numbers pass through, strings are accepted when their trimmed text
    /// parses as a finite number. Everything else (null, booleans, arrays,
    /// objects) has no numeric reading.
    pub fn to_number(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Float(n) if n.is_finite() => Some(*n),
            Value::String(s) => parse_number(s),
            _ => None,
        }
    }

    /// Builds a number value, as an integer when `n` is whole and fits.
    pub fn from_number(n: f64) -> Value {
        if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
            Value::Integer(n as i64)
        } else {
            Value::Float(n)
        }
    }

    /// String form of the value.
    ///
    /// Strings are returned raw, scalars in their usual text form and
    /// arrays/objects as compact JSON, so structurally distinct values
    /// never share a string form.
    pub fn as_string(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Float(n) => n.to_string(),
            Value::Integer(n) => n.to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Null => "null".to_string(),
            Value::Array(_) | Value::Object(_) => serde_json::Value::from(self.clone()).to_string(),
        }
    }

    /// Loose equality, as used by `=` and `!=`.
    ///
    /// Strings compare exactly with strings. A number compares numerically
    /// with a number, a numeric string or a boolean (as 1/0). Null only
    /// equals null, and arrays/objects only equal an identical structure.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Null, _) | (_, Value::Null) => false,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Array(_) | Value::Object(_), _) | (_, Value::Array(_) | Value::Object(_)) => {
                self == other
            }
            (a, b) => match (a.loose_number(), b.loose_number()) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            },
        }
    }

    /// Loose ordering, as used by `>`, `<`, `>=` and `<=`.
    ///
    /// Returns `None` when the pair has no meaningful order: either side is
    /// null, either side is an array/object, or a string that does not read
    /// as a number meets a number.
    pub fn loose_cmp(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Null, _) | (_, Value::Null) => None,
            (Value::Array(_) | Value::Object(_), _) | (_, Value::Array(_) | Value::Object(_)) => {
                None
            }
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (a, b) => a.loose_number()?.partial_cmp(&b.loose_number()?),
        }
    }

    fn loose_number(&self) -> Option<f64> {
        match self {
            Value::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => self.to_number(),
        }
    }
}

fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
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

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(arr) => Value::Array(arr.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(obj) => {
                Value::Object(obj.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => serde_json::Value::Null,
            Value::Boolean(b) => serde_json::Value::Bool(b),
            Value::Integer(i) => serde_json::Value::Number(i.into()),
            Value::Float(f) => serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s),
            Value::Array(arr) => {
                serde_json::Value::Array(arr.into_iter().map(serde_json::Value::from).collect())
            }
            Value::Object(obj) => serde_json::Value::Object(
                obj.into_iter()
                    .map(|(k, v)| (k, serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Converts a JSON object into a [`Record`]. Non-object JSON yields `None`.
pub fn record_from_json(v: serde_json::Value) -> Option<Record> {
    match Value::from(v) {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

/// Converts a [`Record`] back into a JSON object.
pub fn record_to_json(record: Record) -> serde_json::Value {
    serde_json::Value::from(Value::Object(record))
}
