use std::{fmt, str::FromStr};

use crate::{
    executor::ExecutionError,
    value::{Record, Value},
};

/// A column reference, possibly dotted for nested access (`address.city`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Splits a column reference on `.`.
    pub fn parse(text: &str) -> Self {
        FieldPath {
            segments: text.trim().split('.').map(|s| s.trim().to_string()).collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// `*`, the whole record
    pub fn is_star(&self) -> bool {
        self.segments.len() == 1 && self.segments[0] == "*"
    }

    /// Looks the path up in a record.
    ///
    /// A key spelled exactly like the dotted path wins (output records keep
    /// dotted column names flat); otherwise the segments are followed one
    /// by one through nested objects, and numeric segments index arrays.
    /// Any missing segment resolves to `None`.
    pub fn resolve<'r>(&self, record: &'r Record) -> Option<&'r Value> {
        if self.segments.len() > 1
            && let Some(v) = record.get(&self.to_string())
        {
            return Some(v);
        }

        let (first, rest) = self.segments.split_first()?;
        let mut current = record.get(first)?;
        for segment in rest {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Like [`resolve`](Self::resolve), with absent paths read as null.
    pub fn resolve_or_null(&self, record: &Record) -> Value {
        self.resolve(record).cloned().unwrap_or(Value::Null)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

/// Aggregate functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFn {
    /// `SUM(col)`, 0 over no numeric values
    Sum,
    /// `AVG(col)`, null over no numeric values
    Avg,
    /// `COUNT(*)` rows, `COUNT(col)` non-null values
    Count,
    /// `MAX(col)`, null over no numeric values
    Max,
    /// `MIN(col)`, null over no numeric values
    Min,
}

impl FromStr for AggregateFn {
    type Err = ExecutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SUM" => Ok(AggregateFn::Sum),
            "AVG" => Ok(AggregateFn::Avg),
            "COUNT" => Ok(AggregateFn::Count),
            "MAX" => Ok(AggregateFn::Max),
            "MIN" => Ok(AggregateFn::Min),
            _ => Err(ExecutionError::UnknownAggregate(s.to_string())),
        }
    }
}

impl fmt::Display for AggregateFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AggregateFn::Sum => "SUM",
            AggregateFn::Avg => "AVG",
            AggregateFn::Count => "COUNT",
            AggregateFn::Max => "MAX",
            AggregateFn::Min => "MIN",
        };
        f.write_str(name)
    }
}

/// What an aggregate call is applied to.
#[derive(Debug, Clone, PartialEq)]
pub enum AggregateArg {
    /// `*`
    Star,
    Column(FieldPath),
}

/// A select-list entry resolved for execution.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldDescriptor {
    /// A column copied into the output under `alias`
    Plain { alias: String, path: FieldPath },

    /// An aggregate computed per group (or over all rows) under `alias`
    Aggregate {
        alias: String,
        function: AggregateFn,
        arg: AggregateArg,
    },
}

impl FieldDescriptor {
    pub fn alias(&self) -> &str {
        match self {
            FieldDescriptor::Plain { alias, .. } | FieldDescriptor::Aggregate { alias, .. } => alias,
        }
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(self, FieldDescriptor::Aggregate { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(json: serde_json::Value) -> Record {
        crate::value::record_from_json(json).unwrap()
    }

    #[test]
    fn test_nested_path() {
        let r = record(serde_json::json!({"a": {"b": {"c": 7}}, "items": [10, 20]}));
        assert_eq!(FieldPath::parse("a.b.c").resolve(&r), Some(&Value::Integer(7)));
        assert_eq!(FieldPath::parse("items.1").resolve(&r), Some(&Value::Integer(20)));
        assert_eq!(FieldPath::parse("a.x.c").resolve(&r), None);
        assert_eq!(FieldPath::parse("missing").resolve_or_null(&r), Value::Null);
    }

    #[test]
    fn test_flat_dotted_key_wins() {
        let r = record(serde_json::json!({"a.b": 1, "a": {"b": 2}}));
        assert_eq!(FieldPath::parse("a.b").resolve(&r), Some(&Value::Integer(1)));
    }

    #[test]
    fn test_aggregate_names() {
        assert_eq!("count".parse::<AggregateFn>().unwrap(), AggregateFn::Count);
        assert!(matches!(
            "MEDIAN".parse::<AggregateFn>(),
            Err(ExecutionError::UnknownAggregate(name)) if name == "MEDIAN"
        ));
        assert_eq!(AggregateFn::Avg.to_string(), "AVG");
    }
}
