//! Aggregate functions over a group of records.

use std::str::FromStr;

use rust_decimal::{Decimal, prelude::FromPrimitive, prelude::ToPrimitive};

use crate::{
    ast::{AggregateArg, AggregateFn},
    value::{Record, Value},
};

/// A numeric reading of a value: the float for ordering, plus an exact
/// decimal when one exists so sums do not drift.
struct Numeric {
    float: f64,
    exact: Option<Decimal>,
}

fn coerce(value: &Value) -> Option<Numeric> {
    match value {
        Value::Integer(n) => Some(Numeric {
            float: *n as f64,
            exact: Some(Decimal::from(*n)),
        }),
        Value::Float(n) if n.is_finite() => Some(Numeric {
            float: *n,
            exact: Decimal::from_f64(*n),
        }),
        Value::String(s) => {
            let float = value.to_number()?;
            let exact = Decimal::from_str(s.trim())
                .ok()
                .or_else(|| Decimal::from_f64(float));
            Some(Numeric { float, exact })
        }
        _ => None,
    }
}

/// Whole decimals come back as integers, the rest as floats.
fn decimal_to_value(d: Decimal) -> Value {
    if d.is_integer()
        && let Some(n) = d.to_i64()
    {
        return Value::Integer(n);
    }
    d.to_f64().map(Value::Float).unwrap_or(Value::Null)
}

fn numeric_to_value(n: &Numeric) -> Value {
    match n.exact {
        Some(d) => decimal_to_value(d.normalize()),
        None => Value::from_number(n.float),
    }
}

fn numeric_column(arg: &AggregateArg, rows: &[&Record]) -> Vec<Numeric> {
    let AggregateArg::Column(path) = arg else {
        return Vec::new();
    };
    rows.iter()
        .filter_map(|r| path.resolve(r))
        .filter_map(coerce)
        .collect()
}

/// Exact sum when every value has a decimal form and nothing overflows,
/// otherwise a float sum.
fn sum(values: &[Numeric]) -> Value {
    let exact = values.iter().try_fold(Decimal::ZERO, |acc, n| acc.checked_add(n.exact?));
    match exact {
        Some(total) => decimal_to_value(total),
        None => Value::from_number(values.iter().map(|n| n.float).sum()),
    }
}

fn avg(values: &[Numeric]) -> Value {
    if values.is_empty() {
        return Value::Null;
    }
    let exact = values
        .iter()
        .try_fold(Decimal::ZERO, |acc, n| acc.checked_add(n.exact?))
        .and_then(|total| total.checked_div(Decimal::from(values.len())));
    match exact {
        Some(mean) => decimal_to_value(mean.normalize()),
        None => Value::from_number(values.iter().map(|n| n.float).sum::<f64>() / values.len() as f64),
    }
}

fn extreme(values: &[Numeric], want_max: bool) -> Value {
    let best = values.iter().reduce(|best, n| {
        let better = if want_max {
            n.float > best.float
        } else {
            n.float < best.float
        };
        if better { n } else { best }
    });
    best.map(numeric_to_value).unwrap_or(Value::Null)
}

/// Computes one aggregate over `rows`.
///
/// - `COUNT(*)` counts rows; `COUNT(col)` counts rows where `col` is
///   present and not null.
/// - `SUM/AVG/MAX/MIN(col)` only see values with a numeric reading (numbers
///   and numeric strings); everything else is skipped.
/// - Over no numeric values `SUM` is 0 and `AVG`, `MAX`, `MIN` are null.
///
/// # Examples
///
/// ```
/// use rowql::aggregate::compute;
/// use rowql::ast::{AggregateArg, AggregateFn, FieldPath};
/// use rowql::{Record, Value};
///
/// let rows: Vec<Record> = vec![
///     [("cost".to_string(), Value::Integer(500))].into(),
///     [("cost".to_string(), Value::String("n/a".into()))].into(),
/// ];
/// let refs: Vec<&Record> = rows.iter().collect();
/// let cost = AggregateArg::Column(FieldPath::parse("cost"));
///
/// assert_eq!(compute(AggregateFn::Sum, &cost, &refs), Value::Integer(500));
/// assert_eq!(compute(AggregateFn::Count, &AggregateArg::Star, &refs), Value::Integer(2));
/// ```
pub fn compute(function: AggregateFn, arg: &AggregateArg, rows: &[&Record]) -> Value {
    match function {
        AggregateFn::Count => {
            let count = match arg {
                AggregateArg::Star => rows.len(),
                AggregateArg::Column(path) => rows
                    .iter()
                    .filter(|r| path.resolve(r).is_some_and(|v| !v.is_null()))
                    .count(),
            };
            Value::Integer(count as i64)
        }
        AggregateFn::Sum => sum(&numeric_column(arg, rows)),
        AggregateFn::Avg => avg(&numeric_column(arg, rows)),
        AggregateFn::Max => extreme(&numeric_column(arg, rows), true),
        AggregateFn::Min => extreme(&numeric_column(arg, rows), false),
    }
}
