//! Multi-key record ordering for ORDER BY.

use std::cmp::Ordering;

use crate::{
    ast::{Direction, OrderKey},
    value::{Record, Value},
};

/// Compares two values for sorting.
///
/// Null (or absent) sorts before everything else. Two values that both read
/// as numbers compare numerically, two that don't compare case-insensitively
/// on their string form. Across the two classes numbers come first.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());

    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => match (a.to_number(), b.to_number()) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a
                .as_string()
                .to_lowercase()
                .cmp(&b.as_string().to_lowercase()),
        },
    }
}

/// Compares two records key by key, stopping at the first difference.
pub fn compare_rows(a: &Record, b: &Record, keys: &[OrderKey]) -> Ordering {
    for key in keys {
        let ord = compare_values(key.field.resolve(a), key.field.resolve(b));
        let ord = match key.direction {
            Direction::Asc => ord,
            Direction::Desc => ord.reverse(),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

/// Sorts records in place. Records that tie on every key keep their
/// relative order.
///
/// # Examples
///
/// ```
/// use rowql::sort::sort_records;
/// use rowql::{Direction, OrderKey, Record, Value};
///
/// let mut rows: Vec<Record> = vec![
///     [("cost".to_string(), Value::Integer(500))].into(),
///     [("cost".to_string(), Value::Integer(800))].into(),
/// ];
/// sort_records(&mut rows, &[OrderKey::new("cost", Direction::Desc)]);
/// assert_eq!(rows[0]["cost"], Value::Integer(800));
/// ```
pub fn sort_records(records: &mut [Record], keys: &[OrderKey]) {
    if keys.is_empty() {
        return;
    }
    records.sort_by(|a, b| compare_rows(a, b, keys));
}
