use std::cmp::Ordering;

use crate::{
    ast::{BoolOp, CompareOp, Comparison, Predicate},
    value::{Record, Value},
};

/// Evaluates a condition against one record.
///
/// No condition means no filter, so `None` is always true. AND needs both
/// sides, OR either side, and both stop as soon as the answer is known.
/// Missing columns read as null and never raise.
///
/// # Examples
///
/// ```
/// use rowql::{eval_condition, parse_predicate, Value};
/// use std::collections::HashMap;
///
/// let mut record = HashMap::new();
/// record.insert("age".to_string(), Value::Integer(30));
///
/// let adult = parse_predicate("age >= 18").unwrap();
/// assert!(eval_condition(&record, Some(&adult)));
/// assert!(eval_condition(&record, None));
/// ```
pub fn eval_condition(record: &Record, predicate: Option<&Predicate>) -> bool {
    match predicate {
        Some(p) => eval_predicate(record, p),
        None => true,
    }
}

fn eval_predicate(record: &Record, predicate: &Predicate) -> bool {
    match predicate {
        Predicate::Comparison(c) => eval_comparison(record, c),
        Predicate::Boolean { op, left, right } => match op {
            BoolOp::And => eval_predicate(record, left) && eval_predicate(record, right),
            BoolOp::Or => eval_predicate(record, left) || eval_predicate(record, right),
        },
    }
}

fn eval_comparison(record: &Record, comparison: &Comparison) -> bool {
    let left = comparison.field.resolve(record).unwrap_or(&Value::Null);
    let right = comparison.literal.to_value();

    match comparison.op {
        CompareOp::Eq => left.loose_eq(&right),
        CompareOp::NotEq => !left.loose_eq(&right),
        CompareOp::Gt => left.loose_cmp(&right) == Some(Ordering::Greater),
        CompareOp::Lt => left.loose_cmp(&right) == Some(Ordering::Less),
        CompareOp::GtEq => matches!(
            left.loose_cmp(&right),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        CompareOp::LtEq => matches!(
            left.loose_cmp(&right),
            Some(Ordering::Less | Ordering::Equal)
        ),
        CompareOp::Like => {
            let text = match left {
                Value::Null => String::new(),
                v => v.as_string(),
            };
            comparison.pattern().is_some_and(|p| p.is_match(&text))
        }
    }
}

impl Predicate {
    /// Shorthand for [`eval_condition`] with a present condition.
    pub fn matches(&self, record: &Record) -> bool {
        eval_predicate(record, self)
    }
}
