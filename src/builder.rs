//! Direct record selection without query text.
//!
//! A [`Selection`] is an immutable description of filter, ordering, paging
//! and projection. Each builder call consumes the selection and returns a
//! new one, so a partially built selection can be cloned and shared freely.
//!
//! ```
//! use rowql::builder::Selection;
//! use rowql::{Direction, Predicate, Record, Value};
//!
//! let rows: Vec<Record> = (1..=5)
//!     .map(|n| [("n".to_string(), Value::Integer(n))].into())
//!     .collect();
//!
//! let page = Selection::new()
//!     .filter(Predicate::compare("n", ">", 1i64).unwrap())
//!     .order_by("n", Direction::Desc)
//!     .skip(1)
//!     .limit(2)
//!     .apply(&rows);
//!
//! let ns: Vec<Value> = page.iter().map(|r| r["n"].clone()).collect();
//! assert_eq!(ns, vec![Value::Integer(4), Value::Integer(3)]);
//! ```

use crate::{
    ast::{Direction, FieldPath, OrderKey, Predicate},
    evaluator::eval_condition,
    parser::{ParseError, parse_predicate},
    sort::sort_records,
    value::Record,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    filter: Option<Predicate>,
    order: Vec<OrderKey>,
    skip: usize,
    limit: Option<usize>,
    fields: Option<Vec<FieldPath>>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a condition. Repeated calls AND the conditions together.
    pub fn filter(self, predicate: Predicate) -> Self {
        let filter = match self.filter {
            Some(existing) => existing.and(predicate),
            None => predicate,
        };
        Selection {
            filter: Some(filter),
            ..self
        }
    }

    /// Adds a condition written as WHERE-clause text.
    pub fn where_text(self, condition: &str) -> Result<Self, ParseError> {
        Ok(self.filter(parse_predicate(condition)?))
    }

    /// Appends a sort key; earlier keys take priority.
    pub fn order_by(mut self, field: &str, direction: Direction) -> Self {
        self.order.push(OrderKey::new(field, direction));
        self
    }

    pub fn skip(self, count: usize) -> Self {
        Selection { skip: count, ..self }
    }

    pub fn limit(self, count: usize) -> Self {
        Selection {
            limit: Some(count),
            ..self
        }
    }

    /// Keeps only the named columns, each under its own path text. `*`
    /// keeps every column of the row.
    pub fn select<I, S>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Selection {
            fields: Some(fields.into_iter().map(|f| FieldPath::parse(f.as_ref())).collect()),
            ..self
        }
    }

    /// Runs filter, sort, skip, limit and projection over `records`.
    pub fn apply(&self, records: &[Record]) -> Vec<Record> {
        let mut rows: Vec<Record> = records
            .iter()
            .filter(|r| eval_condition(r, self.filter.as_ref()))
            .cloned()
            .collect();

        sort_records(&mut rows, &self.order);

        let rows = rows
            .into_iter()
            .skip(self.skip)
            .take(self.limit.unwrap_or(usize::MAX));

        match &self.fields {
            None => rows.collect(),
            Some(fields) => rows
                .map(|row| {
                    let mut out = Record::new();
                    for path in fields {
                        if path.is_star() {
                            out.extend(row.iter().map(|(k, v)| (k.clone(), v.clone())));
                        } else {
                            out.insert(path.to_string(), path.resolve_or_null(&row));
                        }
                    }
                    out
                })
                .collect(),
        }
    }
}
