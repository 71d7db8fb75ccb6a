use crate::ast::{FieldPath, Predicate};

/// A parsed `SELECT` statement.
///
/// Built once per query string and never mutated by execution.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// Select list, in order
    pub select: Vec<SelectItem>,

    /// Source table token; not resolved, rows are supplied by the caller
    pub from: String,

    /// Optional WHERE condition
    pub where_clause: Option<Predicate>,

    /// Optional GROUP BY columns
    pub group_by: Option<Vec<FieldPath>>,

    /// Optional ORDER BY keys
    pub order_by: Option<Vec<OrderKey>>,

    /// Optional row cap, always at least 1
    pub limit: Option<usize>,
}

/// One select-list entry: expression text and optional alias.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectItem {
    pub expr: String,
    pub alias: Option<String>,
}

impl SelectItem {
    pub fn new(expr: impl Into<String>, alias: Option<String>) -> Self {
        SelectItem {
            expr: expr.into(),
            alias,
        }
    }

    /// Output key: the alias, or the expression text itself.
    pub fn output_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.expr)
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

/// One ORDER BY key.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderKey {
    pub field: FieldPath,
    pub direction: Direction,
}

impl OrderKey {
    pub fn new(field: &str, direction: Direction) -> Self {
        OrderKey {
            field: FieldPath::parse(field),
            direction,
        }
    }
}
