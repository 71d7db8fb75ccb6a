//! A small SQL-like query engine over in-memory records.
//!
//! Query text is parsed into a [`Query`] and executed against a slice of
//! [`Record`]s supplied by the caller:
//!
//! ```
//! use rowql::{record_from_json, Value};
//! use serde_json::json;
//!
//! let rows = vec![
//!     record_from_json(json!({"name": "Ann", "dept": "eng", "cost": 500})).unwrap(),
//!     record_from_json(json!({"name": "Bob", "dept": "ops", "cost": 300})).unwrap(),
//!     record_from_json(json!({"name": "Cid", "dept": "eng", "cost": 700})).unwrap(),
//! ];
//!
//! let result = rowql::query(
//!     "SELECT dept, SUM(cost) AS total FROM t GROUP BY dept ORDER BY total DESC",
//!     &rows,
//! )
//! .unwrap();
//!
//! assert_eq!(result[0]["dept"], Value::from("eng"));
//! assert_eq!(result[0]["total"], Value::Integer(1200));
//! ```

pub mod aggregate;
pub mod ast;
pub mod builder;
#[cfg(feature = "cli")]
pub mod cli;
pub mod evaluator;
pub mod executor;
pub mod lexer;
pub mod normalize;
pub mod parser;
pub mod pattern;
pub mod sort;
pub mod value;

pub use ast::{CompareOp, Direction, FieldPath, Literal, OrderKey, Predicate, Query, SelectItem, Token};
pub use builder::Selection;
pub use evaluator::eval_condition;
pub use executor::{ExecutionError, execute};
pub use lexer::{LexError, Lexer};
pub use parser::{BooleanPrecedence, ParseError, Parser, ParserOptions, parse, parse_predicate, parse_with};
pub use pattern::{LikePattern, like};
pub use value::{Record, Value, record_from_json, record_to_json};

use thiserror::Error;

/// Either stage of [`query`] failing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("execution error: {0}")]
    Execution(#[from] ExecutionError),
}

/// Parses `text` with default options and runs it over `records`.
pub fn query(text: &str, records: &[Record]) -> Result<Vec<Record>, QueryError> {
    let parsed = parse(text)?;
    Ok(execute(&parsed, records)?)
}
