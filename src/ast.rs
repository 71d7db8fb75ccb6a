//! # Query AST
//!
//! Structured form of a parsed query.
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[query]** - The statement: select list, source, clauses
//! - **[predicate]** - WHERE trees of AND/OR nodes over comparisons
//! - **[fields]** - Column paths and select-list descriptors
//!
//! ## Grammar
//!
//! ```text
//! query        := "SELECT" select-list "FROM" ident [where] [group] [order] [limit]
//! select-list  := item ("," item)*
//! item         := expr ["AS" ident | ident]
//! where        := "WHERE" bool-expr
//! bool-expr    := bool-expr ("AND"|"OR") bool-expr | "(" bool-expr ")" | comparison
//! comparison   := path comparator literal
//! comparator   := "=" | "!=" | ">=" | "<=" | ">" | "<" | "LIKE"
//! group        := "GROUP BY" path ("," path)*
//! order        := "ORDER BY" path ["ASC"|"DESC"] ("," path ["ASC"|"DESC"])*
//! limit        := "LIMIT" integer
//! ```
//!
//! ## Example
//!
//! ```text
//! SELECT dept, COUNT(*) AS total FROM staff WHERE age > 25 GROUP BY dept ORDER BY total DESC LIMIT 3
//! ```
pub mod fields;
pub mod predicate;
pub mod query;
pub mod tokens;

pub use fields::{AggregateArg, AggregateFn, FieldDescriptor, FieldPath};
pub use predicate::{BoolOp, CompareOp, Comparison, Literal, Predicate};
pub use query::{Direction, OrderKey, Query, SelectItem};
pub use tokens::{Span, Spanned, Token};
