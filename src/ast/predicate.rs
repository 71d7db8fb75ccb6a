use std::{fmt, str::FromStr};

use crate::{
    ast::FieldPath,
    executor::ExecutionError,
    pattern::LikePattern,
    value::Value,
};

/// Comparison operators accepted in a WHERE clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `=`, loose equality
    Eq,
    /// `!=`
    NotEq,
    /// `>`
    Gt,
    /// `<`
    Lt,
    /// `>=`
    GtEq,
    /// `<=`
    LtEq,
    /// `LIKE`, wildcard match
    Like,
}

impl CompareOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::NotEq => "!=",
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
            CompareOp::GtEq => ">=",
            CompareOp::LtEq => "<=",
            CompareOp::Like => "LIKE",
        }
    }
}

impl FromStr for CompareOp {
    type Err = ExecutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "=" => Ok(CompareOp::Eq),
            "!=" => Ok(CompareOp::NotEq),
            ">" => Ok(CompareOp::Gt),
            "<" => Ok(CompareOp::Lt),
            ">=" => Ok(CompareOp::GtEq),
            "<=" => Ok(CompareOp::LtEq),
            op if op.eq_ignore_ascii_case("LIKE") => Ok(CompareOp::Like),
            op => Err(ExecutionError::UnsupportedOperator(op.to_string())),
        }
    }
}

/// Boolean connectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    And,
    Or,
}

/// Right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Integer(i64),
    Float(f64),
    String(String),
}

impl Literal {
    /// Reads an unquoted token: numeric text becomes a number, anything
    /// else a string.
    pub fn from_bare(text: &str) -> Literal {
        if let Ok(n) = text.parse::<i64>() {
            return Literal::Integer(n);
        }
        match text.parse::<f64>() {
            Ok(n) if n.is_finite() => Literal::Float(n),
            _ => Literal::String(text.to_string()),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Literal::Integer(n) => Value::Integer(*n),
            Literal::Float(n) => Value::Float(*n),
            Literal::String(s) => Value::String(s.clone()),
        }
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::String(s.to_string())
    }
}

impl From<i64> for Literal {
    fn from(n: i64) -> Self {
        Literal::Integer(n)
    }
}

impl From<f64> for Literal {
    fn from(n: f64) -> Self {
        Literal::Float(n)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Integer(n) => write!(f, "{}", n),
            Literal::Float(n) => write!(f, "{}", n),
            Literal::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
        }
    }
}

/// A `field op literal` leaf of the predicate tree.
///
/// LIKE leaves carry their compiled pattern so evaluation never recompiles.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub field: FieldPath,
    pub op: CompareOp,
    pub literal: Literal,
    pattern: Option<LikePattern>,
}

impl Comparison {
    pub fn new(field: FieldPath, op: CompareOp, literal: Literal) -> Result<Self, regex::Error> {
        let pattern = match op {
            CompareOp::Like => {
                let text = match &literal {
                    Literal::String(s) => s.clone(),
                    other => other.to_value().as_string(),
                };
                Some(LikePattern::new(&text)?)
            }
            _ => None,
        };
        Ok(Comparison {
            field,
            op,
            literal,
            pattern,
        })
    }

    pub fn pattern(&self) -> Option<&LikePattern> {
        self.pattern.as_ref()
    }
}

/// Boolean filter tree over comparison leaves.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Comparison(Comparison),

    Boolean {
        op: BoolOp,
        left: Box<Predicate>,
        right: Box<Predicate>,
    },
}

impl Predicate {
    /// Builds a comparison leaf from operator text, for callers that hold
    /// conditions outside of query text.
    ///
    /// # Examples
    ///
    /// ```
    /// use rowql::Predicate;
    ///
    /// let adult = Predicate::compare("age", ">=", 18i64).unwrap();
    /// assert!(Predicate::compare("age", "<>", 18i64).is_err());
    /// ```
    pub fn compare(
        field: &str,
        op: &str,
        literal: impl Into<Literal>,
    ) -> Result<Predicate, ExecutionError> {
        let op = op.parse::<CompareOp>()?;
        let comparison = Comparison::new(FieldPath::parse(field), op, literal.into())
            .map_err(|e| ExecutionError::InvalidPattern(e.to_string()))?;
        Ok(Predicate::Comparison(comparison))
    }

    pub fn and(self, other: Predicate) -> Predicate {
        Predicate::Boolean {
            op: BoolOp::And,
            left: Box::new(self),
            right: Box::new(other),
        }
    }

    pub fn or(self, other: Predicate) -> Predicate {
        Predicate::Boolean {
            op: BoolOp::Or,
            left: Box::new(self),
            right: Box::new(other),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Comparison(c) => write!(f, "{} {} {}", c.field, c.op.symbol(), c.literal),
            Predicate::Boolean { op, left, right } => {
                let word = match op {
                    BoolOp::And => "AND",
                    BoolOp::Or => "OR",
                };
                write!(f, "({} {} {})", left, word, right)
            }
        }
    }
}
