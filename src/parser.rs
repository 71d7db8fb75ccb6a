use log::debug;
use thiserror::Error;

use crate::{
    ast::{
        BoolOp, CompareOp, Comparison, Direction, FieldPath, Literal, OrderKey, Predicate, Query,
        SelectItem, Spanned, Token,
    },
    lexer::{LexError, Lexer},
    normalize::normalize,
};

/// Errors raised while turning query text into a [`Query`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("missing {0} clause")]
    MissingClause(&'static str),

    #[error("JOIN is not supported")]
    UnsupportedJoin,

    #[error("clause out of order: {0}")]
    ClauseOrder(String),

    #[error("empty {0} clause")]
    EmptyClause(&'static str),

    #[error("invalid select item: {0}")]
    InvalidSelectItem(String),

    #[error("invalid condition: {0}")]
    InvalidPredicate(String),

    #[error("LIMIT must be a positive integer, got '{0}'")]
    InvalidLimit(String),

    #[error("invalid LIKE pattern: {0}")]
    InvalidPattern(String),

    #[error(transparent)]
    Lex(#[from] LexError),
}

/// How AND and OR group when a condition mixes them without parentheses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BooleanPrecedence {
    /// AND and OR bind equally; the leftmost connective splits the
    /// condition, so `a AND b OR c` reads as `a AND (b OR c)`.
    #[default]
    LeftmostEqual,

    /// AND binds tighter than OR and both associate to the left, so
    /// `a AND b OR c` reads as `(a AND b) OR c`.
    Standard,
}

/// Parser settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParserOptions {
    pub precedence: BooleanPrecedence,
}

/// Clauses in the only order they may appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Clause {
    Select,
    From,
    Where,
    GroupBy,
    OrderBy,
    Limit,
}

impl Clause {
    fn name(&self) -> &'static str {
        match self {
            Clause::Select => "SELECT",
            Clause::From => "FROM",
            Clause::Where => "WHERE",
            Clause::GroupBy => "GROUP BY",
            Clause::OrderBy => "ORDER BY",
            Clause::Limit => "LIMIT",
        }
    }
}

type Clauses<'t> = [Option<&'t [Spanned]>; 6];

pub struct Parser {
    /// Normalized query text; token spans index into it
    source: String,
    tokens: Vec<Spanned>,
    options: ParserOptions,
}

impl Parser {
    pub fn new(query: &str) -> Result<Self, ParseError> {
        Self::with_options(query, ParserOptions::default())
    }

    pub fn with_options(query: &str, options: ParserOptions) -> Result<Self, ParseError> {
        let source = normalize(query);
        let tokens = Lexer::new(&source).tokenize()?;
        Ok(Parser {
            source,
            tokens,
            options,
        })
    }

    /// The normalized text being parsed
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Parse a complete `SELECT` statement
    pub fn parse_query(&self) -> Result<Query, ParseError> {
        let clauses = self.segment()?;

        let select_body = clauses[Clause::Select as usize].ok_or(ParseError::MissingClause("SELECT"))?;
        let from_body = clauses[Clause::From as usize].ok_or(ParseError::MissingClause("FROM"))?;

        let query = Query {
            select: self.parse_select_list(select_body)?,
            from: self.text(from_body).to_string(),
            where_clause: clauses[Clause::Where as usize]
                .map(|body| self.parse_predicate(body))
                .transpose()?,
            group_by: clauses[Clause::GroupBy as usize]
                .map(|body| self.parse_group_by(body))
                .transpose()?,
            order_by: clauses[Clause::OrderBy as usize]
                .map(|body| self.parse_order_by(body))
                .transpose()?,
            limit: clauses[Clause::Limit as usize]
                .map(|body| self.parse_limit(body))
                .transpose()?,
        };

        debug!(
            "parsed query: {} select item(s) from '{}', where: {}, group by: {}, order by: {}, limit: {:?}",
            query.select.len(),
            query.from,
            query.where_clause.is_some(),
            query.group_by.as_ref().map_or(0, Vec::len),
            query.order_by.as_ref().map_or(0, Vec::len),
            query.limit,
        );

        Ok(query)
    }

    /// Parse the whole input as a bare condition (the body of a WHERE clause)
    pub fn parse_condition(&self) -> Result<Predicate, ParseError> {
        self.parse_predicate(&self.tokens)
    }

    // ------------------------------------------------------------------
    // Clause segmentation
    // ------------------------------------------------------------------

    /// Splits the token stream at top-level clause keywords.
    fn segment(&self) -> Result<Clauses<'_>, ParseError> {
        let tokens = self.tokens.as_slice();

        if tokens.iter().any(|t| t.token == Token::Join) {
            return Err(ParseError::UnsupportedJoin);
        }

        // (clause, keyword index, body start)
        let mut marks: Vec<(Clause, usize, usize)> = Vec::new();
        let mut depth = 0usize;
        let mut i = 0;

        while i < tokens.len() {
            match &tokens[i].token {
                Token::LParen => depth += 1,
                Token::RParen => depth = depth.saturating_sub(1),
                token if depth == 0 => {
                    let next_is_by = tokens.get(i + 1).is_some_and(|t| t.token == Token::By);
                    let found = match token {
                        Token::Select => Some((Clause::Select, 1)),
                        Token::From => Some((Clause::From, 1)),
                        Token::Where => Some((Clause::Where, 1)),
                        Token::Group if next_is_by => Some((Clause::GroupBy, 2)),
                        Token::Order if next_is_by => Some((Clause::OrderBy, 2)),
                        Token::Limit => Some((Clause::Limit, 1)),
                        _ => None,
                    };
                    if let Some((clause, width)) = found {
                        marks.push((clause, i, i + width));
                        i += width;
                        continue;
                    }
                }
                _ => {}
            }
            i += 1;
        }

        if !marks.iter().any(|(c, ..)| *c == Clause::Select) {
            return Err(ParseError::MissingClause("SELECT"));
        }
        if !marks.iter().any(|(c, ..)| *c == Clause::From) {
            return Err(ParseError::MissingClause("FROM"));
        }
        if marks[0].0 != Clause::Select || marks[0].1 != 0 {
            return Err(ParseError::ClauseOrder(
                "query must start with SELECT".to_string(),
            ));
        }
        for pair in marks.windows(2) {
            if pair[1].0 <= pair[0].0 {
                return Err(ParseError::ClauseOrder(format!(
                    "{} after {}",
                    pair[1].0.name(),
                    pair[0].0.name()
                )));
            }
        }

        let mut clauses: Clauses<'_> = [None; 6];
        for (n, (clause, _, body_start)) in marks.iter().enumerate() {
            let body_end = marks.get(n + 1).map_or(tokens.len(), |m| m.1);
            let body = &tokens[*body_start..body_end];
            if body.is_empty() {
                return Err(ParseError::EmptyClause(clause.name()));
            }
            debug!("{} clause: {}", clause.name(), self.text(body));
            clauses[*clause as usize] = Some(body);
        }

        Ok(clauses)
    }

    // ------------------------------------------------------------------
    // Select list, GROUP BY, ORDER BY, LIMIT
    // ------------------------------------------------------------------

    fn parse_select_list(&self, body: &[Spanned]) -> Result<Vec<SelectItem>, ParseError> {
        split_top_level(body)
            .into_iter()
            .map(|item| self.parse_select_item(item, body))
            .collect()
    }

    /// Resolves `expr AS alias`, `expr alias` or a bare `expr`.
    fn parse_select_item(&self, item: &[Spanned], list: &[Spanned]) -> Result<SelectItem, ParseError> {
        let invalid = || ParseError::InvalidSelectItem(self.text(list).to_string());

        if item.is_empty() {
            return Err(invalid());
        }

        if let Some(pos) = position_top_level(item, |t| *t == Token::As) {
            let expr = &item[..pos];
            let alias = match &item[pos + 1..] {
                [name] => self.alias_text(name),
                _ => None,
            };
            return match (expr.is_empty(), alias) {
                (false, Some(alias)) => Ok(SelectItem::new(self.text(expr), Some(alias))),
                _ => Err(invalid()),
            };
        }

        // A trailing bare identifier after a complete expression is an implicit alias
        if let [.., before, last] = item
            && let Token::Identifier(alias) = &last.token
            && matches!(
                before.token,
                Token::Identifier(_)
                    | Token::RParen
                    | Token::Integer(_)
                    | Token::Float(_)
                    | Token::String(_)
            )
        {
            let expr = &item[..item.len() - 1];
            return Ok(SelectItem::new(self.text(expr), Some(alias.clone())));
        }

        Ok(SelectItem::new(self.text(item), None))
    }

    fn alias_text(&self, token: &Spanned) -> Option<String> {
        match &token.token {
            Token::Identifier(name) | Token::String(name) => Some(name.clone()),
            t if t.is_soft_keyword() => Some(self.slice(token).to_string()),
            _ => None,
        }
    }

    fn parse_group_by(&self, body: &[Spanned]) -> Result<Vec<FieldPath>, ParseError> {
        split_top_level(body)
            .into_iter()
            .map(|item| {
                if item.is_empty() {
                    Err(ParseError::EmptyClause("GROUP BY"))
                } else {
                    Ok(FieldPath::parse(self.text(item)))
                }
            })
            .collect()
    }

    fn parse_order_by(&self, body: &[Spanned]) -> Result<Vec<OrderKey>, ParseError> {
        split_top_level(body)
            .into_iter()
            .map(|item| self.parse_order_key(item))
            .collect()
    }

    /// `field [ASC|DESC]`; any other trailing word falls back to ascending.
    fn parse_order_key(&self, item: &[Spanned]) -> Result<OrderKey, ParseError> {
        let (field, direction) = match item.split_last() {
            Some((last, rest)) if !rest.is_empty() => match &last.token {
                Token::Asc => (rest, Direction::Asc),
                Token::Desc => (rest, Direction::Desc),
                Token::Identifier(word) if rest.last().is_some_and(|t| t.token != Token::Dot) => {
                    debug!("unrecognized sort direction '{}', using ASC", word);
                    (rest, Direction::Asc)
                }
                _ => (item, Direction::Asc),
            },
            _ => (item, Direction::Asc),
        };

        if field.is_empty() {
            return Err(ParseError::EmptyClause("ORDER BY"));
        }

        Ok(OrderKey {
            field: FieldPath::parse(self.text(field)),
            direction,
        })
    }

    fn parse_limit(&self, body: &[Spanned]) -> Result<usize, ParseError> {
        match body {
            [Spanned {
                token: Token::Integer(n),
                ..
            }] if *n > 0 => usize::try_from(*n)
                .map_err(|_| ParseError::InvalidLimit(self.text(body).to_string())),
            _ => Err(ParseError::InvalidLimit(self.text(body).to_string())),
        }
    }

    // ------------------------------------------------------------------
    // Conditions
    // ------------------------------------------------------------------

    fn parse_predicate(&self, tokens: &[Spanned]) -> Result<Predicate, ParseError> {
        if tokens.is_empty() {
            return Err(ParseError::InvalidPredicate("empty condition".to_string()));
        }

        if is_wrapped(tokens) {
            return self.parse_predicate(&tokens[1..tokens.len() - 1]);
        }

        if let Some((index, op)) = self.find_connective(tokens) {
            let left = self.parse_predicate(&tokens[..index])?;
            let right = self.parse_predicate(&tokens[index + 1..])?;
            return Ok(Predicate::Boolean {
                op,
                left: Box::new(left),
                right: Box::new(right),
            });
        }

        self.parse_comparison(tokens)
    }

    /// Picks the top-level AND/OR to split on, per the configured precedence.
    fn find_connective(&self, tokens: &[Spanned]) -> Option<(usize, BoolOp)> {
        let mut connectives = Vec::new();
        let mut depth = 0usize;
        for (i, t) in tokens.iter().enumerate() {
            match t.token {
                Token::LParen => depth += 1,
                Token::RParen => depth = depth.saturating_sub(1),
                Token::And if depth == 0 => connectives.push((i, BoolOp::And)),
                Token::Or if depth == 0 => connectives.push((i, BoolOp::Or)),
                _ => {}
            }
        }

        match self.options.precedence {
            BooleanPrecedence::LeftmostEqual => connectives.first().copied(),
            BooleanPrecedence::Standard => connectives
                .iter()
                .rev()
                .find(|(_, op)| *op == BoolOp::Or)
                .or_else(|| connectives.last())
                .copied(),
        }
    }

    /// `path op literal`
    fn parse_comparison(&self, tokens: &[Spanned]) -> Result<Predicate, ParseError> {
        let invalid = || ParseError::InvalidPredicate(self.text(tokens).to_string());

        let (index, op) = tokens
            .iter()
            .enumerate()
            .find_map(|(i, t)| compare_op(&t.token).map(|op| (i, op)))
            .ok_or_else(invalid)?;

        let path = &tokens[..index];
        if !self.is_path(path) {
            return Err(invalid());
        }
        let literal = self.parse_literal(&tokens[index + 1..]).ok_or_else(invalid)?;

        Comparison::new(FieldPath::parse(self.text(path)), op, literal)
            .map(Predicate::Comparison)
            .map_err(|e| ParseError::InvalidPattern(e.to_string()))
    }

    /// `word ("." word)*`
    fn is_path(&self, tokens: &[Spanned]) -> bool {
        tokens.len() % 2 == 1
            && tokens.iter().enumerate().all(|(i, t)| {
                if i % 2 == 0 {
                    matches!(t.token, Token::Identifier(_)) || t.token.is_soft_keyword()
                } else {
                    t.token == Token::Dot
                }
            })
    }

    fn parse_literal(&self, tokens: &[Spanned]) -> Option<Literal> {
        match tokens {
            [t] => match &t.token {
                Token::String(s) => Some(Literal::String(s.clone())),
                Token::Integer(n) => Some(Literal::Integer(*n)),
                Token::Float(n) => Some(Literal::Float(*n)),
                Token::Identifier(word) => Some(Literal::from_bare(word)),
                token if token.is_soft_keyword() => Some(Literal::from_bare(self.slice(t))),
                _ => self.parse_bare(tokens),
            },
            [sign, t] if sign.token == Token::Minus => match t.token {
                Token::Integer(n) => Some(Literal::Integer(-n)),
                Token::Float(n) => Some(Literal::Float(-n)),
                _ => self.parse_bare(tokens),
            },
            _ => self.parse_bare(tokens),
        }
    }

    /// An unquoted value spanning several tokens, read back from the source
    /// text: `A%`, `a@b.com`, `2020-01-01`.
    fn parse_bare(&self, tokens: &[Spanned]) -> Option<Literal> {
        if tokens.is_empty() || !tokens.iter().all(|t| is_bare_part(&t.token)) {
            return None;
        }
        Some(Literal::from_bare(self.text(tokens)))
    }

    // ------------------------------------------------------------------
    // Text helpers
    // ------------------------------------------------------------------

    /// Source text covered by a run of tokens
    fn text(&self, tokens: &[Spanned]) -> &str {
        match (tokens.first(), tokens.last()) {
            (Some(first), Some(last)) => &self.source[first.span.start..last.span.end],
            _ => "",
        }
    }

    fn slice(&self, token: &Spanned) -> &str {
        &self.source[token.span.start..token.span.end]
    }
}

fn compare_op(token: &Token) -> Option<CompareOp> {
    match token {
        Token::Eq => Some(CompareOp::Eq),
        Token::NotEq => Some(CompareOp::NotEq),
        Token::Gt => Some(CompareOp::Gt),
        Token::Lt => Some(CompareOp::Lt),
        Token::GtEq => Some(CompareOp::GtEq),
        Token::LtEq => Some(CompareOp::LtEq),
        Token::Like => Some(CompareOp::Like),
        _ => None,
    }
}

/// Tokens that may make up an unquoted value such as `A%`, `a@b.com` or
/// `2020-01-01`. Quotes, parentheses and comparison operators end a value.
fn is_bare_part(token: &Token) -> bool {
    compare_op(token).is_none()
        && !matches!(
            token,
            Token::String(_) | Token::LParen | Token::RParen | Token::Comma | Token::Eof
        )
}

/// Splits on commas outside parentheses.
fn split_top_level(tokens: &[Spanned]) -> Vec<&[Spanned]> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, t) in tokens.iter().enumerate() {
        match t.token {
            Token::LParen => depth += 1,
            Token::RParen => depth = depth.saturating_sub(1),
            Token::Comma if depth == 0 => {
                parts.push(&tokens[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&tokens[start..]);
    parts
}

fn position_top_level(tokens: &[Spanned], pred: impl Fn(&Token) -> bool) -> Option<usize> {
    let mut depth = 0usize;
    for (i, t) in tokens.iter().enumerate() {
        match t.token {
            Token::LParen => depth += 1,
            Token::RParen => depth = depth.saturating_sub(1),
            ref token if depth == 0 && pred(token) => return Some(i),
            _ => {}
        }
    }
    None
}

/// True when one parenthesis pair encloses the whole run.
fn is_wrapped(tokens: &[Spanned]) -> bool {
    if tokens.len() < 2
        || tokens[0].token != Token::LParen
        || tokens[tokens.len() - 1].token != Token::RParen
    {
        return false;
    }

    let mut depth = 0usize;
    for (i, t) in tokens.iter().enumerate() {
        match t.token {
            Token::LParen => depth += 1,
            Token::RParen => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return i == tokens.len() - 1;
                }
            }
            _ => {}
        }
    }
    false
}

/// Parses a `SELECT` statement with default options.
///
/// # Examples
///
/// ```
/// use rowql::parse;
///
/// let query = parse("SELECT name, age AS years FROM people WHERE age > 25 LIMIT 10").unwrap();
/// assert_eq!(query.select.len(), 2);
/// assert_eq!(query.select[1].output_name(), "years");
/// assert_eq!(query.limit, Some(10));
/// ```
pub fn parse(query: &str) -> Result<Query, ParseError> {
    Parser::new(query)?.parse_query()
}

/// Parses a `SELECT` statement with explicit options.
pub fn parse_with(query: &str, options: ParserOptions) -> Result<Query, ParseError> {
    Parser::with_options(query, options)?.parse_query()
}

/// Parses a bare condition such as `age > 25 AND name LIKE 'A%'`.
pub fn parse_predicate(condition: &str) -> Result<Predicate, ParseError> {
    Parser::new(condition)?.parse_condition()
}
