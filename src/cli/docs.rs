//! Grammar reference printed by `rowql grammar`

/// The accepted query grammar, with the evaluation rules that are easy to
/// get wrong.
pub fn grammar_reference() -> &'static str {
    GRAMMAR
}

const GRAMMAR: &str = r#"ROWQL QUERY GRAMMAR

Queries run over a JSON array of objects. Each object is one record.

STATEMENT
  SELECT <items>
  FROM <source>
  [WHERE <condition>]
  [GROUP BY <column>, ...]
  [ORDER BY <column> [ASC|DESC], ...]
  [LIMIT <n>]

  Clauses must appear in this order. Keywords are case-insensitive.
  JOIN is rejected. The FROM source is a label only; rows come from the input.
  Comments (-- to end of line, /* ... */) and trailing semicolons are ignored.

SELECT ITEMS
  *                     Every column of the record
  column                A column, dotted paths reach nested objects (a.b.c)
  column AS alias       Rename in the output (AS may be omitted)
  FUNC(column)          Aggregate: COUNT, SUM, AVG, MAX, MIN
  COUNT(*)              Number of rows

    Example:
      Query:  SELECT dept, COUNT(*) AS n, AVG(cost) avg_cost FROM t GROUP BY dept

CONDITIONS
  column = value        Loose equality: '30' equals 30
  column != value
  column > value        Also <, >=, <=; null never compares
  column LIKE 'pat%'    % any run, _ one character, case-insensitive
  cond AND cond
  cond OR cond
  ( cond )

  Values are 'single' or "double" quoted strings, numbers, or unquoted
  text such as A% or 2020-01-01 (read as a string unless it is a number).
  Inside quotes a quote is written twice ('it''s'); backslashes are kept
  as written. Without parentheses AND and OR bind equally and the
  first one splits the condition:

      a = 1 AND b = 2 OR c = 3    reads as    a = 1 AND (b = 2 OR c = 3)

  Pass --standard-precedence to make AND bind tighter than OR.

AGGREGATES
  COUNT(column)         Rows where the column is present and not null
  SUM(column)           0 when no value is numeric
  AVG / MAX / MIN       null when no value is numeric

  Only numbers and numeric strings take part in SUM, AVG, MAX and MIN.
  Without GROUP BY an aggregate query returns exactly one row.

ORDERING AND LIMIT
  Nulls sort first ascending and last descending. Numbers (and numeric
  strings) sort numerically and come before text, which sorts
  case-insensitively. Ties keep input order.
  LIMIT takes a positive integer.
"#;
