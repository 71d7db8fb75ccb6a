// tests/parser_tests.rs

use rowql::ast::{Direction, FieldPath, Literal, OrderKey, Predicate, SelectItem};
use rowql::parser::{BooleanPrecedence, ParseError, Parser, ParserOptions, parse, parse_predicate, parse_with};

fn cmp(field: &str, op: &str, literal: impl Into<Literal>) -> Predicate {
    Predicate::compare(field, op, literal).unwrap()
}

// ============================================================================
// Clauses
// ============================================================================

#[test]
fn test_minimal_query() {
    let query = parse("SELECT name FROM users").unwrap();
    assert_eq!(query.select, vec![SelectItem::new("name", None)]);
    assert_eq!(query.from, "users");
    assert!(query.where_clause.is_none());
    assert!(query.group_by.is_none());
    assert!(query.order_by.is_none());
    assert!(query.limit.is_none());
}

#[test]
fn test_all_clauses() {
    let query = parse(
        "SELECT dept, COUNT(*) AS n FROM staff WHERE age > 25 GROUP BY dept ORDER BY n DESC, dept LIMIT 3",
    )
    .unwrap();

    assert_eq!(
        query.select,
        vec![
            SelectItem::new("dept", None),
            SelectItem::new("COUNT(*)", Some("n".into())),
        ]
    );
    assert_eq!(query.from, "staff");
    assert_eq!(query.where_clause, Some(cmp("age", ">", 25i64)));
    assert_eq!(query.group_by, Some(vec![FieldPath::parse("dept")]));
    assert_eq!(
        query.order_by,
        Some(vec![
            OrderKey::new("n", Direction::Desc),
            OrderKey::new("dept", Direction::Asc),
        ])
    );
    assert_eq!(query.limit, Some(3));
}

#[test]
fn test_keywords_any_case_and_comments() {
    let query = parse(
        "select name\n  -- pick the name\n  from users /* everyone */ where age >= 18;",
    )
    .unwrap();
    assert_eq!(query.from, "users");
    assert_eq!(query.where_clause, Some(cmp("age", ">=", 18i64)));
}

#[test]
fn test_keywords_inside_strings_do_not_split_clauses() {
    let query = parse("SELECT a FROM t WHERE note = 'group by -- order by'").unwrap();
    assert_eq!(
        query.where_clause,
        Some(cmp("note", "=", "group by -- order by"))
    );
    assert!(query.group_by.is_none());
}

#[test]
fn test_missing_clauses() {
    assert_eq!(parse("SELECT name"), Err(ParseError::MissingClause("FROM")));
    assert_eq!(parse("FROM users"), Err(ParseError::MissingClause("SELECT")));
    assert_eq!(parse(""), Err(ParseError::MissingClause("SELECT")));
}

#[test]
fn test_join_rejected() {
    assert_eq!(
        parse("SELECT a FROM t JOIN u WHERE t.id = u.id"),
        Err(ParseError::UnsupportedJoin)
    );
}

#[test]
fn test_clause_order() {
    assert!(matches!(
        parse("SELECT a FROM t ORDER BY a WHERE a = 1"),
        Err(ParseError::ClauseOrder(_))
    ));
    assert!(matches!(
        parse("FROM t SELECT a"),
        Err(ParseError::ClauseOrder(_))
    ));
    assert!(matches!(
        parse("SELECT a FROM t WHERE a = 1 WHERE b = 2"),
        Err(ParseError::ClauseOrder(_))
    ));
}

#[test]
fn test_empty_clause() {
    assert_eq!(parse("SELECT FROM t"), Err(ParseError::EmptyClause("SELECT")));
    assert_eq!(parse("SELECT a FROM t WHERE"), Err(ParseError::EmptyClause("WHERE")));
}

#[test]
fn test_group_without_by_is_an_identifier() {
    let query = parse("SELECT group FROM t").unwrap();
    assert_eq!(query.select[0].output_name(), "group");
}

// ============================================================================
// Select list
// ============================================================================

#[test]
fn test_aliases() {
    let query = parse("SELECT name AS who, age years, SUM(cost) total, address.city FROM t").unwrap();
    let names: Vec<&str> = query.select.iter().map(|s| s.output_name()).collect();
    assert_eq!(names, vec!["who", "years", "total", "address.city"]);
    assert_eq!(query.select[2].expr, "SUM(cost)");
}

#[test]
fn test_star() {
    let query = parse("SELECT * FROM t").unwrap();
    assert_eq!(query.select, vec![SelectItem::new("*", None)]);
}

#[test]
fn test_invalid_alias() {
    assert!(matches!(
        parse("SELECT name AS FROM t"),
        Err(ParseError::InvalidSelectItem(_))
    ));
}

// ============================================================================
// ORDER BY and LIMIT
// ============================================================================

#[test]
fn test_order_by_directions() {
    let query = parse("SELECT a FROM t ORDER BY a asc, b DESC, c").unwrap();
    assert_eq!(
        query.order_by.unwrap(),
        vec![
            OrderKey::new("a", Direction::Asc),
            OrderKey::new("b", Direction::Desc),
            OrderKey::new("c", Direction::Asc),
        ]
    );
}

#[test]
fn test_order_by_unknown_direction_is_ascending() {
    let query = parse("SELECT a FROM t ORDER BY a sideways").unwrap();
    assert_eq!(query.order_by.unwrap(), vec![OrderKey::new("a", Direction::Asc)]);
}

#[test]
fn test_limit_must_be_positive() {
    assert_eq!(parse("SELECT a FROM t LIMIT 2").unwrap().limit, Some(2));
    assert_eq!(
        parse("SELECT a FROM t LIMIT 0"),
        Err(ParseError::InvalidLimit("0".into()))
    );
    assert!(matches!(
        parse("SELECT a FROM t LIMIT -1"),
        Err(ParseError::InvalidLimit(_))
    ));
    assert!(matches!(
        parse("SELECT a FROM t LIMIT ten"),
        Err(ParseError::InvalidLimit(_))
    ));
}

// ============================================================================
// Conditions
// ============================================================================

#[test]
fn test_literals() {
    assert_eq!(parse_predicate("n = -5").unwrap(), cmp("n", "=", -5i64));
    assert_eq!(parse_predicate("n = 2.5").unwrap(), cmp("n", "=", 2.5));
    assert_eq!(parse_predicate("name = \"Ann\"").unwrap(), cmp("name", "=", "Ann"));
    assert_eq!(parse_predicate("flag = true").unwrap(), cmp("flag", "=", "true"));
}

#[test]
fn test_unquoted_values_span_several_tokens() {
    assert_eq!(parse_predicate("name LIKE A%").unwrap(), cmp("name", "LIKE", "A%"));
    assert_eq!(parse_predicate("x = 2020-01-01").unwrap(), cmp("x", "=", "2020-01-01"));
    assert_eq!(parse_predicate("email = a@b.com").unwrap(), cmp("email", "=", "a@b.com"));
    assert_eq!(parse_predicate("v = 1e3").unwrap(), cmp("v", "=", 1000.0));
    assert_eq!(
        parse_predicate("name LIKE A% AND dept = R&D").unwrap(),
        cmp("name", "LIKE", "A%").and(cmp("dept", "=", "R&D"))
    );
}

#[test]
fn test_all_operators() {
    for op in ["=", "!=", ">", "<", ">=", "<="] {
        let text = format!("age {} 30", op);
        assert_eq!(parse_predicate(&text).unwrap(), cmp("age", op, 30i64), "{}", text);
    }
    assert_eq!(
        parse_predicate("name like 'A%'").unwrap(),
        cmp("name", "LIKE", "A%")
    );
}

#[test]
fn test_like_pattern_is_compiled() {
    let Predicate::Comparison(c) = parse_predicate("name LIKE 'A_%'").unwrap() else {
        panic!("expected comparison");
    };
    assert_eq!(c.pattern().map(|p| p.as_str()), Some("A_%"));
    assert!(c.pattern().unwrap().is_match("Ann"));
}

#[test]
fn test_nested_field() {
    assert_eq!(
        parse_predicate("address.city = 'Oslo'").unwrap(),
        cmp("address.city", "=", "Oslo")
    );
}

#[test]
fn test_mixed_connectives_split_leftmost() {
    let predicate = parse_predicate("a = 1 AND b = 2 OR c = 3").unwrap();
    assert_eq!(
        predicate,
        cmp("a", "=", 1i64).and(cmp("b", "=", 2i64).or(cmp("c", "=", 3i64)))
    );
    assert_eq!(predicate.to_string(), "(a = 1 AND (b = 2 OR c = 3))");

    let predicate = parse_predicate("a = 1 OR b = 2 AND c = 3").unwrap();
    assert_eq!(
        predicate,
        cmp("a", "=", 1i64).or(cmp("b", "=", 2i64).and(cmp("c", "=", 3i64)))
    );
}

#[test]
fn test_standard_precedence() {
    let options = ParserOptions {
        precedence: BooleanPrecedence::Standard,
    };
    let parser = Parser::with_options("a = 1 AND b = 2 OR c = 3", options).unwrap();
    assert_eq!(
        parser.parse_condition().unwrap(),
        cmp("a", "=", 1i64).and(cmp("b", "=", 2i64)).or(cmp("c", "=", 3i64))
    );

    let query = parse_with("SELECT x FROM t WHERE a = 1 OR b = 2 AND c = 3 AND d = 4", options).unwrap();
    assert_eq!(
        query.where_clause.unwrap(),
        cmp("a", "=", 1i64).or(cmp("b", "=", 2i64)
            .and(cmp("c", "=", 3i64))
            .and(cmp("d", "=", 4i64)))
    );
}

#[test]
fn test_parentheses_group() {
    assert_eq!(
        parse_predicate("(a = 1 OR b = 2) AND c = 3").unwrap(),
        cmp("a", "=", 1i64).or(cmp("b", "=", 2i64)).and(cmp("c", "=", 3i64))
    );
    assert_eq!(
        parse_predicate("((a = 1))").unwrap(),
        cmp("a", "=", 1i64)
    );
}

#[test]
fn test_invalid_conditions() {
    for text in ["age", "age >", "= 5", "a = 1 AND", "(a = 1", "a = b = c"] {
        assert!(
            matches!(parse_predicate(text), Err(ParseError::InvalidPredicate(_))),
            "{} should be rejected",
            text
        );
    }
}

#[test]
fn test_lex_errors_surface() {
    assert!(matches!(
        parse("SELECT a FROM t WHERE name = 'Ann"),
        Err(ParseError::Lex(_))
    ));
}
