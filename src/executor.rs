use std::{collections::HashMap, sync::LazyLock};

use log::{debug, trace, warn};
use regex::Regex;
use thiserror::Error;

use crate::{
    aggregate,
    ast::{AggregateArg, AggregateFn, FieldDescriptor, FieldPath, Query, SelectItem},
    evaluator::eval_condition,
    sort::sort_records,
    value::{Record, Value},
};

/// Errors raised while executing a [`Query`] or building conditions by hand.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExecutionError {
    #[error("not a select statement: {0}")]
    NotSelectStatement(String),

    #[error("unknown aggregate function: {0}")]
    UnknownAggregate(String),

    #[error("unsupported comparison operator: {0}")]
    UnsupportedOperator(String),

    #[error("invalid LIKE pattern: {0}")]
    InvalidPattern(String),
}

/// `NAME(arg)` with no nested parentheses
static CALL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_]*)\s*\(\s*([^()]*?)\s*\)\s*$")
        .expect("call-shape pattern is valid")
});

/// Resolves a select-list entry into a plain column or an aggregate call.
pub fn classify(item: &SelectItem) -> Result<FieldDescriptor, ExecutionError> {
    let alias = item.output_name().to_string();

    if let Some(caps) = CALL_SHAPE.captures(&item.expr) {
        let function: AggregateFn = caps[1].parse()?;
        let arg = match &caps[2] {
            "*" => AggregateArg::Star,
            column => AggregateArg::Column(FieldPath::parse(column)),
        };
        return Ok(FieldDescriptor::Aggregate {
            alias,
            function,
            arg,
        });
    }

    Ok(FieldDescriptor::Plain {
        alias,
        path: FieldPath::parse(&item.expr),
    })
}

fn validate(query: &Query) -> Result<(), ExecutionError> {
    if query.select.is_empty() {
        return Err(ExecutionError::NotSelectStatement(
            "empty select list".to_string(),
        ));
    }
    if query.from.trim().is_empty() {
        return Err(ExecutionError::NotSelectStatement(
            "missing source table".to_string(),
        ));
    }
    if let Some(item) = query.select.iter().find(|i| i.expr.trim().is_empty()) {
        return Err(ExecutionError::NotSelectStatement(format!(
            "empty select expression (alias {:?})",
            item.alias
        )));
    }
    Ok(())
}

/// Copies one plain column from `source` into `out`. `*` copies every column.
fn project_plain(out: &mut Record, alias: &str, path: &FieldPath, source: Option<&Record>) {
    if path.is_star() {
        if let Some(source) = source {
            out.extend(source.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        return;
    }
    let value = source.map_or(Value::Null, |r| path.resolve_or_null(r));
    out.insert(alias.to_string(), value);
}

fn project_aggregates(out: &mut Record, fields: &[FieldDescriptor], rows: &[&Record]) {
    for field in fields {
        if let FieldDescriptor::Aggregate {
            alias,
            function,
            arg,
        } = field
        {
            out.insert(alias.clone(), aggregate::compute(*function, arg, rows));
        }
    }
}

/// Partitions rows by the joined string form of the group-by columns,
/// keeping groups in first-seen order.
fn group_rows<'r>(rows: &[&'r Record], by: &[FieldPath]) -> Vec<(String, Vec<&'r Record>)> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<&'r Record>)> = Vec::new();

    for &row in rows {
        let key = by
            .iter()
            .map(|path| path.resolve(row).map_or_else(|| "null".to_string(), Value::as_string))
            .collect::<Vec<_>>()
            .join("||");

        match index.get(&key) {
            Some(&i) => groups[i].1.push(row),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, vec![row]));
            }
        }
    }
    groups
}

fn execute_grouped(rows: &[&Record], by: &[FieldPath], fields: &[FieldDescriptor]) -> Vec<Record> {
    let loose: Vec<&str> = fields
        .iter()
        .filter_map(|f| match f {
            FieldDescriptor::Plain { path, .. } if !path.is_star() && !by.contains(path) => {
                Some(f.alias())
            }
            _ => None,
        })
        .collect();
    if !loose.is_empty() {
        warn!(
            "column(s) {:?} are neither grouped nor aggregated; values come from the first row of each group",
            loose
        );
    }

    let groups = group_rows(rows, by);
    debug!("{} group(s) from {} row(s)", groups.len(), rows.len());

    groups
        .iter()
        .map(|(key, members)| {
            trace!("group '{}': {} row(s)", key, members.len());
            let representative = members.first().copied();
            let mut out = Record::new();

            for path in by {
                let value = representative.map_or(Value::Null, |r| path.resolve_or_null(r));
                out.insert(path.to_string(), value);
            }
            for field in fields {
                if let FieldDescriptor::Plain { alias, path } = field {
                    project_plain(&mut out, alias, path, representative);
                }
            }
            project_aggregates(&mut out, fields, members);
            out
        })
        .collect()
}

fn execute_global_aggregate(rows: &[&Record], fields: &[FieldDescriptor]) -> Record {
    let first = rows.first().copied();
    let mut out = Record::new();
    for field in fields {
        if let FieldDescriptor::Plain { alias, path } = field {
            project_plain(&mut out, alias, path, first);
        }
    }
    project_aggregates(&mut out, fields, rows);
    out
}

fn execute_projection(rows: &[&Record], fields: &[FieldDescriptor]) -> Vec<Record> {
    rows.iter()
        .map(|&row| {
            let mut out = Record::new();
            for field in fields {
                if let FieldDescriptor::Plain { alias, path } = field {
                    project_plain(&mut out, alias, path, Some(row));
                }
            }
            out
        })
        .collect()
}

/// Runs a parsed query over `records`.
///
/// Stages run in order: filter, field classification, grouping or global
/// aggregation or plain projection, ordering, limit. The input is only read;
/// the result is a freshly built list.
///
/// # Examples
///
/// ```
/// use rowql::{execute, parse, Record, Value};
///
/// let rows: Vec<Record> = vec![
///     [("name".to_string(), Value::from("Bob")), ("age".to_string(), Value::Integer(30))].into(),
///     [("name".to_string(), Value::from("Ann")), ("age".to_string(), Value::Integer(20))].into(),
/// ];
///
/// let query = parse("SELECT name FROM t WHERE age > 25").unwrap();
/// let result = execute(&query, &rows).unwrap();
/// assert_eq!(result.len(), 1);
/// assert_eq!(result[0]["name"], Value::from("Bob"));
/// ```
pub fn execute(query: &Query, records: &[Record]) -> Result<Vec<Record>, ExecutionError> {
    validate(query)?;

    let filtered: Vec<&Record> = records
        .iter()
        .filter(|r| eval_condition(r, query.where_clause.as_ref()))
        .collect();
    debug!("{} of {} row(s) pass the filter", filtered.len(), records.len());

    let fields = query
        .select
        .iter()
        .map(classify)
        .collect::<Result<Vec<_>, _>>()?;

    let mut output = match &query.group_by {
        Some(by) => execute_grouped(&filtered, by, &fields),
        None if fields.iter().any(FieldDescriptor::is_aggregate) => {
            vec![execute_global_aggregate(&filtered, &fields)]
        }
        None => execute_projection(&filtered, &fields),
    };

    if let Some(keys) = &query.order_by {
        sort_records(&mut output, keys);
    }
    if let Some(limit) = query.limit {
        output.truncate(limit);
    }

    debug!("query produced {} row(s)", output.len());
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_aggregates() {
        let item = SelectItem::new("COUNT(*)", Some("total".into()));
        assert_eq!(
            classify(&item).unwrap(),
            FieldDescriptor::Aggregate {
                alias: "total".into(),
                function: AggregateFn::Count,
                arg: AggregateArg::Star,
            }
        );

        let item = SelectItem::new("avg( cost )", None);
        assert_eq!(
            classify(&item).unwrap(),
            FieldDescriptor::Aggregate {
                alias: "avg( cost )".into(),
                function: AggregateFn::Avg,
                arg: AggregateArg::Column(FieldPath::parse("cost")),
            }
        );
    }

    #[test]
    fn test_classify_plain() {
        let item = SelectItem::new("address.city", None);
        assert_eq!(
            classify(&item).unwrap(),
            FieldDescriptor::Plain {
                alias: "address.city".into(),
                path: FieldPath::parse("address.city"),
            }
        );
    }

    #[test]
    fn test_classify_unknown_function() {
        let item = SelectItem::new("UPPER(name)", None);
        assert_eq!(
            classify(&item),
            Err(ExecutionError::UnknownAggregate("UPPER".into()))
        );
    }

    #[test]
    fn test_rejects_empty_select() {
        let query = Query {
            select: vec![],
            from: "t".into(),
            where_clause: None,
            group_by: None,
            order_by: None,
            limit: None,
        };
        assert!(matches!(
            execute(&query, &[]),
            Err(ExecutionError::NotSelectStatement(_))
        ));
    }
}
