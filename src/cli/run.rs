//! Run and check queries against JSON input

use log::debug;

use super::CliError;
use crate::{
    BooleanPrecedence, Parser, ParserOptions, Query, Record, execute, record_from_json,
    record_to_json,
};

/// Options for the run command
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Query text
    pub query: String,
    /// JSON input string: an array of objects
    pub input: Option<String>,
    /// Group AND before OR instead of splitting at the first connective
    pub standard_precedence: bool,
}

fn parser_options(standard_precedence: bool) -> ParserOptions {
    ParserOptions {
        precedence: if standard_precedence {
            BooleanPrecedence::Standard
        } else {
            BooleanPrecedence::LeftmostEqual
        },
    }
}

/// Parse a JSON array of objects into records.
pub fn parse_records(json: &str) -> Result<Vec<Record>, CliError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let items = match value {
        serde_json::Value::Array(items) => items,
        other => return Err(CliError::NotAnArray(other.to_string())),
    };

    items
        .into_iter()
        .map(|item| {
            let text = item.to_string();
            record_from_json(item).ok_or(CliError::NotAnArray(text))
        })
        .collect()
}

/// Parse the query without running it.
pub fn execute_check(query: &str, standard_precedence: bool) -> Result<Query, CliError> {
    let parser = Parser::with_options(query, parser_options(standard_precedence))?;
    Ok(parser.parse_query()?)
}

/// Parse the query, run it over the input and return the result rows as JSON.
pub fn execute_run(options: &RunOptions) -> Result<serde_json::Value, CliError> {
    let query = execute_check(&options.query, options.standard_precedence)?;

    let json = options.input.as_deref().ok_or(CliError::NoInput)?;
    let records = parse_records(json)?;
    debug!("loaded {} record(s)", records.len());

    let rows = execute(&query, &records)?;
    Ok(serde_json::Value::Array(
        rows.into_iter().map(record_to_json).collect(),
    ))
}
