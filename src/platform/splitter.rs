//! Statement splitting for the descrambling function body

use crate::error::RsigError;
use regex::Regex;

/// Split a function body into candidate call statements.
///
/// The first statement (array-ification of the parameter) and the last one
/// (the return expression) are dropped. Order is preserved because it is the
/// order the operations must be applied in.
///
/// A body ending in `;}` leaves the return expression as the last candidate.
pub fn split_statements(body: &str) -> Vec<&str> {
    let statements: Vec<&str> = body.split(';').collect();
    if statements.len() <= 2 {
        return Vec::new();
    }

    statements[1..statements.len() - 1]
        .iter()
        .map(|statement| statement.trim())
        .filter(|statement| !statement.is_empty())
        .collect()
}

/// Regex matching `<object>.<identifier>(` call sites
pub fn call_regex() -> Result<Regex, RsigError> {
    Ok(Regex::new(r"[a-zA-Z0-9$_]+\.([a-zA-Z0-9$_]+)\(")?)
}

/// Identifier of the helper invoked by a candidate statement
pub fn call_identifier<'a>(call_regex: &Regex, statement: &'a str) -> Option<&'a str> {
    call_regex
        .captures(statement)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}
