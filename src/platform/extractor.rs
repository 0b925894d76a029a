//! Function body extraction strategies

use crate::error::RsigError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Extracts the source text of a single-parameter function definition
pub trait BodyExtractor: fmt::Debug + Send + Sync {
    /// Return the body of `function_name`, from its opening brace through
    /// the closing brace chosen by the strategy.
    fn extract<'a>(&self, script: &'a str, function_name: &str) -> Result<&'a str, RsigError>;
}

/// Built-in extraction strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractionMode {
    /// Stop at the first closing brace after the opening one
    #[default]
    FirstBrace,
    /// Stop at the brace that balances the opening one
    Balanced,
}

impl ExtractionMode {
    /// Create the extractor implementing this mode
    pub fn extractor(&self) -> Box<dyn BodyExtractor> {
        match self {
            ExtractionMode::FirstBrace => Box::new(FirstBraceExtractor),
            ExtractionMode::Balanced => Box::new(BalancedBraceExtractor),
        }
    }
}

/// Non-balanced extraction, matches the shape of known player scripts
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstBraceExtractor;

impl BodyExtractor for FirstBraceExtractor {
    fn extract<'a>(&self, script: &'a str, function_name: &str) -> Result<&'a str, RsigError> {
        let open = find_definition(script, function_name)?;
        let close = script[open..]
            .find('}')
            .map(|offset| open + offset)
            .ok_or_else(|| RsigError::FunctionBodyNotFound(function_name.to_string()))?;

        debug!("Extracted body of {} ({} bytes)", function_name, close + 1 - open);
        Ok(&script[open..=close])
    }
}

/// Brace-depth balanced extraction, skips braces inside string literals
#[derive(Debug, Clone, Copy, Default)]
pub struct BalancedBraceExtractor;

impl BodyExtractor for BalancedBraceExtractor {
    fn extract<'a>(&self, script: &'a str, function_name: &str) -> Result<&'a str, RsigError> {
        let open = find_definition(script, function_name)?;
        let close = matching_brace(&script[open..])
            .map(|offset| open + offset)
            .ok_or_else(|| RsigError::FunctionBodyNotFound(function_name.to_string()))?;

        debug!(
            "Extracted balanced body of {} ({} bytes)",
            function_name,
            close + 1 - open
        );
        Ok(&script[open..=close])
    }
}

/// Byte offset of the opening brace of `<name>=function(<param>){`
fn find_definition(script: &str, function_name: &str) -> Result<usize, RsigError> {
    let definition_regex = Regex::new(&format!(
        r#"(?:^|[^a-zA-Z0-9$_.]){}\s*=\s*function\s*\(\s*[a-zA-Z0-9$_]+\s*\)\s*\{{"#,
        regex::escape(function_name)
    ))?;

    definition_regex
        .find(script)
        .map(|m| m.end() - 1)
        .ok_or_else(|| RsigError::FunctionBodyNotFound(function_name.to_string()))
}

/// Offset of the brace closing the one at the start of `text`
fn matching_brace(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '"' | '\'' | '`' => quote = Some(c),
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = r#"var Xy={rv:function(a){a.reverse()}};Xo=function(a){a=a.split("");Xy.rv(a);return a.join("")};"#;

    #[test]
    fn test_first_brace_extraction() {
        let body = FirstBraceExtractor.extract(SCRIPT, "Xo").unwrap();
        assert_eq!(body, r#"{a=a.split("");Xy.rv(a);return a.join("")}"#);
    }

    #[test]
    fn test_first_brace_stops_at_nested_brace() {
        let script = r#"Xo=function(a){if(a){a=a.split("")};return a.join("")};"#;
        let body = FirstBraceExtractor.extract(script, "Xo").unwrap();
        assert_eq!(body, r#"{if(a){a=a.split("")}"#);
    }

    #[test]
    fn test_balanced_extraction() {
        let script = r#"Xo=function(a){if(a){a=a.split("}")};return a.join("")};var z=1;"#;
        let body = BalancedBraceExtractor.extract(script, "Xo").unwrap();
        assert_eq!(body, r#"{if(a){a=a.split("}")};return a.join("")}"#);
    }

    #[test]
    fn test_balanced_unterminated() {
        let script = r#"Xo=function(a){a=a.split("");"#;
        let err = BalancedBraceExtractor.extract(script, "Xo").unwrap_err();
        assert!(matches!(err, RsigError::FunctionBodyNotFound(ref name) if name == "Xo"));
    }

    #[test]
    fn test_definition_requires_single_parameter() {
        let script = r#"Xo=function(a,b){return a};"#;
        assert!(FirstBraceExtractor.extract(script, "Xo").is_err());
    }

    #[test]
    fn test_definition_ignores_longer_names_and_members() {
        let script = r#"aXo=function(a){return 1};h.Xo=function(a){return 2};Xo=function(a){return 3};"#;
        let body = FirstBraceExtractor.extract(script, "Xo").unwrap();
        assert_eq!(body, "{return 3}");
    }

    #[test]
    fn test_missing_definition() {
        let err = FirstBraceExtractor.extract(SCRIPT, "Zz").unwrap_err();
        assert!(matches!(err, RsigError::FunctionBodyNotFound(_)));
    }

    #[test]
    fn test_mode_extractors() {
        let first = ExtractionMode::FirstBrace.extractor();
        let balanced = ExtractionMode::Balanced.extractor();
        assert_eq!(
            first.extract(SCRIPT, "Xo").unwrap(),
            balanced.extract(SCRIPT, "Xo").unwrap()
        );
        assert_eq!(ExtractionMode::default(), ExtractionMode::FirstBrace);
    }
}
