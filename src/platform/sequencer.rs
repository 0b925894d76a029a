//! Turns classified call statements into an ordered operation program

use crate::core::operation::{Operation, OperationKind};
use crate::error::RsigError;
use crate::platform::classifier::ClassificationMap;
use crate::platform::splitter::{call_identifier, call_regex};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// What to do with a call that cannot be fully resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnknownCallPolicy {
    /// Skip calls to unclassified helpers; a missing or unreadable
    /// operand becomes 0
    #[default]
    Ignore,
    /// Abort parsing with [`RsigError::UnknownOperation`] or
    /// [`RsigError::MissingOperand`]
    FailFast,
}

/// Emits operations for candidate statements in their original order
#[derive(Debug, Clone, Copy, Default)]
pub struct OperationSequencer {
    policy: UnknownCallPolicy,
}

impl OperationSequencer {
    pub fn new(policy: UnknownCallPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> UnknownCallPolicy {
        self.policy
    }

    /// Resolve every statement through `map` and collect the program
    pub fn sequence(
        &self,
        statements: &[&str],
        map: &ClassificationMap,
    ) -> Result<Vec<Operation>, RsigError> {
        let call_regex = call_regex()?;
        let operand_regex = Regex::new(r"\(\s*[a-zA-Z0-9$_]+\s*,\s*(\d+)\s*\)")?;
        let mut operations = Vec::with_capacity(statements.len());

        for &statement in statements {
            let identifier = call_identifier(&call_regex, statement);
            let Some(kind) = identifier.and_then(|name| map.kind_of(name)) else {
                match self.policy {
                    UnknownCallPolicy::Ignore => {
                        debug!("Skipping unclassified statement: {}", statement);
                        continue;
                    }
                    UnknownCallPolicy::FailFast => {
                        warn!("Unclassified statement: {}", statement);
                        return Err(RsigError::UnknownOperation(
                            identifier.unwrap_or(statement).to_string(),
                        ));
                    }
                }
            };

            let operand = if kind.takes_operand() {
                match extract_operand(&operand_regex, statement, kind) {
                    Ok(operand) => operand,
                    Err(err) if self.policy == UnknownCallPolicy::Ignore => {
                        warn!("{}, using 0", err);
                        0
                    }
                    Err(err) => return Err(err),
                }
            } else {
                0
            };
            operations.push(Operation::from_kind(kind, operand));
        }

        debug!("Sequenced {} operations", operations.len());
        Ok(operations)
    }
}

/// Trailing numeric literal of a `helper(a,<n>)` call site
fn extract_operand(
    operand_regex: &Regex,
    statement: &str,
    kind: OperationKind,
) -> Result<usize, RsigError> {
    let digits = operand_regex
        .captures(statement)
        .and_then(|captures| captures.get(1))
        .ok_or_else(|| RsigError::MissingOperand {
            kind,
            statement: statement.to_string(),
        })?;

    Ok(digits.as_str().parse()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_map() -> ClassificationMap {
        let mut map = ClassificationMap::new();
        map.bind("rv", OperationKind::Reverse);
        map.bind("sl", OperationKind::Slice);
        map.bind("sw", OperationKind::Swap);
        map
    }

    #[test]
    fn test_sequence_in_statement_order() {
        let statements = ["Xy.sw(a,3)", "Xy.sl(a,2)", "Xy.rv(a,45)", "Xy.sw(a, 17 )"];
        let operations = OperationSequencer::default()
            .sequence(&statements, &reference_map())
            .unwrap();

        assert_eq!(
            operations,
            vec![
                Operation::Swap { index: 3 },
                Operation::Slice { count: 2 },
                Operation::Reverse,
                Operation::Swap { index: 17 },
            ]
        );
    }

    #[test]
    fn test_ignore_unknown() {
        let statements = ["Xy.rv(a)", "Xy.nope(a,4)", "a=a"];
        let operations = OperationSequencer::new(UnknownCallPolicy::Ignore)
            .sequence(&statements, &reference_map())
            .unwrap();

        assert_eq!(operations, vec![Operation::Reverse]);
    }

    #[test]
    fn test_fail_fast_on_unknown() {
        let statements = ["Xy.rv(a)", "Xy.nope(a,4)"];
        let err = OperationSequencer::new(UnknownCallPolicy::FailFast)
            .sequence(&statements, &reference_map())
            .unwrap_err();

        assert!(matches!(err, RsigError::UnknownOperation(ref name) if name == "nope"));
    }

    #[test]
    fn test_fail_fast_on_non_call_statement() {
        let err = OperationSequencer::new(UnknownCallPolicy::FailFast)
            .sequence(&["a=a"], &reference_map())
            .unwrap_err();

        assert!(matches!(err, RsigError::UnknownOperation(ref text) if text == "a=a"));
    }

    #[test]
    fn test_missing_operand_defaults_to_zero() {
        let statements = ["Xy.sl(a)", "Xy.sw(a,c)"];
        let operations = OperationSequencer::default()
            .sequence(&statements, &reference_map())
            .unwrap();

        assert_eq!(
            operations,
            vec![Operation::Slice { count: 0 }, Operation::Swap { index: 0 }]
        );
    }

    #[test]
    fn test_fail_fast_on_missing_operand() {
        let err = OperationSequencer::new(UnknownCallPolicy::FailFast)
            .sequence(&["Xy.sl(a)"], &reference_map())
            .unwrap_err();

        assert!(matches!(
            err,
            RsigError::MissingOperand {
                kind: OperationKind::Slice,
                ..
            }
        ));
    }

    #[test]
    fn test_operand_overflow() {
        let statements = ["Xy.sw(a,99999999999999999999999)"];
        let operations = OperationSequencer::default()
            .sequence(&statements, &reference_map())
            .unwrap();
        assert_eq!(operations, vec![Operation::Swap { index: 0 }]);

        let err = OperationSequencer::new(UnknownCallPolicy::FailFast)
            .sequence(&statements, &reference_map())
            .unwrap_err();
        assert!(matches!(err, RsigError::ParseError(_)));
    }
}
