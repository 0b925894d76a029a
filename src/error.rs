//! Error types for rsig

use crate::core::operation::OperationKind;
use std::sync::Arc;
use thiserror::Error;

/// Main error type for rsig operations
#[derive(Debug, Error)]
pub enum RsigError {
    #[error("Entry function for key \"{key}\" not found in player script")]
    EntryFunctionNotFound { key: String },

    #[error("Function body not found for '{0}'")]
    FunctionBodyNotFound(String),

    #[error("Swap index {index} out of range for length {len}")]
    SwapIndexOutOfRange { index: usize, len: usize },

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Missing {kind} operand in statement '{statement}'")]
    MissingOperand {
        kind: OperationKind,
        statement: String,
    },

    #[error("Player version not found")]
    PlayerVersionNotFound,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Parse error: {0}")]
    ParseError(#[from] std::num::ParseIntError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("URL parsing error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Regex error: {0}")]
    RegexError(#[from] regex::Error),

    #[error(transparent)]
    Shared(Arc<RsigError>),
}

impl RsigError {
    /// Check if error makes the whole script version unusable
    pub fn is_parse_failure(&self) -> bool {
        if let RsigError::Shared(inner) = self {
            return inner.is_parse_failure();
        }
        matches!(
            self,
            RsigError::EntryFunctionNotFound { .. }
                | RsigError::FunctionBodyNotFound(_)
                | RsigError::UnknownOperation(_)
                | RsigError::MissingOperand { .. }
                | RsigError::ParseError(_)
                | RsigError::RegexError(_)
        )
    }

    /// Check if error only affects one signature/program combination
    pub fn is_apply_failure(&self) -> bool {
        if let RsigError::Shared(inner) = self {
            return inner.is_apply_failure();
        }
        matches!(self, RsigError::SwapIndexOutOfRange { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classes() {
        let err = RsigError::EntryFunctionNotFound {
            key: "signature".to_string(),
        };
        assert!(err.is_parse_failure());
        assert!(!err.is_apply_failure());

        let err = RsigError::SwapIndexOutOfRange { index: 5, len: 3 };
        assert!(err.is_apply_failure());
        assert!(!err.is_parse_failure());

        assert!(!RsigError::PlayerVersionNotFound.is_parse_failure());

        let shared = RsigError::Shared(Arc::new(RsigError::FunctionBodyNotFound(
            "Xo".to_string(),
        )));
        assert!(shared.is_parse_failure());
        assert_eq!(shared.to_string(), "Function body not found for 'Xo'");
    }

    #[test]
    fn test_error_messages() {
        let err = RsigError::SwapIndexOutOfRange { index: 5, len: 3 };
        assert_eq!(err.to_string(), "Swap index 5 out of range for length 3");

        let err = RsigError::MissingOperand {
            kind: OperationKind::Slice,
            statement: "Xy.ab(a)".to_string(),
        };
        assert_eq!(err.to_string(), "Missing slice operand in statement 'Xy.ab(a)'");
    }
}
