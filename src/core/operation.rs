//! Scrambling operations recovered from a player script

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a helper function, without its operand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// Reverses the whole sequence
    Reverse,
    /// Drops a prefix of the sequence
    Slice,
    /// Exchanges the first element with another one
    Swap,
}

impl OperationKind {
    /// Whether operations of this kind carry a numeric operand
    pub fn takes_operand(&self) -> bool {
        !matches!(self, OperationKind::Reverse)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationKind::Reverse => "reverse",
            OperationKind::Slice => "slice",
            OperationKind::Swap => "swap",
        };
        f.write_str(name)
    }
}

/// A single step of a descrambling program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Operation {
    Reverse,
    Slice { count: usize },
    Swap { index: usize },
}

impl Operation {
    /// Build an operation of the given kind.
    ///
    /// The operand is ignored for [`OperationKind::Reverse`].
    pub fn from_kind(kind: OperationKind, operand: usize) -> Self {
        match kind {
            OperationKind::Reverse => Operation::Reverse,
            OperationKind::Slice => Operation::Slice { count: operand },
            OperationKind::Swap => Operation::Swap { index: operand },
        }
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Reverse => OperationKind::Reverse,
            Operation::Slice { .. } => OperationKind::Slice,
            Operation::Swap { .. } => OperationKind::Swap,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Reverse => write!(f, "reverse"),
            Operation::Slice { count } => write!(f, "slice({})", count),
            Operation::Swap { index } => write!(f, "swap({})", index),
        }
    }
}
