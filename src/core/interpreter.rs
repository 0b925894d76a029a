//! Applies a descrambling program to a signature

use crate::core::operation::Operation;
use crate::error::RsigError;

/// Apply `operations` to `signature` in program order
pub fn apply(operations: &[Operation], signature: &str) -> Result<String, RsigError> {
    let mut chars: Vec<char> = signature.chars().collect();

    for operation in operations {
        apply_operation(&mut chars, operation)?;
    }

    Ok(chars.into_iter().collect())
}

/// Apply a single operation to a character sequence in place
pub fn apply_operation(chars: &mut Vec<char>, operation: &Operation) -> Result<(), RsigError> {
    match *operation {
        Operation::Reverse => {
            chars.reverse();
        }
        Operation::Slice { count } => {
            let count = count.min(chars.len());
            chars.drain(..count);
        }
        Operation::Swap { index } => {
            // No wrap-around: an out of range index means the program is wrong.
            if index >= chars.len() {
                return Err(RsigError::SwapIndexOutOfRange {
                    index,
                    len: chars.len(),
                });
            }
            chars.swap(0, index);
        }
    }
    Ok(())
}
