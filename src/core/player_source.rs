//! Parsed descrambling program for one player script version

use crate::core::interpreter;
use crate::core::operation::Operation;
use crate::error::RsigError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered operation program extracted from a player script.
///
/// Immutable once built. A new script version needs a fresh parse, so the
/// value can be shared read-only (e.g. behind an `Arc`) between any number
/// of threads deciphering signatures concurrently.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerSource {
    operations: Vec<Operation>,
}

impl PlayerSource {
    /// Create a player source from an operation program
    pub fn new(operations: Vec<Operation>) -> Self {
        Self { operations }
    }

    /// Get the operation program
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Decipher a signature with this program
    pub fn decipher(&self, signature: &str) -> Result<String, RsigError> {
        interpreter::apply(&self.operations, signature)
    }
}

impl From<Vec<Operation>> for PlayerSource {
    fn from(operations: Vec<Operation>) -> Self {
        Self::new(operations)
    }
}

impl fmt::Display for PlayerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, operation) in self.operations.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", operation)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn reference_source() -> PlayerSource {
        PlayerSource::new(vec![
            Operation::Swap { index: 3 },
            Operation::Slice { count: 2 },
            Operation::Reverse,
        ])
    }

    #[test]
    fn test_decipher() {
        let source = reference_source();
        assert_eq!(source.len(), 3);
        assert_eq!(source.decipher("ABCDEFGHIJ").unwrap(), "JIHGFEAC");
    }

    #[test]
    fn test_display() {
        assert_eq!(reference_source().to_string(), "swap(3) slice(2) reverse");
        assert_eq!(PlayerSource::default().to_string(), "");
    }

    #[test]
    fn test_serde_transparent() {
        let json = serde_json::to_string(&reference_source()).unwrap();
        assert_eq!(
            json,
            r#"[{"op":"swap","index":3},{"op":"slice","count":2},{"op":"reverse"}]"#
        );
        let back: PlayerSource = serde_json::from_str(&json).unwrap();
        assert_eq!(back, reference_source());
    }

    #[test]
    fn test_apply_failure_leaves_source_usable() {
        let source = reference_source();
        assert!(source.decipher("AB").is_err());
        assert_eq!(source.decipher("ABCDEFGHIJ").unwrap(), "JIHGFEAC");
    }

    #[test]
    fn test_shared_across_threads() {
        let source = Arc::new(reference_source());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let source = Arc::clone(&source);
                thread::spawn(move || source.decipher("ABCDEFGHIJ").unwrap())
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), "JIHGFEAC");
        }
    }
}
