//! # rsig - Rust Signature Descrambler
//!
//! Recovers the signature scrambling program from an obfuscated player
//! script and applies it to stream signatures.
//!
//! ## Features
//!
//! - Structural classification of minified helper functions
//! - Reverse / slice / swap operation programs
//! - Pluggable function body extraction
//! - Strict or permissive handling of unknown helper calls
//! - Per-version caching of parsed programs
//!
//! ## Example
//!
//! ```rust
//! use rsig::PlayerSourceParser;
//!
//! let script = r#"var Xy={rv:function(a){a.reverse()},
//! sl:function(a,b){a.splice(0,b)},
//! sw:function(a,b){var c=a[0];a[0]=a[b%a.length];a[b%a.length]=c}};
//! Xo=function(a){a=a.split("");Xy.sw(a,3);Xy.sl(a,2);Xy.rv(a,45);return a.join("")};
//! d.set("signature",Xo(c));"#;
//!
//! let source = PlayerSourceParser::new().parse(script)?;
//! assert_eq!(source.to_string(), "swap(3) slice(2) reverse");
//! assert_eq!(source.decipher("ABCDEFGHIJ")?, "JIHGFEAC");
//! # Ok::<(), rsig::RsigError>(())
//! ```

pub mod cli;
pub mod core;
pub mod error;
pub mod platform;
pub mod utils;

// Re-export main types
pub use crate::core::{Decipherer, Operation, OperationKind, PlayerSource};
pub use crate::error::RsigError;
pub use crate::platform::{ExtractionMode, ParserOptions, PlayerSourceParser, UnknownCallPolicy};

/// Result type alias for rsig operations
pub type Result<T> = std::result::Result<T, RsigError>;
