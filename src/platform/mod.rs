//! Player script analysis

pub mod classifier;
pub mod extractor;
pub mod locator;
pub mod parser;
pub mod sequencer;
pub mod splitter;
pub mod version;

pub use classifier::*;
pub use extractor::*;
pub use locator::*;
pub use parser::*;
pub use sequencer::*;
pub use splitter::*;
pub use version::*;
