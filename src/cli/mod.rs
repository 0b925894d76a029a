//! Command line interface for rsig

pub mod args;
pub mod output;

pub use args::*;
pub use output::*;
