//! Utility functions for rsig

pub mod cache;
pub mod url;

pub use cache::*;
pub use url::*;
