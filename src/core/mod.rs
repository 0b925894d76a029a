//! Core functionality for rsig

pub mod decipherer;
pub mod interpreter;
pub mod operation;
pub mod player_source;

pub use decipherer::*;
pub use interpreter::*;
pub use operation::*;
pub use player_source::*;
