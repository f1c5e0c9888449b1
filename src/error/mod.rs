//! Error handling for nodescout
//!
//! Error types, result aliases, and error context utilities.

pub mod context;
#[cfg(test)]
mod tests;
pub mod types;

pub use context::{OptionExt, ResultExt, handle_error, try_with_recovery};
pub use types::{ErrorSeverity, Result, ScoutError};
