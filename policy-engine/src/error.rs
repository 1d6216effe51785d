//! Error types for the policy engine

use thiserror::Error;

/// Result type for policy operations
pub type Result<T> = std::result::Result<T, Error>;

/// Policy engine errors
///
/// A rule returning `Err` never aborts evaluation; the engine folds it
/// into a high-severity violation and keeps going.
#[derive(Error, Debug)]
pub enum Error {
    /// Rule failed to evaluate
    #[error("Rule evaluation failed: {0}")]
    Rule(String),
}
