//! Error types for the execution engine

use crate::types::TransactionState;
use thiserror::Error;

/// Result type for execution operations
pub type Result<T> = std::result::Result<T, Error>;

/// Execution engine errors
#[derive(Error, Debug)]
pub enum Error {
    /// Transition not in the legal state graph
    #[error("Illegal transition: {from:?} -> {to:?}")]
    IllegalTransition {
        /// State the record was in
        from: TransactionState,
        /// State the caller asked for
        to: TransactionState,
    },
}
