//! PayGuard Execution Engine
//!
//! Executes approved payments against a settlement rail with exactly-once
//! semantics:
//!
//! - **Idempotency**: near-duplicate attempts collapse onto the first
//!   transaction observed in a 60-second bucket (24 h expiry)
//! - **State machine**: PENDING → APPROVED → EXECUTING → (COMPLETED | FAILED),
//!   PENDING → REJECTED; every other edge is refused
//! - **Audit trail**: EXECUTION_STARTED always precedes
//!   EXECUTION_COMPLETED / EXECUTION_FAILED for a transaction
//! - **Feedback**: settled outcomes flow into the merchant risk model;
//!   settlement is authoritative and feedback failures never roll it back

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod engine;
pub mod error;
pub mod idempotency;
pub mod metrics;
pub mod rail;
pub mod types;

pub use engine::{ExecutionConfig, ExecutionEngine, MerchantSpend, SpendingAnalysis};
pub use error::{Error, Result};
pub use rail::{RailError, SettlementRail, SimulatedRail};
pub use types::{
    ExecutionErrorCode, ExecutionResult, TransactionRecord, TransactionState,
};
