//! Fraud intelligence for merchant risk
//!
//! Tracks behavioral evidence per merchant (payment and refund counters,
//! impersonation flags) and continuously reclassifies merchants through a
//! pure state machine: NEW → TRUSTED → WATCHLIST → BLOCKED, with BLOCKED
//! terminal.
//!
//! The [`MerchantStore`] is the single writer for merchant records. Policy
//! consumers read through [`MerchantReader`]; the execution engine feeds
//! evidence back through [`MerchantRecorder`]. Neither sees the full store.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod error;
pub mod state_machine;
pub mod store;
pub mod types;

pub use error::{Error, Result};
pub use state_machine::{next_state, RiskThresholds};
pub use store::{MerchantReader, MerchantRecorder, MerchantStore, StoreConfig};
pub use types::{MerchantContext, MerchantRecord, MerchantRiskState};
