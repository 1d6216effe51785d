//! PayGuard Payment Service
//!
//! The ingress of the authorization core: wires the brand screen, fraud
//! intelligence, policy engine, decision router, execution engine, and
//! audit ledger together (constructed once, passed explicitly, no process
//! globals) and exposes [`PaymentService::process`].
//!
//! The service fails closed: a missing payer snapshot or an unreachable
//! dependency yields `status: error` with no approval, never a default
//! context.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod config;
pub mod directory;
pub mod error;
pub mod response;
pub mod service;

pub use config::Config;
pub use directory::UserDirectory;
pub use error::{Error, Result};
pub use response::{Response, ResponseStatus, RiskInfo, UserState};
pub use service::PaymentService;
