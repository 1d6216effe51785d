//! PayGuard Audit Ledger
//!
//! Append-only, event-typed audit trail for the authorization core.
//!
//! Every security-relevant action (policy evaluation, execution lifecycle,
//! merchant risk reclassification) lands here as an immutable [`AuditEvent`]
//! with a monotonic sequence number. The ledger has no mutation or deletion
//! API; downstream consumers scan snapshots.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod ledger;
pub mod types;

pub use ledger::AuditLedger;
pub use types::{AuditEvent, AuditEventType};
