//! Brand impersonation screening for payee addresses
//!
//! Detects VPAs that try to look like a known brand without being on that
//! brand's allowlist: `amaz0n@upi`, `аmazon@psp`, `amazon-support@upi`.
//!
//! Detection never fails: a missing or malformed registry file degrades
//! to an empty registry and the screen becomes a no-op.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod registry;
pub mod screen;

pub use registry::{BrandEntry, BrandRegistry};
pub use screen::{normalize_candidate, BrandMatch, BrandScreen};
