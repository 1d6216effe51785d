//! PayGuard Policy Engine
//!
//! Runs categorized rules over a payment intent plus payer and payee
//! context, and composes their outcomes into a single decision:
//! APPROVE, DENY, or VERIFY (step-up).
//!
//! Categories evaluate in a fixed order (hard invariants, velocity,
//! behavioral, trust) and every rule always runs, so callers see the
//! complete violation picture. The decision itself is a pure function of
//! the maximum observed severity; the accumulated risk score is telemetry,
//! not a gate.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod config;
pub mod engine;
pub mod error;
pub mod router;
pub mod rules;
pub mod types;

pub use config::PolicyThresholds;
pub use engine::PolicyEngine;
pub use error::{Error, Result};
pub use router::DecisionRouter;
pub use rules::{standard_rules, Rule};
pub use types::{
    IntentType, PaymentIntent, PolicyDecision, PolicyResult, RuleCategory, RuleViolation,
    Severity, UserContext,
};
