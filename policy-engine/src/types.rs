//! Shared contracts: intent, payer context, violation, decision
//!
//! All cross-component communication uses these value types; no component
//! hands out mutable references to its internals.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// What the upstream interpreter believes the user asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntentType {
    /// Pay a merchant
    Payment,
    /// Ask for the wallet balance
    BalanceInquiry,
    /// Ask for recent transactions
    TransactionHistory,
    /// Interpreter could not classify the utterance
    Unknown,
}

/// Structured payment request from the interpreter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// Intent classification
    pub intent_type: IntentType,

    /// Requested amount, if the interpreter extracted one
    pub amount: Option<Decimal>,

    /// Currency code
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Payee VPA, if the interpreter extracted one
    pub merchant_vpa: Option<String>,

    /// Interpreter confidence in [0, 1]
    pub confidence_score: f64,

    /// Raw utterance, carried for audit
    pub original_text: String,
}

fn default_currency() -> String {
    "INR".to_string()
}

impl PaymentIntent {
    /// Payment intent with the given amount and payee
    pub fn payment(amount: Decimal, merchant_vpa: impl Into<String>) -> Self {
        Self {
            intent_type: IntentType::Payment,
            amount: Some(amount),
            currency: default_currency(),
            merchant_vpa: Some(merchant_vpa.into()),
            confidence_score: 1.0,
            original_text: String::new(),
        }
    }

    /// Non-payment intent of the given type
    pub fn query(intent_type: IntentType) -> Self {
        Self {
            intent_type,
            amount: None,
            currency: default_currency(),
            merchant_vpa: None,
            confidence_score: 1.0,
            original_text: String::new(),
        }
    }

    /// Deterministic bytes for hashing
    pub fn canonical_bytes(&self) -> Vec<u8> {
        bincode::serialize(self).expect("serialization cannot fail")
    }
}

/// Per-payer snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserContext {
    /// Paying user
    pub user_id: String,

    /// Current wallet balance
    pub wallet_balance: Decimal,

    /// Amount already spent today
    pub daily_spend_today: Decimal,

    /// Transactions completed today
    pub transactions_today: u32,

    /// Transactions in the trailing five minutes
    pub transactions_last_5min: u32,

    /// Device fingerprint of the session
    pub device_fingerprint: String,

    /// True if the device has been seen before
    pub is_known_device: bool,

    /// Age of the current session
    pub session_age_seconds: u64,

    /// Age of the account
    pub account_age_days: u32,

    /// Behavioral trust score in [0, 1]
    pub trust_score: f64,

    /// Payees the user has transacted with before
    pub known_contacts: HashSet<String>,

    /// Timestamp of the most recent transaction
    pub last_transaction_time: Option<DateTime<Utc>>,
}

/// Violation severity, ordered; the maximum observed severity drives the
/// decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational friction
    Low,
    /// Step-up worthy
    Medium,
    /// Step-up required
    High,
    /// Deny outright
    Critical,
}

impl Severity {
    /// Contribution to the composed risk score
    pub fn weight(&self) -> f64 {
        match self {
            Severity::Low => 0.05,
            Severity::Medium => 0.15,
            Severity::High => 0.35,
            Severity::Critical => 1.0,
        }
    }

    /// Wire name of the severity
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

/// Rule category; doubles as the evaluation phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleCategory {
    /// Non-negotiable invariants (balance, daily limit)
    HardInvariant,
    /// Rate-of-activity checks
    Velocity,
    /// Payer and payee behavior patterns
    Behavioral,
    /// Dynamic trust profile checks
    Trust,
}

impl RuleCategory {
    /// Evaluation order of the categories
    pub const EVALUATION_ORDER: [RuleCategory; 4] = [
        RuleCategory::HardInvariant,
        RuleCategory::Velocity,
        RuleCategory::Behavioral,
        RuleCategory::Trust,
    ];
}

/// Emitted by a failing rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleViolation {
    /// Rule that fired
    pub rule_name: String,

    /// Category of the rule
    pub category: RuleCategory,

    /// Severity of the violation
    pub severity: Severity,

    /// Human-readable explanation
    pub message: String,

    /// Free-form detail bag
    pub details: serde_json::Value,
}

/// Final decision for an intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PolicyDecision {
    /// Proceed to execution
    Approve,
    /// Refuse
    Deny,
    /// Require step-up verification
    Verify,
}

impl PolicyDecision {
    /// Wire name of the decision
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyDecision::Approve => "APPROVE",
            PolicyDecision::Deny => "DENY",
            PolicyDecision::Verify => "VERIFY",
        }
    }
}

/// Composed outcome of one policy evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyResult {
    /// Final decision
    pub decision: PolicyDecision,

    /// Accumulated risk score in [0, 1]; telemetry, not a gate
    pub risk_score: f64,

    /// Violations in evaluation order
    pub violations: Vec<RuleViolation>,

    /// Names of rules that passed
    pub passed_rules: Vec<String>,

    /// One-line human summary
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering_and_weights() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
        assert_eq!(Severity::Critical.weight(), 1.0);
    }

    #[test]
    fn test_intent_default_currency() {
        let intent = PaymentIntent::payment(Decimal::from(100), "shop@upi");
        assert_eq!(intent.currency, "INR");
    }

    #[test]
    fn test_canonical_bytes_deterministic() {
        let intent = PaymentIntent::payment(Decimal::from(100), "shop@upi");
        assert_eq!(intent.canonical_bytes(), intent.clone().canonical_bytes());
    }
}
