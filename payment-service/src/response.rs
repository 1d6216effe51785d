//! Ingress response contract

use execution_engine::{ExecutionResult, TransactionRecord};
use policy_engine::{PaymentIntent, PolicyDecision, RuleViolation};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Terminal status of one `process` call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    /// Handled without execution (queries, VERIFY decisions)
    Processed,
    /// Payment settled
    Executed,
    /// Payment reached execution and failed
    Failed,
    /// Policy denied the payment
    Denied,
    /// Dependency failure or unintelligible intent; fail closed
    Error,
}

/// Risk telemetry carried back to the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskInfo {
    /// Composed risk score in [0, 1]
    pub score: f64,

    /// Violations in evaluation order
    pub violations: Vec<RuleViolation>,

    /// Rules that passed
    pub passed_rules: Vec<String>,

    /// One-line summary
    pub reason: String,
}

/// Payer snapshot returned with every successful response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserState {
    /// Wallet balance after any execution
    pub balance: Decimal,

    /// Spend so far today
    pub daily_spend: Decimal,

    /// Configured daily ceiling
    pub daily_limit: Decimal,

    /// Behavioral trust score
    pub trust_score: f64,

    /// Up to three most recent transactions
    pub recent_transactions: Vec<TransactionRecord>,
}

/// Result of one ingress call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// Terminal status
    pub status: ResponseStatus,

    /// Human-readable outcome
    pub message: String,

    /// The intent as evaluated
    pub intent: PaymentIntent,

    /// Policy decision, absent when evaluation never ran
    pub policy_decision: Option<PolicyDecision>,

    /// Execution outcome, present when execution was attempted
    pub execution_result: Option<ExecutionResult>,

    /// Risk telemetry, absent when evaluation never ran
    pub risk_info: Option<RiskInfo>,

    /// Payer snapshot, absent on fail-closed errors
    pub user_state: Option<UserState>,
}
