//! Audit event contract

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Audit event type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum AuditEventType {
    /// Execution engine began settling a transaction
    ExecutionStarted,
    /// Settlement completed successfully
    ExecutionCompleted,
    /// Settlement failed or timed out
    ExecutionFailed,
    /// Policy engine produced a decision for an intent
    PolicyEvaluated,
    /// Merchant risk state transitioned
    RiskStateChanged,
    /// Merchant was flagged for brand impersonation
    ImpersonationFlagged,
}

impl AuditEventType {
    /// Wire name of the event type
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditEventType::ExecutionStarted => "EXECUTION_STARTED",
            AuditEventType::ExecutionCompleted => "EXECUTION_COMPLETED",
            AuditEventType::ExecutionFailed => "EXECUTION_FAILED",
            AuditEventType::PolicyEvaluated => "POLICY_EVALUATED",
            AuditEventType::RiskStateChanged => "RISK_STATE_CHANGED",
            AuditEventType::ImpersonationFlagged => "IMPERSONATION_FLAGGED",
        }
    }
}

/// Immutable audit record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Position in the ledger (monotonic, gap-free)
    pub sequence: u64,

    /// Event type
    pub event_type: AuditEventType,

    /// Opaque structured payload
    pub payload: serde_json::Value,

    /// Append timestamp
    pub timestamp: DateTime<Utc>,
}
