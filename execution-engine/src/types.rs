//! Transaction record and execution result contracts

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Transaction lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionState {
    /// Created, not yet routed
    Pending,
    /// Policy approved, awaiting execution
    Approved,
    /// Settlement in flight
    Executing,
    /// Settled (terminal)
    Completed,
    /// Settlement failed (terminal)
    Failed,
    /// Policy rejected (terminal)
    Rejected,
}

impl TransactionState {
    /// Wire name of the state
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionState::Pending => "PENDING",
            TransactionState::Approved => "APPROVED",
            TransactionState::Executing => "EXECUTING",
            TransactionState::Completed => "COMPLETED",
            TransactionState::Failed => "FAILED",
            TransactionState::Rejected => "REJECTED",
        }
    }

    /// True for states with no outgoing edges
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TransactionState::Completed | TransactionState::Failed | TransactionState::Rejected
        )
    }

    /// Legal edges of the state graph
    pub fn can_transition_to(&self, next: TransactionState) -> bool {
        matches!(
            (self, next),
            (TransactionState::Pending, TransactionState::Approved)
                | (TransactionState::Pending, TransactionState::Rejected)
                | (TransactionState::Approved, TransactionState::Executing)
                | (TransactionState::Executing, TransactionState::Completed)
                | (TransactionState::Executing, TransactionState::Failed)
        )
    }
}

/// The execution unit: one routed payment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Unique transaction id
    pub transaction_id: Uuid,

    /// Intent this transaction was routed from
    pub intent_id: Uuid,

    /// Paying user
    pub user_id: String,

    /// Payment amount
    pub amount: Decimal,

    /// Payee VPA
    pub merchant_vpa: String,

    /// Lifecycle state
    pub state: TransactionState,

    /// Routing timestamp
    pub created_at: DateTime<Utc>,

    /// Digest binding the approved intent to this execution attempt
    pub approval_hash: Option<String>,

    /// Digest of the settled execution (populated on success)
    pub execution_hash: Option<String>,

    /// Settlement timestamp (populated on success)
    pub executed_at: Option<DateTime<Utc>>,

    /// Failure detail (populated on failure)
    pub error_message: Option<String>,
}

impl TransactionRecord {
    /// Move to `next`, refusing edges outside the legal graph
    pub fn transition_to(&mut self, next: TransactionState) -> Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(Error::IllegalTransition {
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        Ok(())
    }
}

/// Execution failure codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionErrorCode {
    /// Record was not in APPROVED state
    InvalidState,
    /// Idempotency key already settled in its window
    Duplicate,
    /// Approval hash absent or malformed
    HashMismatch,
    /// Settlement rail failure
    NetworkError,
    /// Deadline expired
    Timeout,
}

impl ExecutionErrorCode {
    /// Wire name of the code
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionErrorCode::InvalidState => "INVALID_STATE",
            ExecutionErrorCode::Duplicate => "DUPLICATE",
            ExecutionErrorCode::HashMismatch => "HASH_MISMATCH",
            ExecutionErrorCode::NetworkError => "NETWORK_ERROR",
            ExecutionErrorCode::Timeout => "TIMEOUT",
        }
    }
}

/// Outcome of one execution attempt; never thrown, always returned
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// True iff the payment settled
    pub success: bool,

    /// Transaction the attempt was for
    pub transaction_id: Uuid,

    /// State the record ended in
    pub state: TransactionState,

    /// Human-readable outcome
    pub message: String,

    /// Settlement reference number (success only)
    pub reference_number: Option<String>,

    /// Settlement timestamp (success only)
    pub executed_at: Option<DateTime<Utc>>,

    /// Execution digest (success only)
    pub execution_hash: Option<String>,

    /// Failure code (failure only)
    pub error_code: Option<ExecutionErrorCode>,

    /// Failure detail (failure only)
    pub error_message: Option<String>,
}

impl ExecutionResult {
    /// Build a failure result
    pub fn failure(
        record: &TransactionRecord,
        code: ExecutionErrorCode,
        message: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            transaction_id: record.transaction_id,
            state: record.state,
            message: message.into(),
            reference_number: None,
            executed_at: None,
            execution_hash: None,
            error_code: Some(code),
            error_message: Some(detail.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_in(state: TransactionState) -> TransactionRecord {
        TransactionRecord {
            transaction_id: Uuid::new_v4(),
            intent_id: Uuid::new_v4(),
            user_id: "user_1".to_string(),
            amount: Decimal::from(100),
            merchant_vpa: "shop@upi".to_string(),
            state,
            created_at: Utc::now(),
            approval_hash: None,
            execution_hash: None,
            executed_at: None,
            error_message: None,
        }
    }

    #[test]
    fn test_legal_path_to_completed() {
        let mut record = record_in(TransactionState::Pending);
        record.transition_to(TransactionState::Approved).unwrap();
        record.transition_to(TransactionState::Executing).unwrap();
        record.transition_to(TransactionState::Completed).unwrap();
        assert!(record.state.is_terminal());
    }

    #[test]
    fn test_legal_path_to_rejected() {
        let mut record = record_in(TransactionState::Pending);
        record.transition_to(TransactionState::Rejected).unwrap();
        assert!(record.state.is_terminal());
    }

    #[test]
    fn test_illegal_transitions_refused() {
        let cases = [
            (TransactionState::Pending, TransactionState::Executing),
            (TransactionState::Pending, TransactionState::Completed),
            (TransactionState::Approved, TransactionState::Completed),
            (TransactionState::Completed, TransactionState::Executing),
            (TransactionState::Rejected, TransactionState::Approved),
            (TransactionState::Failed, TransactionState::Executing),
        ];

        for (from, to) in cases {
            let mut record = record_in(from);
            let err = record.transition_to(to).unwrap_err();
            assert!(matches!(err, Error::IllegalTransition { .. }));
            assert_eq!(record.state, from, "state mutated on refused edge");
        }
    }
}
