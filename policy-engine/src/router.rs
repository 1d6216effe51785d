//! Decision routing
//!
//! Translates a policy decision into the initial transaction record. The
//! approval hash binds the evaluated intent, the decision, and the paying
//! user together so the execution engine can detect mid-flight tampering.

use crate::types::{PaymentIntent, PolicyDecision, PolicyResult};
use execution_engine::{TransactionRecord, TransactionState};
use chrono::Utc;
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Routes policy results into fresh transaction records
#[derive(Debug, Clone, Default)]
pub struct DecisionRouter;

impl DecisionRouter {
    /// Create a router
    pub fn new() -> Self {
        Self
    }

    /// Build the initial record for an evaluated intent.
    ///
    /// APPROVE lands in APPROVED; everything else lands in REJECTED.
    pub fn route(
        &self,
        intent: &PaymentIntent,
        policy_result: &PolicyResult,
        user_id: &str,
    ) -> TransactionRecord {
        let state = match policy_result.decision {
            PolicyDecision::Approve => TransactionState::Approved,
            PolicyDecision::Deny | PolicyDecision::Verify => TransactionState::Rejected,
        };

        let record = TransactionRecord {
            transaction_id: Uuid::new_v4(),
            intent_id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            amount: intent.amount.unwrap_or(Decimal::ZERO),
            merchant_vpa: intent.merchant_vpa.clone().unwrap_or_default(),
            state,
            created_at: Utc::now(),
            approval_hash: Some(approval_hash(intent, policy_result.decision, user_id)),
            execution_hash: None,
            executed_at: None,
            error_message: None,
        };

        tracing::debug!(
            transaction_id = %record.transaction_id,
            state = record.state.as_str(),
            "Intent routed"
        );

        record
    }
}

/// Digest binding intent, decision, and user
pub fn approval_hash(intent: &PaymentIntent, decision: PolicyDecision, user_id: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(intent.canonical_bytes());
    hasher.update(decision.as_str().as_bytes());
    hasher.update(user_id.as_bytes());
    hex::encode(hasher.finalize())
}
