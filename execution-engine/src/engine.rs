//! Execution pipeline
//!
//! `execute` runs the checks in a fixed order (state precondition,
//! idempotency, approval hash), then drives the record through
//! EXECUTING to a terminal state. A record that reached EXECUTING is never
//! left stranded: deadline expiry and rail failures both land on FAILED
//! with an EXECUTION_FAILED audit event.

use crate::{
    idempotency::{idempotency_key, IdempotencyMap},
    metrics::Metrics,
    rail::SettlementRail,
    types::{ExecutionErrorCode, ExecutionResult, TransactionRecord, TransactionState},
};
use audit_ledger::{AuditEventType, AuditLedger};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use fraud_intel::MerchantRecorder;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Execution engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Probability of a simulated settlement failure
    pub failure_rate: f64,

    /// Idempotency window expiry
    pub idempotency_ttl_seconds: i64,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            failure_rate: 0.05,
            idempotency_ttl_seconds: 86_400,
        }
    }
}

/// Executes approved payments exactly once per idempotency window
pub struct ExecutionEngine {
    rail: Arc<dyn SettlementRail>,
    recorder: Arc<dyn MerchantRecorder>,
    ledger: Arc<AuditLedger>,
    idempotency: IdempotencyMap,
    transactions: DashMap<Uuid, TransactionRecord>,
    metrics: Metrics,
}

impl ExecutionEngine {
    /// Create an engine over a rail, merchant feedback sink, and audit ledger
    pub fn new(
        config: &ExecutionConfig,
        rail: Arc<dyn SettlementRail>,
        recorder: Arc<dyn MerchantRecorder>,
        ledger: Arc<AuditLedger>,
    ) -> prometheus::Result<Self> {
        Ok(Self {
            rail,
            recorder,
            ledger,
            idempotency: IdempotencyMap::new(config.idempotency_ttl_seconds),
            transactions: DashMap::new(),
            metrics: Metrics::new()?,
        })
    }

    /// Execute one approved payment.
    ///
    /// Never panics or errors out; every outcome is an [`ExecutionResult`].
    /// `deadline` expiry before the EXECUTING transition returns `TIMEOUT`
    /// with no side effects; expiry after it drives the record to FAILED.
    pub async fn execute(
        &self,
        mut record: TransactionRecord,
        deadline: Option<DateTime<Utc>>,
    ) -> ExecutionResult {
        // 1. Precondition: only APPROVED records execute
        if record.state != TransactionState::Approved {
            return ExecutionResult::failure(
                &record,
                ExecutionErrorCode::InvalidState,
                format!("Cannot execute transaction in state {}", record.state.as_str()),
                format!("Expected APPROVED, got {}", record.state.as_str()),
            );
        }

        // 2. Idempotency: collapse near-duplicates onto the first attempt
        let key = idempotency_key(
            &record.user_id,
            &record.merchant_vpa,
            record.amount,
            record.created_at,
        );
        if let Some(existing) = self.idempotency.check(&key, Utc::now()) {
            tracing::warn!(
                transaction_id = %record.transaction_id,
                original = %existing.transaction_id,
                "Duplicate transaction detected"
            );
            self.metrics.duplicates_total.inc();
            return ExecutionResult::failure(
                &record,
                ExecutionErrorCode::Duplicate,
                "Duplicate transaction - already processed",
                format!("Original transaction: {}", existing.transaction_id),
            );
        }

        // 3. Approval hash must be present and well-formed
        if !has_valid_approval_hash(&record) {
            return ExecutionResult::failure(
                &record,
                ExecutionErrorCode::HashMismatch,
                "Hash verification failed - potential tampering",
                "Approval hash absent or malformed",
            );
        }

        // Deadline gate: before EXECUTING nothing has happened yet
        if let Some(deadline) = deadline {
            if Utc::now() >= deadline {
                return ExecutionResult::failure(
                    &record,
                    ExecutionErrorCode::Timeout,
                    "Execution deadline expired",
                    "Deadline expired before execution started",
                );
            }
        }

        // 4. APPROVED -> EXECUTING
        if let Err(e) = record.transition_to(TransactionState::Executing) {
            return ExecutionResult::failure(
                &record,
                ExecutionErrorCode::InvalidState,
                "Transition refused",
                e.to_string(),
            );
        }
        self.transactions.insert(record.transaction_id, record.clone());
        self.metrics.attempts_total.inc();
        self.ledger.log_event(
            AuditEventType::ExecutionStarted,
            json!({
                "transaction_id": record.transaction_id,
                "amount": record.amount,
                "merchant": record.merchant_vpa,
            }),
        );

        // 5. Settle, bounded by whatever deadline budget remains
        let settled = match deadline {
            Some(deadline) => {
                let budget = (deadline - Utc::now()).to_std().unwrap_or_default();
                match tokio::time::timeout(budget, self.rail.settle(&record)).await {
                    Ok(outcome) => outcome.map_err(|e| (ExecutionErrorCode::NetworkError, e.to_string())),
                    Err(_) => Err((
                        ExecutionErrorCode::Timeout,
                        "execution deadline exceeded".to_string(),
                    )),
                }
            }
            None => self
                .rail
                .settle(&record)
                .await
                .map_err(|e| (ExecutionErrorCode::NetworkError, e.to_string())),
        };

        if let Err((code, detail)) = settled {
            return self.fail_execution(record, code, detail);
        }

        // 6. EXECUTING -> COMPLETED
        let executed_at = Utc::now();
        if let Err(e) = record.transition_to(TransactionState::Completed) {
            return self.fail_execution(
                record,
                ExecutionErrorCode::InvalidState,
                e.to_string(),
            );
        }
        record.executed_at = Some(executed_at);
        record.execution_hash = Some(execution_hash(
            record.transaction_id,
            executed_at,
            record.amount,
        ));

        self.idempotency.store(key, record.transaction_id, executed_at);
        self.transactions.insert(record.transaction_id, record.clone());
        self.metrics.completed_total.inc();

        let reference_number = format!(
            "UPI{}",
            &Uuid::new_v4().simple().to_string()[..12].to_uppercase()
        );
        self.ledger.log_event(
            AuditEventType::ExecutionCompleted,
            json!({
                "transaction_id": record.transaction_id,
                "reference_number": reference_number,
                "execution_hash": record.execution_hash,
                "timestamp": executed_at,
            }),
        );

        tracing::info!(
            transaction_id = %record.transaction_id,
            amount = %record.amount,
            merchant = %record.merchant_vpa,
            reference = %reference_number,
            "Payment executed"
        );

        // 7. Feedback into the merchant risk model. Settlement is
        // authoritative: a feedback failure is logged, never rolled back.
        if let Err(e) = self
            .recorder
            .record_transaction(&record.merchant_vpa, true, false)
        {
            tracing::error!(
                merchant = %record.merchant_vpa,
                error = %e,
                "Failed to record transaction in fraud intelligence"
            );
        }

        ExecutionResult {
            success: true,
            transaction_id: record.transaction_id,
            state: record.state,
            message: format!(
                "Payment of ₹{:.2} to {} successful",
                record.amount, record.merchant_vpa
            ),
            reference_number: Some(reference_number),
            executed_at: Some(executed_at),
            execution_hash: record.execution_hash.clone(),
            error_code: None,
            error_message: None,
        }
    }

    // Drive an EXECUTING record to FAILED and emit the failure event
    fn fail_execution(
        &self,
        mut record: TransactionRecord,
        code: ExecutionErrorCode,
        detail: String,
    ) -> ExecutionResult {
        if let Err(e) = record.transition_to(TransactionState::Failed) {
            tracing::error!(
                transaction_id = %record.transaction_id,
                error = %e,
                "Failed to mark transaction FAILED"
            );
        }
        record.error_message = Some(detail.clone());
        self.transactions.insert(record.transaction_id, record.clone());
        self.metrics.failed_total.inc();

        self.ledger.log_event(
            AuditEventType::ExecutionFailed,
            json!({
                "transaction_id": record.transaction_id,
                "reason": detail,
            }),
        );

        ExecutionResult::failure(&record, code, "Payment failed - please try again", detail)
    }

    /// Look up a transaction by id
    pub fn get_transaction(&self, transaction_id: Uuid) -> Option<TransactionRecord> {
        self.transactions.get(&transaction_id).map(|r| r.clone())
    }

    /// Transactions for a user, newest first, optionally date-bounded
    pub fn get_transaction_history(
        &self,
        user_id: &str,
        limit: usize,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Vec<TransactionRecord> {
        let mut records: Vec<TransactionRecord> = self
            .transactions
            .iter()
            .filter(|r| r.user_id == user_id)
            .filter(|r| start.map_or(true, |s| r.created_at >= s))
            .filter(|r| end.map_or(true, |e| r.created_at <= e))
            .map(|r| r.clone())
            .collect();

        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records.truncate(limit);
        records
    }

    /// Spending totals and per-merchant breakdown for a user
    pub fn get_spending_analysis(
        &self,
        user_id: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> SpendingAnalysis {
        let spending: Vec<TransactionRecord> = self
            .get_transaction_history(user_id, usize::MAX, start, end)
            .into_iter()
            .filter(|r| {
                matches!(
                    r.state,
                    TransactionState::Completed | TransactionState::Executing
                )
            })
            .collect();

        let total_spend: Decimal = spending.iter().map(|r| r.amount).sum();

        let mut by_merchant: HashMap<String, Decimal> = HashMap::new();
        for record in &spending {
            *by_merchant.entry(record.merchant_vpa.clone()).or_default() += record.amount;
        }

        let mut breakdown: Vec<MerchantSpend> = by_merchant
            .into_iter()
            .map(|(merchant_vpa, amount)| MerchantSpend { merchant_vpa, amount })
            .collect();
        breakdown.sort_by(|a, b| b.amount.cmp(&a.amount));

        SpendingAnalysis {
            total_spend,
            transaction_count: spending.len(),
            breakdown,
        }
    }

    /// Metrics collector for scraping
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}

/// Per-merchant spend line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MerchantSpend {
    /// Payee
    pub merchant_vpa: String,

    /// Total spent with the payee in the window
    pub amount: Decimal,
}

/// Spending summary for a user and window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpendingAnalysis {
    /// Sum over settled and in-flight payments
    pub total_spend: Decimal,

    /// Number of payments counted
    pub transaction_count: usize,

    /// Per-merchant totals, largest first
    pub breakdown: Vec<MerchantSpend>,
}

fn has_valid_approval_hash(record: &TransactionRecord) -> bool {
    match &record.approval_hash {
        Some(hash) => hash.len() == 64 && hash.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

fn execution_hash(transaction_id: Uuid, executed_at: DateTime<Utc>, amount: Decimal) -> String {
    let mut hasher = Sha256::new();
    hasher.update(transaction_id.as_bytes());
    hasher.update(executed_at.to_rfc3339().as_bytes());
    hasher.update(amount.to_string().as_bytes());
    hex::encode(hasher.finalize())
}
