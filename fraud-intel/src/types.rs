//! Merchant risk types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Merchant risk state
///
/// Variant order is the escalation order; the derived `Ord` makes
/// "states only move toward BLOCKED" checkable.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MerchantRiskState {
    /// Newly observed merchant, limited history
    New,
    /// Established merchant with clean history
    Trusted,
    /// Elevated refund rate; under observation
    Watchlist,
    /// Blocked for fraud risk (terminal; manual override only)
    Blocked,
}

impl MerchantRiskState {
    /// Wire name of the state
    pub fn as_str(&self) -> &'static str {
        match self {
            MerchantRiskState::New => "NEW",
            MerchantRiskState::Trusted => "TRUSTED",
            MerchantRiskState::Watchlist => "WATCHLIST",
            MerchantRiskState::Blocked => "BLOCKED",
        }
    }
}

/// Persisted merchant record (the `scores` column family schema)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MerchantRecord {
    /// Merchant VPA (primary key)
    pub merchant_vpa: String,

    /// Current risk state
    pub risk_state: MerchantRiskState,

    /// Update attempts observed (successful or not)
    pub total_attempts: u64,

    /// Successful payments observed
    pub total_txns: u64,

    /// Refunds observed
    pub total_refunds: u64,

    /// Fraud reports filed against the merchant
    pub fraud_reports: u32,

    /// Reputation score in [0, 1]
    pub reputation_score: f64,

    /// Operator-curated whitelist flag
    pub is_whitelisted: bool,

    /// First observation timestamp
    pub first_seen: DateTime<Utc>,

    /// Last mutation timestamp
    pub last_updated: DateTime<Utc>,
}

impl MerchantRecord {
    /// Fresh record for a merchant first seen `now`
    pub fn new(merchant_vpa: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            merchant_vpa: merchant_vpa.into(),
            risk_state: MerchantRiskState::New,
            total_attempts: 0,
            total_txns: 0,
            total_refunds: 0,
            fraud_reports: 0,
            reputation_score: 0.5,
            is_whitelisted: false,
            first_seen: now,
            last_updated: now,
        }
    }

    /// Refund rate over successful payments; 0 with no payments
    pub fn refund_rate(&self) -> f64 {
        if self.total_txns == 0 {
            0.0
        } else {
            self.total_refunds as f64 / self.total_txns as f64
        }
    }

    /// Read-only snapshot served to policy consumers
    pub fn to_context(&self) -> MerchantContext {
        MerchantContext {
            merchant_vpa: self.merchant_vpa.clone(),
            reputation_score: self.reputation_score,
            is_whitelisted: self.is_whitelisted,
            total_transactions: self.total_attempts,
            successful_transactions: self.total_txns,
            refund_rate: self.refund_rate(),
            fraud_reports: self.fraud_reports,
            risk_state: self.risk_state,
            first_seen: self.first_seen,
        }
    }
}

/// Per-payee snapshot consumed by the policy engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MerchantContext {
    /// Merchant VPA
    pub merchant_vpa: String,

    /// Reputation score in [0, 1]
    pub reputation_score: f64,

    /// Operator-curated whitelist flag
    pub is_whitelisted: bool,

    /// All observed transaction attempts
    pub total_transactions: u64,

    /// Successful transactions
    pub successful_transactions: u64,

    /// Refund rate in [0, 1]
    pub refund_rate: f64,

    /// Fraud reports filed
    pub fraud_reports: u32,

    /// Current risk state
    pub risk_state: MerchantRiskState,

    /// First observation timestamp
    pub first_seen: DateTime<Utc>,
}
