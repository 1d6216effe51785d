//! Merchant risk state machine
//!
//! A total, deterministic, side-effect-free transition function. The clock
//! is a parameter so callers (and tests) control time.

use crate::types::MerchantRiskState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Thresholds governing risk transitions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskThresholds {
    /// Successful payments required before TRUSTED
    pub min_trusted_txns: u64,

    /// Days of history required before TRUSTED
    pub min_trusted_days: i64,

    /// Refund rate must stay below this to earn TRUSTED
    pub promote_max_refund_rate: f64,

    /// Refund rate above this demotes TRUSTED to WATCHLIST
    pub demote_refund_rate: f64,

    /// Refund rate above this escalates WATCHLIST to BLOCKED
    pub block_refund_rate: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            min_trusted_txns: 5,
            min_trusted_days: 7,
            promote_max_refund_rate: 0.05,
            demote_refund_rate: 0.20,
            block_refund_rate: 0.50,
        }
    }
}

/// Compute the next risk state from behavioral evidence.
///
/// Clauses are evaluated top-down; the first match wins:
///
/// 1. impersonation ⇒ BLOCKED, from any state
/// 2. BLOCKED is terminal (manual override happens outside this function)
/// 3. NEW promotes to TRUSTED on enough clean history
/// 4. TRUSTED demotes to WATCHLIST on a refund spike
/// 5. WATCHLIST escalates to BLOCKED on a sustained spike; recovery from
///    WATCHLIST is never automatic
pub fn next_state(
    total_txns: u64,
    total_refunds: u64,
    first_seen: DateTime<Utc>,
    current_state: MerchantRiskState,
    is_impersonating: bool,
    now: DateTime<Utc>,
    thresholds: &RiskThresholds,
) -> MerchantRiskState {
    if is_impersonating {
        return MerchantRiskState::Blocked;
    }

    if current_state == MerchantRiskState::Blocked {
        return MerchantRiskState::Blocked;
    }

    let refund_rate = if total_txns == 0 {
        0.0
    } else {
        total_refunds as f64 / total_txns as f64
    };
    let days_active = (now - first_seen).num_days();

    match current_state {
        MerchantRiskState::New => {
            if total_txns >= thresholds.min_trusted_txns
                && days_active >= thresholds.min_trusted_days
                && refund_rate < thresholds.promote_max_refund_rate
            {
                MerchantRiskState::Trusted
            } else {
                MerchantRiskState::New
            }
        }
        MerchantRiskState::Trusted => {
            if refund_rate > thresholds.demote_refund_rate {
                MerchantRiskState::Watchlist
            } else {
                MerchantRiskState::Trusted
            }
        }
        MerchantRiskState::Watchlist => {
            if refund_rate > thresholds.block_refund_rate {
                MerchantRiskState::Blocked
            } else {
                MerchantRiskState::Watchlist
            }
        }
        MerchantRiskState::Blocked => MerchantRiskState::Blocked,
    }
}
