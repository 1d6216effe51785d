//! Policy thresholds

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Thresholds feeding the rule set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyThresholds {
    /// Daily spend ceiling per user
    pub daily_limit: Decimal,

    /// Transactions in the velocity window that trip the burst rule
    pub velocity_max: u32,

    /// Velocity window length
    pub velocity_window_seconds: u64,

    /// Per-payment cap on unrecognized devices
    pub new_device_cap: Decimal,

    /// Merchant reputation floor
    pub min_merchant_reputation: f64,

    /// Fraud report count that flags a merchant
    pub fraud_report_threshold: u32,

    /// Amount above which a new payee needs friction
    pub new_payee_high_value: Decimal,

    /// Trust score floor for the payer
    pub trust_score_floor: f64,
}

impl Default for PolicyThresholds {
    fn default() -> Self {
        Self {
            daily_limit: Decimal::from(2_000),
            velocity_max: 10,
            velocity_window_seconds: 300,
            new_device_cap: Decimal::from(200),
            min_merchant_reputation: 0.3,
            fraud_report_threshold: 5,
            new_payee_high_value: Decimal::from(500),
            trust_score_floor: 0.4,
        }
    }
}
