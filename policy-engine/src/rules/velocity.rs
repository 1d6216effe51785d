//! Velocity rules
//!
//! Advisory under adversarial concurrency: two near-simultaneous payments
//! may see the same snapshot. The idempotency window and the hard balance
//! check are the backstops.

use crate::error::Result;
use crate::rules::Rule;
use crate::types::{IntentType, PaymentIntent, RuleCategory, RuleViolation, Severity, UserContext};
use fraud_intel::MerchantContext;
use serde_json::json;

/// Too many transactions inside the sliding window
pub struct VelocityBurstRule {
    velocity_max: u32,
    window_seconds: u64,
}

impl VelocityBurstRule {
    /// Rule tripping at `velocity_max` transactions per window
    pub fn new(velocity_max: u32, window_seconds: u64) -> Self {
        Self {
            velocity_max,
            window_seconds,
        }
    }
}

impl Rule for VelocityBurstRule {
    fn name(&self) -> &'static str {
        "velocity_burst"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Velocity
    }

    fn description(&self) -> &'static str {
        "Limit transaction bursts inside the sliding window"
    }

    fn severity(&self) -> Severity {
        Severity::High
    }

    fn evaluate(
        &self,
        intent: &PaymentIntent,
        user_ctx: Option<&UserContext>,
        _merchant_ctx: Option<&MerchantContext>,
    ) -> Result<Option<RuleViolation>> {
        if intent.intent_type != IntentType::Payment {
            return Ok(None);
        }
        let Some(user) = user_ctx else {
            return Ok(None);
        };

        if user.transactions_last_5min >= self.velocity_max {
            return Ok(Some(self.violation(
                format!(
                    "Velocity burst: {} transactions in the last {} seconds (max {})",
                    user.transactions_last_5min, self.window_seconds, self.velocity_max
                ),
                json!({
                    "transactions_in_window": user.transactions_last_5min,
                    "window_seconds": self.window_seconds,
                    "velocity_max": self.velocity_max,
                }),
            )));
        }

        Ok(None)
    }
}
