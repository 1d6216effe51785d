//! Hard invariant rules
//!
//! Violations here are critical: the engine denies regardless of what the
//! remaining categories find.

use crate::error::Result;
use crate::rules::Rule;
use crate::types::{IntentType, PaymentIntent, RuleCategory, RuleViolation, Severity, UserContext};
use fraud_intel::MerchantContext;
use rust_decimal::Decimal;
use serde_json::json;

/// The wallet must cover the requested amount
pub struct BalanceSufficientRule;

impl Rule for BalanceSufficientRule {
    fn name(&self) -> &'static str {
        "balance_sufficient"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::HardInvariant
    }

    fn description(&self) -> &'static str {
        "Wallet balance must cover the payment amount"
    }

    fn severity(&self) -> Severity {
        Severity::Critical
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
        let (Some(amount), Some(user)) = (intent.amount, user_ctx) else {
            return Ok(None);
        };

        if amount > user.wallet_balance {
            return Ok(Some(self.violation(
                format!(
                    "Insufficient balance: ₹{:.2} requested, ₹{:.2} available",
                    amount, user.wallet_balance
                ),
                json!({
                    "requested_amount": amount,
                    "wallet_balance": user.wallet_balance,
                }),
            )));
        }

        Ok(None)
    }
}

/// Daily spend plus the new payment must stay under the daily limit
pub struct DailyLimitRule {
    daily_limit: Decimal,
}

impl DailyLimitRule {
    /// Rule with the given daily ceiling
    pub fn new(daily_limit: Decimal) -> Self {
        Self { daily_limit }
    }
}

impl Rule for DailyLimitRule {
    fn name(&self) -> &'static str {
        "daily_limit"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::HardInvariant
    }

    fn description(&self) -> &'static str {
        "Daily spend must stay within the configured ceiling"
    }

    fn severity(&self) -> Severity {
        Severity::Critical
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
        let (Some(amount), Some(user)) = (intent.amount, user_ctx) else {
            return Ok(None);
        };

        let projected = user.daily_spend_today + amount;
        if projected > self.daily_limit {
            return Ok(Some(self.violation(
                format!(
                    "Daily limit exceeded: ₹{:.2} spent today, ₹{:.2} requested, limit ₹{:.2}",
                    user.daily_spend_today, amount, self.daily_limit
                ),
                json!({
                    "daily_spend_today": user.daily_spend_today,
                    "requested_amount": amount,
                    "daily_limit": self.daily_limit,
                }),
            )));
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::tests::{payment, user_with};

    #[test]
    fn test_balance_sufficient_passes() {
        let rule = BalanceSufficientRule;
        let user = user_with(|u| u.wallet_balance = Decimal::from(1_000));
        let outcome = rule.evaluate(&payment(500), Some(&user), None).unwrap();
        assert!(outcome.is_none());
    }

    #[test]
    fn test_balance_insufficient_fails() {
        let rule = BalanceSufficientRule;
        let user = user_with(|u| u.wallet_balance = Decimal::from(100));
        let violation = rule.evaluate(&payment(500), Some(&user), None).unwrap().unwrap();
        assert_eq!(violation.severity, Severity::Critical);
        assert!(violation.message.contains("Insufficient balance"));
    }

    #[test]
    fn test_daily_limit_counts_existing_spend() {
        let rule = DailyLimitRule::new(Decimal::from(2_000));
        let user = user_with(|u| u.daily_spend_today = Decimal::from(1_900));

        assert!(rule.evaluate(&payment(100), Some(&user), None).unwrap().is_none());
        assert!(rule.evaluate(&payment(101), Some(&user), None).unwrap().is_some());
    }

    #[test]
    fn test_non_payment_intents_pass() {
        let rule = BalanceSufficientRule;
        let user = user_with(|u| u.wallet_balance = Decimal::ZERO);
        let intent = PaymentIntent::query(IntentType::BalanceInquiry);
        assert!(rule.evaluate(&intent, Some(&user), None).unwrap().is_none());
    }
}
