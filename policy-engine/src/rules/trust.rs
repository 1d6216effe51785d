//! Trust rules
//!
//! Leverage the payer's dynamic trust profile: first payments to a new
//! payee above the high-value line, and low-trust users in general, get
//! step-up friction rather than a hard deny.

use crate::error::Result;
use crate::rules::Rule;
use crate::types::{IntentType, PaymentIntent, RuleCategory, RuleViolation, Severity, UserContext};
use fraud_intel::MerchantContext;
use rust_decimal::Decimal;
use serde_json::json;

/// High-value payment to a payee the user has never paid before
pub struct NewPayeeRule {
    high_value: Decimal,
}

impl NewPayeeRule {
    /// Rule with the given high-value line
    pub fn new(high_value: Decimal) -> Self {
        Self { high_value }
    }
}

impl Rule for NewPayeeRule {
    fn name(&self) -> &'static str {
        "new_payee_high_value"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Trust
    }

    fn description(&self) -> &'static str {
        "Flag high-value payments to previously unseen payees"
    }

    fn severity(&self) -> Severity {
        Severity::Medium
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
        let (Some(amount), Some(vpa), Some(user)) =
            (intent.amount, intent.merchant_vpa.as_deref(), user_ctx)
        else {
            return Ok(None);
        };

        if amount > self.high_value && !user.known_contacts.contains(vpa) {
            return Ok(Some(self.violation(
                format!("High value payment to new payee: {vpa}"),
                json!({
                    "merchant_vpa": vpa,
                    "amount": amount,
                    "limit": self.high_value,
                }),
            )));
        }

        Ok(None)
    }
}

/// Users below the trust floor get stricter scrutiny
pub struct TrustScoreRule {
    floor: f64,
}

impl TrustScoreRule {
    /// Rule with the given trust floor
    pub fn new(floor: f64) -> Self {
        Self { floor }
    }
}

impl Rule for TrustScoreRule {
    fn name(&self) -> &'static str {
        "trust_score_floor"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Trust
    }

    fn description(&self) -> &'static str {
        "Evaluate the payer's trust score"
    }

    fn severity(&self) -> Severity {
        Severity::Medium
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

        if user.trust_score < self.floor {
            return Ok(Some(self.violation(
                format!("Low trust user profile (score: {:.2})", user.trust_score),
                json!({ "trust_score": user.trust_score }),
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
    fn test_new_payee_high_value_flagged() {
        let rule = NewPayeeRule::new(Decimal::from(500));
        let user = user_with(|u| u.known_contacts.clear());

        let violation = rule.evaluate(&payment(600), Some(&user), None).unwrap().unwrap();
        assert_eq!(violation.severity, Severity::Medium);
        assert!(violation.message.contains("new payee"));
    }

    #[test]
    fn test_known_payee_passes() {
        let rule = NewPayeeRule::new(Decimal::from(500));
        let user = user_with(|_| {}); // shop@upi is a known contact
        assert!(rule.evaluate(&payment(600), Some(&user), None).unwrap().is_none());
    }

    #[test]
    fn test_small_payment_to_new_payee_passes() {
        let rule = NewPayeeRule::new(Decimal::from(500));
        let user = user_with(|u| u.known_contacts.clear());
        assert!(rule.evaluate(&payment(500), Some(&user), None).unwrap().is_none());
    }

    #[test]
    fn test_low_trust_flagged() {
        let rule = TrustScoreRule::new(0.4);

        let shady = user_with(|u| u.trust_score = 0.39);
        assert!(rule.evaluate(&payment(10), Some(&shady), None).unwrap().is_some());

        let solid = user_with(|u| u.trust_score = 0.4);
        assert!(rule.evaluate(&payment(10), Some(&solid), None).unwrap().is_none());
    }
}
