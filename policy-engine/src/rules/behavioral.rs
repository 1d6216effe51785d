//! Behavioral rules
//!
//! Payer- and payee-side anomaly checks: unrecognized devices, merchant
//! reputation, fraud reports, brand impersonation, and the merchant risk
//! state maintained by fraud intelligence.

use crate::error::Result;
use crate::rules::Rule;
use crate::types::{IntentType, PaymentIntent, RuleCategory, RuleViolation, Severity, UserContext};
use brand_screen::BrandScreen;
use fraud_intel::{MerchantContext, MerchantRiskState};
use rust_decimal::Decimal;
use serde_json::json;
use std::sync::Arc;

/// Unrecognized devices get a lower per-payment cap
pub struct NewDeviceCapRule {
    new_device_cap: Decimal,
}

impl NewDeviceCapRule {
    /// Rule with the given cap for unknown devices
    pub fn new(new_device_cap: Decimal) -> Self {
        Self { new_device_cap }
    }
}

impl Rule for NewDeviceCapRule {
    fn name(&self) -> &'static str {
        "new_device_cap"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Behavioral
    }

    fn description(&self) -> &'static str {
        "Apply a stricter amount cap on unrecognized devices"
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
        let (Some(amount), Some(user)) = (intent.amount, user_ctx) else {
            return Ok(None);
        };

        if !user.is_known_device && amount > self.new_device_cap {
            let fingerprint_prefix: String = user.device_fingerprint.chars().take(8).collect();
            return Ok(Some(self.violation(
                format!(
                    "New device detected: ₹{:.2} exceeds the new device limit of ₹{:.2}",
                    amount, self.new_device_cap
                ),
                json!({
                    "is_known_device": false,
                    "device_fingerprint": format!("{fingerprint_prefix}..."),
                    "requested_amount": amount,
                    "new_device_limit": self.new_device_cap,
                }),
            )));
        }

        Ok(None)
    }
}

/// Merchants below the reputation floor are flagged
pub struct MerchantReputationRule {
    min_reputation: f64,
}

impl MerchantReputationRule {
    /// Rule with the given reputation floor
    pub fn new(min_reputation: f64) -> Self {
        Self { min_reputation }
    }
}

impl Rule for MerchantReputationRule {
    fn name(&self) -> &'static str {
        "merchant_reputation"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Behavioral
    }

    fn description(&self) -> &'static str {
        "Merchant reputation must clear the configured floor"
    }

    fn severity(&self) -> Severity {
        Severity::High
    }

    fn evaluate(
        &self,
        intent: &PaymentIntent,
        _user_ctx: Option<&UserContext>,
        merchant_ctx: Option<&MerchantContext>,
    ) -> Result<Option<RuleViolation>> {
        if intent.intent_type != IntentType::Payment {
            return Ok(None);
        }
        let Some(merchant) = merchant_ctx else {
            return Ok(None);
        };

        if merchant.reputation_score < self.min_reputation {
            return Ok(Some(self.violation(
                format!(
                    "Merchant reputation ({:.2}) below threshold ({:.2}); fraud reports: {}",
                    merchant.reputation_score, self.min_reputation, merchant.fraud_reports
                ),
                json!({
                    "merchant_vpa": merchant.merchant_vpa,
                    "reputation_score": merchant.reputation_score,
                    "threshold": self.min_reputation,
                    "fraud_reports": merchant.fraud_reports,
                    "refund_rate": merchant.refund_rate,
                }),
            )));
        }

        Ok(None)
    }
}

/// Merchants accumulating fraud reports are flagged
pub struct FraudReportsRule {
    threshold: u32,
}

impl FraudReportsRule {
    /// Rule tripping at `threshold` fraud reports
    pub fn new(threshold: u32) -> Self {
        Self { threshold }
    }
}

impl Rule for FraudReportsRule {
    fn name(&self) -> &'static str {
        "fraud_reports"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Behavioral
    }

    fn description(&self) -> &'static str {
        "Flag merchants with accumulated fraud reports"
    }

    fn severity(&self) -> Severity {
        Severity::High
    }

    fn evaluate(
        &self,
        intent: &PaymentIntent,
        _user_ctx: Option<&UserContext>,
        merchant_ctx: Option<&MerchantContext>,
    ) -> Result<Option<RuleViolation>> {
        if intent.intent_type != IntentType::Payment {
            return Ok(None);
        }
        let Some(merchant) = merchant_ctx else {
            return Ok(None);
        };

        if merchant.fraud_reports >= self.threshold {
            return Ok(Some(self.violation(
                format!("Merchant has {} fraud reports", merchant.fraud_reports),
                json!({
                    "merchant_vpa": merchant.merchant_vpa,
                    "fraud_reports": merchant.fraud_reports,
                    "refund_rate": merchant.refund_rate,
                }),
            )));
        }

        Ok(None)
    }
}

/// Payee VPAs that mimic a registered brand are denied outright
pub struct BrandImpersonationRule {
    screen: Arc<BrandScreen>,
}

impl BrandImpersonationRule {
    /// Rule backed by the given brand screen
    pub fn new(screen: Arc<BrandScreen>) -> Self {
        Self { screen }
    }
}

impl Rule for BrandImpersonationRule {
    fn name(&self) -> &'static str {
        "brand_impersonation"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Behavioral
    }

    fn description(&self) -> &'static str {
        "Prevent brand impersonation and typosquatting"
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn evaluate(
        &self,
        intent: &PaymentIntent,
        _user_ctx: Option<&UserContext>,
        _merchant_ctx: Option<&MerchantContext>,
    ) -> Result<Option<RuleViolation>> {
        if intent.intent_type != IntentType::Payment {
            return Ok(None);
        }
        let Some(vpa) = intent.merchant_vpa.as_deref() else {
            return Ok(None);
        };

        if let Some(hit) = self.screen.check(vpa) {
            return Ok(Some(self.violation(
                format!(
                    "Brand Impersonation Detected: VPA '{}' mimics brand '{}'.",
                    vpa, hit.brand
                ),
                json!({
                    "merchant_vpa": vpa,
                    "target_brand": hit.brand,
                    "matched_keyword": hit.keyword,
                    "edit_distance": hit.distance,
                }),
            )));
        }

        Ok(None)
    }
}

/// BLOCKED and WATCHLIST merchants are refused
pub struct MerchantRiskStateRule;

impl Rule for MerchantRiskStateRule {
    fn name(&self) -> &'static str {
        "merchant_risk_state"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Behavioral
    }

    fn description(&self) -> &'static str {
        "Enforce merchant risk state restrictions"
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn evaluate(
        &self,
        intent: &PaymentIntent,
        _user_ctx: Option<&UserContext>,
        merchant_ctx: Option<&MerchantContext>,
    ) -> Result<Option<RuleViolation>> {
        if intent.intent_type != IntentType::Payment {
            return Ok(None);
        }
        let Some(merchant) = merchant_ctx else {
            return Ok(None);
        };

        let message = match merchant.risk_state {
            MerchantRiskState::Blocked => "Merchant is BLOCKED due to fraud risk.",
            MerchantRiskState::Watchlist => "Merchant is on WATCHLIST.",
            MerchantRiskState::New | MerchantRiskState::Trusted => return Ok(None),
        };

        Ok(Some(self.violation(
            message.to_string(),
            json!({
                "merchant_vpa": merchant.merchant_vpa,
                "risk_state": merchant.risk_state.as_str(),
            }),
        )))
    }
}
