//! Rule framework and the standard rule set
//!
//! Every rule is pure with respect to its inputs: it reads the intent and
//! the two context snapshots and never touches the stores. A rule that
//! cannot evaluate returns `Err`; the engine folds that into a
//! high-severity violation rather than aborting.

pub mod behavioral;
pub mod invariant;
pub mod trust;
pub mod velocity;

use crate::config::PolicyThresholds;
use crate::error::Result;
use crate::types::{PaymentIntent, RuleCategory, RuleViolation, Severity, UserContext};
use brand_screen::BrandScreen;
use fraud_intel::MerchantContext;
use std::sync::Arc;

/// Common contract for policy rules
pub trait Rule: Send + Sync {
    /// Stable rule name (shows up in violations and passed_rules)
    fn name(&self) -> &'static str;

    /// Category, which is also the evaluation phase
    fn category(&self) -> RuleCategory;

    /// What the rule checks
    fn description(&self) -> &'static str;

    /// Severity of a violation of this rule
    fn severity(&self) -> Severity;

    /// Evaluate the rule; `None` means passed, `Some` carries the violation
    fn evaluate(
        &self,
        intent: &PaymentIntent,
        user_ctx: Option<&UserContext>,
        merchant_ctx: Option<&MerchantContext>,
    ) -> Result<Option<RuleViolation>>;

    /// Build a violation for this rule
    fn violation(&self, message: String, details: serde_json::Value) -> RuleViolation
    where
        Self: Sized,
    {
        RuleViolation {
            rule_name: self.name().to_string(),
            category: self.category(),
            severity: self.severity(),
            message,
            details,
        }
    }
}


/// The standard rule set, in category evaluation order
pub fn standard_rules(
    thresholds: &PolicyThresholds,
    screen: Arc<BrandScreen>,
) -> Vec<Box<dyn Rule>> {
    vec![
        // HARD_INVARIANT
        Box::new(invariant::BalanceSufficientRule),
        Box::new(invariant::DailyLimitRule::new(thresholds.daily_limit)),
        // VELOCITY
        Box::new(velocity::VelocityBurstRule::new(
            thresholds.velocity_max,
            thresholds.velocity_window_seconds,
        )),
        // BEHAVIORAL
        Box::new(behavioral::NewDeviceCapRule::new(thresholds.new_device_cap)),
        Box::new(behavioral::MerchantReputationRule::new(
            thresholds.min_merchant_reputation,
        )),
        Box::new(behavioral::FraudReportsRule::new(
            thresholds.fraud_report_threshold,
        )),
        Box::new(behavioral::BrandImpersonationRule::new(screen)),
        Box::new(behavioral::MerchantRiskStateRule),
        // TRUST
        Box::new(trust::NewPayeeRule::new(thresholds.new_payee_high_value)),
        Box::new(trust::TrustScoreRule::new(thresholds.trust_score_floor)),
    ]
}
