//! Policy evaluation and decision composition
//!
//! The engine holds no state beyond its registered rules; same inputs give
//! the same `PolicyResult`. All rules in all categories always run, so the
//! caller gets the complete picture, and the decision derives purely from
//! the maximum observed severity.

use crate::config::PolicyThresholds;
use crate::rules::{standard_rules, Rule};
use crate::types::{
    IntentType, PaymentIntent, PolicyDecision, PolicyResult, RuleCategory, RuleViolation,
    Severity, UserContext,
};
use brand_screen::BrandScreen;
use fraud_intel::MerchantContext;
use rust_decimal::Decimal;
use serde_json::json;
use std::sync::Arc;

/// Composes rule outcomes into a single decision
pub struct PolicyEngine {
    rules: Vec<Box<dyn Rule>>,
}

impl PolicyEngine {
    /// Engine with the standard rule set
    pub fn new(thresholds: &PolicyThresholds, screen: Arc<BrandScreen>) -> Self {
        Self {
            rules: standard_rules(thresholds, screen),
        }
    }

    /// Engine over a custom rule list (tests, experiments)
    pub fn with_rules(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    /// Evaluate an intent against payer and payee context
    pub fn evaluate(
        &self,
        intent: &PaymentIntent,
        user_ctx: Option<&UserContext>,
        merchant_ctx: Option<&MerchantContext>,
    ) -> PolicyResult {
        // Validation gate: a PAYMENT without its required fields is denied
        // before any rule runs.
        if intent.intent_type == IntentType::Payment {
            let missing = missing_fields(intent);
            if !missing.is_empty() {
                let reason = format!("missing required field(s): {}", missing.join(", "));
                tracing::info!(reason = %reason, "Intent rejected before rule evaluation");
                return PolicyResult {
                    decision: PolicyDecision::Deny,
                    risk_score: 0.0,
                    violations: Vec::new(),
                    passed_rules: Vec::new(),
                    reason,
                };
            }
        }

        let mut violations: Vec<RuleViolation> = Vec::new();
        let mut passed_rules: Vec<String> = Vec::new();

        for category in RuleCategory::EVALUATION_ORDER {
            for rule in self.rules.iter().filter(|r| r.category() == category) {
                match rule.evaluate(intent, user_ctx, merchant_ctx) {
                    Ok(None) => passed_rules.push(rule.name().to_string()),
                    Ok(Some(violation)) => violations.push(violation),
                    Err(e) => {
                        // A failing rule never crashes the engine; it
                        // degrades to a high-severity violation.
                        tracing::warn!(rule = rule.name(), error = %e, "Rule evaluation error");
                        violations.push(RuleViolation {
                            rule_name: rule.name().to_string(),
                            category,
                            severity: Severity::High,
                            message: format!("rule error: {e}"),
                            details: json!({}),
                        });
                    }
                }
            }
        }

        let risk_score = violations
            .iter()
            .map(|v| v.severity.weight())
            .sum::<f64>()
            .clamp(0.0, 1.0);

        let (decision, reason) = compose_decision(&violations);

        tracing::info!(
            decision = decision.as_str(),
            risk_score,
            violations = violations.len(),
            "Policy evaluated"
        );

        PolicyResult {
            decision,
            risk_score,
            violations,
            passed_rules,
            reason,
        }
    }
}

fn missing_fields(intent: &PaymentIntent) -> Vec<&'static str> {
    let mut missing = Vec::new();
    match intent.amount {
        Some(amount) if amount > Decimal::ZERO => {}
        _ => missing.push("amount"),
    }
    match intent.merchant_vpa.as_deref() {
        Some(vpa) if !vpa.is_empty() => {}
        _ => missing.push("merchant_vpa"),
    }
    missing
}

fn compose_decision(violations: &[RuleViolation]) -> (PolicyDecision, String) {
    let max_severity = violations.iter().map(|v| v.severity).max();

    match max_severity {
        Some(Severity::Critical) => {
            let first_critical = violations
                .iter()
                .find(|v| v.severity == Severity::Critical)
                .map(|v| v.message.as_str())
                .unwrap_or_default();
            (
                PolicyDecision::Deny,
                format!("Critical security violation: {first_critical}"),
            )
        }
        Some(Severity::High) => {
            let messages: Vec<&str> = violations
                .iter()
                .filter(|v| v.severity == Severity::High)
                .map(|v| v.message.as_str())
                .collect();
            (PolicyDecision::Verify, messages.join("; "))
        }
        Some(_) => {
            let messages: Vec<&str> = violations.iter().map(|v| v.message.as_str()).collect();
            (
                PolicyDecision::Verify,
                format!("Additional verification suggested: {}", messages.join("; ")),
            )
        }
        None => (PolicyDecision::Approve, "All policy checks passed".to_string()),
    }
}
