//! The ingress pipeline
//!
//! One `process` call takes an interpreted intent from intake to a terminal
//! response: context resolution, policy evaluation, routing, execution,
//! and the feedback writes that keep the risk model and the payer snapshot
//! current.

use crate::{
    config::Config,
    directory::UserDirectory,
    error::{Error, Result},
    response::{Response, ResponseStatus, RiskInfo, UserState},
};
use audit_ledger::{AuditEventType, AuditLedger};
use brand_screen::{BrandRegistry, BrandScreen};
use chrono::{DateTime, Utc};
use execution_engine::{ExecutionEngine, SimulatedRail};
use fraud_intel::{MerchantContext, MerchantReader, MerchantRecorder, MerchantStore, StoreConfig};
use policy_engine::{
    DecisionRouter, IntentType, PaymentIntent, PolicyDecision, PolicyEngine, PolicyResult,
    UserContext,
};
use serde_json::json;
use std::sync::Arc;

/// The authorization core, wired once at startup
pub struct PaymentService {
    config: Config,
    ledger: Arc<AuditLedger>,
    store: Arc<MerchantStore>,
    policy: PolicyEngine,
    router: DecisionRouter,
    execution: Arc<ExecutionEngine>,
    directory: UserDirectory,
}

impl PaymentService {
    /// Construct the service and all its components
    pub fn new(config: Config) -> Result<Self> {
        let ledger = Arc::new(AuditLedger::new());

        let store = Arc::new(MerchantStore::open(
            &StoreConfig {
                data_dir: config.data_dir.clone(),
                thresholds: config.risk.clone(),
            },
            ledger.clone(),
        )?);

        let screen = Arc::new(BrandScreen::new(BrandRegistry::load(
            &config.brand_registry_path,
        )));
        let policy = PolicyEngine::new(&config.policy, screen);

        let rail = Arc::new(SimulatedRail::new(config.execution.failure_rate));
        let execution = Arc::new(ExecutionEngine::new(
            &config.execution,
            rail,
            store.clone(),
            ledger.clone(),
        )?);

        tracing::info!(
            service = %config.service_name,
            version = %config.service_version,
            "Payment service initialized"
        );

        Ok(Self {
            config,
            ledger,
            store,
            policy,
            router: DecisionRouter::new(),
            execution,
            directory: UserDirectory::new(),
        })
    }

    /// Payer directory (seeding, session tracking)
    pub fn directory(&self) -> &UserDirectory {
        &self.directory
    }

    /// Merchant store (seeding, manual override)
    pub fn store(&self) -> &Arc<MerchantStore> {
        &self.store
    }

    /// Audit ledger
    pub fn ledger(&self) -> &Arc<AuditLedger> {
        &self.ledger
    }

    /// Execution engine (queries)
    pub fn execution(&self) -> &Arc<ExecutionEngine> {
        &self.execution
    }

    /// Process one interpreted intent to a terminal response.
    ///
    /// Never errors out: dependency failures fail closed as
    /// `status: error` with no approval.
    pub async fn process(
        &self,
        intent: PaymentIntent,
        user_id: &str,
        ctx_override: Option<UserContext>,
        deadline: Option<DateTime<Utc>>,
    ) -> Response {
        match self.process_inner(&intent, user_id, ctx_override, deadline).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(user_id, error = %e, "Request failed closed");
                Response {
                    status: ResponseStatus::Error,
                    message: format!("System error: {e}"),
                    intent,
                    policy_decision: None,
                    execution_result: None,
                    risk_info: None,
                    user_state: None,
                }
            }
        }
    }

    async fn process_inner(
        &self,
        intent: &PaymentIntent,
        user_id: &str,
        ctx_override: Option<UserContext>,
        deadline: Option<DateTime<Utc>>,
    ) -> Result<Response> {
        // Unintelligible intents bypass policy entirely
        if intent.intent_type == IntentType::Unknown {
            return Ok(Response {
                status: ResponseStatus::Error,
                message: "Could not understand the request".to_string(),
                intent: intent.clone(),
                policy_decision: None,
                execution_result: None,
                risk_info: None,
                user_state: None,
            });
        }

        // Fail closed on a missing payer snapshot; no default context
        let user_ctx = ctx_override
            .or_else(|| self.directory.get(user_id))
            .ok_or_else(|| Error::MissingContext(user_id.to_string()))?;

        let merchant_ctx: Option<MerchantContext> = match intent.merchant_vpa.as_deref() {
            Some(vpa) => Some(self.store.merchant_context(vpa)?),
            None => None,
        };

        let policy_result = self
            .policy
            .evaluate(intent, Some(&user_ctx), merchant_ctx.as_ref());

        self.ledger.log_event(
            AuditEventType::PolicyEvaluated,
            json!({
                "user_id": user_id,
                "intent_type": intent.intent_type,
                "merchant_vpa": intent.merchant_vpa,
                "decision": policy_result.decision.as_str(),
                "risk_score": policy_result.risk_score,
            }),
        );

        // A brand impersonation hit feeds straight back into the risk model
        if let Some(vpa) = intent.merchant_vpa.as_deref() {
            if policy_result
                .violations
                .iter()
                .any(|v| v.rule_name == "brand_impersonation")
            {
                if let Err(e) = self.store.flag_impersonation(vpa) {
                    tracing::error!(merchant_vpa = vpa, error = %e, "Failed to flag impersonation");
                }
            }
        }

        if intent.intent_type != IntentType::Payment {
            return Ok(self.query_response(intent, user_id, &user_ctx, policy_result));
        }

        match policy_result.decision {
            PolicyDecision::Deny => Ok(Response {
                status: ResponseStatus::Denied,
                message: policy_result.reason.clone(),
                intent: intent.clone(),
                policy_decision: Some(PolicyDecision::Deny),
                execution_result: None,
                risk_info: Some(risk_info(&policy_result)),
                user_state: Some(self.user_state(user_id, &user_ctx)),
            }),

            PolicyDecision::Verify => Ok(Response {
                status: ResponseStatus::Processed,
                message: format!("Verification required: {}", policy_result.reason),
                intent: intent.clone(),
                policy_decision: Some(PolicyDecision::Verify),
                execution_result: None,
                risk_info: Some(risk_info(&policy_result)),
                user_state: Some(self.user_state(user_id, &user_ctx)),
            }),

            PolicyDecision::Approve => {
                let record = self.router.route(intent, &policy_result, user_id);
                let amount = record.amount;
                let merchant_vpa = record.merchant_vpa.clone();

                let execution_result = self.execution.execute(record, deadline).await;

                let status = if execution_result.success {
                    self.directory.record_payment(
                        user_id,
                        amount,
                        &merchant_vpa,
                        execution_result.executed_at.unwrap_or_else(Utc::now),
                    );
                    ResponseStatus::Executed
                } else {
                    ResponseStatus::Failed
                };

                // Snapshot after the feedback write so the caller sees the
                // post-payment balance
                let current_ctx = self.directory.get(user_id).unwrap_or(user_ctx);

                Ok(Response {
                    status,
                    message: execution_result.message.clone(),
                    intent: intent.clone(),
                    policy_decision: Some(PolicyDecision::Approve),
                    execution_result: Some(execution_result),
                    risk_info: Some(risk_info(&policy_result)),
                    user_state: Some(self.user_state(user_id, &current_ctx)),
                })
            }
        }
    }

    fn query_response(
        &self,
        intent: &PaymentIntent,
        user_id: &str,
        user_ctx: &UserContext,
        policy_result: PolicyResult,
    ) -> Response {
        let message = match intent.intent_type {
            IntentType::BalanceInquiry => {
                format!("Your balance is ₹{:.2}", user_ctx.wallet_balance)
            }
            IntentType::TransactionHistory => "Here are your recent transactions".to_string(),
            _ => policy_result.reason.clone(),
        };

        Response {
            status: ResponseStatus::Processed,
            message,
            intent: intent.clone(),
            policy_decision: Some(policy_result.decision),
            execution_result: None,
            risk_info: Some(risk_info(&policy_result)),
            user_state: Some(self.user_state(user_id, user_ctx)),
        }
    }

    fn user_state(&self, user_id: &str, user_ctx: &UserContext) -> UserState {
        UserState {
            balance: user_ctx.wallet_balance,
            daily_spend: user_ctx.daily_spend_today,
            daily_limit: self.config.policy.daily_limit,
            trust_score: user_ctx.trust_score,
            recent_transactions: self.execution.get_transaction_history(user_id, 3, None, None),
        }
    }
}

fn risk_info(policy_result: &PolicyResult) -> RiskInfo {
    RiskInfo {
        score: policy_result.risk_score,
        violations: policy_result.violations.clone(),
        passed_rules: policy_result.passed_rules.clone(),
        reason: policy_result.reason.clone(),
    }
}
