//! End-to-end scenarios through the full pipeline
//!
//! Each test drives `PaymentService::process` against a fresh store and a
//! deterministic settlement rail (failure rate 0).

use audit_ledger::AuditEventType;
use chrono::{Duration, Utc};
use execution_engine::ExecutionErrorCode;
use fraud_intel::{MerchantRecord, MerchantRiskState};
use payment_service::{Config, PaymentService, ResponseStatus};
use policy_engine::{IntentType, PaymentIntent, PolicyDecision, UserContext};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::io::Write;
use tempfile::TempDir;

fn test_service() -> (PaymentService, TempDir) {
    let temp_dir = TempDir::new().unwrap();

    let registry_path = temp_dir.path().join("brands.json");
    let mut file = std::fs::File::create(&registry_path).unwrap();
    write!(
        file,
        r#"{{"amazon": {{"keywords": ["amazon", "amzn"], "allowed_vpas": ["amazon@apl"]}}}}"#
    )
    .unwrap();

    let mut config = Config::default();
    config.data_dir = temp_dir.path().join("store");
    config.brand_registry_path = registry_path;
    config.execution.failure_rate = 0.0;

    let service = PaymentService::new(config).unwrap();
    (service, temp_dir)
}

fn seed_user(service: &PaymentService, user_id: &str, balance: i64) {
    service.directory().upsert(UserContext {
        user_id: user_id.to_string(),
        wallet_balance: Decimal::from(balance),
        daily_spend_today: Decimal::ZERO,
        transactions_today: 0,
        transactions_last_5min: 0,
        device_fingerprint: "fp_scenario".to_string(),
        is_known_device: true,
        session_age_seconds: 300,
        account_age_days: 365,
        trust_score: 0.9,
        known_contacts: HashSet::new(),
        last_transaction_time: None,
    });
}

fn seed_merchant(service: &PaymentService, vpa: &str, state: MerchantRiskState, days_old: i64) {
    let now = Utc::now();
    let mut record = MerchantRecord::new(vpa, now - Duration::days(days_old));
    record.risk_state = state;
    record.last_updated = now;
    service.store().put_record(&record).unwrap();
}

#[tokio::test]
async fn scenario_blocked_merchant_is_denied() {
    let (service, _dir) = test_service();
    seed_user(&service, "u1", 50_000);
    seed_merchant(&service, "bad_actor@upi", MerchantRiskState::Blocked, 30);

    let intent = PaymentIntent::payment(Decimal::from(500), "bad_actor@upi");
    let response = service.process(intent, "u1", None, None).await;

    assert_eq!(response.status, ResponseStatus::Denied);
    assert_eq!(response.policy_decision, Some(PolicyDecision::Deny));
    assert!(response.message.contains("Merchant is BLOCKED"));
    assert!(response.execution_result.is_none());
}

#[tokio::test]
async fn scenario_brand_impersonation_is_denied_and_flagged() {
    let (service, _dir) = test_service();
    seed_user(&service, "u1", 50_000);

    let intent = PaymentIntent::payment(Decimal::from(100), "amaz0n@upi");
    let response = service.process(intent, "u1", None, None).await;

    assert_eq!(response.status, ResponseStatus::Denied);
    assert!(response.message.contains("Brand Impersonation Detected"));
    assert!(response.message.contains("amazon"));

    // Detection feeds the risk model: the lookalike VPA is now BLOCKED
    use fraud_intel::MerchantReader;
    let ctx = service.store().merchant_context("amaz0n@upi").unwrap();
    assert_eq!(ctx.risk_state, MerchantRiskState::Blocked);
    assert_eq!(
        service
            .ledger()
            .events_of_type(AuditEventType::ImpersonationFlagged)
            .len(),
        1
    );
}

#[tokio::test]
async fn scenario_merchant_earns_trust_after_fifth_payment() {
    let (service, _dir) = test_service();
    seed_user(&service, "u1", 50_000);
    seed_merchant(&service, "chai@upi", MerchantRiskState::New, 8);

    use fraud_intel::MerchantReader;
    for amount in [10, 20, 30, 40] {
        let intent = PaymentIntent::payment(Decimal::from(amount), "chai@upi");
        let response = service.process(intent, "u1", None, None).await;
        assert_eq!(response.status, ResponseStatus::Executed);
    }
    let ctx = service.store().merchant_context("chai@upi").unwrap();
    assert_eq!(ctx.risk_state, MerchantRiskState::New);

    let intent = PaymentIntent::payment(Decimal::from(50), "chai@upi");
    let response = service.process(intent, "u1", None, None).await;
    assert_eq!(response.status, ResponseStatus::Executed);

    let ctx = service.store().merchant_context("chai@upi").unwrap();
    assert_eq!(ctx.risk_state, MerchantRiskState::Trusted);
}

#[tokio::test]
async fn scenario_replay_is_rejected() {
    let (service, _dir) = test_service();
    seed_user(&service, "u1", 50_000);

    let first = service
        .process(
            PaymentIntent::payment(Decimal::from(300), "shop@upi"),
            "u1",
            None,
            None,
        )
        .await;
    assert_eq!(first.status, ResponseStatus::Executed);

    let second = service
        .process(
            PaymentIntent::payment(Decimal::from(300), "shop@upi"),
            "u1",
            None,
            None,
        )
        .await;
    assert_eq!(second.status, ResponseStatus::Failed);
    let execution = second.execution_result.unwrap();
    assert_eq!(execution.error_code, Some(ExecutionErrorCode::Duplicate));

    // Exactly one settled transaction
    let completed = service
        .execution()
        .get_transaction_history("u1", 100, None, None)
        .into_iter()
        .filter(|r| r.state == execution_engine::TransactionState::Completed)
        .count();
    assert_eq!(completed, 1);
}

#[tokio::test]
async fn scenario_velocity_burst_requires_verification() {
    let (service, _dir) = test_service();
    service.directory().upsert(UserContext {
        user_id: "bursty".to_string(),
        wallet_balance: Decimal::from(50_000),
        daily_spend_today: Decimal::from(100),
        transactions_today: 10,
        transactions_last_5min: 10,
        device_fingerprint: "fp_burst".to_string(),
        is_known_device: true,
        session_age_seconds: 300,
        account_age_days: 365,
        trust_score: 0.9,
        known_contacts: ["shop@upi".to_string()].into(),
        last_transaction_time: Some(Utc::now()),
    });

    let intent = PaymentIntent::payment(Decimal::from(10), "shop@upi");
    let response = service.process(intent, "bursty", None, None).await;

    assert_eq!(response.status, ResponseStatus::Processed);
    assert_eq!(response.policy_decision, Some(PolicyDecision::Verify));
    let risk = response.risk_info.unwrap();
    assert!(risk.violations.iter().any(|v| v.rule_name == "velocity_burst"));
    assert!(response.execution_result.is_none(), "VERIFY must not execute");
}

#[tokio::test]
async fn executed_payment_updates_user_state_and_audit_trail() {
    let (service, _dir) = test_service();
    seed_user(&service, "u1", 1_000);

    let response = service
        .process(
            PaymentIntent::payment(Decimal::from(250), "shop@upi"),
            "u1",
            None,
            None,
        )
        .await;

    assert_eq!(response.status, ResponseStatus::Executed);
    let execution = response.execution_result.unwrap();
    assert!(execution.success);
    assert!(execution.reference_number.unwrap().starts_with("UPI"));

    let state = response.user_state.unwrap();
    assert_eq!(state.balance, Decimal::from(750));
    assert_eq!(state.daily_spend, Decimal::from(250));
    assert_eq!(state.recent_transactions.len(), 1);

    // POLICY_EVALUATED precedes the execution pair
    let events = service.ledger().events();
    let kinds: Vec<AuditEventType> = events.iter().map(|e| e.event_type).collect();
    assert_eq!(
        kinds,
        vec![
            AuditEventType::PolicyEvaluated,
            AuditEventType::ExecutionStarted,
            AuditEventType::ExecutionCompleted,
        ]
    );
}

#[tokio::test]
async fn denied_payment_never_reaches_execution() {
    let (service, _dir) = test_service();
    seed_user(&service, "broke", 50);

    let response = service
        .process(
            PaymentIntent::payment(Decimal::from(500), "shop@upi"),
            "broke",
            None,
            None,
        )
        .await;

    assert_eq!(response.status, ResponseStatus::Denied);
    assert!(response.execution_result.is_none());
    assert!(service
        .execution()
        .get_transaction_history("broke", 10, None, None)
        .is_empty());
    assert!(service
        .ledger()
        .events_of_type(AuditEventType::ExecutionStarted)
        .is_empty());
}

#[tokio::test]
async fn missing_user_context_fails_closed() {
    let (service, _dir) = test_service();

    let response = service
        .process(
            PaymentIntent::payment(Decimal::from(100), "shop@upi"),
            "ghost",
            None,
            None,
        )
        .await;

    assert_eq!(response.status, ResponseStatus::Error);
    assert!(response.policy_decision.is_none());
    assert!(response.execution_result.is_none());
}

#[tokio::test]
async fn unknown_intent_bypasses_policy() {
    let (service, _dir) = test_service();
    seed_user(&service, "u1", 1_000);

    let response = service
        .process(PaymentIntent::query(IntentType::Unknown), "u1", None, None)
        .await;

    assert_eq!(response.status, ResponseStatus::Error);
    assert!(response.policy_decision.is_none());
    assert!(response.risk_info.is_none());
    assert!(service.ledger().is_empty());
}

#[tokio::test]
async fn balance_inquiry_returns_snapshot() {
    let (service, _dir) = test_service();
    seed_user(&service, "u1", 4_200);

    let response = service
        .process(
            PaymentIntent::query(IntentType::BalanceInquiry),
            "u1",
            None,
            None,
        )
        .await;

    assert_eq!(response.status, ResponseStatus::Processed);
    assert_eq!(response.policy_decision, Some(PolicyDecision::Approve));
    assert!(response.message.contains("4200"));

    let state = response.user_state.unwrap();
    assert_eq!(state.balance, Decimal::from(4_200));
    assert_eq!(state.daily_limit, Decimal::from(2_000));
    assert!(state.recent_transactions.len() <= 3);
}

#[tokio::test]
async fn ctx_override_takes_precedence() {
    let (service, _dir) = test_service();
    seed_user(&service, "u1", 50_000);

    let mut override_ctx = service.directory().get("u1").unwrap();
    override_ctx.wallet_balance = Decimal::from(10);

    let response = service
        .process(
            PaymentIntent::payment(Decimal::from(100), "shop@upi"),
            "u1",
            Some(override_ctx),
            None,
        )
        .await;

    assert_eq!(response.status, ResponseStatus::Denied);
    assert!(response.message.contains("Insufficient balance"));
}

#[tokio::test]
async fn expired_deadline_times_out_without_settling() {
    let (service, _dir) = test_service();
    seed_user(&service, "u1", 50_000);

    let past = Utc::now() - Duration::seconds(1);
    let response = service
        .process(
            PaymentIntent::payment(Decimal::from(100), "shop@upi"),
            "u1",
            None,
            Some(past),
        )
        .await;

    assert_eq!(response.status, ResponseStatus::Failed);
    let execution = response.execution_result.unwrap();
    assert_eq!(execution.error_code, Some(ExecutionErrorCode::Timeout));
    assert!(service
        .ledger()
        .events_of_type(AuditEventType::ExecutionCompleted)
        .is_empty());
}
