//! PayGuard demo binary
//!
//! Seeds a payer and a couple of merchants, then walks three intents
//! through the full pipeline: a clean payment, a brand lookalike, and a
//! balance inquiry.

use chrono::Utc;
use payment_service::{Config, PaymentService};
use policy_engine::{IntentType, PaymentIntent, UserContext};
use rust_decimal::Decimal;
use std::error::Error;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting PayGuard demo");

    let mut config = Config::from_env()?;
    config.brand_registry_path =
        PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/resources/brands.json"));
    config.execution.failure_rate = 0.0;

    let service = PaymentService::new(config)?;

    service.directory().upsert(UserContext {
        user_id: "demo_user".to_string(),
        wallet_balance: Decimal::from(10_000),
        daily_spend_today: Decimal::ZERO,
        transactions_today: 0,
        transactions_last_5min: 0,
        device_fingerprint: "fp_demo_device".to_string(),
        is_known_device: true,
        session_age_seconds: 120,
        account_age_days: 365,
        trust_score: 0.9,
        known_contacts: ["chai@upi".to_string()].into(),
        last_transaction_time: None,
    });

    let intents = [
        ("pay 250 to chai@upi", PaymentIntent::payment(Decimal::from(250), "chai@upi")),
        ("pay 100 to amaz0n@upi", PaymentIntent::payment(Decimal::from(100), "amaz0n@upi")),
        ("what's my balance", PaymentIntent::query(IntentType::BalanceInquiry)),
    ];

    for (utterance, mut intent) in intents {
        intent.original_text = utterance.to_string();
        let response = service.process(intent, "demo_user", None, None).await;
        println!(
            "{:>24} -> {:?}: {}",
            utterance, response.status, response.message
        );
    }

    println!("\naudit trail ({} events):", service.ledger().len());
    for event in service.ledger().events() {
        println!(
            "  #{} {} {} {}",
            event.sequence,
            event.timestamp.format("%H:%M:%S%.3f"),
            event.event_type.as_str(),
            event.payload
        );
    }

    tracing::info!(finished_at = %Utc::now(), "Demo complete");
    Ok(())
}
