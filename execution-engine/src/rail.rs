//! Settlement rail abstraction
//!
//! The engine only knows how to ask a rail to settle; the production rail
//! would speak to a PSP. The simulated rail fails with a configured
//! probability, which is all the core needs for testing its failure paths.

use crate::types::TransactionRecord;
use async_trait::async_trait;
use rand::Rng;
use thiserror::Error;

/// Settlement failure
#[derive(Error, Debug)]
pub enum RailError {
    /// Network-level failure between the engine and the rail
    #[error("{0}")]
    Network(String),
}

/// External settlement surface
#[async_trait]
pub trait SettlementRail: Send + Sync {
    /// Attempt to settle one payment
    async fn settle(&self, record: &TransactionRecord) -> Result<(), RailError>;
}

/// Fallible rail simulation
#[derive(Debug, Clone)]
pub struct SimulatedRail {
    failure_rate: f64,
}

impl SimulatedRail {
    /// Create a rail that fails with probability `failure_rate`
    pub fn new(failure_rate: f64) -> Self {
        Self { failure_rate }
    }
}

#[async_trait]
impl SettlementRail for SimulatedRail {
    async fn settle(&self, record: &TransactionRecord) -> Result<(), RailError> {
        if rand::thread_rng().gen::<f64>() < self.failure_rate {
            tracing::warn!(
                transaction_id = %record.transaction_id,
                "Simulated settlement failure"
            );
            return Err(RailError::Network("simulated network failure".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransactionState;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn record() -> TransactionRecord {
        TransactionRecord {
            transaction_id: Uuid::new_v4(),
            intent_id: Uuid::new_v4(),
            user_id: "u".to_string(),
            amount: Decimal::ONE,
            merchant_vpa: "shop@upi".to_string(),
            state: TransactionState::Executing,
            created_at: Utc::now(),
            approval_hash: None,
            execution_hash: None,
            executed_at: None,
            error_message: None,
        }
    }

    #[tokio::test]
    async fn test_zero_failure_rate_always_settles() {
        let rail = SimulatedRail::new(0.0);
        for _ in 0..50 {
            assert!(rail.settle(&record()).await.is_ok());
        }
    }

    #[tokio::test]
    async fn test_full_failure_rate_always_fails() {
        let rail = SimulatedRail::new(1.0);
        for _ in 0..50 {
            let err = rail.settle(&record()).await.unwrap_err();
            assert_eq!(err.to_string(), "simulated network failure");
        }
    }
}
