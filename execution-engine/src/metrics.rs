//! Prometheus metrics for execution observability
//!
//! # Metrics
//!
//! - `execution_attempts_total` - Execution attempts admitted
//! - `execution_completed_total` - Payments settled
//! - `execution_failed_total` - Settlement failures (network + timeout)
//! - `execution_duplicates_total` - Attempts collapsed by idempotency

use prometheus::{IntCounter, Registry};
use std::sync::Arc;

/// Metrics collector
#[derive(Clone)]
pub struct Metrics {
    /// Execution attempts admitted past the precondition checks
    pub attempts_total: IntCounter,

    /// Payments settled
    pub completed_total: IntCounter,

    /// Settlement failures
    pub failed_total: IntCounter,

    /// Duplicate attempts short-circuited
    pub duplicates_total: IntCounter,

    /// Prometheus registry
    pub registry: Arc<Registry>,
}

impl Metrics {
    /// Create a collector with its own registry
    pub fn new() -> prometheus::Result<Self> {
        let registry = Arc::new(Registry::new());

        let attempts_total = IntCounter::new(
            "execution_attempts_total",
            "Execution attempts admitted",
        )?;
        registry.register(Box::new(attempts_total.clone()))?;

        let completed_total = IntCounter::new(
            "execution_completed_total",
            "Payments settled",
        )?;
        registry.register(Box::new(completed_total.clone()))?;

        let failed_total = IntCounter::new(
            "execution_failed_total",
            "Settlement failures",
        )?;
        registry.register(Box::new(failed_total.clone()))?;

        let duplicates_total = IntCounter::new(
            "execution_duplicates_total",
            "Duplicate attempts short-circuited",
        )?;
        registry.register(Box::new(duplicates_total.clone()))?;

        Ok(Self {
            attempts_total,
            completed_total,
            failed_total,
            duplicates_total,
            registry,
        })
    }
}
