//! Service configuration
//!
//! One aggregate `Config` with nested sections mirroring the component
//! crates. All sections default sensibly; TOML files and environment
//! variables override.

use crate::error::{Error, Result};
use execution_engine::ExecutionConfig;
use fraud_intel::RiskThresholds;
use policy_engine::PolicyThresholds;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Aggregate service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Service name
    pub service_name: String,

    /// Service version
    pub service_version: String,

    /// Data directory for the fraud intelligence store
    pub data_dir: PathBuf,

    /// Path to the brand registry JSON file
    pub brand_registry_path: PathBuf,

    /// Policy rule thresholds
    pub policy: PolicyThresholds,

    /// Merchant risk thresholds
    pub risk: RiskThresholds,

    /// Execution engine configuration
    pub execution: ExecutionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "payment-service".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            data_dir: PathBuf::from("./data/payguard"),
            brand_registry_path: PathBuf::from("./resources/brands.json"),
            policy: PolicyThresholds::default(),
            risk: RiskThresholds::default(),
            execution: ExecutionConfig::default(),
        }
    }
}

impl Config {
    /// Load from a TOML file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {e}")))?;
        Ok(config)
    }

    /// Load defaults with environment overrides
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();

        if let Ok(data_dir) = std::env::var("PAYGUARD_DATA_DIR") {
            config.data_dir = PathBuf::from(data_dir);
        }

        if let Ok(path) = std::env::var("PAYGUARD_BRAND_REGISTRY") {
            config.brand_registry_path = PathBuf::from(path);
        }

        if let Ok(rate) = std::env::var("PAYGUARD_FAILURE_RATE") {
            config.execution.failure_rate = rate
                .parse()
                .map_err(|e| Error::Config(format!("Invalid PAYGUARD_FAILURE_RATE: {e}")))?;
        }

        Ok(config)
    }
}
