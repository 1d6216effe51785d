//! Merchant store: the single writer for merchant risk
//!
//! # Column Families
//!
//! - `scores` - Merchant records (key: merchant_vpa, value: bincode)
//!
//! Mutations on one merchant are serialized by a per-key lock; reads decode
//! a consistent snapshot straight from RocksDB. Risk reclassification goes
//! through [`next_state`] on every update, and `RISK_STATE_CHANGED` is
//! emitted only when the state actually moved.

use crate::{
    error::{Error, Result},
    state_machine::{next_state, RiskThresholds},
    types::{MerchantContext, MerchantRecord, MerchantRiskState},
};
use audit_ledger::{AuditEventType, AuditLedger};
use chrono::Utc;
use dashmap::DashMap;
use parking_lot::Mutex;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, Options, DB};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

const CF_SCORES: &str = "scores";

/// Store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Data directory for RocksDB
    pub data_dir: PathBuf,

    /// Risk transition thresholds
    pub thresholds: RiskThresholds,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data/fraud-intel"),
            thresholds: RiskThresholds::default(),
        }
    }
}

/// Read capability exposed to the policy side
pub trait MerchantReader: Send + Sync {
    /// Snapshot for a merchant; unseen merchants get the NEW default
    fn merchant_context(&self, vpa: &str) -> Result<MerchantContext>;
}

/// Feedback capability exposed to the execution side
pub trait MerchantRecorder: Send + Sync {
    /// Fold a transaction outcome into the merchant's counters and
    /// reclassify; returns the (possibly new) risk state
    fn record_transaction(&self, vpa: &str, success: bool, is_refund: bool)
        -> Result<MerchantRiskState>;

    /// Force BLOCKED via the impersonation clause of the state machine
    fn flag_impersonation(&self, vpa: &str) -> Result<MerchantRiskState>;
}

/// Durable per-merchant counters and risk state
pub struct MerchantStore {
    db: DB,
    locks: DashMap<String, Arc<Mutex<()>>>,
    thresholds: RiskThresholds,
    ledger: Arc<AuditLedger>,
}

impl MerchantStore {
    /// Open or create the store
    pub fn open(config: &StoreConfig, ledger: Arc<AuditLedger>) -> Result<Self> {
        std::fs::create_dir_all(&config.data_dir)?;

        let mut db_opts = Options::default();
        db_opts.create_if_missing(true);
        db_opts.create_missing_column_families(true);

        let cf_descriptors = vec![ColumnFamilyDescriptor::new(CF_SCORES, Options::default())];
        let db = DB::open_cf_descriptors(&db_opts, &config.data_dir, cf_descriptors)?;

        tracing::info!(data_dir = %config.data_dir.display(), "Merchant store opened");

        Ok(Self {
            db,
            locks: DashMap::new(),
            thresholds: config.thresholds.clone(),
            ledger,
        })
    }

    fn cf(&self) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(CF_SCORES)
            .ok_or_else(|| Error::Storage(format!("Column family {} not found", CF_SCORES)))
    }

    fn key_lock(&self, vpa: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(vpa.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Fetch the persisted record, if any
    pub fn get_record(&self, vpa: &str) -> Result<Option<MerchantRecord>> {
        let cf = self.cf()?;
        match self.db.get_cf(cf, vpa.as_bytes())? {
            Some(value) => Ok(Some(bincode::deserialize(&value)?)),
            None => Ok(None),
        }
    }

    /// Persist a record verbatim (seeding, manual override)
    pub fn put_record(&self, record: &MerchantRecord) -> Result<()> {
        let lock = self.key_lock(&record.merchant_vpa);
        let _guard = lock.lock();
        self.write_record(record)
    }

    fn write_record(&self, record: &MerchantRecord) -> Result<()> {
        let cf = self.cf()?;
        let value = bincode::serialize(record)?;
        self.db.put_cf(cf, record.merchant_vpa.as_bytes(), &value)?;
        Ok(())
    }

    /// Apply a mutation under the merchant's lock, reclassify, persist,
    /// and emit audit events for any state movement.
    fn mutate(
        &self,
        vpa: &str,
        is_impersonating: bool,
        apply: impl FnOnce(&mut MerchantRecord),
    ) -> Result<MerchantRiskState> {
        let lock = self.key_lock(vpa);
        let _guard = lock.lock();

        let now = Utc::now();
        let mut record = self
            .get_record(vpa)?
            .unwrap_or_else(|| MerchantRecord::new(vpa, now));

        apply(&mut record);

        let previous = record.risk_state;
        record.risk_state = next_state(
            record.total_txns,
            record.total_refunds,
            record.first_seen,
            previous,
            is_impersonating,
            now,
            &self.thresholds,
        );
        record.last_updated = now;

        self.write_record(&record)?;

        if record.risk_state != previous {
            tracing::info!(
                merchant_vpa = vpa,
                from = previous.as_str(),
                to = record.risk_state.as_str(),
                "Merchant risk state changed"
            );
            self.ledger.log_event(
                AuditEventType::RiskStateChanged,
                json!({
                    "merchant_vpa": vpa,
                    "from": previous.as_str(),
                    "to": record.risk_state.as_str(),
                    "total_txns": record.total_txns,
                    "total_refunds": record.total_refunds,
                    "refund_rate": record.refund_rate(),
                }),
            );
        }

        Ok(record.risk_state)
    }
}

impl MerchantReader for MerchantStore {
    fn merchant_context(&self, vpa: &str) -> Result<MerchantContext> {
        match self.get_record(vpa)? {
            Some(record) => Ok(record.to_context()),
            // Unseen merchant: NEW, zero counters, neutral reputation.
            // Nothing is persisted until evidence arrives.
            None => Ok(MerchantRecord::new(vpa, Utc::now()).to_context()),
        }
    }
}

impl MerchantRecorder for MerchantStore {
    fn record_transaction(
        &self,
        vpa: &str,
        success: bool,
        is_refund: bool,
    ) -> Result<MerchantRiskState> {
        self.mutate(vpa, false, |record| {
            record.total_attempts += 1;
            if success {
                record.total_txns += 1;
            }
            if is_refund {
                record.total_refunds += 1;
            }
        })
    }

    fn flag_impersonation(&self, vpa: &str) -> Result<MerchantRiskState> {
        self.ledger.log_event(
            AuditEventType::ImpersonationFlagged,
            json!({ "merchant_vpa": vpa }),
        );
        self.mutate(vpa, true, |_| {})
    }
}
