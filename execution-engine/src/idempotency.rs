//! Idempotency key derivation and storage
//!
//! The key collapses near-duplicate execution attempts: same payer, payee,
//! and amount within the same minute bucket map to the first transaction
//! observed. Entries expire after the configured TTL (default 24 h).

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Derive the idempotency key for an execution attempt
pub fn idempotency_key(
    user_id: &str,
    merchant_vpa: &str,
    amount: Decimal,
    created_at: DateTime<Utc>,
) -> String {
    // Minute bucket: attempts within the same wall-clock minute collide
    format!(
        "{}|{}|{}|{}",
        user_id,
        merchant_vpa,
        amount,
        created_at.format("%Y%m%d%H%M")
    )
}

/// Stored mapping from key to the first settled transaction in its window
#[derive(Debug, Clone)]
pub struct IdempotencyEntry {
    /// First transaction observed for this key
    pub transaction_id: Uuid,

    /// Expiry of the window
    pub expires_at: DateTime<Utc>,
}

/// Sharded idempotency map, owned exclusively by the execution engine
#[derive(Debug)]
pub struct IdempotencyMap {
    entries: DashMap<String, IdempotencyEntry>,
    ttl: Duration,
}

impl IdempotencyMap {
    /// Create a map with the given entry TTL
    pub fn new(ttl_seconds: i64) -> Self {
        Self {
            entries: DashMap::new(),
            ttl: Duration::seconds(ttl_seconds),
        }
    }

    /// Look up a live entry; expired entries are evicted on the way
    pub fn check(&self, key: &str, now: DateTime<Utc>) -> Option<IdempotencyEntry> {
        if let Some(entry) = self.entries.get(key) {
            if now < entry.expires_at {
                return Some(entry.clone());
            }
        }
        // Expired (or raced): drop it so the window can be reused
        self.entries.remove_if(key, |_, entry| now >= entry.expires_at);
        None
    }

    /// Record the settled transaction for a key
    pub fn store(&self, key: String, transaction_id: Uuid, now: DateTime<Utc>) {
        self.entries.insert(
            key,
            IdempotencyEntry {
                transaction_id,
                expires_at: now + self.ttl,
            },
        );
    }

    /// Number of live and expired entries currently held
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no entries are held
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
