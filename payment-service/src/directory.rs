//! In-memory payer directory
//!
//! Holds the per-user snapshots the policy engine evaluates against. The
//! execution feedback path is the only writer besides explicit seeding.
//! Unknown users get no default snapshot; the service fails closed instead.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use policy_engine::UserContext;
use rust_decimal::Decimal;

/// Registry of payer snapshots
#[derive(Debug, Default)]
pub struct UserDirectory {
    users: DashMap<String, UserContext>,
}

impl UserDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot for a user, if one has been seeded
    pub fn get(&self, user_id: &str) -> Option<UserContext> {
        self.users.get(user_id).map(|u| u.clone())
    }

    /// Insert or replace a snapshot
    pub fn upsert(&self, ctx: UserContext) {
        self.users.insert(ctx.user_id.clone(), ctx);
    }

    /// Fold a settled payment into the payer's counters
    pub fn record_payment(
        &self,
        user_id: &str,
        amount: Decimal,
        merchant_vpa: &str,
        executed_at: DateTime<Utc>,
    ) {
        if let Some(mut user) = self.users.get_mut(user_id) {
            user.wallet_balance -= amount;
            user.daily_spend_today += amount;
            user.transactions_today += 1;
            user.transactions_last_5min += 1;
            user.known_contacts.insert(merchant_vpa.to_string());
            user.last_transaction_time = Some(executed_at);
        }
    }

    /// Number of seeded users
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// True if no users are seeded
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
