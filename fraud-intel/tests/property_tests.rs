//! Property-based tests for risk state transition invariants
//!
//! - the transition relation only walks toward BLOCKED, never backwards
//! - with fixed evidence, repeated application reaches a fixpoint within
//!   the height of the state lattice

use chrono::{DateTime, Duration, Utc};
use fraud_intel::{next_state, MerchantRiskState, RiskThresholds};
use proptest::prelude::*;

const STATES: [MerchantRiskState; 4] = [
    MerchantRiskState::New,
    MerchantRiskState::Trusted,
    MerchantRiskState::Watchlist,
    MerchantRiskState::Blocked,
];

fn days_ago(days: i64) -> DateTime<Utc> {
    Utc::now() - Duration::days(days)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// States never move backwards: the transition relation only walks
    /// toward BLOCKED.
    #[test]
    fn prop_transitions_are_monotone(
        txns in 0u64..10_000,
        refunds in 0u64..10_000,
        days in 0i64..3650,
        state_idx in 0usize..4,
        impersonating in any::<bool>(),
    ) {
        let current = STATES[state_idx];
        let next = next_state(
            txns,
            refunds,
            days_ago(days),
            current,
            impersonating,
            Utc::now(),
            &RiskThresholds::default(),
        );
        prop_assert!(next >= current);
    }

    /// With fixed evidence, repeated application reaches a fixpoint
    /// within the height of the state lattice.
    #[test]
    fn prop_converges_to_fixpoint(
        txns in 0u64..10_000,
        refunds in 0u64..10_000,
        days in 0i64..3650,
        state_idx in 0usize..4,
    ) {
        let thresholds = RiskThresholds::default();
        let now = Utc::now();
        let first_seen = days_ago(days);

        let mut state = STATES[state_idx];
        for _ in 0..3 {
            state = next_state(txns, refunds, first_seen, state, false, now, &thresholds);
        }
        let settled = next_state(txns, refunds, first_seen, state, false, now, &thresholds);
        prop_assert_eq!(state, settled);
    }
}
