//! Append-only event sink
//!
//! Appends are serialized by a single mutex, which gives the sequence
//! numbers their total order. Reads clone a snapshot so callers can never
//! observe (or cause) a torn ledger.

use crate::types::{AuditEvent, AuditEventType};
use chrono::Utc;
use parking_lot::Mutex;

/// Append-only audit ledger
#[derive(Debug, Default)]
pub struct AuditLedger {
    events: Mutex<Vec<AuditEvent>>,
}

impl AuditLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event; returns its sequence number
    pub fn log_event(&self, event_type: AuditEventType, payload: serde_json::Value) -> u64 {
        let mut events = self.events.lock();
        let sequence = events.len() as u64;

        tracing::debug!(
            event_type = event_type.as_str(),
            sequence,
            "Audit event appended"
        );

        events.push(AuditEvent {
            sequence,
            event_type,
            payload,
            timestamp: Utc::now(),
        });

        sequence
    }

    /// Snapshot of all events in append order
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().clone()
    }

    /// Snapshot of events of one type, in append order
    pub fn events_of_type(&self, event_type: AuditEventType) -> Vec<AuditEvent> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.event_type == event_type)
            .cloned()
            .collect()
    }

    /// Number of events appended so far
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// True if nothing has been appended
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_append_assigns_monotonic_sequence() {
        let ledger = AuditLedger::new();

        let s0 = ledger.log_event(AuditEventType::ExecutionStarted, json!({"txn": "a"}));
        let s1 = ledger.log_event(AuditEventType::ExecutionCompleted, json!({"txn": "a"}));
        let s2 = ledger.log_event(AuditEventType::PolicyEvaluated, json!({}));

        assert_eq!((s0, s1, s2), (0, 1, 2));

        let events = ledger.events();
        assert_eq!(events.len(), 3);
        assert!(events.windows(2).all(|w| w[0].sequence < w[1].sequence));
    }

    #[test]
    fn test_snapshot_is_detached() {
        let ledger = AuditLedger::new();
        ledger.log_event(AuditEventType::RiskStateChanged, json!({"vpa": "shop@upi"}));

        let mut snapshot = ledger.events();
        snapshot.clear();

        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_events_of_type_filters() {
        let ledger = AuditLedger::new();
        ledger.log_event(AuditEventType::ExecutionStarted, json!({}));
        ledger.log_event(AuditEventType::ExecutionFailed, json!({}));
        ledger.log_event(AuditEventType::ExecutionStarted, json!({}));

        let started = ledger.events_of_type(AuditEventType::ExecutionStarted);
        assert_eq!(started.len(), 2);
        assert!(ledger.events_of_type(AuditEventType::ExecutionCompleted).is_empty());
    }
}
