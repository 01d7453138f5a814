use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

/// Tracks which trade ids have already produced an alert.
///
/// Guarantees at most one alert per distinct trade id: `mark_alerted` is
/// called exactly once, at compose time, on the orchestrator's single
/// sequential processing path. Insertion times let old entries be pruned
/// once the venue can no longer return those trade ids.
#[derive(Debug, Default)]
pub struct AlertDeduplicator {
    alerted: HashMap<String, DateTime<Utc>>,
}

impl AlertDeduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn should_alert(&self, trade_id: &str) -> bool {
        !self.alerted.contains_key(trade_id)
    }

    pub fn mark_alerted(&mut self, trade_id: &str, now: DateTime<Utc>) {
        self.alerted.insert(trade_id.to_string(), now);
    }

    /// Drop entries older than `retention`. Returns how many were pruned.
    pub fn prune(&mut self, now: DateTime<Utc>, retention: Duration) -> usize {
        let before = self.alerted.len();
        self.alerted.retain(|_, marked_at| now - *marked_at < retention);
        before - self.alerted.len()
    }

    pub fn len(&self) -> usize {
        self.alerted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerted.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_alert_once_per_trade_id() {
        let mut dedup = AlertDeduplicator::new();
        assert!(dedup.should_alert("0xtx1"));

        dedup.mark_alerted("0xtx1", Utc::now());
        assert!(!dedup.should_alert("0xtx1"));
        assert!(dedup.should_alert("0xtx2"));

        // Re-marking is harmless and still suppresses.
        dedup.mark_alerted("0xtx1", Utc::now());
        assert!(!dedup.should_alert("0xtx1"));
        assert_eq!(dedup.len(), 1);
    }

    #[test]
    fn test_prune_drops_only_expired_entries() {
        let mut dedup = AlertDeduplicator::new();
        let now = Utc::now();

        dedup.mark_alerted("0xold", now - Duration::hours(48));
        dedup.mark_alerted("0xrecent", now - Duration::hours(1));

        let pruned = dedup.prune(now, Duration::hours(24));
        assert_eq!(pruned, 1);
        assert!(dedup.should_alert("0xold"));
        assert!(!dedup.should_alert("0xrecent"));
    }
}
