//! In-memory quote memoization using moka
//!
//! The pipeline is pure, so an outcome can be reused for an identical draft.
//! Keys are the draft's JSON serialization; any change to any input is a new key.

use moka::sync::Cache;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::pricing::models::EventDraft;
use crate::pricing::summary::QuoteOutcome;

/// Memoized quote outcomes keyed by draft snapshot
#[derive(Clone)]
pub struct QuoteCache {
    /// Quotes (draft json -> outcome)
    pub quotes: Cache<String, Arc<QuoteOutcome>>,
}

impl QuoteCache {
    pub fn new(max_capacity: u64, time_to_live: Duration) -> Self {
        Self {
            quotes: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(time_to_live)
                .build(),
        }
    }

    /// Cache key for a draft
    pub fn draft_key(draft: &EventDraft) -> Result<String, serde_json::Error> {
        serde_json::to_string(draft)
    }

    pub fn get(&self, key: &str) -> Option<Arc<QuoteOutcome>> {
        self.quotes.get(key)
    }

    pub fn insert(&self, key: String, outcome: Arc<QuoteOutcome>) {
        self.quotes.insert(key, outcome);
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        self.quotes.run_pending_tasks();
        CacheStats {
            quotes_size: self.quotes.entry_count(),
        }
    }

    /// Invalidate all cached quotes
    pub fn invalidate_all(&self) {
        self.quotes.invalidate_all();
        info!("Quote cache invalidated");
    }
}

/// Cache statistics for monitoring
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub quotes_size: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::aggregator::PendingReason;

    #[test]
    fn test_draft_key_changes_with_input() {
        let mut draft = EventDraft::new();
        let before = QuoteCache::draft_key(&draft).unwrap();
        assert_eq!(before, QuoteCache::draft_key(&draft.clone()).unwrap());

        draft.guest_count = 2;
        assert_ne!(before, QuoteCache::draft_key(&draft).unwrap());
    }

    #[test]
    fn test_insert_get_and_invalidate() {
        let cache = QuoteCache::new(10, Duration::from_secs(60));
        let outcome = Arc::new(QuoteOutcome::Pending(PendingReason::BasePriceNotLoaded));

        cache.insert("k".to_string(), outcome.clone());
        assert_eq!(cache.get("k").as_deref(), Some(outcome.as_ref()));
        assert_eq!(cache.stats().quotes_size, 1);

        cache.invalidate_all();
        assert!(cache.get("k").is_none());
        assert_eq!(cache.stats().quotes_size, 0);
    }
}
