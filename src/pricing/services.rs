//! Pricing service: the configured entry point callers use after every draft mutation.
//!
//! Wraps the pure pipeline with request parsing, optional memoization and response
//! shaping. Nothing here changes the numbers the pipeline produces.

use std::sync::Arc;

use crate::cache::{CacheStats, QuoteCache};
use crate::config::Config;
use crate::error::{PricingError, Result};

use super::models::EventDraft;
use super::requests::EventDraftRequest;
use super::responses::QuoteResponse;
use super::summary::{quote_draft, QuoteOutcome};

/// Quotes event drafts
#[derive(Clone)]
pub struct Quoter {
    config: Config,
    cache: Option<QuoteCache>,
}

impl Quoter {
    pub fn new(config: Config) -> Self {
        let cache = config
            .cache_enabled()
            .then(|| QuoteCache::new(config.cache_capacity, config.cache_ttl));
        Self { config, cache }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the pipeline, reusing a memoized outcome for an identical draft.
    ///
    /// Validation failures are never memoized.
    pub fn quote(&self, draft: &EventDraft) -> Result<Arc<QuoteOutcome>> {
        let Some(cache) = &self.cache else {
            return Ok(Arc::new(quote_draft(draft)?));
        };

        let key = match QuoteCache::draft_key(draft) {
            Ok(key) => key,
            Err(e) => {
                tracing::warn!("Failed to build quote cache key, computing uncached: {}", e);
                return Ok(Arc::new(quote_draft(draft)?));
            }
        };

        if let Some(cached) = cache.get(&key) {
            tracing::debug!("Cache HIT for draft quote");
            return Ok(cached);
        }

        tracing::debug!("Cache MISS for draft quote");
        let outcome = Arc::new(quote_draft(draft)?);
        cache.insert(key, outcome.clone());
        Ok(outcome)
    }

    /// Quote a draft and shape the wire response.
    pub fn quote_response(&self, draft: &EventDraft) -> Result<QuoteResponse> {
        let outcome = self.quote(draft)?;
        Ok(QuoteResponse::from_outcome(&outcome, &self.config.currency))
    }

    /// Quote a wire-form draft.
    pub fn quote_request(&self, request: EventDraftRequest) -> Result<QuoteResponse> {
        let draft = EventDraft::try_from(request)?;
        self.quote_response(&draft)
    }

    /// Quote a draft snapshot sent as JSON.
    pub fn quote_json(&self, body: &str) -> Result<QuoteResponse> {
        let request: EventDraftRequest = serde_json::from_str(body)?;
        self.quote_request(request).inspect_err(|e| {
            if let PricingError::Validation(err) = e {
                tracing::info!("Rejected draft: {}", err);
            }
        })
    }

    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(QuoteCache::stats)
    }

    /// Drop memoized outcomes, e.g. after catalog prices change upstream.
    pub fn invalidate_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.invalidate_all();
        }
    }
}

impl Default for Quoter {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::pricing::models::{LineItem, LineItemKind};
    use rust_decimal_macros::dec;

    fn uncached() -> Quoter {
        Quoter::new(Config {
            cache_capacity: 0,
            ..Config::default()
        })
    }

    fn draft() -> EventDraft {
        let mut draft = EventDraft::new();
        draft
            .line_items
            .push(LineItem::new("a", "Cake", LineItemKind::Custom, dec!(5000)));
        draft
            .line_items
            .push(LineItem::new("b", "Flowers", LineItemKind::Custom, dec!(3000)));
        draft
    }

    #[test]
    fn test_cached_and_uncached_agree() {
        let cached = Quoter::default();
        let first = cached.quote(&draft()).unwrap();
        let second = cached.quote(&draft()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let fresh = uncached().quote(&draft()).unwrap();
        assert_eq!(*first, *fresh);
        assert_eq!(cached.cache_stats().unwrap().quotes_size, 1);
    }

    #[test]
    fn test_uncached_has_no_stats() {
        let quoter = uncached();
        assert!(quoter.cache_stats().is_none());
        quoter.invalidate_cache();
    }

    #[test]
    fn test_invalidate_cache() {
        let quoter = Quoter::default();
        quoter.quote(&draft()).unwrap();
        quoter.invalidate_cache();
        assert_eq!(quoter.cache_stats().unwrap().quotes_size, 0);
    }

    #[test]
    fn test_validation_errors_not_cached() {
        let quoter = Quoter::default();
        let mut bad = draft();
        bad.guest_count = 0;
        assert!(matches!(
            quoter.quote(&bad),
            Err(PricingError::Validation(ValidationError::InvalidGuestCount(0)))
        ));
        assert_eq!(quoter.cache_stats().unwrap().quotes_size, 0);
    }

    #[test]
    fn test_quote_response_uses_configured_currency() {
        let quoter = Quoter::new(Config {
            currency: "PHP".to_string(),
            ..Config::default()
        });
        let response = quoter.quote_response(&draft()).unwrap();
        assert_eq!(response.gross_total.amount, dec!(8000));
        assert_eq!(response.gross_total.currency, "PHP");
    }

    #[test]
    fn test_quote_json_malformed_body() {
        let err = Quoter::default().quote_json("{ not json").unwrap_err();
        assert!(matches!(err, PricingError::Serialization(_)));
    }
}
