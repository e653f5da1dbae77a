use std::sync::Arc;

use tokio::{sync::Semaphore, task::JoinSet};

use crate::{
    models::{EnrichedEntry, Metadata, RecommendationEntry},
    services::{providers::MetadataLookup, title_normalizer::normalize},
};

/// Fans metadata lookups out over a ranked result list and merges them back.
///
/// Every entry gets its own task; results are merged by position, never by
/// title, because titles repeat. The output always has the input's length and
/// order.
#[derive(Clone)]
pub struct Enricher {
    lookup: Arc<dyn MetadataLookup>,
    /// Caps lookups in flight within one `enrich` call; `None` runs them all at once
    max_concurrency: Option<usize>,
}

impl Enricher {
    pub fn new(lookup: Arc<dyn MetadataLookup>) -> Self {
        Self {
            lookup,
            max_concurrency: None,
        }
    }

    /// Bounds the number of concurrent lookups per `enrich` call.
    ///
    /// Each call gets its own permits, so concurrent requests never queue
    /// behind each other. A limit of zero is treated as one.
    pub fn with_concurrency_limit(mut self, limit: usize) -> Self {
        self.max_concurrency = Some(limit.max(1));
        self
    }

    pub fn max_concurrency(&self) -> Option<usize> {
        self.max_concurrency
    }

    /// Enriches every entry, waiting for all lookups to settle.
    ///
    /// Never fails: a lookup that panics or is otherwise lost yields absent
    /// metadata for its entry only. Dropping the returned future aborts every
    /// lookup still pending.
    pub async fn enrich(&self, entries: Vec<RecommendationEntry>) -> Vec<EnrichedEntry> {
        if entries.is_empty() {
            return Vec::new();
        }

        tracing::debug!(
            entries = entries.len(),
            provider = self.lookup.name(),
            max_concurrency = ?self.max_concurrency,
            "Enriching recommendations"
        );

        let limiter = self.max_concurrency.map(|limit| Arc::new(Semaphore::new(limit)));
        let mut tasks = JoinSet::new();

        for (index, entry) in entries.iter().enumerate() {
            let lookup = Arc::clone(&self.lookup);
            let limiter = limiter.clone();
            let query = normalize(&entry.title);

            tasks.spawn(async move {
                // The semaphore is never closed, so acquiring only waits.
                let _permit = match limiter {
                    Some(limiter) => limiter.acquire_owned().await.ok(),
                    None => None,
                };
                (index, lookup.lookup(&query).await)
            });
        }

        // Slots are filled by index, so completion order never matters.
        let mut slots: Vec<Option<Metadata>> = vec![None; entries.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, metadata)) => slots[index] = Some(metadata),
                Err(e) => tracing::error!(error = %e, "Lookup task join error"),
            }
        }

        let mut degraded = 0usize;
        let enriched: Vec<EnrichedEntry> = entries
            .into_iter()
            .zip(slots)
            .map(|(entry, metadata)| {
                let metadata = metadata.unwrap_or_else(Metadata::absent);
                if metadata.is_absent() {
                    degraded += 1;
                }
                EnrichedEntry::new(entry, metadata)
            })
            .collect();

        if degraded > 0 {
            tracing::warn!(
                total = enriched.len(),
                without_metadata = degraded,
                "Some recommendations have no metadata"
            );
        }

        enriched
    }
}
