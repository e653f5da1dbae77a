use std::collections::HashMap;
use std::future::Future;

use tokio::sync::{watch, RwLock};

use crate::{
    error::{AppError, AppResult},
    models::{EnrichedEntry, SearchKind},
};

/// The shared "currently displayed" result list per action kind.
///
/// Each kind has a generation counter. Starting an action bumps it, which
/// cancels any older in-flight action of that kind and bars it from
/// publishing, so a slow batch can never overwrite a newer one.
pub struct ResultBoard {
    generations: HashMap<SearchKind, watch::Sender<u64>>,
    published: RwLock<HashMap<SearchKind, Vec<EnrichedEntry>>>,
}

/// Proof of which generation an action started under
pub struct Ticket {
    kind: SearchKind,
    generation: u64,
    watcher: watch::Receiver<u64>,
}

impl Ticket {
    pub fn kind(&self) -> SearchKind {
        self.kind
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Resolves once a newer action of the same kind has started
    pub async fn superseded(&mut self) {
        loop {
            if *self.watcher.borrow_and_update() != self.generation {
                return;
            }
            if self.watcher.changed().await.is_err() {
                // Board dropped; nothing can supersede us any more
                std::future::pending::<()>().await;
            }
        }
    }
}

impl Default for ResultBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultBoard {
    pub fn new() -> Self {
        let generations = SearchKind::ALL
            .into_iter()
            .map(|kind| (kind, watch::channel(0u64).0))
            .collect();

        Self {
            generations,
            published: RwLock::new(HashMap::new()),
        }
    }

    fn sender(&self, kind: SearchKind) -> &watch::Sender<u64> {
        // Every kind is inserted in `new`
        &self.generations[&kind]
    }

    /// Starts a new action of `kind`, superseding any in flight
    pub fn begin(&self, kind: SearchKind) -> Ticket {
        let sender = self.sender(kind);
        let mut generation = 0;
        sender.send_modify(|current| {
            *current += 1;
            generation = *current;
        });

        Ticket {
            kind,
            generation,
            watcher: sender.subscribe(),
        }
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        *self.sender(ticket.kind).borrow() == ticket.generation
    }

    /// Publishes results if the ticket is still the newest for its kind.
    ///
    /// Returns `false` when a newer action exists; nothing is written then.
    pub async fn publish(&self, ticket: &Ticket, results: Vec<EnrichedEntry>) -> bool {
        let mut published = self.published.write().await;
        if !self.is_current(ticket) {
            return false;
        }
        published.insert(ticket.kind, results);
        true
    }

    /// Most recently published list for `kind`
    pub async fn latest(&self, kind: SearchKind) -> Option<Vec<EnrichedEntry>> {
        self.published.read().await.get(&kind).cloned()
    }

    /// Runs `work` as the newest action of `kind` and publishes its results.
    ///
    /// If another action of the same kind starts first, `work` is dropped and
    /// [`AppError::Superseded`] is returned.
    pub async fn run<F>(&self, kind: SearchKind, work: F) -> AppResult<Vec<EnrichedEntry>>
    where
        F: Future<Output = AppResult<Vec<EnrichedEntry>>>,
    {
        let mut ticket = self.begin(kind);
        let generation = ticket.generation();

        let results = tokio::select! {
            result = work => result?,
            _ = ticket.superseded() => {
                tracing::info!(kind = %kind, generation, "Action superseded, cancelled");
                return Err(AppError::Superseded(kind.to_string()));
            }
        };

        if !self.publish(&ticket, results.clone()).await {
            tracing::info!(kind = %kind, generation, "Stale results discarded");
            return Err(AppError::Superseded(kind.to_string()));
        }

        Ok(results)
    }
}
