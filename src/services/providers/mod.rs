/// Metadata provider abstraction
///
/// A provider resolves a bare movie title to display metadata (poster, rating,
/// release year). Lookups are infallible at this boundary: transport errors,
/// bad statuses, malformed bodies and empty result sets all come back as
/// [`Metadata::absent`], so one missing poster never hides a recommendation.
use crate::models::Metadata;

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Trait for metadata lookup providers
///
/// Each call performs at most one outbound request. Callers pass the
/// normalized (year-stripped) title and own any concurrency control.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataLookup: Send + Sync {
    /// Look up metadata for a normalized title
    async fn lookup(&self, title: &str) -> Metadata;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
