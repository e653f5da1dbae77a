use crate::{
    error::AppResult,
    models::{EnrichedEntry, YearRange},
    services::{
        enrichment::Enricher, recommender::Recommender, sources::RecommendationSource,
        year_filter::filter_by_year,
    },
};

/// Runs one user action end to end: recommender request, enrichment, then the
/// optional year filter.
///
/// Only a recommender failure is returned as an error; metadata problems
/// degrade individual entries instead.
pub async fn get_recommendations(
    recommender: &dyn Recommender,
    enricher: &Enricher,
    source: &RecommendationSource,
    range: Option<YearRange>,
) -> AppResult<Vec<EnrichedEntry>> {
    let entries = source.fetch(recommender).await?;
    let received = entries.len();

    let enriched = enricher.enrich(entries).await;

    let results = match range {
        Some(range) => filter_by_year(enriched, range),
        None => enriched,
    };

    tracing::info!(
        kind = %source.kind(),
        received,
        returned = results.len(),
        year_range = ?range,
        "Recommendations enriched"
    );

    Ok(results)
}
