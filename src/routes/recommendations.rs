use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{RecommendationResponse, SearchKind, YearRange, GENRES},
    routes::AppState,
    services::{recommendations, RecommendationSource},
};

// Bounds are spelled out per struct: `serde(flatten)` cannot parse numbers
// out of query strings.

/// Optional client-side year bounds
#[derive(Debug, Default, Deserialize)]
pub struct YearBounds {
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct TitleQuery {
    pub title: Option<String>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct GenreRequest {
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub min_year: Option<i32>,
    #[serde(default)]
    pub max_year: Option<i32>,
}

/// Runs a validated source through the pipeline as the newest action of its kind
async fn recommend(
    state: &AppState,
    request_id: &RequestId,
    source: RecommendationSource,
    range: Option<YearRange>,
) -> AppResult<Json<RecommendationResponse>> {
    let kind = source.kind();

    tracing::info!(
        request_id = %request_id,
        kind = %kind,
        year_range = ?range,
        "Processing recommendation request"
    );

    let results = state
        .board
        .run(
            kind,
            recommendations::get_recommendations(
                state.recommender.as_ref(),
                &state.enricher,
                &source,
                range,
            ),
        )
        .await?;

    Ok(Json(RecommendationResponse::new(kind, results)))
}

/// Handler for recommendations by title
pub async fn by_title(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<TitleQuery>,
) -> AppResult<Json<RecommendationResponse>> {
    let title = params
        .title
        .as_deref()
        .ok_or_else(|| AppError::InvalidInput("Missing title parameter".to_string()))?;
    let source = RecommendationSource::title(title)?;

    let range = YearRange::from_bounds(params.min_year, params.max_year);

    recommend(&state, &request_id, source, range).await
}

/// Handler for recommendations by genre set
///
/// Year bounds go to the recommender and are applied again after enrichment.
pub async fn by_genres(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<GenreRequest>, JsonRejection>,
) -> AppResult<Json<RecommendationResponse>> {
    let Json(request) = payload?;
    let source =
        RecommendationSource::genres(&request.genres, request.min_year, request.max_year)?;
    let range = YearRange::from_bounds(request.min_year, request.max_year);

    recommend(&state, &request_id, source, range).await
}

/// Handler for recommendations by cluster
pub async fn by_cluster(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(cluster_id): Path<i64>,
    Query(bounds): Query<YearBounds>,
) -> AppResult<Json<RecommendationResponse>> {
    let source = RecommendationSource::cluster(cluster_id)?;

    let range = YearRange::from_bounds(bounds.min_year, bounds.max_year);

    recommend(&state, &request_id, source, range).await
}

/// Most recently published results for one action kind
pub async fn latest(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<SearchKind>,
) -> AppResult<Json<RecommendationResponse>> {
    let results = state
        .board
        .latest(kind)
        .await
        .ok_or_else(|| AppError::NotFound(format!("No {} results published yet", kind)))?;

    Ok(Json(RecommendationResponse::new(kind, results)))
}

/// Genre catalogue accepted by the genre endpoint
pub async fn genres() -> Json<Vec<&'static str>> {
    Json(GENRES.to_vec())
}
