use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    services::{Enricher, PreferencesStore, Recommender, ResultBoard},
};

pub mod preferences;
pub mod recommendations;

/// Shared application state
pub struct AppState {
    pub recommender: Arc<dyn Recommender>,
    pub enricher: Enricher,
    pub board: ResultBoard,
    pub preferences: PreferencesStore,
}

impl AppState {
    pub fn new(
        recommender: Arc<dyn Recommender>,
        enricher: Enricher,
        preferences: PreferencesStore,
    ) -> Self {
        Self {
            recommender,
            enricher,
            board: ResultBoard::new(),
            preferences,
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/genres", get(recommendations::genres))
        .route("/recommendations/title", get(recommendations::by_title))
        .route("/recommendations/genres", post(recommendations::by_genres))
        .route(
            "/recommendations/cluster/:cluster_id",
            get(recommendations::by_cluster),
        )
        .route("/recommendations/latest/:kind", get(recommendations::latest))
        .route(
            "/preferences",
            get(preferences::get_preferences).put(preferences::update_preferences),
        )
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
