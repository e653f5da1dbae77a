use axum::{extract::State, Json};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{Preferences, Theme},
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct UpdatePreferencesRequest {
    pub theme: Theme,
}

/// Current UI preferences
pub async fn get_preferences(State(state): State<Arc<AppState>>) -> Json<Preferences> {
    Json(state.preferences.get().await)
}

/// Update UI preferences; saved before the response is sent
pub async fn update_preferences(
    State(state): State<Arc<AppState>>,
    Json(request): Json<UpdatePreferencesRequest>,
) -> AppResult<Json<Preferences>> {
    let prefs = state.preferences.set_theme(request.theme).await?;
    Ok(Json(prefs))
}
