use axum::{Extension, Json, extract::State};
use bitebuddy_search::{Key, KeyOutcome, SearchType, SearchView};
use bitebuddy_shared::Error;
use serde::Deserialize;
use validator::Validate;

use crate::{error::AppResult, middleware::Auth, routes::AppState};

#[derive(Deserialize, Validate)]
pub struct InputPayload {
    #[serde(default)]
    #[validate(length(max = 100))]
    pub query: String,
    #[serde(rename = "type")]
    pub search_type: Option<SearchType>,
}

#[derive(Deserialize)]
pub struct KeyPayload {
    pub key: Key,
}

#[derive(Deserialize)]
pub struct PickPayload {
    pub index: usize,
}

/// GET /api/search - the caller's search box and selected meal
pub async fn view(
    State(app_state): State<AppState>,
    Extension(auth): Extension<Auth>,
) -> Json<SearchView> {
    let state = app_state.search.get(&auth.user_id).await;
    let view = state.lock().await.view();

    Json(view)
}

/// POST /api/search/input - type into the search box
pub async fn input(
    State(app_state): State<AppState>,
    Extension(auth): Extension<Auth>,
    Json(input): Json<InputPayload>,
) -> AppResult<Json<SearchView>> {
    input.validate()?;

    let state = app_state.search.get(&auth.user_id).await;
    let mut state = state.lock().await;
    if let Some(search_type) = input.search_type {
        state.session.set_search_type(search_type);
    }
    state.session.input(input.query).await;

    Ok(Json(state.view()))
}

/// POST /api/search/key - navigate suggestions or submit
pub async fn key(
    State(app_state): State<AppState>,
    Extension(auth): Extension<Auth>,
    Json(input): Json<KeyPayload>,
) -> AppResult<Json<SearchView>> {
    let saved = app_state.store.list(&auth.user_id).await?;

    let state = app_state.search.get(&auth.user_id).await;
    let mut state = state.lock().await;
    if let KeyOutcome::Selected(meal) = state.session.key(input.key, &saved).await {
        tracing::debug!(user_id = %auth.user_id, meal_id = %meal.id, "suggestion selected");
        state.selected.select(meal);
    }

    Ok(Json(state.view()))
}

/// POST /api/search/pick - select the suggestion at `index`
pub async fn pick(
    State(app_state): State<AppState>,
    Extension(auth): Extension<Auth>,
    Json(input): Json<PickPayload>,
) -> AppResult<Json<SearchView>> {
    let state = app_state.search.get(&auth.user_id).await;
    let mut state = state.lock().await;
    let Some(meal) = state.session.pick(input.index) else {
        return Err(Error::NotFound(format!("suggestion {}", input.index)).into());
    };
    state.selected.select(meal);

    Ok(Json(state.view()))
}

/// DELETE /api/search/selected - close the detail view
pub async fn clear_selected(
    State(app_state): State<AppState>,
    Extension(auth): Extension<Auth>,
) -> Json<SearchView> {
    let state = app_state.search.get(&auth.user_id).await;
    let mut state = state.lock().await;
    state.selected.clear();

    Json(state.view())
}
