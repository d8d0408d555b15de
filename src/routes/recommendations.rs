use axum::{Extension, Json, extract::State};
use bitebuddy_shared::Meal;

use crate::{error::AppResult, middleware::Auth, routes::AppState};

/// GET /api/recommendations - meals sharing ingredients with the caller's saved recipes
pub async fn list(
    State(app_state): State<AppState>,
    Extension(auth): Extension<Auth>,
) -> AppResult<Json<Vec<Meal>>> {
    let saved = app_state.store.list(&auth.user_id).await?;
    let meals = app_state.recommender.recommend(&saved).await;

    tracing::debug!(
        user_id = %auth.user_id,
        saved = saved.len(),
        recommended = meals.len(),
        "recommendations built"
    );

    Ok(Json(meals))
}
