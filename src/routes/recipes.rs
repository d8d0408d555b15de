use std::convert::Infallible;

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
};
use bitebuddy_shared::{Meal, SavedRecipe};
use futures::{Stream, StreamExt};
use serde::Deserialize;
use validator::{ValidationError, ValidationErrors};

use crate::{error::AppResult, middleware::Auth, routes::AppState};

#[derive(Deserialize, Default)]
pub struct RemoveParams {
    #[serde(default)]
    pub batched: bool,
}

/// GET /api/recipes
pub async fn list(
    State(app_state): State<AppState>,
    Extension(auth): Extension<Auth>,
) -> AppResult<Json<Vec<SavedRecipe>>> {
    Ok(Json(app_state.store.list(&auth.user_id).await?))
}

/// POST /api/recipes - save a meal, 409 when it is already saved
pub async fn create(
    State(app_state): State<AppState>,
    Extension(auth): Extension<Auth>,
    Json(meal): Json<Meal>,
) -> AppResult<(StatusCode, Json<SavedRecipe>)> {
    if meal.id.trim().is_empty() {
        let mut errors = ValidationErrors::new();
        errors.add("id", ValidationError::new("required"));
        return Err(errors.into());
    }

    let saved = app_state.store.add(&auth.user_id, meal).await?;

    Ok((StatusCode::CREATED, Json(saved)))
}

/// DELETE /api/recipes/{id}?batched=true
///
/// Batched deletes are queued and committed together once the delete window goes quiet.
pub async fn remove(
    State(app_state): State<AppState>,
    Extension(auth): Extension<Auth>,
    Path(id): Path<String>,
    Query(params): Query<RemoveParams>,
) -> AppResult<StatusCode> {
    if params.batched {
        if !app_state.batcher.delete(&auth.user_id, &id) {
            tracing::warn!(recipe_id = %id, "delete batcher is closed, removing directly");
            app_state.store.remove(&auth.user_id, &id).await?;
            return Ok(StatusCode::NO_CONTENT);
        }

        return Ok(StatusCode::ACCEPTED);
    }

    app_state.store.remove(&auth.user_id, &id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/recipes/stream - server-sent snapshots of the caller's saved recipes
pub async fn stream(
    State(app_state): State<AppState>,
    Extension(auth): Extension<Auth>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let user_id = auth.user_id;
    tracing::debug!(user_id = %user_id, "recipe stream opened");

    let events = app_state
        .store
        .subscribe(&user_id)
        .into_stream()
        .take_until(app_state.on_shutdown())
        .map(move |snapshot| {
            let event = match snapshot {
                Ok(recipes) => Event::default().event("snapshot").json_data(&recipes),
                Err(e) => {
                    tracing::error!(user_id = %user_id, "recipe stream failed: {e}");
                    Ok(Event::default().event("error").data("Could not load saved recipes"))
                }
            };

            Ok(event.unwrap_or_else(|e| {
                tracing::error!("failed to encode snapshot: {e}");
                Event::default().event("error").data("Could not encode saved recipes")
            }))
        });

    Sse::new(events).keep_alive(KeepAlive::default())
}
