use std::collections::HashSet;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use axum_extra::extract::CookieJar;
use bitebuddy_search::{SearchSession, SearchType};
use bitebuddy_shared::{Meal, SavedRecipe};
use serde::Deserialize;
use validator::Validate;

use crate::{error::AppResult, middleware::optional_auth, routes::AppState};

#[derive(Deserialize, Validate)]
pub struct SearchParams {
    #[serde(default)]
    #[validate(length(max = 100))]
    pub q: String,
    #[serde(default, rename = "type")]
    pub search_type: SearchType,
}

#[derive(Deserialize, Validate)]
pub struct SuggestionParams {
    #[serde(default)]
    #[validate(length(max = 100))]
    pub q: String,
}

#[derive(Deserialize, Validate)]
pub struct RandomParams {
    #[validate(range(min = 1, max = 100))]
    pub count: Option<usize>,
}

/// Saved recipes of the signed-in caller, empty for anonymous visitors
async fn saved_for(app_state: &AppState, jar: &CookieJar) -> AppResult<Vec<SavedRecipe>> {
    match optional_auth(app_state, jar) {
        Some(auth) => Ok(app_state.store.list(&auth.user_id).await?),
        None => Ok(vec![]),
    }
}

/// GET /api/meals/search?q=&type=recipe|ingredient
pub async fn search(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<Meal>>> {
    params.validate()?;

    let saved = saved_for(&app_state, &jar).await?;
    let mut session = SearchSession::new(app_state.query.clone());
    session.set_search_type(params.search_type);
    session.set_query(params.q);
    session.search(&saved).await;

    Ok(Json(session.results().to_vec()))
}

/// GET /api/meals/suggestions?q=
pub async fn suggestions(
    State(app_state): State<AppState>,
    Query(params): Query<SuggestionParams>,
) -> AppResult<Json<Vec<Meal>>> {
    params.validate()?;

    let mut session = SearchSession::new(app_state.query.clone());
    session.input(params.q).await;

    Ok(Json(session.suggestions().to_vec()))
}

/// GET /api/meals/random?count=
pub async fn random(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<RandomParams>,
) -> AppResult<Json<Vec<Meal>>> {
    params.validate()?;

    let config = &app_state.config.random;
    let count = params
        .count
        .unwrap_or(config.default_count)
        .min(config.max_count);

    let exclude = saved_for(&app_state, &jar)
        .await?
        .into_iter()
        .map(|recipe| recipe.meal.id)
        .collect::<HashSet<_>>();

    let meals = config.sampler(count).sample(&app_state.query, &exclude).await;

    Ok(Json(meals))
}

/// GET /api/meals/{id}
pub async fn detail(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Meal>> {
    Ok(Json(app_state.query.lookup_by_id(&id).await?))
}
