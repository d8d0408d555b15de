use std::{sync::Arc, time::Duration};

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use bitebuddy_mealdb::{MealApi, RecipeQuery};
use bitebuddy_recipe::{DeleteBatcher, RecipeStore, Recommender};
use bitebuddy_search::SearchSessions;
use bitebuddy_user::IdentityVerifier;
use sqlx::SqlitePool;
use tokio::sync::watch;

use crate::{config::Config, middleware::auth_middleware};

mod auth;
mod health;
mod meals;
mod recipes;
mod recommendations;
mod search;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub pool: SqlitePool,
    pub query: RecipeQuery,
    pub store: RecipeStore,
    pub batcher: DeleteBatcher,
    pub recommender: Recommender,
    pub search: SearchSessions,
    pub identity: IdentityVerifier,
    pub user_command: bitebuddy_user::Command,
    pub user_query: bitebuddy_user::Query,
    shutdown: watch::Sender<bool>,
}

impl AppState {
    pub fn new(config: Config, pool: SqlitePool, api: Arc<dyn MealApi>) -> anyhow::Result<Self> {
        let query = RecipeQuery::from_arc(api);
        let store = RecipeStore::new(pool.clone());
        let batcher = DeleteBatcher::new(
            store.clone(),
            Duration::from_millis(config.recipes.delete_batch_window_ms),
        );
        let recommender = Recommender::new(query.clone(), config.recommendations.max_ingredients);
        let search = SearchSessions::new(query.clone());
        let identity = IdentityVerifier::new(
            &config.auth.identity_key()?,
            &config.auth.identity_issuer,
            &config.auth.identity_audience,
        )?;

        Ok(Self {
            user_command: bitebuddy_user::Command(pool.clone()),
            user_query: bitebuddy_user::Query(pool.clone()),
            config,
            pool,
            query,
            store,
            batcher,
            recommender,
            search,
            identity,
            shutdown: watch::Sender::new(false),
        })
    }

    /// Ends every open recipe stream so in-flight connections can drain.
    pub fn shutdown(&self) {
        self.shutdown.send_replace(true);
    }

    /// Resolves once [`AppState::shutdown`] has been called.
    pub fn on_shutdown(&self) -> impl Future<Output = ()> + Send + use<> {
        let mut shutdown = self.shutdown.subscribe();

        async move {
            // An error means the state is gone, which is a shutdown too.
            let _ = shutdown.wait_for(|stopped| *stopped).await;
        }
    }
}

pub fn router(app_state: AppState) -> Router {
    let protected = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/api/recipes", get(recipes::list).post(recipes::create))
        .route("/api/recipes/stream", get(recipes::stream))
        .route("/api/recipes/{id}", delete(recipes::remove))
        .route("/api/recommendations", get(recommendations::list))
        .route("/api/search", get(search::view))
        .route("/api/search/input", post(search::input))
        .route("/api/search/key", post(search::key))
        .route("/api/search/pick", post(search::pick))
        .route("/api/search/selected", delete(search::clear_selected))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    Router::new()
        // Health check endpoints (no auth required)
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .with_state(app_state.pool.clone())
        .route("/auth/session", post(auth::session))
        .route("/auth/logout", post(auth::logout))
        .route("/api/meals/search", get(meals::search))
        .route("/api/meals/suggestions", get(meals::suggestions))
        .route("/api/meals/random", get(meals::random))
        .route("/api/meals/{id}", get(meals::detail))
        .merge(protected)
        .with_state(app_state)
}
