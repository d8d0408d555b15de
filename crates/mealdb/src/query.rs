use std::{collections::HashSet, future::Future, sync::Arc};

use bitebuddy_shared::{Error, Meal, Result};

use crate::{MealApi, QueryCache, SearchMode, ingredient};

/// Cached read façade over a [`MealApi`].
///
/// Name searches never fail: upstream errors are logged and degrade to an empty list.
#[derive(Clone)]
pub struct RecipeQuery {
    api: Arc<dyn MealApi>,
    cache: QueryCache,
}

impl RecipeQuery {
    pub fn new(api: impl MealApi + 'static) -> Self {
        Self::from_arc(Arc::new(api))
    }

    pub fn from_arc(api: Arc<dyn MealApi>) -> Self {
        Self {
            api,
            cache: QueryCache::default(),
        }
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    async fn cached<F, Fut>(&self, mode: SearchMode, query: &str, fetch: F) -> Result<Vec<Meal>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Meal>>>,
    {
        if let Some(meals) = self.cache.get(mode, query).await {
            tracing::debug!(%mode, query, "cache hit");
            return Ok(meals);
        }

        let meals = fetch().await?;
        self.cache.insert(mode, query, meals.clone()).await;

        Ok(meals)
    }

    pub async fn search_by_name(&self, query: &str) -> Vec<Meal> {
        let query = QueryCache::normalize(query);
        if query.is_empty() {
            return vec![];
        }

        match self
            .cached(SearchMode::Name, &query, || self.api.search(&query))
            .await
        {
            Ok(meals) => meals,
            Err(e) => {
                tracing::error!(%query, "Error searching meals by name: {e}");
                vec![]
            }
        }
    }

    /// Union of the meals indexed under every form of `ingredient`, deduplicated by id.
    ///
    /// Fails only when every form failed upstream.
    pub async fn try_search_by_ingredient(&self, ingredient: &str) -> Result<Vec<Meal>> {
        let mut meals = vec![];
        let mut seen = HashSet::new();
        let mut first_error = None;
        let mut succeeded = false;

        for form in ingredient::forms(ingredient) {
            match self
                .cached(SearchMode::Ingredient, &form, || {
                    self.api.filter_by_ingredient(&form)
                })
                .await
            {
                Ok(found) => {
                    succeeded = true;
                    meals.extend(found.into_iter().filter(|meal| seen.insert(meal.id.clone())));
                }
                Err(e) => {
                    tracing::warn!(ingredient = %form, "Error filtering meals by ingredient: {e}");
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) if !succeeded => Err(e),
            _ => Ok(meals),
        }
    }

    pub async fn search_by_ingredient(&self, ingredient: &str) -> Vec<Meal> {
        self.try_search_by_ingredient(ingredient)
            .await
            .unwrap_or_default()
    }

    pub async fn lookup_by_id(&self, id: &str) -> Result<Meal> {
        let id = id.trim();
        let meals = self
            .cached(SearchMode::Lookup, id, || self.api.lookup(id))
            .await?;

        meals
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound(format!("meal {id}")))
    }

    /// One random meal. Never cached.
    pub async fn random(&self) -> Result<Option<Meal>> {
        Ok(self.api.random().await?.into_iter().next())
    }
}
