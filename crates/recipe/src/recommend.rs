use std::collections::HashSet;

use bitebuddy_mealdb::RecipeQuery;
use bitebuddy_shared::{Meal, SavedRecipe};

pub const DEFAULT_MAX_INGREDIENTS: usize = 7;

/// Suggests meals sharing ingredients with a user's saved recipes.
#[derive(Clone)]
pub struct Recommender {
    query: RecipeQuery,
    max_ingredients: usize,
}

impl Recommender {
    pub fn new(query: RecipeQuery, max_ingredients: usize) -> Self {
        Self {
            query,
            max_ingredients,
        }
    }

    /// Distinct ingredient names across `saved`, in first-seen order, capped at
    /// `max_ingredients`.
    pub fn ingredients<'a>(&self, saved: &'a [SavedRecipe]) -> Vec<&'a str> {
        let mut seen = HashSet::new();

        saved
            .iter()
            .flat_map(|recipe| recipe.meal.ingredient_names())
            .filter(|name| seen.insert(name.to_lowercase()))
            .take(self.max_ingredients)
            .collect()
    }

    #[tracing::instrument(skip_all, fields(saved = saved.len()))]
    pub async fn recommend(&self, saved: &[SavedRecipe]) -> Vec<Meal> {
        let saved_ids = saved
            .iter()
            .map(|recipe| recipe.meal.id.as_str())
            .collect::<HashSet<_>>();

        let mut seen = HashSet::new();
        let mut meals = vec![];

        for ingredient in self.ingredients(saved) {
            match self.query.try_search_by_ingredient(ingredient).await {
                Ok(found) => meals.extend(found.into_iter().filter(|meal| {
                    !saved_ids.contains(meal.id.as_str()) && seen.insert(meal.id.to_owned())
                })),
                Err(e) => {
                    tracing::warn!(ingredient, "Skipping ingredient for recommendations: {e}")
                }
            }
        }

        meals
    }
}
