use std::collections::HashSet;

use bitebuddy_mealdb::RecipeQuery;
use bitebuddy_shared::Meal;

pub const DEFAULT_RANDOM_COUNT: usize = 8;

/// Draws distinct random meals, one upstream call at a time.
#[derive(Debug, Clone, Copy)]
pub struct RandomSampler {
    count: usize,
    max_attempts: usize,
}

impl RandomSampler {
    /// Samples `count` meals with at most `count * 5` upstream calls.
    pub fn new(count: usize) -> Self {
        Self {
            count,
            max_attempts: count.saturating_mul(5),
        }
    }

    pub fn max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Meals with distinct ids not in `exclude`. Failed calls and repeats use up an
    /// attempt; the result is shorter than `count` when attempts run out.
    #[tracing::instrument(skip(query, exclude))]
    pub async fn sample(&self, query: &RecipeQuery, exclude: &HashSet<String>) -> Vec<Meal> {
        let mut seen = HashSet::new();
        let mut meals = Vec::with_capacity(self.count);
        let mut attempts = 0;

        while meals.len() < self.count && attempts < self.max_attempts {
            attempts += 1;

            match query.random().await {
                Ok(Some(meal)) => {
                    if !exclude.contains(&meal.id) && seen.insert(meal.id.to_owned()) {
                        meals.push(meal);
                    }
                }
                Ok(None) => {}
                Err(e) => tracing::error!(attempts, "Error fetching random meal: {e}"),
            }
        }

        if meals.len() < self.count {
            tracing::warn!(
                found = meals.len(),
                attempts,
                "Random sampling ran out of attempts"
            );
        }

        meals
    }
}
