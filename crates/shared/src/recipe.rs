use serde::{Deserialize, Serialize};

use crate::Meal;

/// A user's saved reference to a [`Meal`], keyed by a store-assigned id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedRecipe {
    pub id: String,
    pub user_id: String,
    pub meal: Meal,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Whether `meal_id` is already present in `recipes`.
pub fn contains_meal(recipes: &[SavedRecipe], meal_id: &str) -> bool {
    recipes.iter().any(|recipe| recipe.meal.id == meal_id)
}
