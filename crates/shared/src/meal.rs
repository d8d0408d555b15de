use serde::{Deserialize, Serialize};

/// Upper bound on ingredient/measure slots in an upstream meal record.
pub const MAX_INGREDIENTS: usize = 20;

/// A recipe record sourced from the external recipe API.
///
/// Records returned by the ingredient filter endpoint only carry `id`, `name` and
/// `thumbnail_url`; every other field is then empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meal {
    pub id: String,
    pub name: String,
    pub thumbnail_url: String,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub youtube_url: Option<String>,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<Option<String>>,
    #[serde(default)]
    pub measures: Vec<Option<String>>,
}

impl Meal {
    /// Non-empty ingredient names in slot order.
    pub fn ingredient_names(&self) -> impl Iterator<Item = &str> {
        self.ingredients
            .iter()
            .flatten()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
    }
}
