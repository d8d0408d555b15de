use bitebuddy_mealdb::RecipeQuery;
use bitebuddy_shared::{Meal, SavedRecipe, recipe::contains_meal};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

pub const SUGGESTION_LIMIT: usize = 5;

/// Suggestions are only fetched for queries longer than this.
pub const SUGGESTION_MIN_QUERY_LEN: usize = 2;

#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SearchType {
    #[default]
    Recipe,
    Ingredient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Key {
    Up,
    Down,
    Enter,
    Escape,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Nothing beyond the session state changed.
    None,
    /// A highlighted suggestion was picked.
    Selected(Meal),
    /// A full search ran; see [`SearchSession::results`].
    Searched,
}

/// Type-ahead search state for one user.
pub struct SearchSession {
    recipes: RecipeQuery,
    query: String,
    search_type: SearchType,
    suggestions: Vec<Meal>,
    results: Vec<Meal>,
    highlighted: Option<usize>,
}

impl SearchSession {
    pub fn new(recipes: RecipeQuery) -> Self {
        Self {
            recipes,
            query: String::new(),
            search_type: SearchType::default(),
            suggestions: vec![],
            results: vec![],
            highlighted: None,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn search_type(&self) -> SearchType {
        self.search_type
    }

    pub fn set_search_type(&mut self, search_type: SearchType) {
        self.search_type = search_type;
    }

    pub fn suggestions(&self) -> &[Meal] {
        &self.suggestions
    }

    pub fn results(&self) -> &[Meal] {
        &self.results
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// Replaces the query without fetching suggestions.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.highlighted = None;
    }

    pub async fn input(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.highlighted = None;

        if self.query.chars().count() <= SUGGESTION_MIN_QUERY_LEN {
            self.suggestions.clear();
            return;
        }

        let mut suggestions = self.recipes.search_by_name(&self.query).await;
        suggestions.truncate(SUGGESTION_LIMIT);
        self.suggestions = suggestions;
    }

    /// Runs the current query, leaving out meals already in `saved`.
    pub async fn search(&mut self, saved: &[SavedRecipe]) {
        self.results = if self.query.trim().is_empty() {
            vec![]
        } else {
            let found = match self.search_type {
                SearchType::Recipe => self.recipes.search_by_name(&self.query).await,
                SearchType::Ingredient => self.recipes.search_by_ingredient(&self.query).await,
            };

            found
                .into_iter()
                .filter(|meal| !contains_meal(saved, &meal.id))
                .collect()
        };

        tracing::debug!(
            search_type = %self.search_type,
            results = self.results.len(),
            "search completed"
        );

        self.dismiss();
    }

    pub async fn key(&mut self, key: Key, saved: &[SavedRecipe]) -> KeyOutcome {
        let len = self.suggestions.len();

        match key {
            Key::Down => {
                self.highlighted = match self.highlighted {
                    _ if len == 0 => None,
                    Some(index) if index + 1 < len => Some(index + 1),
                    _ => Some(0),
                };
                KeyOutcome::None
            }
            Key::Up => {
                self.highlighted = match self.highlighted {
                    _ if len == 0 => None,
                    Some(index) if index > 0 && index < len => Some(index - 1),
                    _ => Some(len - 1),
                };
                KeyOutcome::None
            }
            Key::Enter => {
                let selected = self
                    .highlighted
                    .and_then(|index| self.suggestions.get(index).cloned());

                match selected {
                    Some(meal) => {
                        self.dismiss();
                        KeyOutcome::Selected(meal)
                    }
                    None => {
                        self.search(saved).await;
                        KeyOutcome::Searched
                    }
                }
            }
            Key::Escape => {
                self.dismiss();
                KeyOutcome::None
            }
        }
    }

    /// Picks the suggestion at `index` as if it had been clicked.
    pub fn pick(&mut self, index: usize) -> Option<Meal> {
        let meal = self.suggestions.get(index).cloned()?;
        self.dismiss();

        Some(meal)
    }

    fn dismiss(&mut self) {
        self.suggestions.clear();
        self.query.clear();
        self.highlighted = None;
    }
}
