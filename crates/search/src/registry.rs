use std::{collections::HashMap, sync::Arc};

use bitebuddy_mealdb::RecipeQuery;
use bitebuddy_shared::Meal;
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};

use crate::{SearchSession, SearchType, SelectedMeal};

/// Search box and detail view of one signed-in user.
pub struct SearchState {
    pub session: SearchSession,
    pub selected: SelectedMeal,
}

impl SearchState {
    pub fn view(&self) -> SearchView {
        SearchView {
            query: self.session.query().to_owned(),
            search_type: self.session.search_type(),
            suggestions: self.session.suggestions().to_vec(),
            results: self.session.results().to_vec(),
            highlighted: self.session.highlighted(),
            selected: self.selected.get().cloned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchView {
    pub query: String,
    pub search_type: SearchType,
    pub suggestions: Vec<Meal>,
    pub results: Vec<Meal>,
    pub highlighted: Option<usize>,
    pub selected: Option<Meal>,
}

/// Per-user [`SearchState`], created on first use.
#[derive(Clone)]
pub struct SearchSessions {
    recipes: RecipeQuery,
    states: Arc<RwLock<HashMap<String, Arc<Mutex<SearchState>>>>>,
}

impl SearchSessions {
    pub fn new(recipes: RecipeQuery) -> Self {
        Self {
            recipes,
            states: Default::default(),
        }
    }

    pub async fn get(&self, user_id: &str) -> Arc<Mutex<SearchState>> {
        if let Some(state) = self.states.read().await.get(user_id) {
            return state.clone();
        }

        self.states
            .write()
            .await
            .entry(user_id.to_owned())
            .or_insert_with(|| {
                Arc::new(Mutex::new(SearchState {
                    session: SearchSession::new(self.recipes.clone()),
                    selected: SelectedMeal::default(),
                }))
            })
            .clone()
    }

    pub async fn remove(&self, user_id: &str) {
        self.states.write().await.remove(user_id);
    }
}
