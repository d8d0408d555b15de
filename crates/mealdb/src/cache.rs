use std::{collections::HashMap, sync::Arc};

use bitebuddy_shared::Meal;
use strum::{AsRefStr, Display};
use tokio::sync::RwLock;

#[derive(Display, AsRefStr, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[strum(serialize_all = "snake_case")]
pub enum SearchMode {
    Name,
    Ingredient,
    Lookup,
}

/// Process-lifetime response cache keyed by `(mode, normalized query)`.
///
/// Entries are never evicted.
#[derive(Clone, Default)]
pub struct QueryCache {
    entries: Arc<RwLock<HashMap<(SearchMode, String), Vec<Meal>>>>,
}

impl QueryCache {
    pub fn normalize(query: &str) -> String {
        query.trim().to_lowercase()
    }

    pub async fn get(&self, mode: SearchMode, query: &str) -> Option<Vec<Meal>> {
        self.entries
            .read()
            .await
            .get(&(mode, Self::normalize(query)))
            .cloned()
    }

    pub async fn insert(&self, mode: SearchMode, query: &str, meals: Vec<Meal>) {
        self.entries
            .write()
            .await
            .insert((mode, Self::normalize(query)), meals);
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
