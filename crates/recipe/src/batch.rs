use std::{collections::BTreeMap, sync::Arc, time::Duration};

use crate::{Coalescer, RecipeStore};

/// Coalesces recipe removals and commits them per user with
/// [`RecipeStore::remove_many`].
#[derive(Clone)]
pub struct DeleteBatcher(Arc<Coalescer<(String, String)>>);

impl DeleteBatcher {
    pub fn new(store: RecipeStore, window: Duration) -> Self {
        let coalescer = Coalescer::new(window, move |removals: Vec<(String, String)>| {
            let store = store.clone();
            async move { commit(&store, removals).await }
        });

        Self(Arc::new(coalescer))
    }

    /// Queues the removal of `recipe_id` owned by `user_id`.
    pub fn delete(&self, user_id: impl Into<String>, recipe_id: impl Into<String>) -> bool {
        self.0.push((user_id.into(), recipe_id.into()))
    }

    pub async fn shutdown(&self) {
        self.0.shutdown().await;
    }
}

async fn commit(store: &RecipeStore, removals: Vec<(String, String)>) {
    let mut by_user = BTreeMap::<String, Vec<String>>::new();
    for (user_id, recipe_id) in removals {
        let ids = by_user.entry(user_id).or_default();
        if !ids.contains(&recipe_id) {
            ids.push(recipe_id);
        }
    }

    for (user_id, ids) in by_user {
        match store.remove_many(&user_id, &ids).await {
            Ok(removed) => tracing::debug!(%user_id, removed, "batched recipe removal committed"),
            Err(e) => tracing::error!(%user_id, "Failed to remove recipes: {e}"),
        }
    }
}
