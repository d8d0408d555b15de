use bitebuddy_shared::{Result, SavedRecipe};
use futures::Stream;
use sqlx::SqlitePool;
use tokio::sync::broadcast::{self, error::RecvError};

/// Snapshots of one user's saved recipes.
///
/// The first call to [`Subscription::next`] yields the current set, every later call waits
/// for a change to that user's recipes and yields the full set again. The subscription
/// ends once every [`crate::RecipeStore`] handle is dropped.
pub struct Subscription {
    pool: SqlitePool,
    user_id: String,
    feed: broadcast::Receiver<String>,
    primed: bool,
}

impl Subscription {
    pub(crate) fn new(
        pool: SqlitePool,
        user_id: impl Into<String>,
        feed: broadcast::Receiver<String>,
    ) -> Self {
        Self {
            pool,
            user_id: user_id.into(),
            feed,
            primed: false,
        }
    }

    /// Next snapshot, or `None` once the store is gone.
    pub async fn next(&mut self) -> Result<Option<Vec<SavedRecipe>>> {
        if !self.primed {
            self.primed = true;
            return crate::store::list(&self.pool, &self.user_id).await.map(Some);
        }

        loop {
            match self.feed.recv().await {
                Ok(user_id) if user_id == self.user_id => break,
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(user_id = %self.user_id, skipped, "subscription lagged, resyncing");
                    break;
                }
                Err(RecvError::Closed) => return Ok(None),
            }
        }

        crate::store::list(&self.pool, &self.user_id).await.map(Some)
    }

    pub fn into_stream(self) -> impl Stream<Item = Result<Vec<SavedRecipe>>> + Send {
        futures::stream::unfold(self, |mut subscription| async move {
            match subscription.next().await {
                Ok(Some(recipes)) => Some((Ok(recipes), subscription)),
                Ok(None) => None,
                Err(e) => Some((Err(e), subscription)),
            }
        })
    }
}
