use bitebuddy_db::table::SavedRecipe as SavedRecipeTable;
use bitebuddy_shared::{Error, Meal, Result, SavedRecipe};
use sea_query::{Expr, ExprTrait, Order, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqlitePool, prelude::FromRow, types::Json};
use tokio::sync::broadcast;
use ulid::Ulid;

use crate::Subscription;

const FEED_CAPACITY: usize = 256;

#[derive(FromRow)]
struct SavedRecipeRow {
    id: String,
    user_id: String,
    meal: Json<Meal>,
    created_at: i64,
    updated_at: i64,
}

impl From<SavedRecipeRow> for SavedRecipe {
    fn from(row: SavedRecipeRow) -> Self {
        SavedRecipe {
            id: row.id,
            user_id: row.user_id,
            meal: row.meal.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub(crate) async fn list(pool: &SqlitePool, user_id: &str) -> Result<Vec<SavedRecipe>> {
    let (sql, values) = Query::select()
        .columns([
            SavedRecipeTable::Id,
            SavedRecipeTable::UserId,
            SavedRecipeTable::Meal,
            SavedRecipeTable::CreatedAt,
            SavedRecipeTable::UpdatedAt,
        ])
        .from(SavedRecipeTable::Table)
        .and_where(Expr::col(SavedRecipeTable::UserId).eq(user_id))
        .order_by(SavedRecipeTable::CreatedAt, Order::Asc)
        .order_by_expr(Expr::cust("rowid"), Order::Asc)
        .build_sqlx(SqliteQueryBuilder);

    let rows = sqlx::query_as_with::<_, SavedRecipeRow, _>(&sql, values)
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(SavedRecipe::from).collect())
}

/// Per-user saved recipes backed by SQLite.
///
/// Every write publishes the owner's id on a broadcast feed; [`Subscription`]s re-read the
/// full set when they see it.
#[derive(Clone)]
pub struct RecipeStore {
    pool: SqlitePool,
    feed: broadcast::Sender<String>,
}

impl RecipeStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_feed_capacity(pool, FEED_CAPACITY)
    }

    /// Subscribers more than `capacity` changes behind resync from a fresh snapshot.
    pub fn with_feed_capacity(pool: SqlitePool, capacity: usize) -> Self {
        let (feed, _) = broadcast::channel(capacity);

        Self { pool, feed }
    }

    fn notify(&self, user_id: &str) {
        // No receivers is fine.
        let _ = self.feed.send(user_id.to_owned());
    }

    pub async fn contains(&self, user_id: &str, meal_id: &str) -> Result<bool> {
        let (sql, values) = Query::select()
            .column(SavedRecipeTable::Id)
            .from(SavedRecipeTable::Table)
            .and_where(Expr::col(SavedRecipeTable::UserId).eq(user_id))
            .and_where(Expr::col(SavedRecipeTable::MealId).eq(meal_id))
            .limit(1)
            .build_sqlx(SqliteQueryBuilder);

        let row = sqlx::query_as_with::<_, (String,), _>(&sql, values)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.is_some())
    }

    /// Saves `meal` for `user_id`.
    ///
    /// The duplicate check runs before the insert in a separate statement, so two concurrent
    /// saves of the same meal can both succeed.
    #[tracing::instrument(skip(self, meal), fields(meal_id = %meal.id))]
    pub async fn add(&self, user_id: &str, meal: Meal) -> Result<SavedRecipe> {
        if self.contains(user_id, &meal.id).await? {
            return Err(Error::AlreadySaved);
        }

        let now = bitebuddy_shared::timestamp();
        let recipe = SavedRecipe {
            id: Ulid::new().to_string(),
            user_id: user_id.to_owned(),
            meal,
            created_at: now,
            updated_at: now,
        };

        let (sql, values) = Query::insert()
            .into_table(SavedRecipeTable::Table)
            .columns([
                SavedRecipeTable::Id,
                SavedRecipeTable::UserId,
                SavedRecipeTable::MealId,
                SavedRecipeTable::Meal,
                SavedRecipeTable::CreatedAt,
                SavedRecipeTable::UpdatedAt,
            ])
            .values_panic([
                recipe.id.to_owned().into(),
                recipe.user_id.to_owned().into(),
                recipe.meal.id.to_owned().into(),
                serde_json::to_string(&recipe.meal)?.into(),
                recipe.created_at.into(),
                recipe.updated_at.into(),
            ])
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_with(&sql, values).execute(&self.pool).await?;
        self.notify(user_id);

        tracing::debug!(recipe_id = %recipe.id, "recipe saved");

        Ok(recipe)
    }

    pub async fn list(&self, user_id: &str) -> Result<Vec<SavedRecipe>> {
        list(&self.pool, user_id).await
    }

    /// A live view of `user_id`'s saved recipes, starting with the current set.
    pub fn subscribe(&self, user_id: &str) -> Subscription {
        Subscription::new(self.pool.clone(), user_id, self.feed.subscribe())
    }

    #[tracing::instrument(skip(self))]
    pub async fn remove(&self, user_id: &str, recipe_id: &str) -> Result<()> {
        let (sql, values) = Query::delete()
            .from_table(SavedRecipeTable::Table)
            .and_where(Expr::col(SavedRecipeTable::Id).eq(recipe_id))
            .and_where(Expr::col(SavedRecipeTable::UserId).eq(user_id))
            .build_sqlx(SqliteQueryBuilder);

        let result = sqlx::query_with(&sql, values).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            bitebuddy_shared::not_found!("recipe {recipe_id}");
        }

        self.notify(user_id);

        Ok(())
    }

    /// Deletes every listed recipe owned by `user_id` in a single statement.
    ///
    /// Unknown ids are ignored. Returns the number of deleted rows.
    #[tracing::instrument(skip(self, recipe_ids), fields(count = recipe_ids.len()))]
    pub async fn remove_many(&self, user_id: &str, recipe_ids: &[String]) -> Result<u64> {
        if recipe_ids.is_empty() {
            return Ok(0);
        }

        let (sql, values) = Query::delete()
            .from_table(SavedRecipeTable::Table)
            .and_where(Expr::col(SavedRecipeTable::UserId).eq(user_id))
            .and_where(Expr::col(SavedRecipeTable::Id).is_in(recipe_ids.iter().cloned()))
            .build_sqlx(SqliteQueryBuilder);

        let mut tx = self.pool.begin().await?;
        let result = sqlx::query_with(&sql, values).execute(&mut *tx).await?;
        tx.commit().await?;

        let removed = result.rows_affected();
        if removed > 0 {
            self.notify(user_id);
        }

        Ok(removed)
    }
}
