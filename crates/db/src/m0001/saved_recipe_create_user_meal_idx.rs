use sea_query::{Index, IndexCreateStatement, IndexDropStatement};

use crate::table::SavedRecipe;

pub struct Operation;

// Not unique: duplicate saves are only prevented by the existence check in the store.
fn up_statement() -> IndexCreateStatement {
    Index::create()
        .name("idx_saved_recipe_user_meal")
        .table(SavedRecipe::Table)
        .col(SavedRecipe::UserId)
        .col(SavedRecipe::MealId)
        .to_owned()
}

fn down_statement() -> IndexDropStatement {
    Index::drop()
        .name("idx_saved_recipe_user_meal")
        .table(SavedRecipe::Table)
        .to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for Operation {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statment = up_statement().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statment).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statment = down_statement().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statment).execute(connection).await?;

        Ok(())
    }
}
