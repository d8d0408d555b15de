use sea_query::{ColumnDef, Table, TableCreateStatement, TableDropStatement};

use crate::table::SavedRecipe;

pub struct Operation;

fn up_statement() -> TableCreateStatement {
    Table::create()
        .table(SavedRecipe::Table)
        .col(
            ColumnDef::new(SavedRecipe::Id)
                .string()
                .not_null()
                .string_len(26)
                .primary_key(),
        )
        .col(
            ColumnDef::new(SavedRecipe::UserId)
                .string()
                .not_null()
                .string_len(128),
        )
        .col(
            ColumnDef::new(SavedRecipe::MealId)
                .string()
                .not_null()
                .string_len(32),
        )
        .col(ColumnDef::new(SavedRecipe::Meal).text().not_null())
        .col(
            ColumnDef::new(SavedRecipe::CreatedAt)
                .big_integer()
                .not_null(),
        )
        .col(
            ColumnDef::new(SavedRecipe::UpdatedAt)
                .big_integer()
                .not_null(),
        )
        .to_owned()
}

fn down_statement() -> TableDropStatement {
    Table::drop().table(SavedRecipe::Table).to_owned()
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
