use bitebuddy_db::table::User as UserTable;
use bitebuddy_shared::{Result, User};
use sea_query::{OnConflict, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct Command(pub SqlitePool);

impl Command {
    /// Records a sign-in, creating the user on first sight and refreshing its profile
    /// otherwise.
    #[tracing::instrument(skip_all, fields(user_id = %user.uid))]
    pub async fn sign_in(&self, user: &User) -> Result<()> {
        let now = bitebuddy_shared::timestamp();

        let (sql, values) = Query::insert()
            .into_table(UserTable::Table)
            .columns([
                UserTable::Id,
                UserTable::DisplayName,
                UserTable::Email,
                UserTable::CreatedAt,
                UserTable::LastSignInAt,
            ])
            .values_panic([
                user.uid.to_owned().into(),
                user.display_name.to_owned().into(),
                user.email.to_owned().into(),
                now.into(),
                now.into(),
            ])
            .on_conflict(
                OnConflict::column(UserTable::Id)
                    .update_columns([
                        UserTable::DisplayName,
                        UserTable::Email,
                        UserTable::LastSignInAt,
                    ])
                    .to_owned(),
            )
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_with(&sql, values).execute(&self.0).await?;

        Ok(())
    }
}
