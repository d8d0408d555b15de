use bitebuddy_db::table::User as UserTable;
use sea_query::{Expr, ExprTrait, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqlitePool, prelude::FromRow};

#[derive(Debug, Clone, FromRow)]
pub struct UserView {
    pub id: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub created_at: i64,
    pub last_sign_in_at: i64,
}

impl From<UserView> for bitebuddy_shared::User {
    fn from(view: UserView) -> Self {
        Self {
            uid: view.id,
            display_name: view.display_name,
            email: view.email,
        }
    }
}

#[derive(Clone)]
pub struct Query(pub SqlitePool);

impl Query {
    pub async fn find(&self, id: impl Into<String>) -> anyhow::Result<Option<UserView>> {
        let statement = sea_query::Query::select()
            .columns([
                UserTable::Id,
                UserTable::DisplayName,
                UserTable::Email,
                UserTable::CreatedAt,
                UserTable::LastSignInAt,
            ])
            .from(UserTable::Table)
            .and_where(Expr::col(UserTable::Id).eq(id.into()))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with(&sql, values)
            .fetch_optional(&self.0)
            .await?)
    }
}
