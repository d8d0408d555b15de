mod error;
pub mod meal;
pub mod recipe;
pub mod user;

pub use error::*;
pub use meal::Meal;
pub use recipe::SavedRecipe;
pub use user::User;

/// Current unix timestamp in seconds.
pub fn timestamp() -> i64 {
    time::OffsetDateTime::now_utc().unix_timestamp()
}
