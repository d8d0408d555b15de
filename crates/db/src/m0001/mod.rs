mod saved_recipe_create_table;
mod saved_recipe_create_user_idx;
mod saved_recipe_create_user_meal_idx;
mod user_create_table;

use sqlx_migrator::vec_box;

pub struct M0001;

sqlx_migrator::sqlite_migration!(
    M0001,
    "main",
    "m0001",
    vec_box![],
    vec_box![
        user_create_table::Operation,
        saved_recipe_create_table::Operation,
        saved_recipe_create_user_idx::Operation,
        saved_recipe_create_user_meal_idx::Operation
    ]
);
