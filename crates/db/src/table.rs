use sea_query::Iden;

#[derive(Iden, Clone)]
pub enum User {
    Table,
    Id,
    DisplayName,
    Email,
    CreatedAt,
    LastSignInAt,
}

#[derive(Iden, Clone)]
pub enum SavedRecipe {
    Table,
    Id,
    UserId,
    MealId,
    Meal,
    CreatedAt,
    UpdatedAt,
}
