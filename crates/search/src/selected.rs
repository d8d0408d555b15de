use bitebuddy_shared::Meal;

/// The meal currently opened in the detail view.
#[derive(Debug, Default, Clone)]
pub struct SelectedMeal(Option<Meal>);

impl SelectedMeal {
    pub fn select(&mut self, meal: Meal) {
        self.0 = Some(meal);
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }

    pub fn get(&self) -> Option<&Meal> {
        self.0.as_ref()
    }
}
