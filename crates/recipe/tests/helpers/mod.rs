#![allow(dead_code)]

use std::{
    collections::HashMap,
    path::PathBuf,
    str::FromStr,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use bitebuddy_shared::{Error, Meal, Result};
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use sqlx_migrator::{Migrate, Plan};

pub async fn setup_test_pool(path: PathBuf) -> anyhow::Result<SqlitePool> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.to_str().unwrap()))?
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(opts).await?;
    let mut conn = pool.acquire().await?;
    bitebuddy_db::migrator()?
        .run(&mut *conn, &Plan::apply_all())
        .await?;

    Ok(pool)
}

pub fn meal(id: &str, name: &str, ingredients: &[&str]) -> Meal {
    Meal {
        id: id.to_owned(),
        name: name.to_owned(),
        thumbnail_url: format!("https://example.com/{id}.jpg"),
        ingredients: ingredients.iter().map(|i| Some(i.to_string())).collect(),
        measures: ingredients.iter().map(|_| Some("1 cup".to_owned())).collect(),
        ..Default::default()
    }
}

/// In-memory recipe API recording every call.
#[derive(Default)]
pub struct FakeMealApi {
    pub by_ingredient: HashMap<String, Vec<Meal>>,
    pub failing_ingredients: Vec<String>,
    pub calls: Mutex<Vec<String>>,
    random_counter: AtomicUsize,
    pub random_cycle: Option<usize>,
}

impl FakeMealApi {
    pub fn with_ingredient(mut self, ingredient: &str, meals: Vec<Meal>) -> Self {
        self.by_ingredient.insert(ingredient.to_owned(), meals);
        self
    }

    pub fn failing(mut self, ingredient: &str) -> Self {
        self.failing_ingredients.push(ingredient.to_owned());
        self
    }

    /// Random meals repeat after `cycle` distinct ids.
    pub fn random_cycle(mut self, cycle: usize) -> Self {
        self.random_cycle = Some(cycle);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait::async_trait]
impl bitebuddy_mealdb::MealApi for FakeMealApi {
    async fn search(&self, name: &str) -> Result<Vec<Meal>> {
        self.record(format!("search:{name}"));
        Ok(vec![])
    }

    async fn filter_by_ingredient(&self, ingredient: &str) -> Result<Vec<Meal>> {
        self.record(format!("filter:{ingredient}"));
        if self.failing_ingredients.iter().any(|i| i == ingredient) {
            return Err(Error::Upstream(format!("filter {ingredient} failed")));
        }

        Ok(self
            .by_ingredient
            .get(ingredient)
            .cloned()
            .unwrap_or_default())
    }

    async fn lookup(&self, id: &str) -> Result<Vec<Meal>> {
        self.record(format!("lookup:{id}"));
        Ok(vec![])
    }

    async fn random(&self) -> Result<Vec<Meal>> {
        self.record("random".to_owned());
        let mut n = self.random_counter.fetch_add(1, Ordering::SeqCst);
        if let Some(cycle) = self.random_cycle {
            n %= cycle;
        }

        Ok(vec![meal(&format!("r{n}"), &format!("Random {n}"), &[])])
    }
}
