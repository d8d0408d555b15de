use std::{collections::HashMap, time::Duration};

use bitebuddy_shared::{Error, Meal, Result, meal::MAX_INGREDIENTS};
use serde::Deserialize;
use serde_json::Value;

pub const DEFAULT_BASE_URL: &str = "https://www.themealdb.com/api/json/v1/1";

/// Read operations of the public recipe API.
///
/// Every call returns the `meals` array of the response; a `null` array is an empty list.
#[async_trait::async_trait]
pub trait MealApi: Send + Sync {
    /// `GET /search.php?s=<name>`
    async fn search(&self, name: &str) -> Result<Vec<Meal>>;

    /// `GET /filter.php?i=<ingredient>`
    async fn filter_by_ingredient(&self, ingredient: &str) -> Result<Vec<Meal>>;

    /// `GET /lookup.php?i=<id>`
    async fn lookup(&self, id: &str) -> Result<Vec<Meal>>;

    /// `GET /random.php`
    async fn random(&self) -> Result<Vec<Meal>>;
}

#[derive(Deserialize)]
struct MealsResponse {
    meals: Option<Vec<RawMeal>>,
}

#[derive(Deserialize)]
struct RawMeal {
    #[serde(rename = "idMeal")]
    id: String,
    #[serde(rename = "strMeal")]
    name: String,
    #[serde(rename = "strMealThumb", default)]
    thumbnail: Option<String>,
    #[serde(flatten)]
    fields: HashMap<String, Value>,
}

impl RawMeal {
    fn text(&self, key: &str) -> Option<String> {
        match self.fields.get(key) {
            Some(Value::String(value)) if !value.trim().is_empty() => Some(value.to_owned()),
            _ => None,
        }
    }

    fn slots(&self, prefix: &str) -> Vec<Option<String>> {
        if !self.fields.contains_key(&format!("{prefix}1")) {
            return vec![];
        }

        (1..=MAX_INGREDIENTS)
            .map(|n| self.text(&format!("{prefix}{n}")))
            .collect()
    }
}

impl From<RawMeal> for Meal {
    fn from(raw: RawMeal) -> Self {
        Meal {
            instructions: raw.text("strInstructions"),
            category: raw.text("strCategory"),
            area: raw.text("strArea"),
            tags: raw.text("strTags"),
            youtube_url: raw.text("strYoutube"),
            source_url: raw.text("strSource"),
            ingredients: raw.slots("strIngredient"),
            measures: raw.slots("strMeasure"),
            thumbnail_url: raw.thumbnail.unwrap_or_default(),
            id: raw.id,
            name: raw.name,
        }
    }
}

/// [`MealApi`] over HTTP.
#[derive(Clone)]
pub struct MealDbClient {
    http: reqwest::Client,
    base_url: String,
}

impl MealDbClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Upstream(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        })
    }

    #[tracing::instrument(skip(self), err)]
    async fn fetch(&self, endpoint: &str, param: Option<(&str, &str)>) -> Result<Vec<Meal>> {
        let mut request = self.http.get(format!("{}/{endpoint}", self.base_url));
        if let Some(param) = param {
            request = request.query(&[param]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::Upstream(format!(
                "{endpoint} responded with {}",
                response.status()
            )));
        }

        let body = response
            .json::<MealsResponse>()
            .await
            .map_err(|e| Error::Upstream(e.to_string()))?;

        Ok(body
            .meals
            .unwrap_or_default()
            .into_iter()
            .map(Meal::from)
            .collect())
    }
}

#[async_trait::async_trait]
impl MealApi for MealDbClient {
    async fn search(&self, name: &str) -> Result<Vec<Meal>> {
        self.fetch("search.php", Some(("s", name))).await
    }

    async fn filter_by_ingredient(&self, ingredient: &str) -> Result<Vec<Meal>> {
        self.fetch("filter.php", Some(("i", ingredient))).await
    }

    async fn lookup(&self, id: &str) -> Result<Vec<Meal>> {
        self.fetch("lookup.php", Some(("i", id))).await
    }

    async fn random(&self) -> Result<Vec<Meal>> {
        self.fetch("random.php", None).await
    }
}
