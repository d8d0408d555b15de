#![allow(dead_code)]

use std::{
    str::FromStr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use axum::{
    Router,
    body::Body,
    http::{Method, Request, Response, StatusCode, header},
};
use bitebuddy::{
    AppState,
    config::{
        AuthConfig, Config, DatabaseConfig, MealDbConfig, ObservabilityConfig, RandomConfig,
        RecipesConfig, RecommendationsConfig, ServerConfig,
    },
};
use bitebuddy_shared::{Meal, Result};
use http_body_util::BodyExt;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::Serialize;
use serde_json::Value;
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use sqlx_migrator::{Migrate, Plan};
use temp_dir::TempDir;
use tower::ServiceExt;

pub const IDENTITY_SECRET: &str = "identity-provider-secret";
pub const IDENTITY_ISSUER: &str = "https://securetoken.google.com/bite-buddy";
pub const IDENTITY_AUDIENCE: &str = "bite-buddy";

pub fn meal(id: &str, name: &str, ingredients: &[&str]) -> Meal {
    Meal {
        id: id.to_owned(),
        name: name.to_owned(),
        thumbnail_url: format!("https://example.com/{id}.jpg"),
        ingredients: ingredients.iter().map(|i| Some(i.to_string())).collect(),
        measures: ingredients.iter().map(|_| Some("1 tbsp".to_owned())).collect(),
        ..Default::default()
    }
}

/// Recipe API over a fixed catalogue.
#[derive(Default)]
pub struct FakeMealApi {
    pub catalogue: Vec<Meal>,
    pub calls: Mutex<Vec<String>>,
    random_counter: AtomicUsize,
}

impl FakeMealApi {
    pub fn new(catalogue: Vec<Meal>) -> Self {
        Self {
            catalogue,
            ..Default::default()
        }
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
        Ok(self
            .catalogue
            .iter()
            .filter(|meal| meal.name.to_lowercase().contains(name))
            .cloned()
            .collect())
    }

    async fn filter_by_ingredient(&self, ingredient: &str) -> Result<Vec<Meal>> {
        self.record(format!("filter:{ingredient}"));
        Ok(self
            .catalogue
            .iter()
            .filter(|meal| {
                meal.ingredient_names()
                    .any(|name| name.eq_ignore_ascii_case(ingredient))
            })
            .map(|meal| Meal {
                id: meal.id.clone(),
                name: meal.name.clone(),
                thumbnail_url: meal.thumbnail_url.clone(),
                ..Default::default()
            })
            .collect())
    }

    async fn lookup(&self, id: &str) -> Result<Vec<Meal>> {
        self.record(format!("lookup:{id}"));
        Ok(self
            .catalogue
            .iter()
            .filter(|meal| meal.id == id)
            .cloned()
            .collect())
    }

    async fn random(&self) -> Result<Vec<Meal>> {
        self.record("random".to_owned());
        let n = self.random_counter.fetch_add(1, Ordering::SeqCst);

        Ok(vec![meal(&format!("r{n}"), &format!("Random {n}"), &[])])
    }
}

pub fn test_config(database_url: String) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_owned(),
            port: 3000,
        },
        database: DatabaseConfig {
            url: database_url,
            max_connections: 1,
        },
        auth: AuthConfig {
            session_secret: "test_session_secret_minimum_32_characters".to_owned(),
            session_lifetime_days: 7,
            cookie_secure: false,
            identity_issuer: IDENTITY_ISSUER.to_owned(),
            identity_audience: IDENTITY_AUDIENCE.to_owned(),
            identity_secret: Some(IDENTITY_SECRET.to_owned()),
            identity_public_key_path: None,
        },
        mealdb: MealDbConfig::default(),
        recommendations: RecommendationsConfig::default(),
        random: RandomConfig::default(),
        recipes: RecipesConfig::default(),
        observability: ObservabilityConfig::default(),
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub pool: SqlitePool,
    pub api: Arc<FakeMealApi>,
    _dir: TempDir,
}

pub async fn setup(api: FakeMealApi) -> anyhow::Result<TestApp> {
    let dir = TempDir::new()?;
    let url = format!("sqlite:{}", dir.child("bitebuddy.db").to_str().unwrap());

    let opts = SqliteConnectOptions::from_str(&url)?.create_if_missing(true);
    let pool = SqlitePool::connect_with(opts).await?;
    let mut conn = pool.acquire().await?;
    bitebuddy_db::migrator()?
        .run(&mut *conn, &Plan::apply_all())
        .await?;
    drop(conn);

    let api = Arc::new(api);
    let state = AppState::new(test_config(url), pool.clone(), api.clone())?;

    Ok(TestApp {
        router: bitebuddy::router(state.clone()),
        state,
        pool,
        api,
        _dir: dir,
    })
}

#[derive(Serialize)]
struct IdentityClaims<'a> {
    sub: &'a str,
    name: &'a str,
    email: String,
    iss: &'a str,
    aud: &'a str,
    exp: i64,
}

/// Identity token as the auth provider would mint it
pub fn identity_token(sub: &str) -> String {
    let claims = IdentityClaims {
        sub,
        name: "John Doe",
        email: format!("{sub}@bitebuddy.localhost"),
        iss: IDENTITY_ISSUER,
        aud: IDENTITY_AUDIENCE,
        exp: bitebuddy_shared::timestamp() + 3600,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(IDENTITY_SECRET.as_bytes()),
    )
    .unwrap()
}

impl TestApp {
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn json(
        &self,
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let response = self.send(method, uri, cookie, body).await;
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, value)
    }

    /// Signs `sub` in and returns the session cookie pair
    pub async fn sign_in(&self, sub: &str) -> String {
        let response = self
            .send(
                Method::POST,
                "/auth/session",
                None,
                Some(serde_json::json!({ "id_token": identity_token(sub) })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        set_cookie(&response)
            .split(';')
            .next()
            .unwrap()
            .to_owned()
    }
}

pub fn set_cookie(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_owned()
}
