use bitebuddy_user::IdentityKey;
use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub mealdb: MealDbConfig,
    #[serde(default)]
    pub recommendations: RecommendationsConfig,
    #[serde(default)]
    pub random: RandomConfig,
    #[serde(default)]
    pub recipes: RecipesConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// HS256 secret signing the `auth_token` session cookie
    pub session_secret: String,
    pub session_lifetime_days: u64,
    #[serde(default)]
    pub cookie_secure: bool,
    /// Expected `iss` of identity tokens
    pub identity_issuer: String,
    /// Expected `aud` of identity tokens
    pub identity_audience: String,
    /// Shared HS256 secret of the identity provider
    #[serde(default)]
    pub identity_secret: Option<String>,
    /// RS256 public key of the identity provider, takes precedence over the secret
    #[serde(default)]
    pub identity_public_key_path: Option<String>,
}

impl AuthConfig {
    pub fn identity_key(&self) -> anyhow::Result<IdentityKey> {
        if let Some(path) = &self.identity_public_key_path {
            let pem = std::fs::read_to_string(path)?;
            return Ok(IdentityKey::RsaPem(pem));
        }

        match &self.identity_secret {
            Some(secret) => Ok(IdentityKey::Secret(secret.to_owned())),
            None => anyhow::bail!("no identity provider key configured"),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct MealDbConfig {
    #[serde(default = "default_mealdb_base_url")]
    pub base_url: String,
    #[serde(default = "default_mealdb_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for MealDbConfig {
    fn default() -> Self {
        Self {
            base_url: default_mealdb_base_url(),
            timeout_secs: default_mealdb_timeout_secs(),
        }
    }
}

fn default_mealdb_base_url() -> String {
    bitebuddy_mealdb::DEFAULT_BASE_URL.to_string()
}

fn default_mealdb_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct RecommendationsConfig {
    #[serde(default = "default_max_ingredients")]
    pub max_ingredients: usize,
}

impl Default for RecommendationsConfig {
    fn default() -> Self {
        Self {
            max_ingredients: default_max_ingredients(),
        }
    }
}

fn default_max_ingredients() -> usize {
    bitebuddy_recipe::DEFAULT_MAX_INGREDIENTS
}

#[derive(Debug, Deserialize, Clone)]
pub struct RandomConfig {
    #[serde(default = "default_random_count")]
    pub default_count: usize,
    #[serde(default = "default_random_max_count")]
    pub max_count: usize,
    /// Upstream calls allowed per sample, `count * 5` when unset
    #[serde(default)]
    pub max_attempts: Option<usize>,
}

impl Default for RandomConfig {
    fn default() -> Self {
        Self {
            default_count: default_random_count(),
            max_count: default_random_max_count(),
            max_attempts: None,
        }
    }
}

impl RandomConfig {
    pub fn sampler(&self, count: usize) -> bitebuddy_recipe::RandomSampler {
        let sampler = bitebuddy_recipe::RandomSampler::new(count);

        match self.max_attempts {
            Some(max_attempts) => sampler.max_attempts(max_attempts),
            None => sampler,
        }
    }
}

fn default_random_count() -> usize {
    bitebuddy_recipe::DEFAULT_RANDOM_COUNT
}

fn default_random_max_count() -> usize {
    20
}

#[derive(Debug, Deserialize, Clone)]
pub struct RecipesConfig {
    #[serde(default = "default_delete_batch_window_ms")]
    pub delete_batch_window_ms: u64,
}

impl Default for RecipesConfig {
    fn default() -> Self {
        Self {
            delete_batch_window_ms: default_delete_batch_window_ms(),
        }
    }
}

fn default_delete_batch_window_ms() -> u64 {
    500
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (BITEBUDDY__DATABASE__URL, etc.)
    /// 2. Config file specified by path
    /// 3. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        builder = builder
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("database.url", "sqlite:bitebuddy.db")?
            .set_default("database.max_connections", 5)?
            .set_default("auth.session_lifetime_days", 7)?
            .set_default("auth.identity_issuer", "https://securetoken.google.com/bite-buddy")?
            .set_default("auth.identity_audience", "bite-buddy")?;

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        // Optional, ignored when missing
        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("BITEBUDDY")
                .separator("__")
                .try_parsing(true),
        );

        if let Ok(database_url) = env::var("DATABASE_URL") {
            builder = builder.set_override("database.url", database_url)?;
        }
        if let Ok(session_secret) = env::var("SESSION_SECRET") {
            builder = builder.set_override("auth.session_secret", session_secret)?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.auth.session_secret.len() < 32 {
            return Err("Session secret must be at least 32 characters long".to_string());
        }
        if self.auth.identity_secret.is_none() && self.auth.identity_public_key_path.is_none() {
            return Err(
                "Either auth.identity_secret or auth.identity_public_key_path must be set"
                    .to_string(),
            );
        }
        if self.database.max_connections < 1 {
            return Err("Database max_connections must be at least 1".to_string());
        }
        if self.server.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }
        if self.mealdb.timeout_secs == 0 {
            return Err("Recipe API timeout must be greater than 0".to_string());
        }
        if self.recommendations.max_ingredients == 0 {
            return Err("Recommendations max_ingredients must be at least 1".to_string());
        }
        if self.random.default_count == 0 || self.random.default_count > self.random.max_count {
            return Err("Random default_count must be between 1 and max_count".to_string());
        }
        if self.recipes.delete_batch_window_ms == 0 {
            return Err("Recipes delete_batch_window_ms must be greater than 0".to_string());
        }
        Ok(())
    }
}
