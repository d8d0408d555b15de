//! Session tokens issued after sign-in and carried in the `auth_token` cookie.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

pub const AUTH_COOKIE_NAME: &str = "auth_token";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub iat: u64,
    pub exp: u64,
}

/// User information extracted from a session token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
}

fn now() -> u64 {
    u64::try_from(bitebuddy_shared::timestamp()).unwrap_or_default()
}

pub fn generate_token(
    user_id: impl Into<String>,
    secret: &str,
    lifetime_seconds: u64,
) -> anyhow::Result<String> {
    let now = now();
    let claims = Claims {
        sub: user_id.into(),
        iat: now,
        exp: now + lifetime_seconds,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

pub fn validate_token(token: &str, secret: &str) -> anyhow::Result<AuthUser> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;

    Ok(AuthUser {
        user_id: token_data.claims.sub,
    })
}
