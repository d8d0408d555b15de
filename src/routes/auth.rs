use axum::{Extension, Json, extract::State};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use bitebuddy_shared::{Error, User};
use bitebuddy_user::{generate_token, session::AUTH_COOKIE_NAME};
use serde::Deserialize;
use serde_json::{Value, json};
use validator::Validate;

use crate::{
    error::AppResult,
    middleware::{Auth, optional_auth},
    routes::AppState,
};

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

#[derive(Deserialize, Validate)]
pub struct SessionInput {
    /// Identity token issued by the auth provider
    #[validate(length(min = 1, max = 8192))]
    pub id_token: String,
}

/// POST /auth/session - exchange an identity token for a session cookie
pub async fn session(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Json(input): Json<SessionInput>,
) -> AppResult<(CookieJar, Json<User>)> {
    input.validate()?;

    let user = app_state.identity.verify(&input.id_token)?;
    app_state.user_command.sign_in(&user).await?;

    let lifetime = app_state
        .config
        .auth
        .session_lifetime_days
        .saturating_mul(SECONDS_PER_DAY);
    let token = generate_token(&user.uid, &app_state.config.auth.session_secret, lifetime)?;

    let cookie = Cookie::build((AUTH_COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .secure(app_state.config.auth.cookie_secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(
            i64::try_from(lifetime).unwrap_or(i64::MAX),
        ))
        .build();

    tracing::info!(user_id = %user.uid, "User signed in");

    Ok((jar.add(cookie), Json(user)))
}

/// POST /auth/logout - always succeeds, even without a session
pub async fn logout(
    State(app_state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<Value>) {
    if let Some(auth) = optional_auth(&app_state, &jar) {
        app_state.search.remove(&auth.user_id).await;
    }

    let jar = jar.remove(Cookie::build(AUTH_COOKIE_NAME).path("/"));

    (jar, Json(json!({"status": "signed_out"})))
}

/// GET /auth/me
pub async fn me(
    State(app_state): State<AppState>,
    Extension(auth): Extension<Auth>,
) -> AppResult<Json<User>> {
    match app_state.user_query.find(&auth.user_id).await? {
        Some(user) => Ok(Json(user.into())),
        None => Err(Error::Unauthorized.into()),
    }
}
