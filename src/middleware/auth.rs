use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use bitebuddy_shared::Error;
use bitebuddy_user::{session::AUTH_COOKIE_NAME, validate_token};

use crate::{error::AppError, routes::AppState};

/// Auth extension containing the signed-in user id
#[derive(Clone, Debug)]
pub struct Auth {
    pub user_id: String,
}

fn unauthorized() -> Response {
    AppError::from(Error::Unauthorized).into_response()
}

/// Rejects requests without a valid session cookie for a known user
///
/// Inserts an [`Auth`] extension on success.
pub async fn auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(token) = jar.get(AUTH_COOKIE_NAME).map(|cookie| cookie.value()) else {
        tracing::debug!("Missing auth_token cookie");
        return unauthorized();
    };

    let auth_user = match validate_token(token, &state.config.auth.session_secret) {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!("Invalid session token: {e}");
            return unauthorized();
        }
    };

    // Catches users removed since the token was issued
    match state.user_query.find(&auth_user.user_id).await {
        Ok(Some(_)) => {
            req.extensions_mut().insert(Auth {
                user_id: auth_user.user_id,
            });
            next.run(req).await
        }
        Ok(None) => {
            tracing::warn!(user_id = %auth_user.user_id, "Session for unknown user");
            unauthorized()
        }
        Err(e) => AppError::InternalError(e).into_response(),
    }
}

/// Signed-in user, if any, for routes that also serve anonymous visitors
pub fn optional_auth(state: &AppState, jar: &CookieJar) -> Option<Auth> {
    let token = jar.get(AUTH_COOKIE_NAME)?.value();

    validate_token(token, &state.config.auth.session_secret)
        .ok()
        .map(|user| Auth {
            user_id: user.user_id,
        })
}
