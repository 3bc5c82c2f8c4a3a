//! Login/logout. These are the only unguarded routes besides `/health`.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::{HeaderMap, HeaderValue, StatusCode, header::SET_COOKIE},
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::Duration;

use franchise_auth::CredentialSource;

use crate::app::dto::{LoginRequest, LoginResponse, UserDto};
use crate::app::{errors, services::AppServices};

pub fn router() -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
}

/// POST /auth/login - phone + password -> credential
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(req): Json<LoginRequest>,
) -> Response {
    // Password hashing is CPU-bound; keep it off the async workers.
    let svc = services.clone();
    let result =
        tokio::task::spawn_blocking(move || svc.authenticator.login(&req.phone, &req.password)).await;

    let issued = match result {
        Ok(Ok(issued)) => issued,
        Ok(Err(e)) => return errors::login_error_to_response(e),
        Err(e) => {
            tracing::error!(error = %e, "login task failed");
            return errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "internal error");
        }
    };

    let ttl = services.tokens.ttl();
    let cookie = match services.tokens.source() {
        CredentialSource::Cookie(name) => Some(session_cookie(name, &issued.token, ttl)),
        CredentialSource::BearerHeader => None,
    };

    let body = LoginResponse {
        user: UserDto::from(&issued.claims),
        expires_at: issued.claims.expires_at,
        expires_in: ttl.num_seconds(),
        token_type: "Bearer",
        token: issued.token,
    };

    let mut resp = (StatusCode::OK, Json(body)).into_response();
    if let Some(cookie) = cookie.and_then(|c| HeaderValue::from_str(&c).ok()) {
        resp.headers_mut().insert(SET_COOKIE, cookie);
    }
    resp
}

/// POST /auth/logout - drop the session cookie; revoke the credential if configured
pub async fn logout(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
) -> Response {
    if let Some(token) = services.tokens.extract_from_request(&headers) {
        services.tokens.revoke(token);
    }

    let mut resp = StatusCode::NO_CONTENT.into_response();
    if let CredentialSource::Cookie(name) = services.tokens.source() {
        if let Ok(clear) = HeaderValue::from_str(&session_cookie(name, "", Duration::zero())) {
            resp.headers_mut().insert(SET_COOKIE, clear);
        }
    }
    resp
}

fn session_cookie(name: &str, value: &str, max_age: Duration) -> String {
    format!(
        "{name}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        max_age.num_seconds()
    )
}
