use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use franchise_auth::LoginError;

/// Generic 401. Never says whether the credential was missing, expired or malformed.
pub fn unauthenticated() -> axum::response::Response {
    json_error(StatusCode::UNAUTHORIZED, "unauthenticated", "authentication required")
}

/// Generic 403. Never names the role or tenant that would have been needed.
pub fn forbidden() -> axum::response::Response {
    json_error(StatusCode::FORBIDDEN, "forbidden", "access denied")
}

pub fn login_error_to_response(err: LoginError) -> axum::response::Response {
    match err {
        LoginError::InvalidCredentials | LoginError::UnknownRole(_) => json_error(
            StatusCode::UNAUTHORIZED,
            "invalid_credentials",
            "invalid phone or password",
        ),
        LoginError::Issue(e) => {
            tracing::error!(error = %e, "failed to issue credential");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "internal error")
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
