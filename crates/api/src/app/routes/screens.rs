//! Guarded screen routes.
//!
//! The screens themselves are rendered elsewhere; these handlers only hand the
//! already-authorized context to the presentation layer.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};

use franchise_auth::roles::catalog;
use franchise_auth::{Capability, Screen, TokenService, ViewVariant, explain};
use franchise_core::FranchiseeId;

use crate::app::dto::{ExplainQuery, ScreenResponse};
use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::AuthorizedContext;
use crate::middleware::guarded;

pub fn router(tokens: Arc<TokenService>) -> Router {
    let plain = [
        ("/dashboard", Screen::Dashboard),
        ("/crm", Screen::Crm),
        ("/finances", Screen::Finances),
        ("/personnel", Screen::Personnel),
        ("/social-integrations", Screen::SocialIntegrations),
    ];

    let mut router = Router::new();
    for (path, screen) in plain {
        let route = Router::new().route(path, get(show_screen).post(show_screen));
        router = router.merge(guarded(route, tokens.clone(), screen));
    }

    let access = Router::new()
        .route("/access-management", get(access_management).post(access_management))
        .route("/access-management/explain", get(explain_decision));
    router.merge(guarded(access, tokens, Screen::AccessManagement))
}

/// GET|POST /<screen> - the variant and scope this caller gets
pub async fn show_screen(Extension(ctx): Extension<AuthorizedContext>) -> Json<ScreenResponse> {
    Json(ScreenResponse::from(&ctx))
}

/// GET|POST /access-management - like any screen, plus the roles the caller may assign
pub async fn access_management(Extension(ctx): Extension<AuthorizedContext>) -> Json<ScreenResponse> {
    let assignable = ctx.assignable_roles();
    let mut body = ScreenResponse::from(&ctx);
    body.assignable_roles = Some(
        catalog()
            .into_iter()
            .filter(|info| assignable.iter().any(|r| r.as_str() == info.name))
            .collect(),
    );
    Json(body)
}

/// GET /access-management/explain?screen=X&access=Y&target_franchisee_id=Z
///
/// Explains how the caller's own credential would fare on another capability.
/// Operators only: the network-wide and franchisee views of access management.
pub async fn explain_decision(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthorizedContext>,
    Query(query): Query<ExplainQuery>,
) -> Response {
    if !matches!(ctx.variant(), ViewVariant::UkWide | ViewVariant::Franchisee) {
        tracing::debug!(user_id = %ctx.identity().user_id, variant = %ctx.variant(), "explain refused");
        return errors::forbidden();
    }

    let target = query
        .target_franchisee_id
        .and_then(|raw| raw.parse::<FranchiseeId>().ok());
    let capability = Capability {
        screen: query.screen,
        access: query.access,
    };

    let explanation = explain(
        Some(ctx.identity()),
        services.tokens.now(),
        target.as_ref(),
        capability,
    );

    (StatusCode::OK, Json(serde_json::json!({ "explanation": explanation }))).into_response()
}
