use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use serde::Deserialize;

use franchise_auth::{Screen, TokenService};
use franchise_core::FranchiseeId;

use crate::app::errors;
use crate::authz::{Rejection, guard_request};

/// Per-route guard state: the token service plus the screen the route serves.
#[derive(Clone)]
pub struct GuardState {
    pub tokens: Arc<TokenService>,
    pub screen: Screen,
}

#[derive(Debug, Default, Deserialize)]
struct TenantQuery {
    #[serde(default)]
    franchisee_id: Option<String>,
}

pub async fn guard_middleware(
    State(state): State<GuardState>,
    mut req: Request,
    next: Next,
) -> Response {
    let requested = match requested_tenant(&req) {
        Ok(requested) => requested,
        Err(resp) => return resp,
    };

    match guard_request(
        &state.tokens,
        req.headers(),
        req.method(),
        requested.as_ref(),
        state.screen,
    ) {
        Ok(ctx) => {
            req.extensions_mut().insert(ctx);
            next.run(req).await
        }
        Err(Rejection::Unauthenticated) => errors::unauthenticated(),
        Err(Rejection::Forbidden) => errors::forbidden(),
    }
}

/// Wrap every route of `router` in the guard for `screen`.
pub fn guarded(router: Router, tokens: Arc<TokenService>, screen: Screen) -> Router {
    router.route_layer(axum::middleware::from_fn_with_state(
        GuardState { tokens, screen },
        guard_middleware,
    ))
}

/// Tenant from `?franchisee_id=`; blank means network-wide.
fn requested_tenant(req: &Request) -> Result<Option<FranchiseeId>, Response> {
    let Query(query) = Query::<TenantQuery>::try_from_uri(req.uri()).map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "bad_request", "invalid query string")
    })?;

    Ok(query
        .franchisee_id
        .and_then(|raw| raw.parse::<FranchiseeId>().ok()))
}
