//! Request guard decision: credential -> identity -> authorized context.
//!
//! This runs before any handler. It performs no data access and never leaks
//! which check failed: callers only see [`Rejection`].

use axum::http::{HeaderMap, Method};

use franchise_auth::{Access, Capability, Screen, TokenService, authorize};
use franchise_core::FranchiseeId;

use crate::context::AuthorizedContext;

/// Externally visible guard outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// 401: no, expired, malformed or revoked credential.
    Unauthenticated,
    /// 403: valid credential, wrong role, tenant or screen.
    Forbidden,
}

/// `GET`/`HEAD` read; everything else writes.
pub fn access_for(method: &Method) -> Access {
    if method == Method::GET || method == Method::HEAD {
        Access::Read
    } else {
        Access::Write
    }
}

/// Authenticate and authorize one request for `screen`.
pub fn guard_request(
    tokens: &TokenService,
    headers: &HeaderMap,
    method: &Method,
    requested: Option<&FranchiseeId>,
    screen: Screen,
) -> Result<AuthorizedContext, Rejection> {
    let capability = Capability {
        screen,
        access: access_for(method),
    };

    let claims = match tokens.authenticate(headers) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!(reason = e.reason(), %capability, "request unauthenticated");
            return Err(Rejection::Unauthenticated);
        }
    };

    match authorize(Some(&claims), tokens.now(), requested, capability) {
        Ok(grant) => {
            tracing::debug!(
                user_id = %claims.user_id,
                role = %grant.role,
                variant = %grant.variant,
                %capability,
                "request authorized"
            );
            Ok(AuthorizedContext::new(claims, grant, capability))
        }
        Err(denial) if denial.is_forbidden() => {
            let kind = denial.kind().as_str();
            if matches!(denial, franchise_auth::Denial::UnknownRole(_)) {
                tracing::warn!(user_id = %claims.user_id, role = %claims.role, reason = kind, %capability, "request forbidden");
            } else {
                tracing::debug!(user_id = %claims.user_id, role = %claims.role, reason = kind, %capability, "request forbidden");
            }
            Err(Rejection::Forbidden)
        }
        Err(_) => Err(Rejection::Unauthenticated),
    }
}
