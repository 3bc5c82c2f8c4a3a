//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: codec/token/identity wiring
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent (and deliberately vague) error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};

use franchise_auth::IdentityStore;
use franchise_core::Clock;

use crate::config::AuthConfig;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
pub fn build_app(
    config: &AuthConfig,
    identities: Arc<dyn IdentityStore>,
    clock: Arc<dyn Clock>,
) -> Router {
    let services = Arc::new(services::build_services(config, identities, clock));

    // Screen routes: each carries its own guard.
    let screens = routes::screens::router(services.tokens.clone());

    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/auth", routes::auth::router())
        .merge(screens)
        .layer(Extension(services))
}
