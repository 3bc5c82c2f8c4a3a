use std::sync::Arc;

use anyhow::Context;

use franchise_api::config::Config;
use franchise_core::SystemClock;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    franchise_observability::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration; refusing to start");
            return Err(e.into());
        }
    };

    let identities = franchise_api::app::services::load_identities(config.seed_users.as_deref())?;
    let app = franchise_api::app::build_app(&config.auth, Arc::new(identities), Arc::new(SystemClock));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}
