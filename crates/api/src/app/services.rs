//! Service wiring: codec, token service, identity store, login flow.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use franchise_auth::{
    Argon2PasswordVerifier, Authenticator, CredentialCodec, IdentityStore, InMemoryIdentityStore,
    InMemoryRevocationList, PlainCodec, SeedUser, SignedCodec, TokenService,
};
use franchise_core::Clock;

use crate::config::{AuthConfig, TokenFormat};

pub struct AppServices {
    pub tokens: Arc<TokenService>,
    pub authenticator: Authenticator,
}

pub fn build_services(
    config: &AuthConfig,
    identities: Arc<dyn IdentityStore>,
    clock: Arc<dyn Clock>,
) -> AppServices {
    let codec: Arc<dyn CredentialCodec> = match config.token_format {
        TokenFormat::Signed => Arc::new(SignedCodec::new(config.secret.as_bytes())),
        TokenFormat::Plain => {
            tracing::warn!("AUTH_TOKEN_FORMAT=plain: credentials are not integrity-checked");
            Arc::new(PlainCodec)
        }
    };

    let mut tokens = TokenService::new(codec, config.ttl, clock, config.credential_source.clone());
    if config.revoke_on_logout {
        tokens = tokens.with_revocations(Arc::new(InMemoryRevocationList::new()));
    }
    let tokens = Arc::new(tokens);

    let authenticator = Authenticator::new(identities, Arc::new(Argon2PasswordVerifier), tokens.clone());

    tracing::info!(
        codec = ?config.token_format,
        source = ?config.credential_source,
        ttl_secs = config.ttl.num_seconds(),
        revocation = config.revoke_on_logout,
        "auth services ready"
    );

    AppServices {
        tokens,
        authenticator,
    }
}

/// Dev/test identity store, optionally seeded from a JSON file of [`SeedUser`]s.
pub fn load_identities(seed_path: Option<&Path>) -> anyhow::Result<InMemoryIdentityStore> {
    let Some(path) = seed_path else {
        tracing::warn!("AUTH_SEED_USERS not set; identity store is empty");
        return Ok(InMemoryIdentityStore::new());
    };

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read seed users from {}", path.display()))?;
    let users: Vec<SeedUser> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse seed users in {}", path.display()))?;
    let count = users.len();
    let store = InMemoryIdentityStore::from_seed(users)?;

    tracing::info!(count, path = %path.display(), "seed users loaded");
    Ok(store)
}
