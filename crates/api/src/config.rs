//! Process configuration, read from the environment at startup.
//!
//! A missing secret or TTL is fatal: the binary refuses to bind a socket rather
//! than run with an authorization core that cannot verify anything.

use std::path::PathBuf;

use chrono::Duration;
use thiserror::Error;

use franchise_auth::CredentialSource;

/// Longest credential lifetime the binary accepts (one year).
pub const MAX_TOKEN_TTL_SECS: i64 = 365 * 24 * 60 * 60;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// How credentials are encoded on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenFormat {
    /// HS256 JWT with signature verification.
    Signed,
    /// Unsigned base64url JSON; structural decode + expiry only.
    Plain,
}

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub ttl: Duration,
    pub token_format: TokenFormat,
    pub credential_source: CredentialSource,
    pub revoke_on_logout: bool,
}

impl core::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .field("token_format", &self.token_format)
            .field("credential_source", &self.credential_source)
            .field("revoke_on_logout", &self.revoke_on_logout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub auth: AuthConfig,
    pub bind_addr: String,
    pub seed_users: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`], with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let secret = get("AUTH_SECRET").ok_or(ConfigError::Missing("AUTH_SECRET"))?;

        let ttl_raw = get("AUTH_TOKEN_TTL_SECS").ok_or(ConfigError::Missing("AUTH_TOKEN_TTL_SECS"))?;
        let ttl_secs: i64 = ttl_raw.parse().map_err(|_| ConfigError::Invalid {
            var: "AUTH_TOKEN_TTL_SECS",
            reason: format!("'{ttl_raw}' is not an integer"),
        })?;
        if ttl_secs <= 0 {
            return Err(ConfigError::Invalid {
                var: "AUTH_TOKEN_TTL_SECS",
                reason: "must be positive".to_string(),
            });
        }
        let ttl = Duration::try_seconds(ttl_secs)
            .filter(|_| ttl_secs <= MAX_TOKEN_TTL_SECS)
            .ok_or_else(|| ConfigError::Invalid {
                var: "AUTH_TOKEN_TTL_SECS",
                reason: format!("must not exceed {MAX_TOKEN_TTL_SECS} seconds"),
            })?;

        let token_format = match get("AUTH_TOKEN_FORMAT").as_deref() {
            None | Some("signed") => TokenFormat::Signed,
            Some("plain") => TokenFormat::Plain,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "AUTH_TOKEN_FORMAT",
                    reason: format!("expected 'signed' or 'plain', got '{other}'"),
                });
            }
        };

        let credential_source = match get("AUTH_CREDENTIAL_SOURCE") {
            None => CredentialSource::BearerHeader,
            Some(raw) => raw.parse().map_err(|e: franchise_core::DomainError| ConfigError::Invalid {
                var: "AUTH_CREDENTIAL_SOURCE",
                reason: e.to_string(),
            })?,
        };

        let revoke_on_logout = match get("AUTH_REVOKE_ON_LOGOUT") {
            None => true,
            Some(raw) => raw.parse::<bool>().map_err(|_| ConfigError::Invalid {
                var: "AUTH_REVOKE_ON_LOGOUT",
                reason: format!("expected 'true' or 'false', got '{raw}'"),
            })?,
        };

        Ok(Self {
            auth: AuthConfig {
                secret,
                ttl,
                token_format,
                credential_source,
                revoke_on_logout,
            },
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string()),
            seed_users: get("AUTH_SEED_USERS").map(PathBuf::from),
        })
    }
}
