//! Token service: issue, extract and verify bearer credentials.

use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use http::HeaderMap;
use http::header::{AUTHORIZATION, COOKIE};
use thiserror::Error;

use franchise_core::{Clock, DomainError, FranchiseeId, UserId};

use crate::{
    Claims, CredentialCodec, DecodeError, EncodeError, RevocationList, RoleName,
    TokenValidationError, validate_claims,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerifyError {
    #[error(transparent)]
    Malformed(DecodeError),

    #[error("token has expired")]
    Expired,

    #[error("token not yet valid")]
    NotYetValid,

    #[error("invalid token time window")]
    InvalidTimeWindow,

    #[error("token has been revoked")]
    Revoked,
}

impl VerifyError {
    /// Stable label for logs. Never sent to clients.
    pub fn reason(&self) -> &'static str {
        match self {
            VerifyError::Malformed(DecodeError::BadSignature) => "bad_signature",
            VerifyError::Malformed(_) => "malformed",
            VerifyError::Expired => "expired",
            VerifyError::NotYetValid => "not_yet_valid",
            VerifyError::InvalidTimeWindow => "invalid_time_window",
            VerifyError::Revoked => "revoked",
        }
    }
}

impl From<TokenValidationError> for VerifyError {
    fn from(value: TokenValidationError) -> Self {
        match value {
            TokenValidationError::Expired => VerifyError::Expired,
            TokenValidationError::NotYetValid => VerifyError::NotYetValid,
            TokenValidationError::InvalidTimeWindow => VerifyError::InvalidTimeWindow,
        }
    }
}

/// Why a request is unauthenticated. All variants look the same from outside.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthnError {
    #[error("no credential presented")]
    Absent,

    #[error(transparent)]
    Invalid(#[from] VerifyError),
}

impl AuthnError {
    pub fn reason(&self) -> &'static str {
        match self {
            AuthnError::Absent => "absent",
            AuthnError::Invalid(e) => e.reason(),
        }
    }
}

/// Where a deployment reads the credential from. Exactly one path is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// `Authorization: Bearer <token>`.
    BearerHeader,
    /// A session cookie with the given name.
    Cookie(String),
}

impl FromStr for CredentialSource {
    type Err = DomainError;

    /// `header` | `bearer` | `cookie:<name>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("header") || s.eq_ignore_ascii_case("bearer") {
            return Ok(CredentialSource::BearerHeader);
        }
        match s.split_once(':') {
            Some((kind, name)) if kind.eq_ignore_ascii_case("cookie") && is_cookie_name(name) => {
                Ok(CredentialSource::Cookie(name.to_string()))
            }
            _ => Err(DomainError::validation(format!(
                "credential source must be 'header' or 'cookie:<name>', got '{s}'"
            ))),
        }
    }
}

fn is_cookie_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || b == b'.')
}

/// A freshly minted credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

/// Stateless token issuance and verification.
///
/// Verification decodes structurally first and judges expiry on that, then
/// runs the codec's integrity check. An expired token is reported as expired
/// whether or not its signature holds. Signature comparison inside the HS256
/// codec is constant-time; making the whole path constant-time with respect to
/// token content is a hardening goal, not a guarantee.
pub struct TokenService {
    codec: Arc<dyn CredentialCodec>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    source: CredentialSource,
    revocations: Option<Arc<dyn RevocationList>>,
}

impl TokenService {
    pub fn new(
        codec: Arc<dyn CredentialCodec>,
        ttl: Duration,
        clock: Arc<dyn Clock>,
        source: CredentialSource,
    ) -> Self {
        Self {
            codec,
            ttl,
            clock,
            source,
            revocations: None,
        }
    }

    pub fn with_revocations(mut self, revocations: Arc<dyn RevocationList>) -> Self {
        self.revocations = Some(revocations);
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn source(&self) -> &CredentialSource {
        &self.source
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn issue(
        &self,
        user_id: UserId,
        phone: &str,
        name: &str,
        role: RoleName,
        franchisee_id: Option<FranchiseeId>,
    ) -> Result<IssuedToken, EncodeError> {
        let now = self.clock.now();
        // Whole seconds, so the claims survive the wire unchanged.
        let issued_at = DateTime::from_timestamp(now.timestamp(), 0).unwrap_or(now);
        let expires_at = issued_at
            .checked_add_signed(self.ttl)
            .ok_or(EncodeError::LifetimeOverflow)?;
        let claims = Claims {
            user_id,
            name: name.to_string(),
            phone: phone.to_string(),
            role,
            franchisee_id,
            issued_at,
            expires_at,
        };
        let token = self.codec.encode(&claims)?;

        tracing::debug!(
            user_id = %claims.user_id,
            role = %claims.role,
            codec = self.codec.name(),
            expires_at = %claims.expires_at,
            "credential issued"
        );

        Ok(IssuedToken { token, claims })
    }

    pub fn verify(&self, token: &str) -> Result<Claims, VerifyError> {
        let unverified = self.codec.peek(token).map_err(VerifyError::Malformed)?;
        validate_claims(&unverified, self.clock.now())?;

        let claims = self.codec.decode(token).map_err(VerifyError::Malformed)?;

        if let Some(revocations) = &self.revocations {
            if revocations.is_revoked(token) {
                return Err(VerifyError::Revoked);
            }
        }

        Ok(claims)
    }

    /// Read the credential from the configured path. `None` when not presented.
    pub fn extract_from_request<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        match &self.source {
            CredentialSource::BearerHeader => extract_bearer(headers),
            CredentialSource::Cookie(name) => extract_cookie(headers, name),
        }
    }

    /// Extract + verify.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<Claims, AuthnError> {
        let token = self.extract_from_request(headers).ok_or(AuthnError::Absent)?;
        Ok(self.verify(token)?)
    }

    /// Revoke a presented token, if a revocation list is configured.
    ///
    /// Returns whether the token was recorded. Tokens that do not verify are
    /// ignored: there is nothing to revoke.
    pub fn revoke(&self, token: &str) -> bool {
        let Some(revocations) = &self.revocations else {
            return false;
        };
        match self.verify(token) {
            Ok(claims) => {
                revocations.revoke(token, claims.expires_at, self.clock.now());
                tracing::info!(user_id = %claims.user_id, "credential revoked");
                true
            }
            Err(_) => false,
        }
    }
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

fn extract_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.trim().trim_matches('"'))
        .filter(|v| !v.is_empty())
}
