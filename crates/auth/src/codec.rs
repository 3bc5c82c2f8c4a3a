//! Credential codecs: claims <-> compact bearer token.
//!
//! Codecs are stateless and never look at the clock. An expired token decodes
//! fine; expiry is the token service's call, so callers can tell "not a token"
//! apart from "token expired".

use std::collections::HashSet;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::Claims;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Not a token: bad encoding, truncated, or a payload that is not claims-shaped.
    #[error("malformed credential: {0}")]
    Malformed(&'static str),

    /// Well-formed, but the integrity check failed.
    #[error("credential signature mismatch")]
    BadSignature,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("failed to encode credential: {0}")]
    Serialization(String),

    /// `issued_at + ttl` does not fit the calendar.
    #[error("credential lifetime out of range")]
    LifetimeOverflow,
}

pub trait CredentialCodec: Send + Sync {
    fn encode(&self, claims: &Claims) -> Result<String, EncodeError>;

    /// Full decode: structure plus whatever integrity check the codec carries.
    fn decode(&self, token: &str) -> Result<Claims, DecodeError>;

    /// Structural decode only, skipping integrity checks.
    ///
    /// Never trust the result on its own; it exists so expiry can be judged
    /// independently of signature validity.
    fn peek(&self, token: &str) -> Result<Claims, DecodeError>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

/// Self-describing, unsigned token: base64url (no padding) of the JSON claims.
///
/// Anyone can mint one of these. It matches the legacy dashboard's
/// credential behaviour and is only suitable behind a trusted transport.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainCodec;

impl CredentialCodec for PlainCodec {
    fn encode(&self, claims: &Claims) -> Result<String, EncodeError> {
        let json =
            serde_json::to_vec(claims).map_err(|e| EncodeError::Serialization(e.to_string()))?;
        Ok(URL_SAFE_NO_PAD.encode(json))
    }

    fn decode(&self, token: &str) -> Result<Claims, DecodeError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(token.trim())
            .map_err(|_| DecodeError::Malformed("encoding"))?;
        serde_json::from_slice(&bytes).map_err(|_| DecodeError::Malformed("payload"))
    }

    fn peek(&self, token: &str) -> Result<Claims, DecodeError> {
        self.decode(token)
    }

    fn name(&self) -> &'static str {
        "plain"
    }
}

/// HS256 JWT. Signature is verified on `decode`; `exp` is deliberately not.
#[derive(Clone)]
pub struct SignedCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    peek_validation: Validation,
}

impl SignedCodec {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.required_spec_claims = HashSet::new();
        validation.leeway = 0;

        let mut peek_validation = validation.clone();
        peek_validation.insecure_disable_signature_validation();

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            peek_validation,
        }
    }

    fn decode_with(&self, token: &str, validation: &Validation) -> Result<Claims, DecodeError> {
        jsonwebtoken::decode::<Claims>(token.trim(), &self.decoding, validation)
            .map(|data| data.claims)
            .map_err(|e| map_jwt_error(e.kind()))
    }
}

impl core::fmt::Debug for SignedCodec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SignedCodec").finish_non_exhaustive()
    }
}

impl CredentialCodec for SignedCodec {
    fn encode(&self, claims: &Claims) -> Result<String, EncodeError> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| EncodeError::Serialization(e.to_string()))
    }

    fn decode(&self, token: &str) -> Result<Claims, DecodeError> {
        self.decode_with(token, &self.validation)
    }

    fn peek(&self, token: &str) -> Result<Claims, DecodeError> {
        self.decode_with(token, &self.peek_validation)
    }

    fn name(&self) -> &'static str {
        "hs256"
    }
}

fn map_jwt_error(kind: &ErrorKind) -> DecodeError {
    match kind {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => DecodeError::BadSignature,
        ErrorKind::Json(_) | ErrorKind::InvalidClaimFormat(_) => DecodeError::Malformed("payload"),
        _ => DecodeError::Malformed("encoding"),
    }
}
