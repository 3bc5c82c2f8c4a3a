//! `franchise-auth`: role-based, franchise-scoped authentication/authorization core.
//!
//! This crate is intentionally decoupled from routing and storage: it decides,
//! it never fetches. The only HTTP type it touches is `http::HeaderMap`, for
//! credential extraction.

pub mod authorize;
pub mod capability;
pub mod claims;
pub mod codec;
pub mod identity;
pub mod revocation;
pub mod roles;
pub mod token;
pub mod views;

pub use authorize::{
    AuthorizationExplanation, Denial, DenialKind, Grant, TenantMatch, authorize, explain,
};
pub use capability::{Access, Capability, Screen};
pub use claims::{Claims, TokenValidationError, validate_claims};
pub use codec::{CredentialCodec, DecodeError, EncodeError, PlainCodec, SignedCodec};
pub use identity::{
    Argon2PasswordVerifier, Authenticator, IdentityStore, InMemoryIdentityStore, LoginError,
    PasswordVerifier, SeedUser, UserRecord,
};
pub use revocation::{InMemoryRevocationList, RevocationList};
pub use roles::{Role, RoleInfo, RoleName, ScopeClass};
pub use token::{AuthnError, CredentialSource, IssuedToken, TokenService, VerifyError};
pub use views::ViewVariant;
