//! Login: identity store and password verification seams, and the flow that
//! turns a phone/password pair into a credential.
//!
//! The identity store and password hashing belong to the surrounding system;
//! this module only defines what it consumes from them. The in-memory store and
//! the argon2 verifier are there for development and tests.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier as _, SaltString};
use argon2::Argon2;
use serde::Deserialize;
use thiserror::Error;

use franchise_core::{DomainError, FranchiseeId, UserId};

use crate::{EncodeError, IssuedToken, RoleName, TokenService};

/// A user as the identity store knows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
    pub name: String,
    pub phone: String,
    pub role: RoleName,
    pub franchisee_id: Option<FranchiseeId>,
    pub password_hash: String,
}

pub trait IdentityStore: Send + Sync {
    fn find_user_by_phone(&self, phone: &str) -> Option<UserRecord>;
}

pub trait PasswordVerifier: Send + Sync {
    fn verify_password(&self, plain: &str, hash: &str) -> bool;
}

/// Phone numbers are looked up by digits only, keeping a leading `+`.
pub fn normalize_phone(phone: &str) -> String {
    let trimmed = phone.trim();
    let digits: String = trimmed.chars().filter(|c| c.is_ascii_digit()).collect();
    if trimmed.starts_with('+') {
        format!("+{digits}")
    } else {
        digits
    }
}

#[derive(Debug, Default)]
pub struct InMemoryIdentityStore {
    by_phone: RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, user: UserRecord) {
        let key = normalize_phone(&user.phone);
        self.by_phone
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key, user);
    }

    /// Build a store from plaintext seed users, hashing their passwords.
    pub fn from_seed(users: Vec<SeedUser>) -> Result<Self, DomainError> {
        let store = Self::new();
        for seed in users {
            let password_hash = Argon2PasswordVerifier::hash_password(&seed.password)?;
            store.insert(UserRecord {
                id: seed.id.unwrap_or_default(),
                name: seed.name,
                phone: seed.phone,
                role: seed.role,
                franchisee_id: seed.franchisee_id,
                password_hash,
            });
        }
        Ok(store)
    }
}

impl IdentityStore for InMemoryIdentityStore {
    fn find_user_by_phone(&self, phone: &str) -> Option<UserRecord> {
        self.by_phone
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&normalize_phone(phone))
            .cloned()
    }
}

/// Seed entry for [`InMemoryIdentityStore::from_seed`] (JSON friendly).
#[derive(Debug, Clone, Deserialize)]
pub struct SeedUser {
    #[serde(default)]
    pub id: Option<UserId>,
    pub name: String,
    pub phone: String,
    pub role: RoleName,
    #[serde(default)]
    pub franchisee_id: Option<FranchiseeId>,
    pub password: String,
}

/// PHC-format argon2 hashes.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2PasswordVerifier;

impl Argon2PasswordVerifier {
    pub fn hash_password(plain: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(plain.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DomainError::validation(format!("failed to hash password: {e}")))
    }
}

impl PasswordVerifier for Argon2PasswordVerifier {
    fn verify_password(&self, plain: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoginError {
    /// Unknown phone or wrong password; deliberately not told apart.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The store returned a role this build does not know.
    #[error("account role '{0}' is not recognized")]
    UnknownRole(String),

    #[error(transparent)]
    Issue(#[from] EncodeError),
}

/// Phone + password login against an external identity store.
pub struct Authenticator {
    identities: Arc<dyn IdentityStore>,
    passwords: Arc<dyn PasswordVerifier>,
    tokens: Arc<TokenService>,
}

impl Authenticator {
    pub fn new(
        identities: Arc<dyn IdentityStore>,
        passwords: Arc<dyn PasswordVerifier>,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            identities,
            passwords,
            tokens,
        }
    }

    pub fn login(&self, phone: &str, password: &str) -> Result<IssuedToken, LoginError> {
        let Some(user) = self.identities.find_user_by_phone(phone) else {
            tracing::info!(reason = "unknown_phone", "login rejected");
            return Err(LoginError::InvalidCredentials);
        };

        if !self.passwords.verify_password(password, &user.password_hash) {
            tracing::info!(user_id = %user.id, reason = "bad_password", "login rejected");
            return Err(LoginError::InvalidCredentials);
        }

        if user.role.resolve().is_none() {
            tracing::warn!(user_id = %user.id, role = %user.role, "login rejected: unknown role");
            return Err(LoginError::UnknownRole(user.role.as_str().to_string()));
        }

        let issued = self.tokens.issue(
            user.id,
            &user.phone,
            &user.name,
            user.role,
            user.franchisee_id,
        )?;

        tracing::info!(user_id = %issued.claims.user_id, role = %issued.claims.role, "login succeeded");
        Ok(issued)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use franchise_core::ManualClock;

    use super::*;
    use crate::{CredentialSource, PlainCodec, Role};

    /// Verifier that compares plaintext, so tests skip argon2's cost.
    struct PlainVerifier;

    impl PasswordVerifier for PlainVerifier {
        fn verify_password(&self, plain: &str, hash: &str) -> bool {
            plain == hash
        }
    }

    fn authenticator(store: InMemoryIdentityStore) -> Authenticator {
        let tokens = TokenService::new(
            Arc::new(PlainCodec),
            Duration::hours(1),
            Arc::new(ManualClock::new(Utc::now())),
            CredentialSource::BearerHeader,
        );
        Authenticator::new(Arc::new(store), Arc::new(PlainVerifier), Arc::new(tokens))
    }

    fn record(phone: &str, role: &'static str) -> UserRecord {
        UserRecord {
            id: UserId::generate(),
            name: "Morgan".to_string(),
            phone: phone.to_string(),
            role: RoleName::new(role),
            franchisee_id: Some(FranchiseeId::new("F1")),
            password_hash: "hunter2".to_string(),
        }
    }

    #[test]
    fn phone_normalization_keeps_plus_and_digits() {
        assert_eq!(normalize_phone(" +7 (900) 123-45-67 "), "+79001234567");
        assert_eq!(normalize_phone("8-900-123"), "8900123");
    }

    #[test]
    fn login_issues_credential_with_store_identity() {
        let store = InMemoryIdentityStore::new();
        let user = record("+7 900 000 11 22", "admin");
        store.insert(user.clone());

        let issued = authenticator(store).login("+79000001122", "hunter2").unwrap();
        assert_eq!(issued.claims.user_id, user.id);
        assert_eq!(issued.claims.role.resolve(), Some(Role::Admin));
        assert_eq!(issued.claims.franchisee_id, Some(FranchiseeId::new("F1")));
    }

    #[test]
    fn unknown_phone_and_bad_password_look_the_same() {
        let store = InMemoryIdentityStore::new();
        store.insert(record("+15550001", "admin"));
        let auth = authenticator(store);

        assert_eq!(auth.login("+15559999", "hunter2"), Err(LoginError::InvalidCredentials));
        assert_eq!(auth.login("+15550001", "wrong"), Err(LoginError::InvalidCredentials));
    }

    #[test]
    fn unknown_role_accounts_get_no_credential() {
        let store = InMemoryIdentityStore::new();
        store.insert(record("+15550002", "intern"));
        assert_eq!(
            authenticator(store).login("+15550002", "hunter2"),
            Err(LoginError::UnknownRole("intern".to_string()))
        );
    }

    #[test]
    fn argon2_verifier_round_trip() {
        let hash = Argon2PasswordVerifier::hash_password("s3cret-Pass").unwrap();
        assert!(Argon2PasswordVerifier.verify_password("s3cret-Pass", &hash));
        assert!(!Argon2PasswordVerifier.verify_password("nope", &hash));
        assert!(!Argon2PasswordVerifier.verify_password("s3cret-Pass", "not-a-phc-string"));
    }

    #[test]
    fn seed_users_deserialize_and_hash() {
        let seed: Vec<SeedUser> = serde_json::from_str(
            r#"[{"name":"Root","phone":"+10000000000","role":"super_admin","password":"pw"}]"#,
        )
        .unwrap();
        let store = InMemoryIdentityStore::from_seed(seed).unwrap();
        let user = store.find_user_by_phone("+1 000 000 0000").unwrap();
        assert_eq!(user.franchisee_id, None);
        assert!(Argon2PasswordVerifier.verify_password("pw", &user.password_hash));
    }
}
