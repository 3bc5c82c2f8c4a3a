//! Strongly-typed identifiers used across the workspace.

use core::str::FromStr;
use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Identifier of a user (actor identity).
///
/// Opaque: the identity store issues it and it is only ever compared and
/// echoed back. Locally generated ids are UUIDv7 strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Cow<'static, str>);

impl UserId {
    pub fn new(id: impl Into<Cow<'static, str>>) -> Self {
        Self(id.into())
    }

    /// Fresh time-ordered id. Prefer passing IDs explicitly in tests
    /// for determinism.
    pub fn generate() -> Self {
        Self::from_uuid(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(Cow::Owned(uuid.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::generate()
    }
}

impl core::fmt::Display for UserId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Uuid> for UserId {
    fn from(value: Uuid) -> Self {
        Self::from_uuid(value)
    }
}

impl FromStr for UserId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DomainError::invalid_id("UserId: empty"));
        }
        Ok(Self(Cow::Owned(s.to_string())))
    }
}

/// Identifier of a franchisee (the multi-tenant data-ownership boundary).
///
/// Franchisee identifiers are opaque: they are issued by the relational store
/// and only ever compared for equality here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FranchiseeId(Cow<'static, str>);

impl FranchiseeId {
    pub fn new(id: impl Into<Cow<'static, str>>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for FranchiseeId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for FranchiseeId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DomainError::invalid_id("FranchiseeId: empty"));
        }
        Ok(Self(Cow::Owned(s.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_user_id_parses_back() {
        let id = UserId::generate();
        let parsed: UserId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!(Uuid::parse_str(id.as_str()).is_ok());
    }

    #[test]
    fn user_id_accepts_store_issued_strings() {
        let id: UserId = "legacy-42".parse().unwrap();
        assert_eq!(id.as_str(), "legacy-42");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"legacy-42\"");
        let back: UserId = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(back, UserId::new("7"));
    }

    #[test]
    fn user_id_rejects_blank() {
        let err = "  ".parse::<UserId>().unwrap_err();
        assert!(matches!(err, DomainError::InvalidId(_)));
    }

    #[test]
    fn franchisee_id_is_transparent_on_the_wire() {
        let id = FranchiseeId::new("F1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"F1\"");
    }

    #[test]
    fn franchisee_id_rejects_blank() {
        assert!(" ".parse::<FranchiseeId>().is_err());
        assert_eq!(" F2 ".parse::<FranchiseeId>().unwrap(), FranchiseeId::new("F2"));
    }
}
