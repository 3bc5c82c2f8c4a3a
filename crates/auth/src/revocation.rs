//! Optional server-side revocation.
//!
//! Credentials are stateless; without a revocation list a token stays valid
//! until its natural expiry even after logout. The in-memory list closes that
//! gap for a single process only.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};

pub trait RevocationList: Send + Sync {
    /// Remember `token` as revoked until `expires_at`.
    fn revoke(&self, token: &str, expires_at: DateTime<Utc>, now: DateTime<Utc>);

    fn is_revoked(&self, token: &str) -> bool;
}

#[derive(Debug, Default)]
pub struct InMemoryRevocationList {
    revoked: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl InMemoryRevocationList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.revoked.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RevocationList for InMemoryRevocationList {
    fn revoke(&self, token: &str, expires_at: DateTime<Utc>, now: DateTime<Utc>) {
        let mut revoked = self.revoked.write().unwrap_or_else(|e| e.into_inner());
        // Entries past expiry would be rejected as expired anyway.
        revoked.retain(|_, exp| *exp > now);
        if expires_at > now {
            revoked.insert(token.to_string(), expires_at);
        }
    }

    fn is_revoked(&self, token: &str) -> bool {
        self.revoked
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(token)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn revoked_token_is_remembered_until_expiry() {
        let now = Utc::now();
        let list = InMemoryRevocationList::new();
        list.revoke("t1", now + Duration::minutes(5), now);
        assert!(list.is_revoked("t1"));
        assert!(!list.is_revoked("t2"));
    }

    #[test]
    fn expired_entries_are_pruned_on_insert() {
        let now = Utc::now();
        let list = InMemoryRevocationList::new();
        list.revoke("old", now + Duration::minutes(1), now);
        list.revoke("new", now + Duration::hours(2), now + Duration::minutes(10));
        assert_eq!(list.len(), 1);
        assert!(list.is_revoked("new"));
    }

    #[test]
    fn already_expired_tokens_are_not_stored() {
        let now = Utc::now();
        let list = InMemoryRevocationList::new();
        list.revoke("stale", now - Duration::seconds(1), now);
        assert!(list.is_empty());
    }
}
