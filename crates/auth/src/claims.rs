use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use franchise_core::{FranchiseeId, UserId};

use crate::RoleName;

/// Identity carried by a credential (transport-agnostic).
///
/// Timestamps are whole seconds on the wire (`iat`/`exp`), so claims built by
/// the token service round-trip exactly through any codec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: UserId,

    pub name: String,

    pub phone: String,

    /// Raw role; resolved against the registry at authorization time.
    pub role: RoleName,

    /// Tenant the identity belongs to. Absent for network-wide roles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub franchisee_id: Option<FranchiseeId>,

    #[serde(rename = "iat", with = "chrono::serde::ts_seconds")]
    pub issued_at: DateTime<Utc>,

    #[serde(rename = "exp", with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,
}

impl Claims {
    /// `issued_at <= now < expires_at`.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        validate_claims(self, now).is_ok()
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

/// Deterministically validate the time window of a set of claims.
///
/// Expiry is checked first: a token past its `exp` reports `Expired` no matter
/// what else is wrong with it.
pub fn validate_claims(claims: &Claims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if now >= claims.expires_at {
        return Err(TokenValidationError::Expired);
    }
    if claims.expires_at <= claims.issued_at {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(TokenValidationError::NotYetValid);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn claims_at(iat: DateTime<Utc>, exp: DateTime<Utc>) -> Claims {
        Claims {
            user_id: UserId::generate(),
            name: "Dana".to_string(),
            phone: "+15550001".to_string(),
            role: RoleName::new("admin"),
            franchisee_id: Some(FranchiseeId::new("F1")),
            issued_at: iat,
            expires_at: exp,
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn live_inside_window() {
        let c = claims_at(t0(), t0() + Duration::hours(1));
        assert_eq!(validate_claims(&c, t0()), Ok(()));
        assert!(c.is_live(t0() + Duration::minutes(59)));
    }

    #[test]
    fn expired_at_exact_expiry_instant() {
        let c = claims_at(t0(), t0() + Duration::hours(1));
        assert_eq!(
            validate_claims(&c, t0() + Duration::hours(1)),
            Err(TokenValidationError::Expired)
        );
    }

    #[test]
    fn not_yet_valid_before_issue() {
        let c = claims_at(t0(), t0() + Duration::hours(1));
        assert_eq!(
            validate_claims(&c, t0() - Duration::seconds(1)),
            Err(TokenValidationError::NotYetValid)
        );
    }

    #[test]
    fn inverted_window_is_rejected_unless_already_expired() {
        let c = claims_at(t0(), t0() - Duration::hours(1));
        assert_eq!(
            validate_claims(&c, t0() - Duration::hours(2)),
            Err(TokenValidationError::InvalidTimeWindow)
        );
        assert_eq!(validate_claims(&c, t0()), Err(TokenValidationError::Expired));
    }

    #[test]
    fn wire_shape_uses_short_timestamp_names() {
        let c = claims_at(t0(), t0() + Duration::hours(1));
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["iat"], t0().timestamp());
        assert_eq!(json["franchiseeId"], "F1");
        assert!(json.get("userId").is_some());

        let mut uk = c.clone();
        uk.franchisee_id = None;
        let json = serde_json::to_value(&uk).unwrap();
        assert!(json.get("franchiseeId").is_none());
    }
}
