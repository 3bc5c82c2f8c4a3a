use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use franchise_core::FranchiseeId;

use crate::views::variant_for;
use crate::{Access, Capability, Claims, Role, ScopeClass, Screen, ViewVariant};

/// Which tenants an authorized request may touch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "franchisee_id", rename_all = "snake_case")]
pub enum TenantMatch {
    /// Any franchisee in the network.
    Unrestricted,
    /// Exactly this franchisee.
    Bound(FranchiseeId),
    /// This franchisee, own work items only.
    SelfOnly(FranchiseeId),
}

/// Outcome of a successful authorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
    pub role: Role,
    pub scope: TenantMatch,
    pub variant: ViewVariant,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Denial {
    #[error("unauthenticated")]
    Unauthenticated,

    #[error("unknown role '{0}'")]
    UnknownRole(String),

    #[error("tenant mismatch")]
    TenantMismatch,

    #[error("no variant of '{0}' for this role")]
    NoVariant(Screen),
}

impl Denial {
    pub fn kind(&self) -> DenialKind {
        match self {
            Denial::Unauthenticated => DenialKind::Unauthenticated,
            Denial::UnknownRole(_) => DenialKind::UnknownRole,
            Denial::TenantMismatch => DenialKind::TenantMismatch,
            Denial::NoVariant(_) => DenialKind::NoVariant,
        }
    }

    /// Everything except `Unauthenticated` is "authenticated but forbidden".
    pub fn is_forbidden(&self) -> bool {
        !matches!(self, Denial::Unauthenticated)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    Unauthenticated,
    UnknownRole,
    TenantMismatch,
    NoVariant,
}

impl DenialKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DenialKind::Unauthenticated => "unauthenticated",
            DenialKind::UnknownRole => "unknown_role",
            DenialKind::TenantMismatch => "tenant_mismatch",
            DenialKind::NoVariant => "no_variant",
        }
    }
}

/// Decide whether `claims` may exercise `capability` against `requested`.
///
/// `requested = None` is a network-wide request: only unrestricted roles match it.
///
/// - No IO
/// - No panics
/// - Fails closed on anything it does not recognize
pub fn authorize(
    claims: Option<&Claims>,
    now: DateTime<Utc>,
    requested: Option<&FranchiseeId>,
    capability: Capability,
) -> Result<Grant, Denial> {
    let claims = match claims {
        Some(c) if c.is_live(now) => c,
        _ => return Err(Denial::Unauthenticated),
    };

    let role = claims
        .role
        .resolve()
        .ok_or_else(|| Denial::UnknownRole(claims.role.as_str().to_string()))?;

    let scope = scope_match(role, claims.franchisee_id.as_ref(), requested, capability.access)
        .ok_or(Denial::TenantMismatch)?;

    // Personnel always land on self-service, ahead of the table.
    let variant = if role.is_personnel() {
        ViewVariant::EmployeeSelfService
    } else {
        match variant_for(capability.screen, role) {
            Some(ViewVariant::NoAccess) | None => {
                return Err(Denial::NoVariant(capability.screen));
            }
            Some(variant) => variant,
        }
    };

    Ok(Grant {
        role,
        scope,
        variant,
    })
}

fn scope_match(
    role: Role,
    own: Option<&FranchiseeId>,
    requested: Option<&FranchiseeId>,
    access: Access,
) -> Option<TenantMatch> {
    match role.scope_class() {
        ScopeClass::Unrestricted => Some(TenantMatch::Unrestricted),
        ScopeClass::Tenant => match (own, requested) {
            (Some(own), Some(req)) if own == req => Some(TenantMatch::Bound(own.clone())),
            _ => None,
        },
        ScopeClass::Personnel => match (own, requested) {
            (Some(own), Some(req)) if own == req && access.is_read_only() => {
                Some(TenantMatch::SelfOnly(own.clone()))
            }
            _ => None,
        },
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Authorization Explanation (Audit Trail)
// ─────────────────────────────────────────────────────────────────────────────

/// Detailed, serializable explanation of one authorization decision.
///
/// Meant for operators inspecting "why was this denied?". It is never part of
/// a rejection response.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationExplanation {
    pub capability: Capability,
    pub requested_franchisee_id: Option<FranchiseeId>,
    pub granted: bool,
    pub reason: String,
    pub role: Option<String>,
    pub role_label: Option<String>,
    pub scope_class: Option<ScopeClass>,
    pub variant: Option<ViewVariant>,
    pub scope: Option<TenantMatch>,
    pub denial: Option<DenialKind>,
}

pub fn explain(
    claims: Option<&Claims>,
    now: DateTime<Utc>,
    requested: Option<&FranchiseeId>,
    capability: Capability,
) -> AuthorizationExplanation {
    let decision = authorize(claims, now, requested, capability);
    let known = claims.and_then(|c| c.role.resolve());

    let reason = match &decision {
        Ok(grant) if grant.role.is_personnel() => format!(
            "role '{}' is personnel: routed to the self-service variant",
            grant.role
        ),
        Ok(grant) => format!(
            "role '{}' is granted the '{}' variant of '{}'",
            grant.role, grant.variant, capability.screen
        ),
        Err(Denial::Unauthenticated) => "no live identity".to_string(),
        Err(Denial::UnknownRole(raw)) => format!("role '{raw}' is not in the registry"),
        Err(Denial::TenantMismatch) => match requested {
            Some(id)
                if known.is_some_and(|r| r.is_personnel())
                    && !capability.access.is_read_only()
                    && claims.and_then(|c| c.franchisee_id.as_ref()) == Some(id) =>
            {
                format!("personnel have read-only access to their own franchisee; {capability} is a write")
            }
            Some(id) => format!("scope of this identity does not include franchisee '{id}' for {capability}"),
            None => format!("network-wide {capability} requires an unrestricted role"),
        },
        Err(Denial::NoVariant(screen)) => format!("the view table has no variant of '{screen}' for this role"),
    };

    AuthorizationExplanation {
        capability,
        requested_franchisee_id: requested.cloned(),
        granted: decision.is_ok(),
        reason,
        role: claims.map(|c| c.role.as_str().to_string()),
        role_label: claims.map(|c| c.role.label().into_owned()),
        scope_class: known.map(|r| r.scope_class()),
        variant: decision.as_ref().ok().map(|g| g.variant),
        scope: decision.as_ref().ok().map(|g| g.scope.clone()),
        denial: decision.as_ref().err().map(Denial::kind),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    use franchise_core::UserId;

    use super::*;
    use crate::RoleName;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 10, 0, 0).unwrap()
    }

    fn claims(role: &str, franchisee: Option<&str>) -> Claims {
        Claims {
            user_id: UserId::generate(),
            name: "Test User".to_string(),
            phone: "+15550199".to_string(),
            role: RoleName::new(role.to_string()),
            franchisee_id: franchisee.map(|f| FranchiseeId::new(f.to_string())),
            issued_at: now() - Duration::minutes(5),
            expires_at: now() + Duration::minutes(55),
        }
    }

    fn f(id: &'static str) -> FranchiseeId {
        FranchiseeId::new(id)
    }

    #[test]
    fn absent_claims_are_unauthenticated() {
        let res = authorize(None, now(), Some(&f("F1")), Capability::read(Screen::Dashboard));
        assert_eq!(res, Err(Denial::Unauthenticated));
    }

    #[test]
    fn expired_claims_are_unauthenticated_even_for_super_admin() {
        let c = claims("super_admin", None);
        let later = c.expires_at;
        let res = authorize(Some(&c), later, None, Capability::read(Screen::Dashboard));
        assert_eq!(res, Err(Denial::Unauthenticated));
    }

    #[test]
    fn uk_and_super_admin_get_network_view_for_any_tenant() {
        for role in ["uk", "super_admin"] {
            let c = claims(role, None);
            for screen in Screen::ALL {
                for tenant in [None, Some(f("F1")), Some(f("F9"))] {
                    let grant = authorize(Some(&c), now(), tenant.as_ref(), Capability::write(screen))
                        .unwrap();
                    assert_eq!(grant.variant, ViewVariant::UkWide);
                    assert_eq!(grant.scope, TenantMatch::Unrestricted);
                }
            }
        }
    }

    #[test]
    fn franchisee_and_own_point_are_bound_to_their_tenant() {
        for role in ["franchisee", "own_point"] {
            let c = claims(role, Some("F1"));
            let grant = authorize(Some(&c), now(), Some(&f("F1")), Capability::write(Screen::Crm)).unwrap();
            assert_eq!(grant.variant, ViewVariant::Franchisee);
            assert_eq!(grant.scope, TenantMatch::Bound(f("F1")));

            assert_eq!(
                authorize(Some(&c), now(), Some(&f("F2")), Capability::read(Screen::Crm)),
                Err(Denial::TenantMismatch)
            );
            assert_eq!(
                authorize(Some(&c), now(), None, Capability::read(Screen::Crm)),
                Err(Denial::TenantMismatch)
            );
        }
    }

    #[test]
    fn tenant_role_without_franchisee_never_matches() {
        let c = claims("admin", None);
        assert_eq!(
            authorize(Some(&c), now(), Some(&f("F1")), Capability::read(Screen::Dashboard)),
            Err(Denial::TenantMismatch)
        );
    }

    #[test]
    fn personnel_route_to_self_service_on_every_screen() {
        for role in ["employee", "animator", "host", "dj"] {
            let c = claims(role, Some("F3"));
            for screen in Screen::ALL {
                let grant = authorize(Some(&c), now(), Some(&f("F3")), Capability::read(screen)).unwrap();
                assert_eq!(grant.variant, ViewVariant::EmployeeSelfService);
                assert_eq!(grant.scope, TenantMatch::SelfOnly(f("F3")));
            }
        }
    }

    #[test]
    fn personnel_cannot_write_or_cross_tenants() {
        let c = claims("host", Some("F3"));
        assert_eq!(
            authorize(Some(&c), now(), Some(&f("F3")), Capability::write(Screen::Crm)),
            Err(Denial::TenantMismatch)
        );
        assert_eq!(
            authorize(Some(&c), now(), Some(&f("F4")), Capability::read(Screen::Crm)),
            Err(Denial::TenantMismatch)
        );
    }

    #[test]
    fn no_access_entries_deny_with_no_variant() {
        let admin = claims("admin", Some("F1"));
        assert_eq!(
            authorize(Some(&admin), now(), Some(&f("F1")), Capability::read(Screen::AccessManagement)),
            Err(Denial::NoVariant(Screen::AccessManagement))
        );

        let uk_employee = claims("uk_employee", None);
        assert_eq!(
            authorize(Some(&uk_employee), now(), Some(&f("F1")), Capability::read(Screen::Finances)),
            Err(Denial::NoVariant(Screen::Finances))
        );
        assert!(authorize(Some(&uk_employee), now(), None, Capability::read(Screen::Crm)).is_ok());
    }

    #[test]
    fn admin_gets_admin_variant_in_own_tenant() {
        let c = claims("admin", Some("F1"));
        let grant = authorize(Some(&c), now(), Some(&f("F1")), Capability::write(Screen::Personnel)).unwrap();
        assert_eq!(grant.variant, ViewVariant::Admin);
        assert_eq!(grant.role, Role::Admin);
    }

    #[test]
    fn unknown_role_is_denied_before_scope() {
        let c = claims("Admin", Some("F1"));
        assert_eq!(
            authorize(Some(&c), now(), Some(&f("F1")), Capability::read(Screen::Dashboard)),
            Err(Denial::UnknownRole("Admin".to_string()))
        );
    }

    #[test]
    fn explanation_reports_denial_kind_without_panicking() {
        let c = claims("franchisee", Some("F1"));
        let e = explain(Some(&c), now(), Some(&f("F2")), Capability::read(Screen::Finances));
        assert!(!e.granted);
        assert_eq!(e.denial, Some(DenialKind::TenantMismatch));
        assert_eq!(e.role_label.as_deref(), Some("Franchisee"));
        assert_eq!(e.scope_class, Some(ScopeClass::Tenant));

        let e = explain(Some(&c), now(), Some(&f("F1")), Capability::read(Screen::Finances));
        assert!(e.granted);
        assert_eq!(e.variant, Some(ViewVariant::Franchisee));
        assert!(e.denial.is_none());

        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["scope"]["kind"], "bound");
        assert_eq!(json["scope"]["franchisee_id"], "F1");
    }

    #[test]
    fn explanation_tells_personnel_writes_apart_from_foreign_tenants() {
        let c = claims("host", Some("F1"));

        let own = explain(Some(&c), now(), Some(&f("F1")), Capability::write(Screen::Crm));
        assert_eq!(own.denial, Some(DenialKind::TenantMismatch));
        assert!(own.reason.contains("read-only"), "{}", own.reason);
        assert!(!own.reason.contains("does not include"), "{}", own.reason);

        let foreign = explain(Some(&c), now(), Some(&f("F2")), Capability::write(Screen::Crm));
        assert_eq!(foreign.denial, Some(DenialKind::TenantMismatch));
        assert!(foreign.reason.contains("does not include franchisee 'F2'"), "{}", foreign.reason);
    }

    fn screens() -> impl Strategy<Value = Screen> {
        prop::sample::select(Screen::ALL.to_vec())
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 512,
            ..ProptestConfig::default()
        })]

        /// Property: a role string outside the registry is never allowed.
        #[test]
        fn garbage_roles_fail_closed(
            role in "\\PC{0,24}",
            tenant in proptest::option::of("[A-Z0-9]{1,4}"),
            screen in screens(),
            write in any::<bool>(),
        ) {
            prop_assume!(Role::parse(&role).is_none());
            let c = claims(&role, tenant.as_deref());
            let requested = tenant.map(FranchiseeId::new);
            let capability = if write { Capability::write(screen) } else { Capability::read(screen) };
            let res = authorize(Some(&c), now(), requested.as_ref(), capability);
            prop_assert_eq!(res, Err(Denial::UnknownRole(role)));
        }
    }
}
