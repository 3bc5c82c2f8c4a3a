//! Role registry: the closed set of organizational roles.
//!
//! Roles travel on the wire as opaque strings ([`RoleName`]) so that a
//! structurally valid credential can carry a role this build does not know.
//! Recognition happens here; anything unrecognized fails closed in the engine.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role identifier as carried by a credential or an identity record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleName(Cow<'static, str>);

impl RoleName {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolve against the registry. `None` for unknown roles.
    pub fn resolve(&self) -> Option<Role> {
        Role::parse(self.as_str())
    }

    /// Display label; unknown roles are labelled with their raw value.
    pub fn label(&self) -> Cow<'_, str> {
        match self.resolve() {
            Some(role) => Cow::Borrowed(role.label()),
            None => Cow::Borrowed(self.as_str()),
        }
    }
}

impl core::fmt::Display for RoleName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Role> for RoleName {
    fn from(role: Role) -> Self {
        Self(Cow::Borrowed(role.as_str()))
    }
}

/// Tenant scope class of a role.
///
/// Ordered from narrowest to broadest.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeClass {
    /// Bound to one franchisee, read of own work items only.
    Personnel,
    /// Bound to exactly one franchisee.
    Tenant,
    /// Every franchisee in the network.
    Unrestricted,
}

/// Organizational role. The set is closed and versioned with the build.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Uk,
    UkEmployee,
    Franchisee,
    OwnPoint,
    Admin,
    Employee,
    Animator,
    Host,
    Dj,
}

impl Role {
    pub const ALL: [Role; 10] = [
        Role::SuperAdmin,
        Role::Uk,
        Role::UkEmployee,
        Role::Franchisee,
        Role::OwnPoint,
        Role::Admin,
        Role::Employee,
        Role::Animator,
        Role::Host,
        Role::Dj,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::Uk => "uk",
            Role::UkEmployee => "uk_employee",
            Role::Franchisee => "franchisee",
            Role::OwnPoint => "own_point",
            Role::Admin => "admin",
            Role::Employee => "employee",
            Role::Animator => "animator",
            Role::Host => "host",
            Role::Dj => "dj",
        }
    }

    /// Exact, case-sensitive lookup. Wire values are never normalized.
    pub fn parse(s: &str) -> Option<Role> {
        Role::ALL.into_iter().find(|r| r.as_str() == s)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "Super administrator",
            Role::Uk => "Management company",
            Role::UkEmployee => "Management company employee",
            Role::Franchisee => "Franchisee",
            Role::OwnPoint => "Own point",
            Role::Admin => "Administrator",
            Role::Employee => "Employee",
            Role::Animator => "Animator",
            Role::Host => "Host",
            Role::Dj => "DJ",
        }
    }

    /// `franchisee` and `own_point` share one class; so do `uk` and `super_admin`.
    pub fn scope_class(&self) -> ScopeClass {
        match self {
            Role::SuperAdmin | Role::Uk | Role::UkEmployee => ScopeClass::Unrestricted,
            Role::Franchisee | Role::OwnPoint | Role::Admin => ScopeClass::Tenant,
            Role::Employee | Role::Animator | Role::Host | Role::Dj => ScopeClass::Personnel,
        }
    }

    /// Position in the access hierarchy (higher is broader).
    ///
    /// Only meaningful through [`Role::subsumes`]; equal ranks are peers.
    pub fn rank(&self) -> u8 {
        match self {
            Role::SuperAdmin | Role::Uk => 4,
            Role::UkEmployee => 3,
            Role::Franchisee | Role::OwnPoint => 2,
            Role::Admin => 1,
            Role::Employee | Role::Animator | Role::Host | Role::Dj => 0,
        }
    }

    /// Whether this role's scope covers everything `other`'s scope covers.
    pub fn subsumes(&self, other: Role) -> bool {
        self.rank() >= other.rank()
    }

    /// Roles strictly below this one, i.e. the roles it may hand out.
    pub fn assignable_roles(&self) -> Vec<Role> {
        Role::ALL
            .into_iter()
            .filter(|r| r.rank() < self.rank())
            .collect()
    }

    pub fn is_personnel(&self) -> bool {
        self.scope_class() == ScopeClass::Personnel
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role definition (for audit/display).
#[derive(Debug, Clone, Serialize)]
pub struct RoleInfo {
    pub name: &'static str,
    pub label: &'static str,
    pub rank: u8,
    pub scope: ScopeClass,
}

/// The full registry, in declaration order.
pub fn catalog() -> Vec<RoleInfo> {
    Role::ALL
        .into_iter()
        .map(|role| RoleInfo {
            name: role.as_str(),
            label: role.label(),
            rank: role.rank(),
            scope: role.scope_class(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_role_round_trips_through_its_wire_name() {
        for role in Role::ALL {
            assert_eq!(Role::parse(role.as_str()), Some(role));
            assert_eq!(RoleName::from(role).resolve(), Some(role));
        }
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert_eq!(Role::parse("Admin"), None);
        assert_eq!(Role::parse(" admin"), None);
    }

    #[test]
    fn unknown_role_labels_as_itself() {
        let name = RoleName::new("regional_manager");
        assert_eq!(name.resolve(), None);
        assert_eq!(name.label(), "regional_manager");
        assert_eq!(RoleName::from(Role::Dj).label(), "DJ");
    }

    #[test]
    fn uk_and_super_admin_are_peers() {
        assert!(Role::Uk.subsumes(Role::SuperAdmin));
        assert!(Role::SuperAdmin.subsumes(Role::Uk));
        assert_eq!(Role::Uk.scope_class(), Role::SuperAdmin.scope_class());
    }

    #[test]
    fn franchisee_and_own_point_share_a_capability_class() {
        assert_eq!(Role::Franchisee.scope_class(), ScopeClass::Tenant);
        assert_eq!(Role::OwnPoint.scope_class(), ScopeClass::Tenant);
        assert_eq!(Role::Franchisee.rank(), Role::OwnPoint.rank());
        assert_ne!(Role::Franchisee.label(), Role::OwnPoint.label());
    }

    #[test]
    fn personnel_cannot_assign_anyone() {
        for role in [Role::Employee, Role::Animator, Role::Host, Role::Dj] {
            assert!(role.is_personnel());
            assert!(role.assignable_roles().is_empty());
        }
    }

    #[test]
    fn franchisee_assigns_admin_and_personnel_only() {
        let assignable = Role::Franchisee.assignable_roles();
        assert!(assignable.contains(&Role::Admin));
        assert!(assignable.contains(&Role::Host));
        assert!(!assignable.contains(&Role::OwnPoint));
        assert!(!assignable.contains(&Role::UkEmployee));
    }

    #[test]
    fn catalog_lists_the_closed_set() {
        let names: Vec<_> = catalog().into_iter().map(|r| r.name).collect();
        assert_eq!(names.len(), 10);
        assert_eq!(names[0], "super_admin");
        assert_eq!(names[9], "dj");
    }
}
