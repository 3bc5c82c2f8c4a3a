use franchise_auth::{Capability, Claims, Grant, Role, TenantMatch, ViewVariant};

/// Authorized request context, inserted by the request guard.
///
/// This is immutable and present on every guarded route. Handlers read it;
/// they never re-derive authorization from the raw claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizedContext {
    identity: Claims,
    role: Role,
    tenant_scope: TenantMatch,
    variant: ViewVariant,
    capability: Capability,
}

impl AuthorizedContext {
    pub(crate) fn new(identity: Claims, grant: Grant, capability: Capability) -> Self {
        Self {
            identity,
            role: grant.role,
            tenant_scope: grant.scope,
            variant: grant.variant,
            capability,
        }
    }

    pub fn identity(&self) -> &Claims {
        &self.identity
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn tenant_scope(&self) -> &TenantMatch {
        &self.tenant_scope
    }

    pub fn variant(&self) -> ViewVariant {
        self.variant
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }

    /// Roles this identity may hand out on the access-management screen.
    pub fn assignable_roles(&self) -> Vec<Role> {
        if self.variant == ViewVariant::EmployeeSelfService {
            return Vec::new();
        }
        self.role.assignable_roles()
    }
}
