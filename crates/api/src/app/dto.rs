//! Request/response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use franchise_auth::{Access, Claims, RoleInfo, Screen, TenantMatch, ViewVariant};
use franchise_core::{FranchiseeId, UserId};

use crate::context::AuthorizedContext;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub phone: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_at: DateTime<Utc>,
    pub expires_in: i64,
    pub user: UserDto,
}

#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: UserId,
    pub name: String,
    pub phone: String,
    pub role: String,
    pub role_label: String,
    pub franchisee_id: Option<FranchiseeId>,
}

impl From<&Claims> for UserDto {
    fn from(claims: &Claims) -> Self {
        Self {
            id: claims.user_id.clone(),
            name: claims.name.clone(),
            phone: claims.phone.clone(),
            role: claims.role.as_str().to_string(),
            role_label: claims.role.label().into_owned(),
            franchisee_id: claims.franchisee_id.clone(),
        }
    }
}

/// What a guarded screen handler hands to the presentation layer.
#[derive(Debug, Serialize)]
pub struct ScreenResponse {
    pub screen: Screen,
    pub access: Access,
    pub variant: ViewVariant,
    pub scope: TenantMatch,
    pub user: UserDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignable_roles: Option<Vec<RoleInfo>>,
}

impl From<&AuthorizedContext> for ScreenResponse {
    fn from(ctx: &AuthorizedContext) -> Self {
        Self {
            screen: ctx.capability().screen,
            access: ctx.capability().access,
            variant: ctx.variant(),
            scope: ctx.tenant_scope().clone(),
            user: UserDto::from(ctx.identity()),
            assignable_roles: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ExplainQuery {
    pub screen: Screen,
    #[serde(default = "default_access")]
    pub access: Access,
    #[serde(default)]
    pub target_franchisee_id: Option<String>,
}

fn default_access() -> Access {
    Access::Read
}
