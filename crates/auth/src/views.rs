//! The view table: which variant of each screen a role gets.
//!
//! This is the single source of truth for screen variants. Each screen lists
//! every role exactly once; `NoAccess` is an explicit entry, never a fallthrough.

use serde::Serialize;

use crate::{Role, Screen};

use Role as R;
use ViewVariant as V;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewVariant {
    /// Network-wide view across every franchisee.
    UkWide,
    /// One franchisee's business.
    Franchisee,
    /// A franchisee's administrator view.
    Admin,
    /// Own schedule and work items only.
    EmployeeSelfService,
    /// Explicit placeholder: this role has no variant of the screen.
    NoAccess,
}

impl ViewVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewVariant::UkWide => "uk_wide",
            ViewVariant::Franchisee => "franchisee",
            ViewVariant::Admin => "admin",
            ViewVariant::EmployeeSelfService => "employee_self_service",
            ViewVariant::NoAccess => "no_access",
        }
    }
}

impl core::fmt::Display for ViewVariant {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

type Table = [(Role, ViewVariant); 10];

const DASHBOARD: Table = [
    (R::SuperAdmin, V::UkWide),
    (R::Uk, V::UkWide),
    (R::UkEmployee, V::UkWide),
    (R::Franchisee, V::Franchisee),
    (R::OwnPoint, V::Franchisee),
    (R::Admin, V::Admin),
    (R::Employee, V::EmployeeSelfService),
    (R::Animator, V::EmployeeSelfService),
    (R::Host, V::EmployeeSelfService),
    (R::Dj, V::EmployeeSelfService),
];

const CRM: Table = DASHBOARD;

const FINANCES: Table = [
    (R::SuperAdmin, V::UkWide),
    (R::Uk, V::UkWide),
    (R::UkEmployee, V::NoAccess),
    (R::Franchisee, V::Franchisee),
    (R::OwnPoint, V::Franchisee),
    (R::Admin, V::Admin),
    (R::Employee, V::EmployeeSelfService),
    (R::Animator, V::EmployeeSelfService),
    (R::Host, V::EmployeeSelfService),
    (R::Dj, V::EmployeeSelfService),
];

const PERSONNEL: Table = DASHBOARD;

const ACCESS_MANAGEMENT: Table = [
    (R::SuperAdmin, V::UkWide),
    (R::Uk, V::UkWide),
    (R::UkEmployee, V::NoAccess),
    (R::Franchisee, V::Franchisee),
    (R::OwnPoint, V::Franchisee),
    (R::Admin, V::NoAccess),
    (R::Employee, V::EmployeeSelfService),
    (R::Animator, V::EmployeeSelfService),
    (R::Host, V::EmployeeSelfService),
    (R::Dj, V::EmployeeSelfService),
];

const SOCIAL_INTEGRATIONS: Table = DASHBOARD;

pub fn table(screen: Screen) -> &'static Table {
    match screen {
        Screen::Dashboard => &DASHBOARD,
        Screen::Crm => &CRM,
        Screen::Finances => &FINANCES,
        Screen::Personnel => &PERSONNEL,
        Screen::AccessManagement => &ACCESS_MANAGEMENT,
        Screen::SocialIntegrations => &SOCIAL_INTEGRATIONS,
    }
}

/// Table lookup. `None` only if a row is missing, which the tests rule out.
pub fn variant_for(screen: Screen, role: Role) -> Option<ViewVariant> {
    table(screen)
        .iter()
        .find(|(r, _)| *r == role)
        .map(|(_, variant)| *variant)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_screen_maps_every_role_exactly_once() {
        for screen in Screen::ALL {
            for role in Role::ALL {
                let rows = table(screen).iter().filter(|(r, _)| *r == role).count();
                assert_eq!(rows, 1, "{screen} has {rows} rows for {role}");
            }
        }
    }

    #[test]
    fn owners_of_everything_see_the_network() {
        for screen in Screen::ALL {
            assert_eq!(variant_for(screen, Role::Uk), Some(V::UkWide));
            assert_eq!(variant_for(screen, Role::SuperAdmin), Some(V::UkWide));
        }
    }

    #[test]
    fn franchisee_and_own_point_rows_agree() {
        for screen in Screen::ALL {
            assert_eq!(
                variant_for(screen, Role::Franchisee),
                variant_for(screen, Role::OwnPoint)
            );
        }
    }

    #[test]
    fn personnel_rows_are_self_service() {
        for screen in Screen::ALL {
            for role in [R::Employee, R::Animator, R::Host, R::Dj] {
                assert_eq!(variant_for(screen, role), Some(V::EmployeeSelfService));
            }
        }
    }
}
