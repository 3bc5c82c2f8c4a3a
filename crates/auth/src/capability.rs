//! What a request asks for: a screen plus read or write access.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use franchise_core::DomainError;

/// Dashboard screens with role-dependent variants.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Dashboard,
    Crm,
    Finances,
    Personnel,
    AccessManagement,
    SocialIntegrations,
}

impl Screen {
    pub const ALL: [Screen; 6] = [
        Screen::Dashboard,
        Screen::Crm,
        Screen::Finances,
        Screen::Personnel,
        Screen::AccessManagement,
        Screen::SocialIntegrations,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Screen::Dashboard => "dashboard",
            Screen::Crm => "crm",
            Screen::Finances => "finances",
            Screen::Personnel => "personnel",
            Screen::AccessManagement => "access_management",
            Screen::SocialIntegrations => "social_integrations",
        }
    }
}

impl core::fmt::Display for Screen {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Screen {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Screen::ALL
            .into_iter()
            .find(|screen| screen.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown screen '{s}'")))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    Read,
    Write,
}

impl Access {
    pub fn is_read_only(&self) -> bool {
        matches!(self, Access::Read)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Capability {
    pub screen: Screen,
    pub access: Access,
}

impl Capability {
    pub fn read(screen: Screen) -> Self {
        Self {
            screen,
            access: Access::Read,
        }
    }

    pub fn write(screen: Screen) -> Self {
        Self {
            screen,
            access: Access::Write,
        }
    }
}

impl core::fmt::Display for Capability {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let access = match self.access {
            Access::Read => "read",
            Access::Write => "write",
        };
        write!(f, "{}.{}", self.screen, access)
    }
}
