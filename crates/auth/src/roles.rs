use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role of an authenticated user.
///
/// The portal has exactly three roles; the wire form is the upper-case name
/// (`"ADMIN"`, `"TRAINER"`, `"STUDENT"`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Trainer,
    Student,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Trainer, Role::Student];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Trainer => "TRAINER",
            Role::Student => "STUDENT",
        }
    }

    /// Landing route after login: `/{role-lowercased}`.
    pub fn home_route(&self) -> &'static str {
        match self {
            Role::Admin => "/admin",
            Role::Trainer => "/trainer",
            Role::Student => "/student",
        }
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "TRAINER" => Ok(Role::Trainer),
            "STUDENT" => Ok(Role::Student),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
