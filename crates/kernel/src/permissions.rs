//! Role hierarchy checks.
//!
//! Roles form a closed, strictly ordered ladder. Access checks compare
//! levels with greater-or-equal semantics: an editor can do everything an
//! author can, and so on up the ladder. Role strings come from the
//! embedding application's storage; unknown strings are an error rather
//! than a silent denial so misconfiguration surfaces in logs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// User role, ordered from least to most privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Can read and comment.
    Subscriber,

    /// Can author and edit their own content.
    Author,

    /// Can edit any content and manage menus.
    Editor,

    /// Full administrative access.
    Admin,
}

impl Role {
    /// Explicit privilege level backing the ordering.
    pub fn level(self) -> u8 {
        match self {
            Role::Subscriber => 0,
            Role::Author => 1,
            Role::Editor => 2,
            Role::Admin => 3,
        }
    }

    /// Whether this role meets or exceeds the required role's level.
    pub fn satisfies(self, required: Role) -> bool {
        self.level() >= required.level()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Subscriber => "subscriber",
            Role::Author => "author",
            Role::Editor => "editor",
            Role::Admin => "admin",
        };
        f.write_str(name)
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "subscriber" => Ok(Role::Subscriber),
            "author" => Ok(Role::Author),
            "editor" => Ok(Role::Editor),
            "admin" => Ok(Role::Admin),
            other => Err(Error::UnknownRole(other.to_string())),
        }
    }
}

/// Require that `actual` meets or exceeds `required`.
///
/// Returns [`Error::InsufficientRole`] on failure; the caller maps that to
/// its own denial response.
pub fn require_role(actual: Role, required: Role) -> Result<()> {
    if actual.satisfies(required) {
        Ok(())
    } else {
        Err(Error::InsufficientRole { required, actual })
    }
}
