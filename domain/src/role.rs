//! Normalized user roles carried in bearer token claims.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Literal prefix some issuers put in front of role names (`ROLE_ADMIN`).
pub const ROLE_PREFIX: &str = "ROLE_";

/// A user's category, always upper case and never empty.
///
/// Roles the portal routes on are exposed as constants, but any other value an issuer
/// sends is still a valid `Role`; it just has no dashboard of its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Role(String);

impl Role {
    pub const SEEKER: &'static str = "SEEKER";
    pub const LANDLORD: &'static str = "LANDLORD";
    pub const ADMIN: &'static str = "ADMIN";

    /// Strips a leading `ROLE_` (case-sensitive) and upper-cases the remainder.
    /// Returns `None` when nothing is left.
    pub fn normalize(candidate: &str) -> Option<Role> {
        let bare = candidate.strip_prefix(ROLE_PREFIX).unwrap_or(candidate);
        if bare.is_empty() {
            return None;
        }
        Some(Role(bare.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_seeker(&self) -> bool {
        self.0 == Self::SEEKER
    }

    pub fn is_landlord(&self) -> bool {
        self.0 == Self::LANDLORD
    }

    pub fn is_admin(&self) -> bool {
        self.0 == Self::ADMIN
    }
}

impl fmt::Display for Role {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "{}", self.0)
    }
}

impl TryFrom<String> for Role {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Role::normalize(&value).ok_or_else(|| format!("invalid role `{value}`"))
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.0
    }
}
