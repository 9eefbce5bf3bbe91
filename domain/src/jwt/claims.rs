//! The decoded payload of a bearer token.
//!
//! A `ClaimSet` keeps every key the issuer put in the payload, untouched. The accessors
//! below only read the handful of claims the portal routes on; nothing is required to
//! be present.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const ROLES_CLAIM: &str = "roles";
pub const ROLE_CLAIM: &str = "role";
pub const SUBJECT_CLAIM: &str = "sub";
pub const USERNAME_CLAIM: &str = "username";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimSet(Map<String, Value>);

impl ClaimSet {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    /// The value a role is read from: the first entry of `roles` when that is a
    /// non-empty array, otherwise `role`. Later entries of `roles` are never consulted.
    pub(crate) fn role_candidate(&self) -> Option<(&'static str, &Value)> {
        match self.0.get(ROLES_CLAIM) {
            Some(Value::Array(roles)) if !roles.is_empty() => Some((ROLES_CLAIM, &roles[0])),
            _ => self.0.get(ROLE_CLAIM).map(|role| (ROLE_CLAIM, role)),
        }
    }

    /// `sub` when it holds a principal, otherwise `username`.
    pub(crate) fn principal(&self) -> Option<String> {
        self.text(SUBJECT_CLAIM).or_else(|| self.text(USERNAME_CLAIM))
    }

    /// Non-empty string claims as-is, numbers in their JSON form, anything else as absent.
    fn text(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

impl From<Map<String, Value>> for ClaimSet {
    fn from(map: Map<String, Value>) -> Self {
        ClaimSet(map)
    }
}
