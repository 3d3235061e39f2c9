//! Remote identity types returned by the Auth Gateway.
//!
//! # Invariants
//! - `UserId` values are at most 36 chars of `[a-zA-Z0-9._-]` and never start
//!   with a special character.
//! - Passwords are never stored on these types.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const USER_ID_MAX_LEN: usize = 36;

/// Client-generated account identifier sent with `create-user`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Generates a fresh identifier (32 lowercase hex chars).
    pub fn unique() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Wraps an externally supplied identifier after shape checks.
    pub fn parse(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        let mut chars = value.chars();
        let first_ok = chars.next().is_some_and(|c| c.is_ascii_alphanumeric());
        let rest_ok = chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
        (first_ok && rest_ok && value.len() <= USER_ID_MAX_LEN).then_some(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Server-issued proof of an authenticated identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque session identifier.
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    /// Expiry timestamp as formatted by the service.
    #[serde(default)]
    pub expire: Option<String>,
    /// Auth provider name, `email` for password sessions.
    #[serde(default)]
    pub provider: Option<String>,
}

/// Registered account as echoed back by `create-user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "$id")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}
