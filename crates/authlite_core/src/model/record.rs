//! Persisted mirror of the remote session state.
//!
//! # Invariants
//! - `is_logged_in == true` implies `user_email` is non-empty.
//! - A logged-out record always carries an empty email.

use serde::{Deserialize, Serialize};

/// Local `(isLoggedIn, userEmail)` pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalAuthRecord {
    pub is_logged_in: bool,
    pub user_email: String,
}

impl LocalAuthRecord {
    /// Record written after a successful login.
    pub fn logged_in(email: impl Into<String>) -> Self {
        Self {
            is_logged_in: true,
            user_email: email.into(),
        }
    }

    /// Record written after a successful logout; also the never-written default.
    pub fn logged_out() -> Self {
        Self::default()
    }

    pub fn is_consistent(&self) -> bool {
        if self.is_logged_in {
            !self.user_email.is_empty()
        } else {
            self.user_email.is_empty()
        }
    }
}
