//! Auth Gateway: login/register/logout against the identity service.
//!
//! # Responsibility
//! - Translate the three user intents into remote calls.
//! - Surface every failure as one `AuthError` kind with a readable message.
//!
//! # Invariants
//! - Gateways hold no session cache of their own beyond transport cookies.
//! - No call is retried.
//! - `register` never establishes a session.

use crate::model::account::{Session, User};
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod http;
pub mod memory;

pub use http::HttpAuthGateway;
pub use memory::InMemoryAuthGateway;

pub type AuthResult<T> = Result<T, AuthError>;

/// Single failure kind for invalid credentials, duplicate registration and
/// service unavailability alike.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthError {
    message: String,
    /// HTTP status when the failure came back from the service.
    status: Option<u16>,
}

impl AuthError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(message: impl Into<String>, status: u16) -> Self {
        Self {
            message: message.into(),
            status: Some(status),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for AuthError {}

/// Remote identity/session operations.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Creates an email/password session.
    async fn login(&self, email: &str, password: &str) -> AuthResult<Session>;

    /// Creates an account under a freshly generated user id.
    async fn register(&self, email: &str, password: &str) -> AuthResult<User>;

    /// Deletes the current active session.
    async fn logout(&self) -> AuthResult<()>;
}
