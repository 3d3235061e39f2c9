//! Use-case layer: remote call first, local write-through second.
//!
//! # Responsibility
//! - `AuthService` is the effect boundary around the pure transition rules.
//! - `AuthController` owns in-memory screen state and turns every failure
//!   into a prefixed error line.

use crate::gateway::AuthError;
use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod auth_service;
pub mod screen;

pub use auth_service::AuthService;
pub use screen::{AuthController, AuthScreen, ScreenMode, ScreenView};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// User intents handled by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    Login,
    Register,
    Logout,
}

impl AuthAction {
    /// Event name used in log lines.
    pub fn event(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Register => "register",
            Self::Logout => "logout",
        }
    }

    /// Prefix shown to the user when the action fails.
    pub fn failure_prefix(self) -> &'static str {
        match self {
            Self::Login => "Login failed",
            Self::Register => "Registration failed",
            Self::Logout => "Logout failed",
        }
    }

    /// Full error line for a failed action, e.g. `"Login failed: <message>"`.
    pub fn failure_line(self, err: &ServiceError) -> String {
        format!("{}: {err}", self.failure_prefix())
    }
}

#[derive(Debug)]
pub enum ServiceError {
    /// The identity service rejected the call or could not be reached.
    Auth(AuthError),
    /// The remote call succeeded but the local mirror could not be written.
    Store(StoreError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auth(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Auth(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<AuthError> for ServiceError {
    fn from(value: AuthError) -> Self {
        Self::Auth(value)
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}
