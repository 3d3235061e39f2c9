//! Core auth logic for AuthLite.
//! Owns the session lifecycle and its local write-through mirror.

pub mod config;
pub mod db;
pub mod gateway;
pub mod logging;
pub mod model;
pub mod service;
pub mod session;
pub mod store;

pub use config::{AuthClient, ClientConfig, ConfigError};
pub use gateway::{AuthError, AuthGateway, AuthResult, HttpAuthGateway, InMemoryAuthGateway};
pub use logging::{default_log_level, init_logging, logging_status, mask_email, LogLevel};
pub use model::account::{Session, User, UserId};
pub use model::record::LocalAuthRecord;
pub use service::{
    AuthAction, AuthController, AuthScreen, AuthService, ScreenMode, ScreenView, ServiceError,
    ServiceResult,
};
pub use session::{apply, persisted_effect, AuthOutcome};
pub use store::{
    MemorySessionStore, SessionStore, SqliteSessionStore, StoreError, StoreResult,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
