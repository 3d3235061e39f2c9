//! In-process identity service.
//!
//! Deterministic stand-in for the remote service, used by tests and the CLI
//! `--offline` mode. Error messages follow the wording of the real service.

use super::{AuthError, AuthGateway, AuthResult};
use crate::model::account::{Session, User, UserId};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeMap;

pub const INVALID_CREDENTIALS: &str =
    "Invalid credentials. Please check the email and password.";
pub const DUPLICATE_USER: &str =
    "A user with the same id, email, or phone already exists in this project.";
pub const MISSING_SESSION: &str = "User (role: guests) missing scope (account)";
pub const INVALID_EMAIL: &str = "Invalid `email` param: Value must be a valid email address";
pub const INVALID_PASSWORD: &str = "Invalid `password` param: Password must not be empty";
pub const UNREACHABLE: &str = "identity service unreachable: network is offline";

#[derive(Debug, Clone)]
struct Account {
    user_id: UserId,
    password: String,
}

#[derive(Debug, Default)]
struct ServiceState {
    accounts: BTreeMap<String, Account>,
    current: Option<Session>,
    issued_sessions: u64,
    offline: bool,
}

/// Mutex-guarded account table plus at most one current session.
#[derive(Debug, Default)]
pub struct InMemoryAuthGateway {
    state: Mutex<ServiceState>,
}

impl InMemoryAuthGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an account without going through `register` validation.
    pub fn with_account(self, email: &str, password: &str) -> Self {
        self.state.lock().accounts.insert(
            email.to_string(),
            Account {
                user_id: UserId::unique(),
                password: password.to_string(),
            },
        );
        self
    }

    /// Makes every following call fail as if the network were down.
    pub fn set_offline(&self, offline: bool) {
        self.state.lock().offline = offline;
    }

    pub fn current_session(&self) -> Option<Session> {
        self.state.lock().current.clone()
    }

    pub fn account_count(&self) -> usize {
        self.state.lock().accounts.len()
    }
}

#[async_trait]
impl AuthGateway for InMemoryAuthGateway {
    async fn login(&self, email: &str, password: &str) -> AuthResult<Session> {
        let mut state = self.state.lock();
        if state.offline {
            return Err(AuthError::new(UNREACHABLE));
        }

        let user_id = match state.accounts.get(email) {
            Some(account) if account.password == password => account.user_id.clone(),
            _ => return Err(AuthError::with_status(INVALID_CREDENTIALS, 401)),
        };

        state.issued_sessions += 1;
        let session = Session {
            id: format!("session-{}", state.issued_sessions),
            user_id: user_id.to_string(),
            expire: None,
            provider: Some("email".to_string()),
        };
        state.current = Some(session.clone());
        Ok(session)
    }

    async fn register(&self, email: &str, password: &str) -> AuthResult<User> {
        let mut state = self.state.lock();
        if state.offline {
            return Err(AuthError::new(UNREACHABLE));
        }
        if !looks_like_email(email) {
            return Err(AuthError::with_status(INVALID_EMAIL, 400));
        }
        if password.is_empty() {
            return Err(AuthError::with_status(INVALID_PASSWORD, 400));
        }
        if state.accounts.contains_key(email) {
            return Err(AuthError::with_status(DUPLICATE_USER, 409));
        }

        let user_id = UserId::unique();
        state.accounts.insert(
            email.to_string(),
            Account {
                user_id: user_id.clone(),
                password: password.to_string(),
            },
        );
        Ok(User {
            id: user_id.to_string(),
            email: email.to_string(),
            name: None,
        })
    }

    async fn logout(&self) -> AuthResult<()> {
        let mut state = self.state.lock();
        if state.offline {
            return Err(AuthError::new(UNREACHABLE));
        }
        match state.current.take() {
            Some(_) => Ok(()),
            None => Err(AuthError::with_status(MISSING_SESSION, 401)),
        }
    }
}

fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.contains('@'),
        None => false,
    }
}
