//! Single-screen auth state and its controller.
//!
//! # Responsibility
//! - Seed in-memory state from the persisted record exactly once.
//! - Toggle between the logged-out form and the logged-in view.
//! - Catch every service failure at the action boundary and expose it as
//!   a `"<Action> failed: <message>"` line.
//!
//! # Invariants
//! - The screen mutex is never held across a gateway call.
//! - A failed action only touches `error_message`.

use super::{AuthAction, AuthService, ServiceError, ServiceResult};
use crate::gateway::AuthGateway;
use crate::logging::{mask_email, sanitize_message};
use crate::model::record::LocalAuthRecord;
use crate::store::SessionStore;
use log::{error, info};
use parking_lot::Mutex;

const MAX_ERROR_LOG_CHARS: usize = 240;

/// In-memory UI state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthScreen {
    /// Email of the logged-in user; empty while logged out.
    pub user: String,
    pub email: String,
    pub password: String,
    pub error_message: Option<String>,
}

/// Which half of the screen is visible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenMode {
    /// Email/password fields with Login and Register buttons.
    LoggedOut,
    /// `"Logged in as {email}"` label with a Logout button.
    LoggedIn { label: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenView {
    pub mode: ScreenMode,
    pub error_line: Option<String>,
}

impl ScreenView {
    pub fn shows_register(&self) -> bool {
        self.mode == ScreenMode::LoggedOut
    }
}

impl AuthScreen {
    pub fn from_record(record: &LocalAuthRecord) -> Self {
        let user = if record.is_logged_in {
            record.user_email.clone()
        } else {
            String::new()
        };
        Self {
            user,
            ..Self::default()
        }
    }

    pub fn is_logged_in(&self) -> bool {
        !self.user.is_empty()
    }

    pub fn view(&self) -> ScreenView {
        let mode = if self.is_logged_in() {
            ScreenMode::LoggedIn {
                label: format!("Logged in as {}", self.user),
            }
        } else {
            ScreenMode::LoggedOut
        };
        ScreenView {
            mode,
            error_line: self.error_message.clone(),
        }
    }

    fn fail(&mut self, action: AuthAction, err: &ServiceError) {
        self.error_message = Some(action.failure_line(err));
    }
}

/// Drives an [`AuthService`] from screen state.
pub struct AuthController<G, S> {
    service: AuthService<G, S>,
    screen: Mutex<AuthScreen>,
}

impl<G: AuthGateway, S: SessionStore> AuthController<G, S> {
    /// Loads the persisted record once and seeds the screen from it.
    pub fn start(service: AuthService<G, S>) -> ServiceResult<Self> {
        let record = service.load_record()?;
        info!(
            "event=screen_start module=service status=ok is_logged_in={}",
            record.is_logged_in
        );
        Ok(Self {
            service,
            screen: Mutex::new(AuthScreen::from_record(&record)),
        })
    }

    pub fn service(&self) -> &AuthService<G, S> {
        &self.service
    }

    pub fn screen(&self) -> AuthScreen {
        self.screen.lock().clone()
    }

    pub fn view(&self) -> ScreenView {
        self.screen.lock().view()
    }

    pub fn set_email(&self, email: impl Into<String>) {
        self.screen.lock().email = email.into();
    }

    pub fn set_password(&self, password: impl Into<String>) {
        self.screen.lock().password = password.into();
    }

    /// Login button, using the credentials currently typed into the screen.
    pub async fn login(&self) -> ServiceResult<()> {
        let (email, password) = self.credentials();
        self.login_with(email, password).await
    }

    /// Login with explicit credentials; the typed fields are not read.
    pub async fn login_with(&self, email: String, password: String) -> ServiceResult<()> {
        let result = self.service.login(&email, &password).await.map(|_| ());
        self.finish(AuthAction::Login, &email, result, |screen| {
            screen.user = email.clone();
        })
    }

    /// Register button. Leaves the screen logged out.
    pub async fn register(&self) -> ServiceResult<()> {
        let (email, password) = self.credentials();
        self.register_with(email, password).await
    }

    /// Register with explicit credentials; the typed fields are not read.
    pub async fn register_with(&self, email: String, password: String) -> ServiceResult<()> {
        let result = self.service.register(&email, &password).await.map(|_| ());
        self.finish(AuthAction::Register, &email, result, |_| {})
    }

    /// Logout button.
    pub async fn logout(&self) -> ServiceResult<()> {
        let email = self.screen.lock().user.clone();
        let result = self.service.logout().await;
        self.finish(AuthAction::Logout, &email, result, |screen| {
            screen.user.clear();
        })
    }

    fn credentials(&self) -> (String, String) {
        let screen = self.screen.lock();
        (screen.email.clone(), screen.password.clone())
    }

    fn finish(
        &self,
        action: AuthAction,
        email: &str,
        result: ServiceResult<()>,
        on_success: impl FnOnce(&mut AuthScreen),
    ) -> ServiceResult<()> {
        let mut screen = self.screen.lock();
        match &result {
            Ok(()) => {
                on_success(&mut screen);
                screen.error_message = None;
                info!(
                    "event={} module=service status=ok email={}",
                    action.event(),
                    mask_email(email)
                );
            }
            Err(err) => {
                screen.fail(action, err);
                error!(
                    "event={} module=service status=error error={}",
                    action.event(),
                    sanitize_message(&err.to_string(), MAX_ERROR_LOG_CHARS)
                );
            }
        }
        result
    }
}
