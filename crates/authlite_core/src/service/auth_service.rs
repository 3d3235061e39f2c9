//! Auth use-case service.
//!
//! # Invariants
//! - The store is written only after the gateway call succeeded.
//! - Nothing is retried; failures are returned to the caller as-is.
//! - No lock is held across the remote call.

use super::{AuthAction, ServiceResult};
use crate::gateway::AuthGateway;
use crate::logging::mask_email;
use crate::model::account::{Session, User};
use crate::model::record::LocalAuthRecord;
use crate::session::{persisted_effect, AuthOutcome};
use crate::store::{SessionStore, StoreResult};
use log::error;

pub struct AuthService<G, S> {
    gateway: G,
    store: S,
}

impl<G: AuthGateway, S: SessionStore> AuthService<G, S> {
    pub fn new(gateway: G, store: S) -> Self {
        Self { gateway, store }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Startup read of the persisted record.
    pub fn load_record(&self) -> StoreResult<LocalAuthRecord> {
        self.store.load()
    }

    /// Creates a session, then records `(true, email)`.
    pub async fn login(&self, email: &str, password: &str) -> ServiceResult<Session> {
        let session = self.gateway.login(email, password).await?;
        self.write_through(
            AuthAction::Login,
            &AuthOutcome::LoggedIn {
                email: email.to_string(),
            },
        )?;
        Ok(session)
    }

    /// Creates an account. The persisted record is left as it was.
    pub async fn register(&self, email: &str, password: &str) -> ServiceResult<User> {
        let user = self.gateway.register(email, password).await?;
        self.write_through(AuthAction::Register, &AuthOutcome::Registered)?;
        Ok(user)
    }

    /// Deletes the current session, then records `(false, "")`.
    pub async fn logout(&self) -> ServiceResult<()> {
        self.gateway.logout().await?;
        self.write_through(AuthAction::Logout, &AuthOutcome::LoggedOut)?;
        Ok(())
    }

    fn write_through(&self, action: AuthAction, outcome: &AuthOutcome) -> StoreResult<()> {
        let Some(record) = persisted_effect(outcome) else {
            return Ok(());
        };
        self.store.save(&record).inspect_err(|err| {
            // Remote state already changed; the local mirror is now stale.
            error!(
                "event={} module=service status=store_error email={} error={}",
                action.event(),
                mask_email(&record.user_email),
                err
            );
        })
    }
}
