//! Session Store: durable mirror of "is a session active, for which email".
//!
//! # Responsibility
//! - Read the persisted record once at startup.
//! - Overwrite both fields together after each successful login/logout.
//!
//! # Invariants
//! - A reader never observes `isLoggedIn=true` paired with a stale or empty
//!   email; both keys change in one atomic write.
//! - Writes are synchronous and unbuffered.

use crate::db::DbError;
use crate::model::record::LocalAuthRecord;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;
pub mod sqlite;

pub use memory::MemorySessionStore;
pub use sqlite::SqliteSessionStore;

/// Preference key for the login flag.
pub const IS_LOGGED_IN_KEY: &str = "isLoggedIn";
/// Preference key for the email of the last successful login.
pub const USER_EMAIL_KEY: &str = "userEmail";

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted auth record: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Local key-value persistence for the auth record.
pub trait SessionStore: Send + Sync {
    /// Returns the persisted record, `(false, "")` when never written.
    fn load(&self) -> StoreResult<LocalAuthRecord>;

    /// Replaces the persisted record in one atomic write.
    fn save(&self, record: &LocalAuthRecord) -> StoreResult<()>;

    /// Writes `(true, email)`.
    fn record_login(&self, email: &str) -> StoreResult<()> {
        self.save(&LocalAuthRecord::logged_in(email))
    }

    /// Writes `(false, "")`.
    fn record_logout(&self) -> StoreResult<()> {
        self.save(&LocalAuthRecord::logged_out())
    }
}
