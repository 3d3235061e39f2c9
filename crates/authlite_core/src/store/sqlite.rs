//! SQLite-backed Session Store.
//!
//! Both keys live in the `preferences` table under one namespace and are
//! upserted inside a single transaction.

use super::{SessionStore, StoreError, StoreResult, IS_LOGGED_IN_KEY, USER_EMAIL_KEY};
use crate::db::{open_db, open_db_in_memory};
use crate::logging::mask_email;
use crate::model::record::LocalAuthRecord;
use log::{error, info};
use parking_lot::Mutex;
use rusqlite::{params, Connection};
use std::path::Path;

pub const DEFAULT_NAMESPACE: &str = "AuthLite";

const UPSERT_SQL: &str = "INSERT INTO preferences (namespace, key, value)
    VALUES (?1, ?2, ?3)
    ON CONFLICT(namespace, key) DO UPDATE SET
        value = excluded.value,
        updated_at = (strftime('%s', 'now') * 1000);";

pub struct SqliteSessionStore {
    conn: Mutex<Connection>,
    namespace: String,
}

impl SqliteSessionStore {
    /// Wraps an already migrated connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }

    /// Opens (creating and migrating if needed) the store file at `path`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

impl SessionStore for SqliteSessionStore {
    fn load(&self) -> StoreResult<LocalAuthRecord> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT key, value FROM preferences
             WHERE namespace = ?1 AND key IN (?2, ?3);",
        )?;
        let mut rows = stmt.query(params![self.namespace, IS_LOGGED_IN_KEY, USER_EMAIL_KEY])?;

        let mut logged_in_text: Option<String> = None;
        let mut email = String::new();
        while let Some(row) = rows.next()? {
            let key: String = row.get(0)?;
            let value: String = row.get(1)?;
            if key == IS_LOGGED_IN_KEY {
                logged_in_text = Some(value);
            } else {
                email = value;
            }
        }

        decode_record(logged_in_text.as_deref(), email)
    }

    fn save(&self, record: &LocalAuthRecord) -> StoreResult<()> {
        if !record.is_consistent() {
            return Err(StoreError::InvalidData(format!(
                "refusing to persist isLoggedIn={} with email length {}",
                record.is_logged_in,
                record.user_email.len()
            )));
        }

        let mut conn = self.conn.lock();
        let result = (|| -> StoreResult<()> {
            let tx = conn.transaction()?;
            tx.execute(
                UPSERT_SQL,
                params![
                    self.namespace,
                    IS_LOGGED_IN_KEY,
                    bool_to_text(record.is_logged_in)
                ],
            )?;
            tx.execute(
                UPSERT_SQL,
                params![self.namespace, USER_EMAIL_KEY, record.user_email],
            )?;
            tx.commit()?;
            Ok(())
        })();

        match &result {
            Ok(()) => info!(
                "event=auth_record_save module=store status=ok is_logged_in={} email={}",
                record.is_logged_in,
                mask_email(&record.user_email)
            ),
            Err(err) => error!(
                "event=auth_record_save module=store status=error error={}",
                err
            ),
        }
        result
    }
}

fn decode_record(logged_in_text: Option<&str>, email: String) -> StoreResult<LocalAuthRecord> {
    let is_logged_in = match logged_in_text {
        None | Some("false") => false,
        Some("true") => true,
        Some(other) => {
            return Err(StoreError::InvalidData(format!(
                "invalid {IS_LOGGED_IN_KEY} value `{other}`"
            )));
        }
    };

    if !is_logged_in {
        return Ok(LocalAuthRecord::logged_out());
    }
    if email.is_empty() {
        return Err(StoreError::InvalidData(format!(
            "{IS_LOGGED_IN_KEY}=true with empty {USER_EMAIL_KEY}"
        )));
    }
    Ok(LocalAuthRecord::logged_in(email))
}

fn bool_to_text(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
