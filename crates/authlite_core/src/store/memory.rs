//! Mutex-guarded in-process store.

use super::{SessionStore, StoreError, StoreResult};
use crate::model::record::LocalAuthRecord;
use parking_lot::Mutex;

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    record: Mutex<Option<LocalAuthRecord>>,
    writes: Mutex<u64>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an already persisted record.
    pub fn with_record(record: LocalAuthRecord) -> Self {
        Self {
            record: Mutex::new(Some(record)),
            writes: Mutex::new(0),
        }
    }

    /// Number of successful `save` calls so far.
    pub fn write_count(&self) -> u64 {
        *self.writes.lock()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> StoreResult<LocalAuthRecord> {
        Ok(self.record.lock().clone().unwrap_or_default())
    }

    fn save(&self, record: &LocalAuthRecord) -> StoreResult<()> {
        if !record.is_consistent() {
            return Err(StoreError::InvalidData(format!(
                "refusing to persist isLoggedIn={} with email length {}",
                record.is_logged_in,
                record.user_email.len()
            )));
        }
        *self.record.lock() = Some(record.clone());
        *self.writes.lock() += 1;
        Ok(())
    }
}
