//! Pure write-through rules for the local auth record.
//!
//! # Invariants
//! - Only a successful login or logout produces a write.
//! - Registration and every failure leave the persisted record untouched.
//! - The written record never depends on the previous one, so overlapping
//!   operations resolve as last-write-wins with no mixed record.

use crate::model::record::LocalAuthRecord;

/// Result of one Auth Gateway call, reduced to what the mirror cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    LoggedIn { email: String },
    Registered,
    LoggedOut,
    Failed,
}

/// Record the effect boundary must write for `outcome`, if any.
pub fn persisted_effect(outcome: &AuthOutcome) -> Option<LocalAuthRecord> {
    match outcome {
        AuthOutcome::LoggedIn { email } => Some(LocalAuthRecord::logged_in(email.clone())),
        AuthOutcome::LoggedOut => Some(LocalAuthRecord::logged_out()),
        AuthOutcome::Registered | AuthOutcome::Failed => None,
    }
}

/// Next persisted record given the current one and an outcome.
pub fn apply(current: &LocalAuthRecord, outcome: &AuthOutcome) -> LocalAuthRecord {
    persisted_effect(outcome).unwrap_or_else(|| current.clone())
}
