//! Session lifecycle rules, free of storage and network.

pub mod transition;

pub use transition::{apply, persisted_effect, AuthOutcome};
