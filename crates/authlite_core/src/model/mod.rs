//! Domain model for remote identities and their local mirror.
//!
//! # Responsibility
//! - Describe what the identity service hands back (`Session`, `User`).
//! - Define the persisted `LocalAuthRecord` and its invariant.

pub mod account;
pub mod record;
