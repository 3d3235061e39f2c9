//! Flutter-facing bindings for AuthLite core.

pub mod api;
