//! Error types shared across the coordinator.
//!
//! One enum per subsystem. Per-image failures (`ProvisionError`,
//! `DestroyError`) are always converted to outcome values at the
//! aggregation boundary and never escape a session; the only fatal
//! condition is a startup configuration failure.

pub mod types;

pub use types::{
    ConfigError, DestroyError, ProvisionError, ServerError, SessionError, WorkspaceError,
};
