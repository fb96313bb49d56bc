//! Runtime configuration.
//!
//! A single [`Config`] value is constructed once at startup (from CLI
//! flags or a TOML file) and passed by reference into the connection
//! server and the orchestration components. No ambient globals.

pub mod config;

pub use config::Config;
