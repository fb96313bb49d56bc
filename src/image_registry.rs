//! Image registry.
//!
//! Loads the list of buildable machine images once at startup by scanning
//! the project's machine-definition file. Read-only for the rest of the
//! process lifetime and shared across all connections.

pub mod registry;

pub use registry::{Image, ImageRegistry};
