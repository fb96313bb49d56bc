//! Per-session workspace lifecycle.
//!
//! Each connection gets a private copy of the shared project tree under a
//! collision-resistant directory name. Builds never touch the shared tree.

pub mod workspace_manager;

pub use workspace_manager::WorkspaceManager;
