//! Session management core module.
//!
//! A session is the server-side state of one client connection, from
//! accept to final cleanup: the workspace, the machine handles, and the
//! cleaned-up flag that guarantees teardown runs at most once.

pub mod build_orchestrator;
pub mod cleanup;
pub mod session;

pub use build_orchestrator::BuildOrchestrator;
pub use cleanup::CleanupCoordinator;
pub use session::{Session, SessionState};
