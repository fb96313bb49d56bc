pub mod configuration;
pub use configuration::Config;

pub mod error_handling;

pub mod image_registry;
pub use image_registry::{Image, ImageRegistry};

pub mod settlement;
pub use settlement::{settle_all, Outcome};

pub mod workspace_management;
pub use workspace_management::WorkspaceManager;

pub mod provisioning;
pub use provisioning::{Provisioner, VagrantProvisioner};

pub mod session_management;
pub use session_management::{BuildOrchestrator, CleanupCoordinator, Session};

pub mod network;
pub use network::ConnectionServer;

pub mod client;
