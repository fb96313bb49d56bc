use crate::error_handling::types::ProvisionError;
use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;

/// Handle describing one in-flight (or completed) machine build.
///
/// Bound to one image and one session workspace. The join handle is taken
/// by the orchestrator at settlement time; the image name stays behind so
/// the cleanup phase knows what to destroy.
#[derive(Debug)]
pub struct MachineHandle {
    /// Image the machine was provisioned from.
    pub image: String,
    /// When the bring-up task was launched.
    pub created_at: DateTime<Utc>,
    /// Task resolving to the build result; `None` once settled.
    pub task: Option<JoinHandle<Result<String, ProvisionError>>>,
}

impl MachineHandle {
    pub fn new(image: String, task: JoinHandle<Result<String, ProvisionError>>) -> Self {
        Self {
            image,
            created_at: Utc::now(),
            task: Some(task),
        }
    }
}
