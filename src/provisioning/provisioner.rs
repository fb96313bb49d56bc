use crate::error_handling::types::{DestroyError, ProvisionError};
use std::path::Path;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// Abstraction over the virtual-machine tool.
///
/// Both operations return immediately with a handle to a spawned task;
/// the task resolves exactly once. On success the payload is the image
/// name (mirrored back for the summary/destroy bookkeeping).
pub trait Provisioner: Send + Sync {
    /// Starts bringing `image` up inside `workspace`.
    ///
    /// Progress text emitted by the tool is sent line by line through
    /// `progress`; the sender is dropped when the task finishes, which is
    /// what lets the orchestrator detect that all machines have settled
    /// their output.
    fn bring_up(
        &self,
        image: &str,
        workspace: &Path,
        progress: UnboundedSender<String>,
    ) -> JoinHandle<Result<String, ProvisionError>>;

    /// Starts destroying `image` inside `workspace`.
    fn destroy(&self, image: &str, workspace: &Path) -> JoinHandle<Result<String, DestroyError>>;
}
