use crate::error_handling::types::SessionError;
use crate::image_registry::registry::ImageRegistry;
use crate::provisioning::provisioner::Provisioner;
use crate::provisioning::types::MachineHandle;
use crate::session_management::session::{Session, SessionState};
use crate::settlement::aggregator::settle_all;
use crate::workspace_management::workspace_manager::WorkspaceManager;
use log::{error, info};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Per-connection build orchestration.
///
/// One instance is shared by all connections (it holds only read-only
/// collaborators); the mutable state lives in each connection's
/// [`Session`].
///
/// Build sequence per session: allocate and materialize the workspace,
/// announce the image list, fan out one bring-up task per image, relay
/// progress lines to the client as they arrive, then settle all tasks and
/// emit one summary line per image in registry order.
pub struct BuildOrchestrator {
    project_root: PathBuf,
    registry: Arc<ImageRegistry>,
    provisioner: Arc<dyn Provisioner>,
    workspaces: Arc<WorkspaceManager>,
}

impl BuildOrchestrator {
    pub fn new(
        project_root: PathBuf,
        registry: Arc<ImageRegistry>,
        provisioner: Arc<dyn Provisioner>,
        workspaces: Arc<WorkspaceManager>,
    ) -> Self {
        Self {
            project_root,
            registry,
            provisioner,
            workspaces,
        }
    }

    /// Runs one full build for `session`, writing all client-visible
    /// output to `client`.
    ///
    /// Machine handles are registered in the session before the first
    /// await of the relay loop, so a caller that cancels this future on
    /// disconnect still finds every launched machine when it cleans up.
    pub async fn run_build<W>(
        &self,
        session: &mut Session,
        client: &mut W,
    ) -> Result<(), SessionError>
    where
        W: AsyncWrite + Unpin,
    {
        let (workspace_id, workspace) = self.workspaces.allocate()?;
        session.workspace = Some(workspace.clone());
        self.workspaces.materialize(&self.project_root, &workspace)?;
        info!("Session {} using workspace {}", session.id, workspace_id);

        // The client learns what it is waiting for before any build starts.
        Self::send_line(client, &format!("IMAGES: {}", self.registry.joined_names())).await?;
        session.state = SessionState::Building;

        info!("BUILDING MACHINES...");
        let (progress_tx, mut progress_rx) = tokio::sync::mpsc::unbounded_channel::<String>();
        for image in self.registry.images() {
            let task = self
                .provisioner
                .bring_up(&image.name, &workspace, progress_tx.clone());
            session.machines.push(MachineHandle::new(image.name.clone(), task));
        }
        // Every sender is now owned by a bring-up task; the channel closes
        // exactly when the last task finishes.
        drop(progress_tx);

        // Low-latency relay: each progress line goes out as it arrives,
        // interleaved across images in emission order.
        while let Some(line) = progress_rx.recv().await {
            info!("{}", line);
            Self::send_line(client, &line).await?;
        }

        // All tasks have finished; settling preserves registry order.
        let tasks = session
            .machines
            .iter_mut()
            .filter_map(|machine| machine.task.take())
            .collect();
        let outcomes = settle_all(tasks).await;
        session.state = SessionState::Settled;

        for (machine, outcome) in session.machines.iter().zip(outcomes.iter()) {
            if let Some(err) = outcome.failure() {
                error!("Build failed for image {}: {}", machine.image, err);
            }
            let summary = format!(
                "FINISHED IMAGE: {} -> {}",
                machine.image,
                outcome.status_label()
            );
            info!("{}", summary);
            Self::send_line(client, &summary).await?;
        }

        Ok(())
    }

    async fn send_line<W>(client: &mut W, line: &str) -> Result<(), SessionError>
    where
        W: AsyncWrite + Unpin,
    {
        client
            .write_all(format!("{}\n", line).as_bytes())
            .await
            .map_err(SessionError::Connection)?;
        client.flush().await.map_err(SessionError::Connection)
    }
}
