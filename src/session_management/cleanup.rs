use crate::provisioning::provisioner::Provisioner;
use crate::session_management::session::{Session, SessionState};
use crate::settlement::aggregator::settle_all;
use crate::workspace_management::workspace_manager::WorkspaceManager;
use log::{debug, info, warn};
use std::sync::Arc;

/// Destroys a session's machines and removes its workspace.
///
/// The coordinator itself does not deduplicate; callers gate invocation
/// on [`Session::begin_cleanup`]. Individual destroy failures are logged
/// and never abort the rest of the teardown or the workspace removal.
pub struct CleanupCoordinator {
    provisioner: Arc<dyn Provisioner>,
    workspaces: Arc<WorkspaceManager>,
}

impl CleanupCoordinator {
    pub fn new(provisioner: Arc<dyn Provisioner>, workspaces: Arc<WorkspaceManager>) -> Self {
        Self {
            provisioner,
            workspaces,
        }
    }

    pub async fn cleanup(&self, session: &mut Session) {
        debug!(
            "Cleaning up session {} ({} machines)",
            session.id,
            session.machines.len()
        );

        if let Some(workspace) = session.workspace.clone() {
            // A destroy is issued for every registered machine, whether
            // its build passed, failed or never settled.
            let mut destroys = Vec::with_capacity(session.machines.len());
            for machine in &session.machines {
                destroys.push(self.provisioner.destroy(&machine.image, &workspace));
            }
            let outcomes = settle_all(destroys).await;

            let failed: Vec<_> = outcomes
                .iter()
                .filter_map(|outcome| outcome.failure())
                .collect();
            if !failed.is_empty() {
                warn!("FAILED TO DESTROY:");
                for err in failed {
                    warn!("  {}", err);
                }
            }

            if let Err(e) = self.workspaces.dispose(&workspace) {
                warn!(
                    "Failed to remove workspace {} for session {}: {}",
                    workspace.display(),
                    session.id,
                    e
                );
            }
        }

        session.state = SessionState::Cleaned;
        info!("Session {} cleaned up", session.id);
    }
}
