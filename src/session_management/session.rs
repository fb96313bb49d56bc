use crate::provisioning::types::MachineHandle;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use uuid::Uuid;

/// Lifecycle of a session's build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Building,
    Settled,
    Cleaned,
}

/// State owned by one client connection.
///
/// Machines are recorded in registry order as their bring-up tasks are
/// launched; the workspace path stays `None` until allocation succeeds.
/// Cleanup may be triggered by settlement, a connection error or a close,
/// but [`begin_cleanup`](Self::begin_cleanup) lets exactly one trigger
/// through.
#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub state: SessionState,
    pub workspace: Option<PathBuf>,
    pub machines: Vec<MachineHandle>,
    cleaned_up: bool,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            state: SessionState::Idle,
            workspace: None,
            machines: Vec::new(),
            cleaned_up: false,
        }
    }

    /// Synchronous check-and-set of the cleaned-up flag.
    ///
    /// Returns true for the first caller only. Callers must invoke this
    /// before the first await of the cleanup path so that settlement,
    /// error and close triggers cannot both win.
    pub fn begin_cleanup(&mut self) -> bool {
        if self.cleaned_up {
            return false;
        }
        self.cleaned_up = true;
        true
    }

    pub fn is_cleaned_up(&self) -> bool {
        self.cleaned_up
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
