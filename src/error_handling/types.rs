use std::fmt;
use std::path::PathBuf;
use tokio::task::JoinError;

#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    TomlError(String),
    PatternError(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::TomlError(e) => write!(f, "TOML parsing error: {}", e),
            ConfigError::PatternError(e) => write!(f, "Definition pattern error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError(err)
    }
}

#[derive(Debug)]
pub enum WorkspaceError {
    IoError(std::io::Error),
    SourceMissing(PathBuf),
}

impl fmt::Display for WorkspaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkspaceError::IoError(e) => write!(f, "Workspace IO error: {}", e),
            WorkspaceError::SourceMissing(p) => {
                write!(f, "Workspace source tree does not exist: {}", p.display())
            }
        }
    }
}

impl std::error::Error for WorkspaceError {}

impl From<std::io::Error> for WorkspaceError {
    fn from(err: std::io::Error) -> Self {
        WorkspaceError::IoError(err)
    }
}

/// Failure of a single image's bring-up. Recorded as a FAILED outcome,
/// reported to the client, never propagated past the aggregation boundary.
#[derive(Debug)]
pub enum ProvisionError {
    SpawnFailed { image: String, message: String },
    BuildFailed { image: String, code: Option<i32> },
    TaskPanicked(String),
}

impl fmt::Display for ProvisionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProvisionError::SpawnFailed { image, message } => {
                write!(f, "Failed to spawn build for image {}: {}", image, message)
            }
            ProvisionError::BuildFailed { image, code } => match code {
                Some(code) => write!(f, "Build failed for image {} (exit code {})", image, code),
                None => write!(f, "Build failed for image {} (killed by signal)", image),
            },
            ProvisionError::TaskPanicked(e) => write!(f, "Build task panicked: {}", e),
        }
    }
}

impl std::error::Error for ProvisionError {}

impl From<JoinError> for ProvisionError {
    fn from(err: JoinError) -> Self {
        ProvisionError::TaskPanicked(err.to_string())
    }
}

/// Failure of a single image's teardown. Logged with the image identity,
/// never propagated; must not block sibling destroys or workspace removal.
#[derive(Debug)]
pub enum DestroyError {
    SpawnFailed { image: String, message: String },
    DestroyFailed { image: String, code: Option<i32> },
    TaskPanicked(String),
}

impl fmt::Display for DestroyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DestroyError::SpawnFailed { image, message } => {
                write!(f, "Failed to spawn destroy for image {}: {}", image, message)
            }
            DestroyError::DestroyFailed { image, code } => match code {
                Some(code) => write!(f, "Destroy failed for image {} (exit code {})", image, code),
                None => write!(f, "Destroy failed for image {} (killed by signal)", image),
            },
            DestroyError::TaskPanicked(e) => write!(f, "Destroy task panicked: {}", e),
        }
    }
}

impl std::error::Error for DestroyError {}

impl From<JoinError> for DestroyError {
    fn from(err: JoinError) -> Self {
        DestroyError::TaskPanicked(err.to_string())
    }
}

#[derive(Debug)]
pub enum SessionError {
    Workspace(WorkspaceError),
    Connection(std::io::Error),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Workspace(e) => write!(f, "Session workspace error: {}", e),
            SessionError::Connection(e) => write!(f, "Session connection error: {}", e),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<WorkspaceError> for SessionError {
    fn from(err: WorkspaceError) -> Self {
        SessionError::Workspace(err)
    }
}

#[derive(Debug)]
pub enum ServerError {
    BindError(std::io::Error),
    StaleSocketError(std::io::Error),
    SignalError(std::io::Error),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::BindError(e) => write!(f, "Failed to bind socket: {}", e),
            ServerError::StaleSocketError(e) => {
                write!(f, "Failed to remove stale socket file: {}", e)
            }
            ServerError::SignalError(e) => write!(f, "Failed to install signal handler: {}", e),
        }
    }
}

impl std::error::Error for ServerError {}
