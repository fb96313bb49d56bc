use crate::error_handling::types::ConfigError;
use clap::Parser;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Name of the Unix socket file created under the runtime directory.
pub const SOCKET_FILE_NAME: &str = "vagrancy.sock";

/// Coordinator configuration.
///
/// Parsed either from command-line arguments (`clap`) or from a TOML file
/// (`serde`), whichever the binary picks at startup.
///
/// # Fields Overview
///
/// - `project_root`: the shared project tree that every session gets a
///   private copy of; must contain the machine-definition file
/// - `runtime_dir`: where the socket file and per-session workspaces live
/// - `machine_file`: name of the machine-definition file inside
///   `project_root`
/// - `build_env`: extra environment variables applied to every
///   provisioning and destroy command (TOML only)
#[derive(Parser, Debug, Clone, Deserialize)]
#[command(name = "vagrancy-server")]
#[serde(default)]
pub struct Config {
    /// Shared project tree copied into each session's workspace.
    #[arg(long, env = "VAGRANCY_PROJECT_ROOT", default_value = "../Submitty")]
    pub project_root: PathBuf,

    /// Directory holding the socket file and session workspaces.
    #[arg(long, env = "VAGRANCY_RUNTIME_DIR", default_value = "/tmp/vagrancy")]
    pub runtime_dir: PathBuf,

    /// Machine-definition file name, resolved against `project_root`.
    #[arg(long, default_value = "Vagrantfile")]
    pub machine_file: String,

    /// Extra environment for provisioning commands.
    ///
    /// Not exposed on the command line; set it in the TOML file as a
    /// `[build_env]` table.
    #[arg(skip)]
    pub build_env: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("../Submitty"),
            runtime_dir: PathBuf::from("/tmp/vagrancy"),
            machine_file: "Vagrantfile".to_string(),
            build_env: HashMap::new(),
        }
    }
}

impl Config {
    /// Parses configuration from the process command line.
    pub fn from_args() -> Self {
        Config::parse()
    }

    /// Parses configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| ConfigError::TomlError(e.to_string()))
    }

    /// Absolute location of the Unix socket the server binds.
    pub fn socket_path(&self) -> PathBuf {
        self.runtime_dir.join(SOCKET_FILE_NAME)
    }

    /// Location of the machine-definition file.
    pub fn machine_file_path(&self) -> PathBuf {
        self.project_root.join(&self.machine_file)
    }
}
