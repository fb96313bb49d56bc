use log::{error, info, warn};
use std::env;
use std::path::Path;
use std::sync::Arc;
use vagrancy::configuration::config::Config;
use vagrancy::image_registry::registry::ImageRegistry;
use vagrancy::network::connection_server::ConnectionServer;
use vagrancy::provisioning::vagrant::VagrantProvisioner;
use vagrancy::session_management::build_orchestrator::BuildOrchestrator;
use vagrancy::session_management::cleanup::CleanupCoordinator;
use vagrancy::workspace_management::workspace_manager::WorkspaceManager;

const DEFAULT_CONFIG_FILE: &str = "vagrancy.toml";

#[tokio::main]
async fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .init();

    println!(
        "
██╗   ██╗ █████╗  ██████╗ ██████╗  █████╗ ███╗   ██╗ ██████╗██╗   ██╗
██║   ██║██╔══██╗██╔════╝ ██╔══██╗██╔══██╗████╗  ██║██╔════╝╚██╗ ██╔╝
██║   ██║███████║██║  ███╗██████╔╝███████║██╔██╗ ██║██║      ╚████╔╝
╚██╗ ██╔╝██╔══██║██║   ██║██╔══██╗██╔══██║██║╚██╗██║██║       ╚██╔╝
 ╚████╔╝ ██║  ██║╚██████╔╝██║  ██║██║  ██║██║ ╚████║╚██████╗   ██║
  ╚═══╝  ╚═╝  ╚═╝ ╚═════╝ ╚═╝  ╚═╝╚═╝  ╚═╝╚═╝  ╚═══╝ ╚═════╝   ╚═╝
=====================================================================
                   A local VM build-farm coordinator
=====================================================================
"
    );

    // Flags present means CLI configuration; otherwise the TOML file.
    let config = if env::args().len() > 1 {
        Config::from_args()
    } else {
        match Config::from_file(Path::new(DEFAULT_CONFIG_FILE)) {
            Ok(config) => config,
            Err(e) => {
                error!("Unable to import configuration from file: {}", e);
                std::process::exit(1);
            }
        }
    };

    let registry = match ImageRegistry::load(&config.machine_file_path()) {
        Ok(registry) => registry,
        Err(e) => {
            error!(
                "Unable to read machine definitions from {}: {}",
                config.machine_file_path().display(),
                e
            );
            std::process::exit(1);
        }
    };

    info!("RUNTIME PATH: {}", config.runtime_dir.display());
    info!("PROJECT PATH: {}", config.project_root.display());
    info!("SOCKET PATH:  {}", config.socket_path().display());
    info!("IMAGES:");
    for image in registry.images() {
        info!("  {}", image);
    }

    let provisioner = Arc::new(VagrantProvisioner::new(config.build_env.clone()));
    if !provisioner.is_available() {
        warn!("vagrant binary not found; every build will settle as FAILED");
    }

    let workspaces = Arc::new(WorkspaceManager::new(config.runtime_dir.clone()));
    let registry = Arc::new(registry);
    let orchestrator = Arc::new(BuildOrchestrator::new(
        config.project_root.clone(),
        registry,
        provisioner.clone(),
        workspaces.clone(),
    ));
    let cleanup = Arc::new(CleanupCoordinator::new(provisioner, workspaces));

    let server = ConnectionServer::new(config.socket_path(), orchestrator, cleanup);
    if let Err(e) = server.run().await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}
