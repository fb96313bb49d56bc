use crate::error_handling::types::ServerError;
use crate::session_management::build_orchestrator::BuildOrchestrator;
use crate::session_management::cleanup::CleanupCoordinator;
use crate::session_management::session::Session;
use log::{debug, error, info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tokio::net::unix::OwnedReadHalf;
use tokio::net::{UnixListener, UnixStream};
use tokio::signal::unix::{signal, SignalKind};

/// Listens on the filesystem-backed socket and serves one session per
/// accepted connection.
pub struct ConnectionServer {
    socket_path: PathBuf,
    orchestrator: Arc<BuildOrchestrator>,
    cleanup: Arc<CleanupCoordinator>,
}

impl ConnectionServer {
    pub fn new(
        socket_path: PathBuf,
        orchestrator: Arc<BuildOrchestrator>,
        cleanup: Arc<CleanupCoordinator>,
    ) -> Self {
        Self {
            socket_path,
            orchestrator,
            cleanup,
        }
    }

    /// Binds the socket and runs the accept loop until SIGINT/SIGTERM.
    ///
    /// A stale socket file from a previous run is removed before binding.
    /// Per-connection failures are logged and never stop the loop.
    pub async fn run(&self) -> Result<(), ServerError> {
        if let Some(parent) = self.socket_path.parent() {
            std::fs::create_dir_all(parent).map_err(ServerError::BindError)?;
        }
        if self.socket_path.exists() {
            std::fs::remove_file(&self.socket_path).map_err(ServerError::StaleSocketError)?;
        }

        let listener = UnixListener::bind(&self.socket_path).map_err(ServerError::BindError)?;
        info!("LISTENING: {}", self.socket_path.display());

        let mut sigint = signal(SignalKind::interrupt()).map_err(ServerError::SignalError)?;
        let mut sigterm = signal(SignalKind::terminate()).map_err(ServerError::SignalError)?;

        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, _addr)) => {
                        let orchestrator = self.orchestrator.clone();
                        let cleanup = self.cleanup.clone();
                        tokio::spawn(async move {
                            Self::handle_connection(stream, orchestrator, cleanup).await;
                        });
                    }
                    Err(e) => error!("Failed to accept connection: {}", e),
                },
                _ = sigint.recv() => {
                    info!("closing server");
                    break;
                }
                _ = sigterm.recv() => {
                    info!("closing server");
                    break;
                }
            }
        }

        let _ = std::fs::remove_file(&self.socket_path);
        Ok(())
    }

    /// Serves one connection: trigger, build, exactly-once cleanup.
    pub(crate) async fn handle_connection(
        stream: UnixStream,
        orchestrator: Arc<BuildOrchestrator>,
        cleanup: Arc<CleanupCoordinator>,
    ) {
        info!("CONNECTED");
        let mut session = Session::new();
        let (mut reader, mut writer) = stream.into_split();

        // Any non-empty payload is the build trigger; its content is
        // ignored. EOF or an error before the trigger means no build.
        let mut buf = [0u8; 1024];
        let triggered = match reader.read(&mut buf).await {
            Ok(0) => {
                debug!("Client disconnected before triggering a build");
                false
            }
            Ok(_) => true,
            Err(e) => {
                warn!("Connection error before trigger: {}", e);
                false
            }
        };

        if triggered {
            // The build races the disconnect monitor. If the client goes
            // away first, the build future is dropped; the provisioning
            // tasks it spawned keep running and stay registered in the
            // session, so cleanup still destroys every machine.
            tokio::select! {
                result = orchestrator.run_build(&mut session, &mut writer) => {
                    if let Err(e) = result {
                        warn!("Session {} ended with error: {}", session.id, e);
                    }
                }
                _ = Self::wait_for_disconnect(&mut reader) => {
                    info!("Client disconnected mid-build on session {}", session.id);
                }
            }
        }

        // Single gated call site: settlement, error and close all funnel
        // here, and the flag flips before the first await of the cleanup.
        if session.begin_cleanup() {
            cleanup.cleanup(&mut session).await;
        }
        info!("CLOSED");
    }

    /// Resolves when the peer closes or errors. Extra payloads after the
    /// trigger are drained and ignored; they do not re-trigger a build.
    async fn wait_for_disconnect(reader: &mut OwnedReadHalf) {
        let mut buf = [0u8; 1024];
        loop {
            match reader.read(&mut buf).await {
                Ok(0) => return,
                Ok(n) => debug!("Ignoring {} extra bytes from client", n),
                Err(e) => {
                    warn!("Connection error: {}", e);
                    return;
                }
            }
        }
    }
}
