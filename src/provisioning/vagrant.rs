use crate::error_handling::types::{DestroyError, ProvisionError};
use crate::provisioning::provisioner::Provisioner;
use log::{debug, error};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// Drives the `vagrant` binary as a subprocess.
///
/// Bring-up runs `vagrant up <image>` with the session workspace as
/// working directory and streams stdout into the progress channel.
/// Destroy runs `vagrant destroy -f <image>` the same way, with output
/// going to debug logs only (the client never sees destroy output).
pub struct VagrantProvisioner {
    binary: String,
    env: HashMap<String, String>,
}

impl VagrantProvisioner {
    pub fn new(env: HashMap<String, String>) -> Self {
        Self {
            binary: "vagrant".to_string(),
            env,
        }
    }

    #[cfg(test)]
    pub fn with_binary(binary: &str, env: HashMap<String, String>) -> Self {
        Self {
            binary: binary.to_string(),
            env,
        }
    }

    /// Best-effort probe for the vagrant binary. Missing vagrant is not
    /// fatal at startup; every build would simply settle as FAILED.
    pub fn is_available(&self) -> bool {
        std::process::Command::new(&self.binary)
            .arg("--version")
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    fn command(&self, workspace: &Path) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.current_dir(workspace)
            .envs(self.env.clone())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

impl Provisioner for VagrantProvisioner {
    fn bring_up(
        &self,
        image: &str,
        workspace: &Path,
        progress: UnboundedSender<String>,
    ) -> JoinHandle<Result<String, ProvisionError>> {
        let mut cmd = self.command(workspace);
        cmd.arg("up").arg(image);
        let image = image.to_string();

        tokio::spawn(async move {
            let mut child = cmd.spawn().map_err(|e| {
                error!("Failed to spawn vagrant up for {}: {}", image, e);
                ProvisionError::SpawnFailed {
                    image: image.clone(),
                    message: e.to_string(),
                }
            })?;

            // Relay stderr to the debug log; only stdout counts as
            // client-visible progress.
            if let Some(stderr) = child.stderr.take() {
                let mut reader = BufReader::new(stderr).lines();
                let name = image.clone();
                tokio::spawn(async move {
                    while let Ok(Some(line)) = reader.next_line().await {
                        debug!("[vagrant up:{}][stderr] {}", name, line);
                    }
                });
            }

            if let Some(stdout) = child.stdout.take() {
                let mut reader = BufReader::new(stdout).lines();
                while let Ok(Some(line)) = reader.next_line().await {
                    let line = line.trim().to_string();
                    if line.is_empty() {
                        continue;
                    }
                    debug!("[vagrant up:{}] {}", image, line);
                    // Receiver gone means the client went away; keep the
                    // build running, just stop relaying.
                    let _ = progress.send(line);
                }
            }

            let status = child.wait().await.map_err(|e| ProvisionError::SpawnFailed {
                image: image.clone(),
                message: e.to_string(),
            })?;

            if status.success() {
                Ok(image)
            } else {
                Err(ProvisionError::BuildFailed {
                    image,
                    code: status.code(),
                })
            }
        })
    }

    fn destroy(&self, image: &str, workspace: &Path) -> JoinHandle<Result<String, DestroyError>> {
        let mut cmd = self.command(workspace);
        cmd.arg("destroy").arg("-f").arg(image);
        let image = image.to_string();
        let workspace: PathBuf = workspace.to_path_buf();

        tokio::spawn(async move {
            debug!(
                "Destroying machine {} in workspace {}",
                image,
                workspace.display()
            );
            let mut child = cmd.spawn().map_err(|e| DestroyError::SpawnFailed {
                image: image.clone(),
                message: e.to_string(),
            })?;

            if let Some(stdout) = child.stdout.take() {
                let mut reader = BufReader::new(stdout).lines();
                let name = image.clone();
                tokio::spawn(async move {
                    while let Ok(Some(line)) = reader.next_line().await {
                        debug!("[vagrant destroy:{}] {}", name, line);
                    }
                });
            }

            let status = child.wait().await.map_err(|e| DestroyError::SpawnFailed {
                image: image.clone(),
                message: e.to_string(),
            })?;

            if status.success() {
                Ok(image)
            } else {
                Err(DestroyError::DestroyFailed {
                    image,
                    code: status.code(),
                })
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn bring_up_with_missing_binary_resolves_to_spawn_error() {
        let provisioner =
            VagrantProvisioner::with_binary("definitely-not-a-real-vagrant", HashMap::new());
        let workspace = tempfile::tempdir().expect("tempdir");
        let (tx, mut rx) = mpsc::unbounded_channel();

        let handle = provisioner.bring_up("ubuntu", workspace.path(), tx);
        let result = handle.await.expect("task joined");

        match result {
            Err(ProvisionError::SpawnFailed { image, .. }) => assert_eq!(image, "ubuntu"),
            other => panic!("expected SpawnFailed, got {:?}", other),
        }
        // No progress was emitted and the channel is closed.
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn destroy_with_missing_binary_resolves_to_spawn_error() {
        let provisioner =
            VagrantProvisioner::with_binary("definitely-not-a-real-vagrant", HashMap::new());
        let workspace = tempfile::tempdir().expect("tempdir");

        let result = provisioner
            .destroy("ubuntu", workspace.path())
            .await
            .expect("task joined");

        match result {
            Err(DestroyError::SpawnFailed { image, .. }) => assert_eq!(image, "ubuntu"),
            other => panic!("expected SpawnFailed, got {:?}", other),
        }
    }

    // Stub standing in for the vagrant binary: prints two progress lines
    // (plus a blank one) and exits with the given code.
    fn stub_binary(dir: &Path, exit_code: i32) -> String {
        let script = dir.join("fake-vagrant");
        std::fs::write(
            &script,
            format!(
                "#!/bin/sh\necho \"Bringing machine '$2' up\"\necho\necho done\nexit {}\n",
                exit_code
            ),
        )
        .expect("write script");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))
                .expect("chmod script");
        }
        script.to_str().expect("utf8 path").to_string()
    }

    #[tokio::test]
    async fn bring_up_streams_stdout_lines_and_reports_exit_status() {
        let workspace = tempfile::tempdir().expect("tempdir");
        let script_dir = tempfile::tempdir().expect("tempdir");
        let (tx, mut rx) = mpsc::unbounded_channel();

        let provisioner =
            VagrantProvisioner::with_binary(&stub_binary(script_dir.path(), 3), HashMap::new());

        let handle = provisioner.bring_up("ubuntu", workspace.path(), tx);
        let result = handle.await.expect("task joined");

        match result {
            Err(ProvisionError::BuildFailed { image, code }) => {
                assert_eq!(image, "ubuntu");
                assert_eq!(code, Some(3));
            }
            other => panic!("expected BuildFailed, got {:?}", other),
        }

        let mut lines = Vec::new();
        while let Some(line) = rx.recv().await {
            lines.push(line);
        }
        // Blank stdout lines are dropped, the rest arrive in order.
        assert_eq!(lines, vec!["Bringing machine 'ubuntu' up", "done"]);
    }

    #[tokio::test]
    async fn bring_up_success_resolves_to_image_name() {
        let workspace = tempfile::tempdir().expect("tempdir");
        let script_dir = tempfile::tempdir().expect("tempdir");
        let (tx, _rx) = mpsc::unbounded_channel();

        let provisioner =
            VagrantProvisioner::with_binary(&stub_binary(script_dir.path(), 0), HashMap::new());

        let result = provisioner
            .bring_up("debian", workspace.path(), tx)
            .await
            .expect("task joined");

        match result {
            Ok(image) => assert_eq!(image, "debian"),
            Err(e) => panic!("expected success, got {}", e),
        }
    }
}
