use crate::error_handling::types::WorkspaceError;
use log::{debug, info};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Allocates, materializes and removes per-session workspace directories.
///
/// Workspace identifiers are uuid-v4 in simple hex form (32 hex chars),
/// so concurrent sessions cannot collide on a path under `base_dir`.
pub struct WorkspaceManager {
    base_dir: PathBuf,
}

impl WorkspaceManager {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Creates a fresh, uniquely named workspace directory.
    ///
    /// Returns the identifier and the full path. The directory exists but
    /// is empty until [`materialize`](Self::materialize) runs.
    pub fn allocate(&self) -> Result<(String, PathBuf), WorkspaceError> {
        let id = Uuid::new_v4().simple().to_string();
        let path = self.base_dir.join(&id);
        std::fs::create_dir_all(&path)?;
        debug!("Allocated workspace {} at {}", id, path.display());
        Ok((id, path))
    }

    /// Copies the shared project tree into `workspace`.
    ///
    /// The copy is synchronous and completes before the caller launches
    /// any build task, so builds never race the copy.
    pub fn materialize(&self, source: &Path, workspace: &Path) -> Result<(), WorkspaceError> {
        if !source.is_dir() {
            return Err(WorkspaceError::SourceMissing(source.to_path_buf()));
        }
        info!(
            "SETTING UP WORKSPACE: {} (from {})",
            workspace.display(),
            source.display()
        );
        copy_tree(source, workspace)?;
        Ok(())
    }

    /// Removes a workspace tree.
    ///
    /// Idempotent: a never-materialized or already-removed path is a
    /// no-op, not an error.
    pub fn dispose(&self, workspace: &Path) -> Result<(), WorkspaceError> {
        if !workspace.exists() {
            debug!("Workspace {} already gone, nothing to dispose", workspace.display());
            return Ok(());
        }
        std::fs::remove_dir_all(workspace)?;
        info!("Removed workspace {}", workspace.display());
        Ok(())
    }
}

/// Recursive deep copy of `src` into `dst` (children of `src` land
/// directly under `dst`). Entries that are neither files nor directories
/// are skipped.
fn copy_tree(src: &Path, dst: &Path) -> Result<(), std::io::Error> {
    std::fs::create_dir_all(dst)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            copy_tree(&entry.path(), &target)?;
        } else if file_type.is_file() {
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_tree(root: &Path) {
        std::fs::create_dir_all(root.join("sub/inner")).expect("create dirs");
        std::fs::write(root.join("Vagrantfile"), "config.vm.define 'a'\n").expect("write file");
        std::fs::write(root.join("sub/data.txt"), "data").expect("write file");
        std::fs::write(root.join("sub/inner/deep.txt"), "deep").expect("write file");
    }

    #[test]
    fn allocate_creates_unique_directories() {
        let base = tempfile::tempdir().expect("tempdir");
        let manager = WorkspaceManager::new(base.path().to_path_buf());

        let (id_a, path_a) = manager.allocate().expect("allocate a");
        let (id_b, path_b) = manager.allocate().expect("allocate b");

        assert_ne!(id_a, id_b);
        assert_ne!(path_a, path_b);
        assert!(path_a.is_dir());
        assert!(path_b.is_dir());
        assert_eq!(id_a.len(), 32);
    }

    #[test]
    fn materialize_copies_nested_tree() {
        let base = tempfile::tempdir().expect("tempdir");
        let source = tempfile::tempdir().expect("tempdir");
        fixture_tree(source.path());
        let manager = WorkspaceManager::new(base.path().to_path_buf());

        let (_, workspace) = manager.allocate().expect("allocate");
        manager
            .materialize(source.path(), &workspace)
            .expect("materialize");

        assert!(workspace.join("Vagrantfile").is_file());
        assert!(workspace.join("sub/data.txt").is_file());
        let deep = std::fs::read_to_string(workspace.join("sub/inner/deep.txt"))
            .expect("read copied file");
        assert_eq!(deep, "deep");
    }

    #[test]
    fn materialize_missing_source_fails() {
        let base = tempfile::tempdir().expect("tempdir");
        let manager = WorkspaceManager::new(base.path().to_path_buf());
        let (_, workspace) = manager.allocate().expect("allocate");

        let result = manager.materialize(Path::new("/nonexistent/project"), &workspace);

        match result {
            Err(WorkspaceError::SourceMissing(_)) => {}
            other => panic!("expected SourceMissing, got {:?}", other),
        }
    }

    #[test]
    fn dispose_removes_tree_and_is_idempotent() {
        let base = tempfile::tempdir().expect("tempdir");
        let source = tempfile::tempdir().expect("tempdir");
        fixture_tree(source.path());
        let manager = WorkspaceManager::new(base.path().to_path_buf());

        let (_, workspace) = manager.allocate().expect("allocate");
        manager
            .materialize(source.path(), &workspace)
            .expect("materialize");

        manager.dispose(&workspace).expect("dispose");
        assert!(!workspace.exists());

        // Second dispose and dispose of a never-allocated path are no-ops.
        manager.dispose(&workspace).expect("dispose again");
        manager
            .dispose(&base.path().join("never-created"))
            .expect("dispose unknown");
    }
}
