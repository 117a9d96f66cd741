//! File-backed snapshot storage.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, RuntimeError};
use crate::snapshot::SessionSnapshot;

/// Stores session snapshots as individual bincode files.
///
/// Snapshots live at `{base_dir}/{name}.snapshot` and are written through a
/// temp file followed by a rename.
pub struct SnapshotStore {
    base_dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn snapshot_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(format!("{name}.snapshot"))
    }

    pub fn save(&self, name: &str, snapshot: &SessionSnapshot) -> Result<PathBuf> {
        let path = self.snapshot_path(name);
        let temp_path = path.with_extension("snapshot.tmp");

        let bytes = bincode::serialize(snapshot).map_err(RuntimeError::Snapshot)?;
        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!(name, digest = snapshot.digest(), "saved snapshot to {}", path.display());
        Ok(path)
    }

    /// Loads and verifies a snapshot. Returns `None` if it was never saved.
    pub fn load(&self, name: &str) -> Result<Option<SessionSnapshot>> {
        let path = self.snapshot_path(name);
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path)?;
        let snapshot: SessionSnapshot =
            bincode::deserialize(&bytes).map_err(RuntimeError::Snapshot)?;
        snapshot.verify()?;

        tracing::debug!(name, digest = snapshot.digest(), "loaded snapshot");
        Ok(Some(snapshot))
    }

    pub fn delete(&self, name: &str) -> Result<()> {
        let path = self.snapshot_path(name);
        if path.exists() {
            fs::remove_file(&path)?;
            tracing::debug!(name, "deleted snapshot");
        }
        Ok(())
    }

    /// Names of every stored snapshot, sorted.
    pub fn names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "snapshot")
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
            {
                names.push(stem.to_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}
