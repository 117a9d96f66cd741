//! Content factory for building catalogs from data files.

use std::path::{Path, PathBuf};

use combat_core::CombatConfig;

use crate::catalog::EnemyCatalog;
use crate::loaders::{ConfigLoader, EncounterLoader, EncounterScript, EnemyLoader, LoadResult};

/// Content factory that loads all combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── enemies.ron
/// └── encounters/
///     ├── orc_ambush.ron
///     └── summoner_keep.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load engine configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load the enemy catalog from `enemies.ron`.
    pub fn load_enemies(&self) -> LoadResult<EnemyCatalog> {
        EnemyLoader::load(&self.data_dir.join("enemies.ron"))
    }

    /// Load an encounter script from `encounters/{name}.ron`.
    pub fn load_encounter(&self, name: &str) -> LoadResult<EncounterScript> {
        let path = self.data_dir.join("encounters").join(format!("{}.ron", name));
        EncounterLoader::load(&path)
    }

    /// Names of every encounter script in `encounters/`, sorted.
    pub fn encounter_names(&self) -> LoadResult<Vec<String>> {
        let dir = self.data_dir.join("encounters");
        let entries = std::fs::read_dir(&dir)
            .map_err(|e| anyhow::anyhow!("Failed to read directory {}: {}", dir.display(), e))?;

        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "ron")
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
            {
                names.push(stem.to_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
