//! Content loaders for reading combat data from files.
//!
//! Loaders turn RON/TOML files into core types and catalogs. Every failure is
//! reported as an [`anyhow::Error`] carrying the offending path.

pub mod config;
pub mod encounter;
pub mod enemies;
pub mod factory;

pub use config::ConfigLoader;
pub use encounter::{EncounterLoader, EncounterScript, HeroSpec, UnitSpec};
pub use enemies::EnemyLoader;
pub use factory::ContentFactory;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
