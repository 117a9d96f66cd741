//! CLI configuration read from the process environment.
use std::env;
use std::path::PathBuf;

use runtime::DEFAULT_HISTORY_LIMIT;

/// Data directory used when `COMBAT_DATA_DIR` is unset.
pub const DEFAULT_DATA_DIR: &str = "crates/combat/content/data";

#[derive(Clone, Debug)]
pub struct CliConfig {
    pub data_dir: PathBuf,
    pub log_filter: Option<String>,
    pub snapshot_dir: Option<PathBuf>,
    pub undo_limit: usize,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            log_filter: None,
            snapshot_dir: None,
            undo_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl CliConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `COMBAT_DATA_DIR` - Content directory with `enemies.ron`, `config.toml`
    ///   and `encounters/` (default: `crates/combat/content/data`)
    /// - `COMBAT_LOG` - tracing filter directives (default: `RUST_LOG`, then `info`)
    /// - `COMBAT_SNAPSHOT_DIR` - Where final session snapshots are saved (default: not saved)
    /// - `COMBAT_UNDO_LIMIT` - Undo snapshots kept between commit points (default: 32)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = env::var("COMBAT_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        config.log_filter = env::var("COMBAT_LOG").ok();
        config.snapshot_dir = env::var("COMBAT_SNAPSHOT_DIR").ok().map(PathBuf::from);
        if let Some(limit) = read_env::<usize>("COMBAT_UNDO_LIMIT") {
            config.undo_limit = limit;
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
