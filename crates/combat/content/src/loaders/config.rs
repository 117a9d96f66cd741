//! Engine configuration loader.

use std::path::Path;

use combat_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for [`CombatConfig`] from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        Self::from_toml_str(&content)
            .map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))
    }

    pub fn from_toml_str(content: &str) -> LoadResult<CombatConfig> {
        toml::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = ConfigLoader::from_toml_str("vampiric_heal = 2\n").expect("valid toml");
        assert_eq!(config.vampiric_heal, 2);
        assert_eq!(config.cumbersome_rate, CombatConfig::DEFAULT_CUMBERSOME_RATE);
        assert_eq!(config.event_buffer_limit, CombatConfig::DEFAULT_EVENT_BUFFER_LIMIT);
    }

    #[test]
    fn rejects_wrong_types() {
        assert!(ConfigLoader::from_toml_str("cumbersome_rate = \"fast\"").is_err());
    }
}
