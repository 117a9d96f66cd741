//! Read-only content lookups.
//!
//! The engine never loads content itself. Hosts hand it an [`EnemyOracle`]
//! when an encounter starts, and summoners resolve the enemy they bring in
//! through it.

use crate::model::EnemyDefinition;

/// Provides enemy definitions by catalog key.
pub trait EnemyOracle: Send + Sync {
    /// Returns the definition for `key` (e.g. "orc_summoner"), if known.
    fn definition(&self, key: &str) -> Option<EnemyDefinition>;

    /// Returns every key the oracle can resolve.
    fn keys(&self) -> Vec<String> {
        Vec::new()
    }
}

impl EnemyOracle for [EnemyDefinition] {
    fn definition(&self, key: &str) -> Option<EnemyDefinition> {
        self.iter().find(|d| d.key == key).cloned()
    }

    fn keys(&self) -> Vec<String> {
        self.iter().map(|d| d.key.clone()).collect()
    }
}

impl<const N: usize> EnemyOracle for [EnemyDefinition; N] {
    fn definition(&self, key: &str) -> Option<EnemyDefinition> {
        self.as_slice().definition(key)
    }

    fn keys(&self) -> Vec<String> {
        self.as_slice().keys()
    }
}

impl EnemyOracle for Vec<EnemyDefinition> {
    fn definition(&self, key: &str) -> Option<EnemyDefinition> {
        self.as_slice().definition(key)
    }

    fn keys(&self) -> Vec<String> {
        self.as_slice().keys()
    }
}
