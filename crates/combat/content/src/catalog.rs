//! Enemy catalog implementing [`combat_core::EnemyOracle`].

use std::collections::HashMap;

use combat_core::{EnemyAbilities, EnemyDefinition, EnemyOracle};

/// Enemy definitions keyed by catalog key.
#[derive(Clone, Debug, Default)]
pub struct EnemyCatalog {
    definitions: HashMap<String, EnemyDefinition>,
}

impl EnemyCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from definitions. Later duplicates replace earlier ones.
    pub fn from_definitions(definitions: impl IntoIterator<Item = EnemyDefinition>) -> Self {
        let mut catalog = Self::new();
        for definition in definitions {
            catalog.add(definition);
        }
        catalog
    }

    /// Adds a definition under its own key.
    pub fn add(&mut self, definition: EnemyDefinition) {
        if let Some(previous) = self.definitions.insert(definition.key.clone(), definition) {
            tracing::warn!(key = %previous.key, "duplicate enemy definition replaced");
        }
    }

    pub fn get(&self, key: &str) -> Option<&EnemyDefinition> {
        self.definitions.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.definitions.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Summon keys referenced by summoners but absent from the catalog.
    ///
    /// A summoner without a `summons` key is reported under its own key.
    pub fn missing_summons(&self) -> Vec<String> {
        let mut missing: Vec<String> = self
            .definitions
            .values()
            .filter(|d| d.abilities.contains(EnemyAbilities::SUMMONER))
            .filter_map(|d| match d.summons.as_deref() {
                Some(key) if self.contains(key) => None,
                Some(key) => Some(key.to_owned()),
                None => Some(format!("{}.summons", d.key)),
            })
            .collect();
        missing.sort();
        missing.dedup();
        missing
    }
}

impl EnemyOracle for EnemyCatalog {
    fn definition(&self, key: &str) -> Option<EnemyDefinition> {
        self.definitions.get(key).cloned()
    }

    fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.definitions.keys().cloned().collect();
        keys.sort();
        keys
    }
}
