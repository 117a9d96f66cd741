//! Encounter script loader.
//!
//! A script names the enemies by catalog key, describes the hero and the
//! allied units, and lists the commands to replay against a session.

use std::path::Path;

use combat_core::{
    CombatCommand, CombatConfig, EncounterSetup, EnemyOracle, Hero, Unit, UnitAbility, UnitId,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// The parts of the hero an encounter starts from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeroSpec {
    pub hand_cards: u32,
    #[serde(default)]
    pub movement_points: u32,
}

/// An allied unit. Ids follow the unit's position in the script.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitSpec {
    pub name: String,
    pub armor: u32,
    #[serde(default)]
    pub abilities: Vec<UnitAbility>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncounterScript {
    pub name: String,
    pub hero: HeroSpec,
    /// Enemy catalog keys in roster order.
    pub enemies: Vec<String>,
    #[serde(default)]
    pub units: Vec<UnitSpec>,
    #[serde(default)]
    pub commands: Vec<CombatCommand>,
}

impl EncounterScript {
    /// Resolves enemy keys through `oracle` and builds the session setup.
    pub fn setup(&self, oracle: &dyn EnemyOracle) -> LoadResult<EncounterSetup> {
        if self.units.len() > CombatConfig::MAX_UNITS {
            anyhow::bail!(
                "Encounter '{}' has {} units (max {})",
                self.name,
                self.units.len(),
                CombatConfig::MAX_UNITS
            );
        }

        let enemies = self
            .enemies
            .iter()
            .map(|key| {
                oracle.definition(key).ok_or_else(|| {
                    anyhow::anyhow!("Encounter '{}' references unknown enemy '{}'", self.name, key)
                })
            })
            .collect::<LoadResult<Vec<_>>>()?;

        let units = self
            .units
            .iter()
            .enumerate()
            .map(|(index, spec)| {
                if spec.abilities.len() > CombatConfig::MAX_UNIT_ABILITIES {
                    tracing::warn!(unit = %spec.name, "extra unit abilities ignored");
                }
                spec.abilities.iter().fold(
                    Unit::new(UnitId(index as u32), spec.name.clone(), spec.armor),
                    |unit, &ability| unit.with_ability(ability),
                )
            })
            .collect();

        Ok(EncounterSetup {
            hero: Hero::new(self.hero.hand_cards, self.hero.movement_points),
            enemies,
            units,
        })
    }
}

/// Loader for encounter scripts from RON files.
pub struct EncounterLoader;

impl EncounterLoader {
    pub fn load(path: &Path) -> LoadResult<EncounterScript> {
        let content = read_file(path)?;
        Self::from_ron_str(&content).map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))
    }

    pub fn from_ron_str(content: &str) -> LoadResult<EncounterScript> {
        ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse encounter script RON: {}", e))
    }
}
