//! Enemy catalog loader.

use std::path::Path;

use combat_core::EnemyDefinition;
use serde::{Deserialize, Serialize};

use crate::catalog::EnemyCatalog;
use crate::loaders::{LoadResult, read_file};

/// Enemy catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyCatalogFile {
    pub enemies: Vec<EnemyDefinition>,
}

/// Loader for the enemy catalog from RON files.
pub struct EnemyLoader;

impl EnemyLoader {
    /// Load and validate an enemy catalog from a RON file.
    ///
    /// Fails if a summoner refers to an enemy the file does not define.
    pub fn load(path: &Path) -> LoadResult<EnemyCatalog> {
        let content = read_file(path)?;
        Self::from_ron_str(&content).map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))
    }

    pub fn from_ron_str(content: &str) -> LoadResult<EnemyCatalog> {
        let file: EnemyCatalogFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse enemy catalog RON: {}", e))?;

        let catalog = EnemyCatalog::from_definitions(file.enemies.into_iter().map(|mut d| {
            // reduced armor only matters for elusive enemies; default it to full armor
            if d.reduced_armor == 0 {
                d.reduced_armor = d.armor;
            }
            d
        }));

        let missing = catalog.missing_summons();
        if !missing.is_empty() {
            anyhow::bail!("Summoned enemies missing from catalog: {}", missing.join(", "));
        }
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{Element, EnemyAbilities, EnemyOracle, Resistances};

    const CATALOG: &str = r#"(
        enemies: [
            (
                key: "fire_mage",
                name: "Fire Mage",
                armor: 5,
                attack: 6,
                fame: 5,
                abilities: "SWIFT | PARALYZE",
                resistances: "FIRE",
                attack_element: Fire,
            ),
            (
                key: "orc_summoner",
                name: "Orc Summoner",
                armor: 4,
                attack: 3,
                fame: 4,
                abilities: "SUMMONER",
                summons: Some("wolf"),
            ),
            (key: "wolf", name: "Wolf", armor: 2, attack: 3, fame: 2),
        ],
    )"#;

    #[test]
    fn parses_flags_and_defaults() {
        let catalog = EnemyLoader::from_ron_str(CATALOG).expect("valid catalog");
        let mage = catalog.definition("fire_mage").expect("mage defined");
        assert_eq!(mage.abilities, EnemyAbilities::SWIFT | EnemyAbilities::PARALYZE);
        assert_eq!(mage.resistances, Resistances::FIRE);
        assert_eq!(mage.attack_element, Element::Fire);
        assert_eq!(mage.reduced_armor, 5);

        let wolf = catalog.definition("wolf").expect("wolf defined");
        assert!(wolf.abilities.is_empty());
        assert_eq!(wolf.attack_element, Element::Physical);
    }

    #[test]
    fn rejects_dangling_summons() {
        let content = r#"(enemies: [(key: "shaman", name: "Shaman", armor: 3, attack: 2, fame: 3,
            abilities: "SUMMONER", summons: Some("spirit"))])"#;
        let error = EnemyLoader::from_ron_str(content).unwrap_err();
        assert!(error.to_string().contains("spirit"));
    }
}
