//! Hostile combatants.

use super::{Conditions, Element, EnemyAbilities, EnemyId, Resistances};
use crate::session::Phase;

/// Static description of an enemy, as authored in content files.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyDefinition {
    /// Catalog key (e.g. `"orc_summoner"`).
    pub key: String,
    pub name: String,
    pub armor: u32,
    pub attack: u32,
    pub fame: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub abilities: EnemyAbilities,
    #[cfg_attr(feature = "serde", serde(default))]
    pub resistances: Resistances,
    #[cfg_attr(feature = "serde", serde(default))]
    pub attack_element: Element,
    /// Armor used under the elusive rule. Ignored for non-elusive enemies.
    #[cfg_attr(feature = "serde", serde(default))]
    pub reduced_armor: u32,
    /// Catalog key of the enemy a summoner brings in.
    #[cfg_attr(feature = "serde", serde(default))]
    pub summons: Option<String>,
}

impl EnemyDefinition {
    /// Creates a definition with no abilities and a physical attack.
    pub fn new(key: impl Into<String>, armor: u32, attack: u32, fame: u32) -> Self {
        let key = key.into();
        Self {
            name: key.clone(),
            key,
            armor,
            attack,
            fame,
            abilities: EnemyAbilities::empty(),
            resistances: Resistances::empty(),
            attack_element: Element::Physical,
            reduced_armor: armor,
            summons: None,
        }
    }

    pub fn with_abilities(mut self, abilities: EnemyAbilities) -> Self {
        self.abilities = abilities;
        self
    }

    pub fn with_resistances(mut self, resistances: Resistances) -> Self {
        self.resistances = resistances;
        self
    }

    pub fn with_attack_element(mut self, element: Element) -> Self {
        self.attack_element = element;
        self
    }

    pub fn with_reduced_armor(mut self, reduced_armor: u32) -> Self {
        self.reduced_armor = reduced_armor;
        self
    }

    pub fn with_summons(mut self, key: impl Into<String>) -> Self {
        self.summons = Some(key.into());
        self
    }
}

/// An enemy taking part in an encounter.
///
/// Base stats (`armor`, `attack`) are copied from the definition and never
/// written afterwards; everything doubled, halved or reduced is derived by
/// the [`resolver`](crate::resolver) on demand.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Enemy {
    pub id: EnemyId,
    pub key: String,
    pub name: String,
    pub armor: u32,
    pub attack: u32,
    pub fame: u32,
    pub abilities: EnemyAbilities,
    pub resistances: Resistances,
    pub attack_element: Element,
    pub reduced_armor: u32,
    /// Armor gained during this encounter (vampiric heals).
    pub armor_bonus: u32,
    /// Damage dealt by status effects; counts toward defeating the enemy.
    pub sustained_damage: u32,
    pub conditions: Conditions,
    /// Summoner that brought this enemy in.
    pub summoned_by: Option<EnemyId>,
    /// Phase during which the enemy joined; it cannot be targeted until a
    /// later phase.
    pub joined_in: Option<Phase>,
}

impl Enemy {
    pub fn from_definition(id: EnemyId, definition: &EnemyDefinition) -> Self {
        Self {
            id,
            key: definition.key.clone(),
            name: definition.name.clone(),
            armor: definition.armor,
            attack: definition.attack,
            fame: definition.fame,
            abilities: definition.abilities,
            resistances: definition.resistances,
            attack_element: definition.attack_element,
            reduced_armor: definition.reduced_armor,
            armor_bonus: 0,
            sustained_damage: 0,
            conditions: Conditions::default(),
            summoned_by: None,
            joined_in: None,
        }
    }

    /// Creates an enemy brought in mid-encounter. Summoned enemies award no fame.
    pub fn summoned(
        id: EnemyId,
        definition: &EnemyDefinition,
        summoner: EnemyId,
        phase: Phase,
    ) -> Self {
        Self {
            fame: 0,
            summoned_by: Some(summoner),
            joined_in: Some(phase),
            ..Self::from_definition(id, definition)
        }
    }

    pub fn has(&self, ability: EnemyAbilities) -> bool {
        self.abilities.contains(ability)
    }

    /// Returns true if the enemy may be targeted during `phase`.
    pub fn is_targetable_in(&self, phase: Phase) -> bool {
        self.joined_in.is_none_or(|joined| phase > joined)
    }
}
