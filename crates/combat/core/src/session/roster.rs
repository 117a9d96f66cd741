//! Combatants taking part in an encounter.

use crate::model::{CombatantId, Enemy, EnemyId, Hero, Unit, UnitId};
use crate::status::{EffectTarget, TargetLookup};

/// Owns every combatant of one encounter.
///
/// Enemies keep their insertion order: summoned enemies are appended after
/// the enemies that started the encounter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Roster {
    pub hero: Hero,
    pub enemies: Vec<Enemy>,
    pub units: Vec<Unit>,
}

impl Roster {
    pub fn new(hero: Hero, enemies: Vec<Enemy>, units: Vec<Unit>) -> Self {
        Self {
            hero,
            enemies,
            units,
        }
    }

    pub fn enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn enemy_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|e| e.id == id)
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.iter_mut().find(|u| u.id == id)
    }

    /// Removes a defeated enemy, preserving the order of the rest.
    pub fn remove_enemy(&mut self, id: EnemyId) -> Option<Enemy> {
        let index = self.enemies.iter().position(|e| e.id == id)?;
        Some(self.enemies.remove(index))
    }

    pub fn contains(&self, id: CombatantId) -> bool {
        match id {
            CombatantId::Hero => true,
            CombatantId::Enemy(enemy) => self.enemy(enemy).is_some(),
            CombatantId::Unit(unit) => self.unit(unit).is_some(),
        }
    }

    pub fn enemy_ids(&self) -> Vec<EnemyId> {
        self.enemies.iter().map(|e| e.id).collect()
    }
}

impl TargetLookup for Roster {
    fn target_mut(&mut self, id: CombatantId) -> Option<&mut dyn EffectTarget> {
        match id {
            CombatantId::Hero => Some(&mut self.hero as &mut dyn EffectTarget),
            CombatantId::Enemy(enemy) => self
                .enemy_mut(enemy)
                .map(|e| e as &mut dyn EffectTarget),
            CombatantId::Unit(unit) => self.unit_mut(unit).map(|u| u as &mut dyn EffectTarget),
        }
    }
}
