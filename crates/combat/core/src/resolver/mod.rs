//! Damage resolution.
//!
//! This module provides pure functions for the arithmetic of an encounter.
//! Nothing here mutates a combatant; the session feeds the results back into
//! its own state.
//!
//! # Core Functions
//!
//! - [`effective_attack`]: base attack, doubled for brutal enemies
//! - [`block_requirement`]: base attack, doubled for swift enemies
//! - [`resistance_multiplier`]: halving for resisted elements
//! - [`current_armor`]: armor after the elusive rule and vampiric bonuses
//! - [`classify_block`]: block efficiency matrix
//! - [`resolve_strike`]: the ordered modifier pipeline

pub mod block;
pub mod modifiers;

pub use block::{
    BlockAssessment, BlockContribution, BlockEfficiency, BlockSource, assess_block,
    classify_block,
};
pub use modifiers::{Modifier, PIPELINE, Strike, StrikeContext, resolve_strike};

use crate::config::CombatConfig;
use crate::model::{Element, Enemy, EnemyAbilities};

/// Attack multiplier from an elemental resistance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResistanceMultiplier {
    Full,
    Half,
}

impl ResistanceMultiplier {
    /// Scales attack points, rounding down.
    pub fn apply(self, points: u32) -> u32 {
        match self {
            Self::Full => points,
            Self::Half => points / 2,
        }
    }

    /// Raw attack points needed to deliver `effective` points.
    pub fn raw_points_for(self, effective: u32) -> u32 {
        match self {
            Self::Full => effective,
            Self::Half => effective.saturating_mul(2),
        }
    }
}

/// Attack the enemy deals when unblocked: base attack, doubled if brutal.
pub fn effective_attack(enemy: &Enemy) -> u32 {
    if enemy.has(EnemyAbilities::BRUTAL) {
        enemy.attack.saturating_mul(2)
    } else {
        enemy.attack
    }
}

/// Block needed to stop the enemy: base attack, doubled if swift.
pub fn block_requirement(enemy: &Enemy) -> u32 {
    if enemy.has(EnemyAbilities::SWIFT) {
        enemy.attack.saturating_mul(2)
    } else {
        enemy.attack
    }
}

pub fn resistance_multiplier(enemy: &Enemy, attack_element: Element) -> ResistanceMultiplier {
    if enemy.resistances.resists(attack_element) {
        ResistanceMultiplier::Half
    } else {
        ResistanceMultiplier::Full
    }
}

/// Armor the enemy currently presents.
///
/// The reduced armor replaces the base value only for an elusive enemy that
/// was blocked and is being attacked in the attack phase.
pub fn current_armor(enemy: &Enemy, is_blocked: bool, is_attack_phase: bool) -> u32 {
    let base = if enemy.has(EnemyAbilities::ELUSIVE) && is_blocked && is_attack_phase {
        enemy.reduced_armor
    } else {
        enemy.armor
    };
    base.saturating_add(enemy.armor_bonus)
}

/// Armor a vampiric enemy gains after a damage resolution in which it
/// delivered `wounds_delivered` wounds.
///
/// The heal is a flat amount, independent of how many wounds landed.
pub fn vampiric_heal(enemy: &Enemy, wounds_delivered: u32, config: &CombatConfig) -> u32 {
    if enemy.has(EnemyAbilities::VAMPIRIC) && wounds_delivered > 0 {
        config.vampiric_heal
    } else {
        0
    }
}
