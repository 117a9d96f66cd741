//! Block efficiency and block requirement checks.

use super::block_requirement;
use crate::model::{Conditions, Element, Enemy, EnemyAbilities};

/// Who provided a block contribution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BlockSource {
    #[default]
    Hero,
    Unit,
}

/// One block value submitted against an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockContribution {
    pub value: u32,
    pub element: Element,
    #[cfg_attr(feature = "serde", serde(default))]
    pub source: BlockSource,
}

impl BlockContribution {
    pub const fn hero(value: u32, element: Element) -> Self {
        Self {
            value,
            element,
            source: BlockSource::Hero,
        }
    }

    pub const fn unit(value: u32, element: Element) -> Self {
        Self {
            value,
            element,
            source: BlockSource::Unit,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum BlockEfficiency {
    Efficient,
    /// Counted at half value.
    Inefficient,
}

/// Classifies a block element against an attack element.
///
/// | attack    | full value           | halved                   |
/// |-----------|----------------------|--------------------------|
/// | fire      | fire, cold-fire      | anything else            |
/// | ice       | ice, cold-fire       | anything else            |
/// | cold-fire | cold-fire            | anything else            |
/// | physical  | any hero block, or a physical unit block | elemental unit block |
pub fn classify_block(attack: Element, block: Element, source: BlockSource) -> BlockEfficiency {
    let efficient = match attack {
        Element::Fire => matches!(block, Element::Fire | Element::ColdFire),
        Element::Ice => matches!(block, Element::Ice | Element::ColdFire),
        Element::ColdFire => block == Element::ColdFire,
        Element::Physical => source == BlockSource::Hero || block == Element::Physical,
    };
    if efficient {
        BlockEfficiency::Efficient
    } else {
        BlockEfficiency::Inefficient
    }
}

/// Result of measuring block contributions against one enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockAssessment {
    pub required: u32,
    /// Block value after efficiency and freeze, including earlier submissions.
    pub effective: u32,
    /// Movement points spent against a cumbersome enemy.
    pub movement_used: u32,
    /// `Inefficient` if any contribution in this submission was halved.
    pub efficiency: BlockEfficiency,
    pub blocked: bool,
}

impl BlockAssessment {
    pub fn shortfall(&self) -> u32 {
        self.required.saturating_sub(self.effective)
    }

    pub fn message_key(&self) -> &'static str {
        match (self.blocked, self.efficiency) {
            (true, BlockEfficiency::Efficient) => "combat.block.efficient",
            (true, BlockEfficiency::Inefficient) => "combat.block.inefficient",
            (false, _) => "combat.block.insufficient",
        }
    }
}

/// Measures `contributions` (plus block already credited to this enemy)
/// against the enemy's requirement.
///
/// Halved contributions are summed before halving, so two inefficient
/// 1-point blocks still count as 1. Freeze on the hero halves the hero's
/// share. Against a cumbersome enemy, up to `movement_available` movement
/// points cover the shortfall at `cumbersome_rate` block per point.
///
/// The requirement comes from the enemy's base attack (doubled if swift).
/// Enrage and weaken on the enemy change only the wounds it deals when
/// unblocked, never the block needed to stop it. Sums saturate at `u32::MAX`.
pub fn assess_block(
    enemy: &Enemy,
    contributions: &[BlockContribution],
    prior_block: u32,
    hero: &Conditions,
    movement_available: u32,
    cumbersome_rate: u32,
) -> BlockAssessment {
    let required = block_requirement(enemy);

    let mut efficiency = BlockEfficiency::Efficient;
    let mut sums = [[0u32; 2]; 2];
    for contribution in contributions {
        let class = classify_block(enemy.attack_element, contribution.element, contribution.source);
        if class == BlockEfficiency::Inefficient {
            efficiency = BlockEfficiency::Inefficient;
        }
        let source = contribution.source as usize;
        let sum = &mut sums[source][class as usize];
        *sum = sum.saturating_add(contribution.value);
    }

    let share = |[full, halved]: [u32; 2]| full.saturating_add(halved / 2);
    let hero_share = hero.block_value(share(sums[BlockSource::Hero as usize]));
    let unit_share = share(sums[BlockSource::Unit as usize]);
    let mut effective = prior_block.saturating_add(hero_share).saturating_add(unit_share);

    let mut movement_used = 0;
    if enemy.has(EnemyAbilities::CUMBERSOME) && effective < required && cumbersome_rate > 0 {
        let shortfall = required - effective;
        movement_used = shortfall.div_ceil(cumbersome_rate).min(movement_available);
        effective += movement_used.saturating_mul(cumbersome_rate).min(shortfall);
    }

    BlockAssessment {
        required,
        effective,
        movement_used,
        efficiency,
        blocked: effective >= required,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConditionFlags, EnemyDefinition, EnemyId};

    fn enemy(definition: EnemyDefinition) -> Enemy {
        Enemy::from_definition(EnemyId(0), &definition)
    }

    #[test]
    fn efficiency_matrix() {
        use BlockEfficiency::*;
        use Element::*;
        let hero = BlockSource::Hero;

        assert_eq!(classify_block(Fire, Fire, hero), Efficient);
        assert_eq!(classify_block(Fire, ColdFire, hero), Efficient);
        assert_eq!(classify_block(Fire, Physical, hero), Inefficient);

        assert_eq!(classify_block(Ice, Ice, hero), Efficient);
        assert_eq!(classify_block(Ice, ColdFire, hero), Efficient);
        assert_eq!(classify_block(Ice, Physical, hero), Inefficient);

        assert_eq!(classify_block(ColdFire, ColdFire, hero), Efficient);
        assert_eq!(classify_block(ColdFire, Fire, hero), Inefficient);
        assert_eq!(classify_block(ColdFire, Ice, hero), Inefficient);
        assert_eq!(classify_block(ColdFire, Physical, hero), Inefficient);

        assert_eq!(classify_block(Physical, Fire, hero), Efficient);
        assert_eq!(classify_block(Physical, Physical, BlockSource::Unit), Efficient);
        assert_eq!(classify_block(Physical, Ice, BlockSource::Unit), Inefficient);
    }

    #[test]
    fn swift_attack_three_needs_six() {
        let wolf = enemy(EnemyDefinition::new("wolf", 3, 3, 2).with_abilities(EnemyAbilities::SWIFT));
        let none = Conditions::default();

        let short = assess_block(&wolf, &[BlockContribution::hero(3, Element::Physical)], 0, &none, 0, 1);
        assert!(!short.blocked);
        assert_eq!(short.shortfall(), 3);
        assert_eq!(short.message_key(), "combat.block.insufficient");

        let enough = assess_block(&wolf, &[BlockContribution::hero(6, Element::Physical)], 0, &none, 0, 1);
        assert!(enough.blocked);
        assert_eq!(enough.efficiency, BlockEfficiency::Efficient);
    }

    #[test]
    fn inefficient_contributions_halve_after_summing() {
        let salamander = enemy(
            EnemyDefinition::new("salamander", 4, 3, 3).with_attack_element(Element::Fire),
        );
        let contributions = [
            BlockContribution::hero(3, Element::Physical),
            BlockContribution::hero(3, Element::Physical),
        ];
        let result = assess_block(&salamander, &contributions, 0, &Conditions::default(), 0, 1);
        assert_eq!(result.effective, 3);
        assert!(result.blocked);
        assert_eq!(result.message_key(), "combat.block.inefficient");
    }

    #[test]
    fn freeze_halves_hero_share_only() {
        let orc = enemy(EnemyDefinition::new("orc", 3, 4, 2));
        let frozen = Conditions {
            flags: ConditionFlags::FROZEN,
            attack_penalty: 0,
        };
        let contributions = [
            BlockContribution::hero(4, Element::Physical),
            BlockContribution::unit(2, Element::Physical),
        ];
        let result = assess_block(&orc, &contributions, 0, &frozen, 0, 1);
        assert_eq!(result.effective, 4);
        assert!(result.blocked);
    }

    #[test]
    fn cumbersome_uses_movement_up_to_shortfall() {
        let ogre = enemy(EnemyDefinition::new("ogre", 5, 6, 4).with_abilities(EnemyAbilities::CUMBERSOME));
        let none = Conditions::default();

        let result = assess_block(&ogre, &[BlockContribution::hero(4, Element::Physical)], 0, &none, 5, 1);
        assert_eq!(result.movement_used, 2);
        assert!(result.blocked);

        let starved = assess_block(&ogre, &[BlockContribution::hero(1, Element::Physical)], 0, &none, 3, 1);
        assert_eq!(starved.movement_used, 3);
        assert_eq!(starved.effective, 4);
        assert!(!starved.blocked);
    }

    #[test]
    fn movement_ignored_for_ordinary_enemies() {
        let orc = enemy(EnemyDefinition::new("orc", 3, 4, 2));
        let result = assess_block(&orc, &[BlockContribution::hero(2, Element::Physical)], 0, &Conditions::default(), 9, 1);
        assert_eq!(result.movement_used, 0);
        assert!(!result.blocked);
    }

    #[test]
    fn prior_block_accumulates() {
        let orc = enemy(EnemyDefinition::new("orc", 3, 4, 2));
        let result = assess_block(&orc, &[BlockContribution::hero(2, Element::Physical)], 2, &Conditions::default(), 0, 1);
        assert!(result.blocked);
    }
}
