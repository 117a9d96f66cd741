//! Ordered modifier pipeline.
//!
//! Each ability rule is a pure stage over a [`Strike`]. Stages run in the
//! order of [`PIPELINE`]:
//!
//! ```text
//! resistance → fortification → elusiveness → brutality
//! ```
//!
//! Resistance scales the hero's points before fortification can zero them;
//! elusiveness settles the armor the points are measured against; brutality
//! only touches the enemy's outgoing attack.

use super::{ResistanceMultiplier, current_armor, effective_attack, resistance_multiplier};
use crate::model::{Element, Enemy, EnemyAbilities, StrikeKind};

/// What is known about a strike before the pipeline runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StrikeContext {
    pub kind: StrikeKind,
    pub element: Element,
    /// The enemy was blocked during this encounter.
    pub blocked: bool,
}

impl StrikeContext {
    pub const fn new(kind: StrikeKind, element: Element, blocked: bool) -> Self {
        Self {
            kind,
            element,
            blocked,
        }
    }

    fn is_attack_phase(&self) -> bool {
        matches!(self.kind, StrikeKind::Melee)
    }
}

/// Derived values for one strike against one enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Strike {
    /// Hero points that reach the enemy.
    pub points: u32,
    /// Armor the points are measured against.
    pub armor: u32,
    /// Damage already sustained by the enemy from status effects.
    pub sustained: u32,
    /// Attack the enemy deals back.
    pub enemy_attack: u32,
    pub multiplier: ResistanceMultiplier,
    /// Fortification cancelled the strike.
    pub immune: bool,
}

impl Strike {
    fn base(enemy: &Enemy, points: u32) -> Self {
        Self {
            points,
            armor: enemy.armor.saturating_add(enemy.armor_bonus),
            sustained: enemy.sustained_damage,
            enemy_attack: enemy.attack,
            multiplier: ResistanceMultiplier::Full,
            immune: false,
        }
    }

    /// Effective points still needed to defeat the enemy.
    pub fn cost(&self) -> u32 {
        self.armor.saturating_sub(self.sustained)
    }

    /// Raw (pre-resistance) points needed to defeat the enemy.
    pub fn raw_cost(&self) -> u32 {
        self.multiplier.raw_points_for(self.cost())
    }

    pub fn defeats(&self) -> bool {
        !self.immune && self.points >= self.cost()
    }
}

/// One rule of the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Modifier {
    Resistance,
    Fortification,
    Elusiveness,
    Brutality,
}

/// Stage order. Changing it changes game rules.
pub const PIPELINE: [Modifier; 4] = [
    Modifier::Resistance,
    Modifier::Fortification,
    Modifier::Elusiveness,
    Modifier::Brutality,
];

impl Modifier {
    pub fn apply(self, enemy: &Enemy, ctx: &StrikeContext, strike: Strike) -> Strike {
        match self {
            Modifier::Resistance => {
                let multiplier = resistance_multiplier(enemy, ctx.element);
                Strike {
                    points: multiplier.apply(strike.points),
                    multiplier,
                    ..strike
                }
            }
            Modifier::Fortification => {
                if enemy.has(EnemyAbilities::FORTIFIED) && ctx.kind == StrikeKind::Ranged {
                    Strike {
                        points: 0,
                        immune: true,
                        ..strike
                    }
                } else {
                    strike
                }
            }
            Modifier::Elusiveness => Strike {
                armor: current_armor(enemy, ctx.blocked, ctx.is_attack_phase()),
                ..strike
            },
            Modifier::Brutality => {
                if ctx.blocked {
                    strike
                } else {
                    Strike {
                        enemy_attack: effective_attack(enemy),
                        ..strike
                    }
                }
            }
        }
    }
}

/// Runs `points` through every stage of the pipeline.
pub fn resolve_strike(enemy: &Enemy, ctx: &StrikeContext, points: u32) -> Strike {
    PIPELINE
        .iter()
        .fold(Strike::base(enemy, points), |strike, modifier| {
            modifier.apply(enemy, ctx, strike)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EnemyDefinition, EnemyId, Resistances};

    fn enemy(definition: EnemyDefinition) -> Enemy {
        Enemy::from_definition(EnemyId(0), &definition)
    }

    #[test]
    fn fortified_ignores_plain_ranged() {
        let keep = enemy(EnemyDefinition::new("keep", 3, 4, 3).with_abilities(EnemyAbilities::FORTIFIED));
        let ranged = StrikeContext::new(StrikeKind::Ranged, Element::Physical, false);
        let strike = resolve_strike(&keep, &ranged, 10);
        assert!(strike.immune);
        assert_eq!(strike.points, 0);
        assert!(!strike.defeats());
    }

    #[test]
    fn fortified_takes_siege() {
        let keep = enemy(EnemyDefinition::new("keep", 3, 4, 3).with_abilities(EnemyAbilities::FORTIFIED));
        let siege = StrikeContext::new(StrikeKind::Siege, Element::Physical, false);
        let strike = resolve_strike(&keep, &siege, 3);
        assert!(!strike.immune);
        assert!(strike.defeats());
    }

    #[test]
    fn resistance_runs_before_armor_check() {
        let golem = enemy(EnemyDefinition::new("golem", 4, 2, 3).with_resistances(Resistances::ICE));
        let ctx = StrikeContext::new(StrikeKind::Melee, Element::Ice, false);
        let strike = resolve_strike(&golem, &ctx, 7);
        assert_eq!(strike.points, 3);
        assert!(!strike.defeats());
        assert_eq!(strike.raw_cost(), 8);
    }

    #[test]
    fn elusive_stage_uses_reduced_armor_when_blocked_in_melee() {
        let shade = enemy(
            EnemyDefinition::new("shade", 6, 3, 4)
                .with_abilities(EnemyAbilities::ELUSIVE)
                .with_reduced_armor(2),
        );
        let blocked = StrikeContext::new(StrikeKind::Melee, Element::Physical, true);
        let unblocked = StrikeContext::new(StrikeKind::Melee, Element::Physical, false);
        assert_eq!(resolve_strike(&shade, &blocked, 0).armor, 2);
        assert_eq!(resolve_strike(&shade, &unblocked, 0).armor, 6);
    }

    #[test]
    fn brutality_only_when_unblocked() {
        let orc = enemy(EnemyDefinition::new("orc", 4, 5, 2).with_abilities(EnemyAbilities::BRUTAL));
        let unblocked = StrikeContext::new(StrikeKind::Melee, Element::Physical, false);
        let blocked = StrikeContext::new(StrikeKind::Melee, Element::Physical, true);
        assert_eq!(resolve_strike(&orc, &unblocked, 0).enemy_attack, 10);
        assert_eq!(resolve_strike(&orc, &blocked, 0).enemy_attack, 5);
        assert_eq!(resolve_strike(&orc, &unblocked, 0).armor, 4);
    }

    #[test]
    fn sustained_damage_lowers_cost() {
        let mut troll = enemy(EnemyDefinition::new("troll", 5, 4, 3));
        troll.sustained_damage = 2;
        let ctx = StrikeContext::new(StrikeKind::Melee, Element::Physical, false);
        let strike = resolve_strike(&troll, &ctx, 3);
        assert_eq!(strike.cost(), 3);
        assert!(strike.defeats());
    }

    #[test]
    fn pipeline_order_is_fixed() {
        assert_eq!(
            PIPELINE,
            [
                Modifier::Resistance,
                Modifier::Fortification,
                Modifier::Elusiveness,
                Modifier::Brutality
            ]
        );
    }
}
