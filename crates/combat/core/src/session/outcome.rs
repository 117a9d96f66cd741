//! Results handed back to the host.

use super::Phase;
use crate::error::{CombatError, CommandError};
use crate::model::{AbilityPhase, CombatantId, EnemyId, Hero, Unit, UnitId, UnitState};
use crate::resolver::BlockAssessment;
use crate::status::{ApplyOutcome, StatusEffectKind};

/// How an encounter ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum EncounterOutcome {
    /// Every enemy was defeated.
    Victory,
    /// Combat ended with enemies still standing.
    Defeat,
    /// The hero withdrew.
    Retreated,
}

/// Final tally of a completed encounter.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatResult {
    pub outcome: EncounterOutcome,
    pub enemies_defeated: Vec<EnemyId>,
    pub fame_gained: u32,
    /// Wounds the hero took during the encounter, combat-end effects included.
    pub wounds_received: u32,
    /// Extra wounds sent straight to the discard pile by poisonous enemies.
    pub poison_wounds: u32,
    /// Wounds dealt by combat-end status effects alone.
    pub combat_end_wounds: u32,
    pub hero: Hero,
    pub units: Vec<Unit>,
}

/// Command-specific payload of a [`CommandOutcome`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OutcomeData {
    #[default]
    None,
    CombatStarted {
        enemies: Vec<EnemyId>,
        summoned: Vec<EnemyId>,
    },
    RangedResolved {
        target: EnemyId,
        /// Points credited to the target after modifiers.
        applied: u32,
        fortified_immune: bool,
        defeated: bool,
        fame: u32,
    },
    PhaseEnded {
        unblocked: Vec<EnemyId>,
        pending_wounds: u32,
        waiting_for_assignment: bool,
    },
    BlockResolved {
        target: EnemyId,
        assessment: BlockAssessment,
    },
    DamageAssigned {
        unit: UnitId,
        source: EnemyId,
        unit_state: UnitState,
        /// Armor of the unit that absorbed the wound, for presentation.
        unit_armor: u32,
        wounds_left: u32,
    },
    DamageResolved {
        wounds_received: u32,
        poison_wounds: u32,
        paralyze_triggered: bool,
        cards_discarded: u32,
    },
    AttackResolved {
        enemies_defeated: Vec<EnemyId>,
        fame: u32,
        /// Attack points left over after allocation. They do not carry.
        discarded: u32,
        victory: bool,
    },
    UnitActivated {
        unit: UnitId,
        ability: AbilityPhase,
        value: u32,
        effect: Box<OutcomeData>,
    },
    StatusApplied {
        target: CombatantId,
        kind: StatusEffectKind,
        applied: ApplyOutcome,
    },
    CombatEnded(CombatResult),
}

/// What a command did, or why it was rejected.
///
/// `message` is a localization key owned by the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CommandOutcome {
    pub phase: Phase,
    pub success: bool,
    pub message: &'static str,
    pub data: OutcomeData,
    pub error: Option<CommandError>,
}

impl CommandOutcome {
    pub fn succeeded(phase: Phase, message: &'static str, data: OutcomeData) -> Self {
        Self {
            phase,
            success: true,
            message,
            data,
            error: None,
        }
    }

    pub fn rejected(phase: Phase, error: CommandError) -> Self {
        Self {
            phase,
            success: false,
            message: error.error_code(),
            data: OutcomeData::None,
            error: Some(error),
        }
    }

    /// True when unblocked damage is waiting for the host to assign it.
    pub fn waiting_for_assignment(&self) -> bool {
        matches!(
            self.data,
            OutcomeData::PhaseEnded {
                waiting_for_assignment: true,
                ..
            }
        )
    }

    /// True when the command ended the encounter in victory.
    pub fn victory(&self) -> bool {
        match &self.data {
            OutcomeData::AttackResolved { victory, .. } => *victory,
            OutcomeData::CombatEnded(result) => result.outcome == EncounterOutcome::Victory,
            _ => false,
        }
    }
}
