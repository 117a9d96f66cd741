//! Inbound commands.

use arrayvec::ArrayVec;

use super::Phase;
use crate::config::CombatConfig;
use crate::model::{CombatantId, Element, EnemyId, UnitId};
use crate::resolver::BlockContribution;
use crate::status::StatusEffectKind;

/// Command discriminant, used for phase validation and error reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum CommandKind {
    InitiateCombat,
    SubmitRanged,
    EndRangedPhase,
    SubmitBlock,
    EndBlockPhase,
    AssignDamage,
    ResolveRemainder,
    SubmitAttack,
    ActivateUnit,
    ApplyStatus,
    Retreat,
}

impl CommandKind {
    /// Returns true if the command may be issued during `phase`.
    pub fn valid_in(self, phase: Phase) -> bool {
        use CommandKind::*;
        match self {
            InitiateCombat => phase.accepts_new_encounter(),
            SubmitRanged | EndRangedPhase => phase == Phase::Ranged,
            SubmitBlock | EndBlockPhase => phase == Phase::Block,
            AssignDamage | ResolveRemainder => phase == Phase::Damage,
            SubmitAttack => phase == Phase::Attack,
            ActivateUnit => matches!(phase, Phase::Ranged | Phase::Block | Phase::Attack),
            ApplyStatus | Retreat => phase.is_active(),
        }
    }
}

/// A command issued by the host against a running session.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatCommand {
    SubmitRanged {
        target: EnemyId,
        ranged: u32,
        siege: u32,
        #[cfg_attr(feature = "serde", serde(default))]
        element: Element,
    },
    EndRangedPhase,
    SubmitBlock {
        target: EnemyId,
        contributions: ArrayVec<BlockContribution, { CombatConfig::MAX_BLOCK_CONTRIBUTIONS }>,
    },
    EndBlockPhase,
    AssignDamage {
        unit: UnitId,
        source: EnemyId,
    },
    ResolveRemainder,
    SubmitAttack {
        total: u32,
        #[cfg_attr(feature = "serde", serde(default))]
        element: Element,
    },
    ActivateUnit {
        unit: UnitId,
        ability: usize,
        #[cfg_attr(feature = "serde", serde(default))]
        target: Option<EnemyId>,
    },
    ApplyStatus {
        target: CombatantId,
        effect: StatusEffectKind,
    },
    Retreat,
}

impl CombatCommand {
    pub fn kind(&self) -> CommandKind {
        match self {
            CombatCommand::SubmitRanged { .. } => CommandKind::SubmitRanged,
            CombatCommand::EndRangedPhase => CommandKind::EndRangedPhase,
            CombatCommand::SubmitBlock { .. } => CommandKind::SubmitBlock,
            CombatCommand::EndBlockPhase => CommandKind::EndBlockPhase,
            CombatCommand::AssignDamage { .. } => CommandKind::AssignDamage,
            CombatCommand::ResolveRemainder => CommandKind::ResolveRemainder,
            CombatCommand::SubmitAttack { .. } => CommandKind::SubmitAttack,
            CombatCommand::ActivateUnit { .. } => CommandKind::ActivateUnit,
            CombatCommand::ApplyStatus { .. } => CommandKind::ApplyStatus,
            CombatCommand::Retreat => CommandKind::Retreat,
        }
    }

    /// Returns true if a successful execution is an irreversible commit
    /// point. Hosts drop their undo history after these.
    pub fn is_commit_point(&self) -> bool {
        matches!(
            self,
            CombatCommand::EndRangedPhase
                | CombatCommand::EndBlockPhase
                | CombatCommand::ResolveRemainder
                | CombatCommand::SubmitAttack { .. }
                | CombatCommand::Retreat
        )
    }

    /// Builds a block submission, dropping contributions beyond the maximum.
    pub fn block(target: EnemyId, contributions: &[BlockContribution]) -> Self {
        CombatCommand::SubmitBlock {
            target,
            contributions: contributions
                .iter()
                .copied()
                .take(CombatConfig::MAX_BLOCK_CONTRIBUTIONS)
                .collect(),
        }
    }
}
