//! Notifications emitted while an encounter runs.
//!
//! Events are buffered inside the session and drained by the host, which
//! usually forwards them to a presentation layer.

use super::{EncounterOutcome, Phase};
use crate::model::{CombatantId, EnemyId};
use crate::status::StatusEffectKind;

/// Origin of damage dealt to a combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageSource {
    Enemy(EnemyId),
    Status(StatusEffectKind),
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatEvent {
    CombatStarted {
        enemies: Vec<EnemyId>,
    },
    PhaseChanged {
        from: Phase,
        to: Phase,
    },
    EnemySummoned {
        summoner: EnemyId,
        summoned: EnemyId,
    },
    EnemyDefeated {
        enemy: EnemyId,
        fame: u32,
    },
    BlockPerformed {
        enemy: EnemyId,
        effective: u32,
        blocked: bool,
    },
    DamageApplied {
        target: CombatantId,
        amount: u32,
        source: DamageSource,
    },
    StatusApplied {
        target: CombatantId,
        kind: StatusEffectKind,
        stacks: u8,
    },
    StatusExpired {
        target: CombatantId,
        kind: StatusEffectKind,
    },
    CombatEnded {
        outcome: EncounterOutcome,
    },
}

impl CombatEvent {
    /// Returns true for status-effect notifications.
    pub fn is_status(&self) -> bool {
        matches!(
            self,
            CombatEvent::StatusApplied { .. } | CombatEvent::StatusExpired { .. }
        )
    }
}
