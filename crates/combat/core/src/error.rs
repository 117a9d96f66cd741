//! Error infrastructure for combat-core.
//!
//! Two families of errors exist and they are handled very differently:
//!
//! - [`CommandError`] covers everything a player can trigger by issuing a
//!   command at the wrong time or against the wrong target. These never abort
//!   the engine; the session folds them into a failed
//!   [`CommandOutcome`](crate::session::CommandOutcome) and leaves its state
//!   untouched.
//! - [`ConfigError`] covers corrupted content (unknown effect keys, missing
//!   enemy definitions). Valid player input cannot produce one, so they are
//!   returned as `Err` from the few configuration entry points and are
//!   classified as [`ErrorSeverity::Fatal`].

use crate::model::{EnemyId, UnitId};
use crate::session::{CommandKind, Phase};

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// The same command may succeed later or against another target.
    Recoverable,

    /// Invalid input; retrying without changes will fail again.
    Validation,

    /// Unexpected state inconsistency inside the engine.
    Internal,

    /// Content or build is corrupted; the encounter cannot continue.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error should abort engine execution.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal)
    }
}

/// Common trait for all combat-core errors.
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
/// - `error_code` doubles as the message key handed to the presentation layer
pub trait CombatError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier for this error variant.
    fn error_code(&self) -> &'static str;
}

/// Why a wound could not be routed to an allied unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AssignmentViolation {
    /// The unit is exhausted, wounded, or destroyed.
    UnitNotReady,
    /// The source enemy is an assassin; its wounds must fall on the hero.
    AssassinSource,
}

/// Player-reachable command failures.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommandError {
    #[error("{command} is not valid during the {phase} phase")]
    InvalidPhaseOperation { command: CommandKind, phase: Phase },

    #[error("cannot assign damage from {source_enemy} to {unit}: {reason:?}")]
    IllegalDamageAssignment {
        unit: UnitId,
        source_enemy: EnemyId,
        reason: AssignmentViolation,
    },

    #[error("enemy {0} is not on the roster")]
    EnemyNotFound(EnemyId),

    #[error("enemy {0} cannot be targeted during this phase")]
    EnemyNotTargetable(EnemyId),

    #[error("enemy {0} is already blocked")]
    EnemyAlreadyBlocked(EnemyId),

    #[error("unit {0} is not part of this encounter")]
    UnitNotFound(UnitId),

    #[error("unit {0} is not ready")]
    UnitNotReady(UnitId),

    #[error("unit {unit} has no ability #{index} usable in this phase")]
    AbilityNotAvailable { unit: UnitId, index: usize },

    #[error("enemy {0} has no pending damage")]
    NoPendingDamage(EnemyId),

    #[error("the hero cannot act")]
    HeroCannotAct,

    #[error("submission carries no points")]
    EmptySubmission,

    #[error("this activation needs an enemy target")]
    MissingTarget,
}

impl CombatError for CommandError {
    fn severity(&self) -> ErrorSeverity {
        use CommandError::*;
        match self {
            InvalidPhaseOperation { .. } | HeroCannotAct => ErrorSeverity::Recoverable,
            IllegalDamageAssignment { .. } | UnitNotReady(_) => ErrorSeverity::Recoverable,
            EnemyNotTargetable(_) | EnemyAlreadyBlocked(_) => ErrorSeverity::Recoverable,
            EnemyNotFound(_) | UnitNotFound(_) | NoPendingDamage(_) => ErrorSeverity::Validation,
            AbilityNotAvailable { .. } | EmptySubmission | MissingTarget => {
                ErrorSeverity::Validation
            }
        }
    }

    fn error_code(&self) -> &'static str {
        use CommandError::*;
        match self {
            InvalidPhaseOperation { .. } => "combat.invalid_phase",
            IllegalDamageAssignment {
                reason: AssignmentViolation::AssassinSource,
                ..
            } => "combat.assign.assassin",
            IllegalDamageAssignment {
                reason: AssignmentViolation::UnitNotReady,
                ..
            } => "combat.assign.unit_not_ready",
            EnemyNotFound(_) => "combat.enemy_not_found",
            EnemyNotTargetable(_) => "combat.enemy_not_targetable",
            EnemyAlreadyBlocked(_) => "combat.enemy_already_blocked",
            UnitNotFound(_) => "combat.unit_not_found",
            UnitNotReady(_) => "combat.unit_not_ready",
            AbilityNotAvailable { .. } => "combat.ability_not_available",
            NoPendingDamage(_) => "combat.no_pending_damage",
            HeroCannotAct => "combat.hero_cannot_act",
            EmptySubmission => "combat.empty_submission",
            MissingTarget => "combat.missing_target",
        }
    }
}

/// Configuration-level failures. These indicate corrupted content, not
/// player behavior.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConfigError {
    #[error("unknown status effect type '{0}'")]
    UnknownEffectType(String),

    #[error("no enemy definition for '{0}'")]
    MissingEnemyDefinition(String),

    #[error("roster exceeds {max} enemies")]
    RosterOverflow { max: usize },
}

impl CombatError for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            ConfigError::UnknownEffectType(_) => "config.unknown_effect_type",
            ConfigError::MissingEnemyDefinition(_) => "config.missing_enemy_definition",
            ConfigError::RosterOverflow { .. } => "config.roster_overflow",
        }
    }
}
