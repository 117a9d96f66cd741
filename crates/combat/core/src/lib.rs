//! Deterministic combat rules for a turn-based tactical encounter.
//!
//! `combat-core` resolves one encounter between a hero (with optional allied
//! units) and a roster of enemies. It owns no I/O: hosts feed it commands and
//! read back [`CommandOutcome`]s and buffered [`CombatEvent`]s. All state
//! mutation flows through [`session::CombatSession`].
//!
//! - [`model`]: combatants, elements and ability flags
//! - [`resolver`]: pure damage and block arithmetic
//! - [`status`]: timed status effects and their hooks
//! - [`session`]: the phase state machine
pub mod config;
pub mod env;
pub mod error;
pub mod model;
pub mod resolver;
pub mod session;
pub mod status;

pub use config::CombatConfig;
pub use env::EnemyOracle;
pub use error::{AssignmentViolation, CombatError, CommandError, ConfigError, ErrorSeverity};
pub use model::{
    AbilityPhase, CombatantId, ConditionFlags, Conditions, Element, Enemy, EnemyAbilities,
    EnemyDefinition, EnemyId, Hero, Resistances, StrikeKind, Unit, UnitAbility, UnitId, UnitState,
};
pub use resolver::{
    BlockAssessment, BlockContribution, BlockEfficiency, BlockSource, ResistanceMultiplier,
    assess_block, block_requirement, classify_block, current_armor, effective_attack,
    resistance_multiplier, resolve_strike, vampiric_heal,
};
pub use session::{
    BlockStatus, CombatCommand, CombatEvent, CombatResult, CombatSession, CommandKind,
    CommandOutcome, DamageSource, EncounterOutcome, EncounterSetup, OutcomeData, PendingDamage,
    Phase, PhaseTotals, Roster,
};
pub use status::{ActiveEffect, ApplyOutcome, StatusEffectKind, StatusEffectManager};
