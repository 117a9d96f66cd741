//! Status effects: registry, static definitions and hooks.
//!
//! Effects live in a [`StatusEffectManager`] owned by the session. They refer
//! to their target by [`CombatantId`](crate::model::CombatantId) only and
//! reach the combatant through a [`TargetLookup`] when a hook fires.
//!
//! Triggers:
//! - apply / stack / remove: adjust the target's [`Conditions`](crate::model::Conditions)
//! - phase start: damage (burn), then duration tick
//! - damage taken: absorption (shield)
//! - combat end: wounds (poison), no duration tick

pub mod hooks;
pub mod kinds;
pub mod manager;

pub use hooks::{EffectHooks, EffectTarget};
pub use kinds::{EFFECTS, EffectDefinition, EffectDuration, StatusEffectKind};
pub use manager::{
    ActiveEffect, ApplyOutcome, PhaseStartReport, Remaining, StatusEffectManager, StatusTick,
    TargetLookup,
};
