//! Hook functions referenced by the effect definition table.

use crate::model::{ConditionFlags, Conditions, Enemy, Hero, Unit};

/// Anything a status effect can be attached to.
///
/// Hooks only reach the target through this trait and only for the duration
/// of one call; effects never hold on to their target.
pub trait EffectTarget {
    fn conditions_mut(&mut self) -> &mut Conditions;
}

impl EffectTarget for Hero {
    fn conditions_mut(&mut self) -> &mut Conditions {
        &mut self.conditions
    }
}

impl EffectTarget for Enemy {
    fn conditions_mut(&mut self) -> &mut Conditions {
        &mut self.conditions
    }
}

impl EffectTarget for Unit {
    fn conditions_mut(&mut self) -> &mut Conditions {
        &mut self.conditions
    }
}

/// Callbacks of one effect type. `None` means the trigger does nothing.
#[derive(Clone, Copy, Debug)]
pub struct EffectHooks {
    /// First application to a target. Receives the stack count.
    pub on_apply: Option<fn(&mut dyn EffectTarget, u8)>,
    /// A stack was added to an existing effect.
    pub on_stack: Option<fn(&mut dyn EffectTarget, u8)>,
    pub on_remove: Option<fn(&mut dyn EffectTarget)>,
    /// Phase start. Returns damage dealt to the target.
    pub on_phase_start: Option<fn(u8) -> u32>,
    /// Target is about to take `damage`. Returns how much is absorbed.
    pub on_damage_taken: Option<fn(u8, u32) -> u32>,
    /// Combat end. Returns wounds dealt to the target.
    pub on_combat_end: Option<fn(u8) -> u32>,
}

impl EffectHooks {
    pub const NONE: Self = Self {
        on_apply: None,
        on_stack: None,
        on_remove: None,
        on_phase_start: None,
        on_damage_taken: None,
        on_combat_end: None,
    };
}

fn set_flag(target: &mut dyn EffectTarget, flag: ConditionFlags, on: bool) {
    target.conditions_mut().flags.set(flag, on);
}

pub(super) fn stun_apply(target: &mut dyn EffectTarget, _stacks: u8) {
    set_flag(target, ConditionFlags::STUNNED, true);
}

pub(super) fn stun_remove(target: &mut dyn EffectTarget) {
    set_flag(target, ConditionFlags::STUNNED, false);
}

pub(super) fn freeze_apply(target: &mut dyn EffectTarget, _stacks: u8) {
    set_flag(target, ConditionFlags::FROZEN, true);
}

pub(super) fn freeze_remove(target: &mut dyn EffectTarget) {
    set_flag(target, ConditionFlags::FROZEN, false);
}

pub(super) fn enrage_apply(target: &mut dyn EffectTarget, _stacks: u8) {
    set_flag(target, ConditionFlags::ENRAGED, true);
}

pub(super) fn enrage_remove(target: &mut dyn EffectTarget) {
    set_flag(target, ConditionFlags::ENRAGED, false);
}

pub(super) fn weaken_sync(target: &mut dyn EffectTarget, stacks: u8) {
    target.conditions_mut().attack_penalty = u32::from(stacks);
}

pub(super) fn weaken_remove(target: &mut dyn EffectTarget) {
    target.conditions_mut().attack_penalty = 0;
}

pub(super) fn damage_per_stack(stacks: u8) -> u32 {
    u32::from(stacks)
}

pub(super) fn shield_absorb(stacks: u8, damage: u32) -> u32 {
    damage.min(u32::from(stacks))
}
