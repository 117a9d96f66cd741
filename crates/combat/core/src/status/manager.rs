//! Registry of active status effects.

use tracing::trace;

use super::hooks::EffectTarget;
use super::kinds::{EffectDuration, StatusEffectKind};
use crate::model::CombatantId;

/// Resolves a combatant key to the live combatant, if it still exists.
pub trait TargetLookup {
    fn target_mut(&mut self, id: CombatantId) -> Option<&mut dyn EffectTarget>;
}

/// Remaining lifetime of an active effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Remaining {
    Phases(u8),
    UntilRemoved,
}

impl From<EffectDuration> for Remaining {
    fn from(duration: EffectDuration) -> Self {
        match duration {
            EffectDuration::Phases(n) => Remaining::Phases(n),
            EffectDuration::UntilRemoved => Remaining::UntilRemoved,
        }
    }
}

/// One effect on one target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveEffect {
    pub target: CombatantId,
    pub kind: StatusEffectKind,
    pub stacks: u8,
    pub remaining: Remaining,
}

/// Result of applying an effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ApplyOutcome {
    /// The effect did not exist on the target before.
    pub created: bool,
    pub stacks: u8,
    pub remaining: Remaining,
}

/// Damage or wounds produced by an effect trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusTick {
    pub target: CombatantId,
    pub kind: StatusEffectKind,
    pub amount: u32,
}

/// Everything that happened during one phase-start tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhaseStartReport {
    pub ticks: Vec<StatusTick>,
    pub expired: Vec<(CombatantId, StatusEffectKind)>,
}

/// Active effects for every combatant in a session.
///
/// A `(target, kind)` pair appears at most once; stacking changes the
/// entry's count instead of adding a second entry. Entries are kept in
/// application order so hooks fire deterministically.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffectManager {
    effects: Vec<ActiveEffect>,
}

impl StatusEffectManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, target: CombatantId, kind: StatusEffectKind) -> Option<&ActiveEffect> {
        self.effects
            .iter()
            .find(|e| e.target == target && e.kind == kind)
    }

    pub fn stacks(&self, target: CombatantId, kind: StatusEffectKind) -> u8 {
        self.get(target, kind).map_or(0, |e| e.stacks)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveEffect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Applies `kind` to `target`.
    ///
    /// An existing effect gains a stack (up to the type's maximum) and has its
    /// duration refreshed. A new effect is created and its apply hook runs.
    pub fn apply(
        &mut self,
        id: CombatantId,
        kind: StatusEffectKind,
        target: &mut dyn EffectTarget,
    ) -> ApplyOutcome {
        let definition = kind.definition();
        let remaining = Remaining::from(definition.duration);

        if let Some(effect) = self
            .effects
            .iter_mut()
            .find(|e| e.target == id && e.kind == kind)
        {
            if definition.stackable && effect.stacks < definition.max_stacks {
                effect.stacks += 1;
                if let Some(on_stack) = definition.hooks.on_stack {
                    on_stack(target, effect.stacks);
                }
            }
            effect.remaining = remaining;
            trace!(combatant = %id, %kind, stacks = effect.stacks, "status refreshed");
            return ApplyOutcome {
                created: false,
                stacks: effect.stacks,
                remaining,
            };
        }

        self.effects.push(ActiveEffect {
            target: id,
            kind,
            stacks: 1,
            remaining,
        });
        if let Some(on_apply) = definition.hooks.on_apply {
            on_apply(target, 1);
        }
        trace!(combatant = %id, %kind, "status applied");
        ApplyOutcome {
            created: true,
            stacks: 1,
            remaining,
        }
    }

    /// Removes `kind` from `target`, running its remove hook.
    ///
    /// Returns false if the effect was not active.
    pub fn remove(
        &mut self,
        id: CombatantId,
        kind: StatusEffectKind,
        target: &mut dyn EffectTarget,
    ) -> bool {
        let Some(index) = self
            .effects
            .iter()
            .position(|e| e.target == id && e.kind == kind)
        else {
            return false;
        };
        self.effects.remove(index);
        if let Some(on_remove) = kind.definition().hooks.on_remove {
            on_remove(target);
        }
        true
    }

    /// Drops every effect on a combatant that left the encounter. No hooks
    /// run because the target no longer exists.
    pub fn forget(&mut self, id: CombatantId) {
        self.effects.retain(|e| e.target != id);
    }

    /// Runs phase-start hooks, then ticks durations down.
    ///
    /// An effect reaching zero is removed after its hook has run for this
    /// tick. Effects whose target can no longer be found are dropped.
    pub fn on_phase_start(&mut self, targets: &mut dyn TargetLookup) -> PhaseStartReport {
        let mut report = PhaseStartReport::default();

        let mut index = 0;
        while index < self.effects.len() {
            let effect = &mut self.effects[index];
            let definition = effect.kind.definition();
            let Some(target) = targets.target_mut(effect.target) else {
                self.effects.remove(index);
                continue;
            };

            if let Some(on_phase_start) = definition.hooks.on_phase_start {
                let amount = on_phase_start(effect.stacks);
                if amount > 0 {
                    report.ticks.push(StatusTick {
                        target: effect.target,
                        kind: effect.kind,
                        amount,
                    });
                }
            }

            let expired = match &mut effect.remaining {
                Remaining::Phases(n) => {
                    *n = n.saturating_sub(1);
                    *n == 0
                }
                Remaining::UntilRemoved => false,
            };

            if expired {
                if let Some(on_remove) = definition.hooks.on_remove {
                    on_remove(target);
                }
                report.expired.push((effect.target, effect.kind));
                self.effects.remove(index);
            } else {
                index += 1;
            }
        }

        trace!(
            ticks = report.ticks.len(),
            expired = report.expired.len(),
            "status phase start"
        );
        report
    }

    /// Lets damage-taken hooks absorb part of `damage` aimed at `id`.
    ///
    /// Absorbing effects consume one stack per point absorbed and are removed
    /// once empty. Returns the damage that gets through.
    pub fn on_damage_taken(
        &mut self,
        id: CombatantId,
        damage: u32,
        target: &mut dyn EffectTarget,
    ) -> u32 {
        let mut remaining = damage;
        let mut index = 0;
        while index < self.effects.len() && remaining > 0 {
            let effect = &mut self.effects[index];
            let hooks = effect.kind.definition().hooks;
            if effect.target != id {
                index += 1;
                continue;
            }
            let Some(on_damage_taken) = hooks.on_damage_taken else {
                index += 1;
                continue;
            };

            let absorbed = on_damage_taken(effect.stacks, remaining);
            remaining -= absorbed;
            // absorbed <= stacks, so this fits in u8
            effect.stacks -= absorbed as u8;
            if effect.stacks == 0 {
                self.effects.remove(index);
                if let Some(on_remove) = hooks.on_remove {
                    on_remove(target);
                }
            } else {
                index += 1;
            }
        }
        remaining
    }

    /// Runs combat-end hooks. Durations are left untouched.
    pub fn on_combat_end(&self) -> Vec<StatusTick> {
        self.effects
            .iter()
            .filter_map(|effect| {
                let on_combat_end = effect.kind.definition().hooks.on_combat_end?;
                let amount = on_combat_end(effect.stacks);
                (amount > 0).then_some(StatusTick {
                    target: effect.target,
                    kind: effect.kind,
                    amount,
                })
            })
            .collect()
    }

    /// Removes every effect, running remove hooks on targets that still exist.
    pub fn clear(&mut self, targets: &mut dyn TargetLookup) {
        for effect in self.effects.drain(..) {
            if let (Some(on_remove), Some(target)) = (
                effect.kind.definition().hooks.on_remove,
                targets.target_mut(effect.target),
            ) {
                on_remove(target);
            }
        }
    }
}
