//! Status effect types and their static definitions.
//!
//! The definition table is process-wide, read-only configuration. Nothing
//! mutates it; the manager only ever borrows `&'static` entries.

use super::hooks;
use super::hooks::EffectHooks;

/// Types of status effects.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[repr(u8)]
pub enum StatusEffectKind {
    /// Cannot act.
    Stun,
    /// Damage equal to stacks at every phase start.
    Burn,
    /// Block contributions halved.
    Freeze,
    /// Wounds equal to stacks when combat ends.
    Poison,
    /// Outgoing attack reduced by stacks.
    Weaken,
    /// Absorbs incoming damage, one stack per point.
    Shield,
    /// Outgoing attack and incoming damage doubled.
    Enrage,
}

impl StatusEffectKind {
    pub fn definition(self) -> &'static EffectDefinition {
        &EFFECTS[self as usize]
    }
}

/// How long an effect lasts once applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectDuration {
    /// Number of phase starts before expiry.
    Phases(u8),
    /// Stays until explicitly removed or the session is cleared.
    UntilRemoved,
}

/// Mechanical definition of a status effect type.
#[derive(Clone, Copy, Debug)]
pub struct EffectDefinition {
    pub kind: StatusEffectKind,
    pub duration: EffectDuration,
    pub stackable: bool,
    pub max_stacks: u8,
    pub hooks: EffectHooks,
}

/// Definition table, indexed by `StatusEffectKind as usize`.
pub static EFFECTS: [EffectDefinition; 7] = [
    EffectDefinition {
        kind: StatusEffectKind::Stun,
        duration: EffectDuration::Phases(1),
        stackable: false,
        max_stacks: 1,
        hooks: EffectHooks {
            on_apply: Some(hooks::stun_apply),
            on_remove: Some(hooks::stun_remove),
            ..EffectHooks::NONE
        },
    },
    EffectDefinition {
        kind: StatusEffectKind::Burn,
        duration: EffectDuration::Phases(3),
        stackable: true,
        max_stacks: 3,
        hooks: EffectHooks {
            on_phase_start: Some(hooks::damage_per_stack),
            ..EffectHooks::NONE
        },
    },
    EffectDefinition {
        kind: StatusEffectKind::Freeze,
        duration: EffectDuration::Phases(2),
        stackable: false,
        max_stacks: 1,
        hooks: EffectHooks {
            on_apply: Some(hooks::freeze_apply),
            on_remove: Some(hooks::freeze_remove),
            ..EffectHooks::NONE
        },
    },
    EffectDefinition {
        kind: StatusEffectKind::Poison,
        duration: EffectDuration::UntilRemoved,
        stackable: true,
        max_stacks: 5,
        hooks: EffectHooks {
            on_combat_end: Some(hooks::damage_per_stack),
            ..EffectHooks::NONE
        },
    },
    EffectDefinition {
        kind: StatusEffectKind::Weaken,
        duration: EffectDuration::Phases(2),
        stackable: true,
        max_stacks: 3,
        hooks: EffectHooks {
            on_apply: Some(hooks::weaken_sync),
            on_stack: Some(hooks::weaken_sync),
            on_remove: Some(hooks::weaken_remove),
            ..EffectHooks::NONE
        },
    },
    EffectDefinition {
        kind: StatusEffectKind::Shield,
        duration: EffectDuration::Phases(1),
        stackable: true,
        max_stacks: 5,
        hooks: EffectHooks {
            on_damage_taken: Some(hooks::shield_absorb),
            ..EffectHooks::NONE
        },
    },
    EffectDefinition {
        kind: StatusEffectKind::Enrage,
        duration: EffectDuration::Phases(3),
        stackable: false,
        max_stacks: 1,
        hooks: EffectHooks {
            on_apply: Some(hooks::enrage_apply),
            on_remove: Some(hooks::enrage_remove),
            ..EffectHooks::NONE
        },
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use core::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn table_is_indexed_by_kind() {
        for kind in StatusEffectKind::iter() {
            assert_eq!(kind.definition().kind, kind);
        }
    }

    #[test]
    fn non_stackable_types_cap_at_one() {
        for kind in StatusEffectKind::iter() {
            let definition = kind.definition();
            if !definition.stackable {
                assert_eq!(definition.max_stacks, 1, "{kind}");
            }
        }
    }

    #[test]
    fn parses_snake_case_keys() {
        assert_eq!(StatusEffectKind::from_str("burn"), Ok(StatusEffectKind::Burn));
        assert_eq!(StatusEffectKind::from_str("SHIELD"), Ok(StatusEffectKind::Shield));
        assert!(StatusEffectKind::from_str("blight").is_err());
    }

    #[test]
    fn poison_never_expires_on_its_own() {
        assert_eq!(
            StatusEffectKind::Poison.definition().duration,
            EffectDuration::UntilRemoved
        );
    }
}
