//! Allied combat units.

use arrayvec::ArrayVec;

use super::{Conditions, Element, UnitId};
use crate::config::CombatConfig;

/// Phase in which a unit ability can be activated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AbilityPhase {
    Ranged,
    Siege,
    Block,
    Attack,
}

/// One activatable unit ability.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitAbility {
    pub phase: AbilityPhase,
    pub value: u32,
    pub element: Element,
}

impl UnitAbility {
    pub const fn new(phase: AbilityPhase, value: u32, element: Element) -> Self {
        Self {
            phase,
            value,
            element,
        }
    }
}

/// Lifecycle of a unit.
///
/// ```text
/// Ready ──activate──▶ Exhausted
///   │                    │
///   └──────wound─────────┴──▶ Wounded ──wound──▶ Destroyed
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum UnitState {
    #[default]
    Ready,
    Exhausted,
    Wounded,
    Destroyed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    pub armor: u32,
    pub abilities: ArrayVec<UnitAbility, { CombatConfig::MAX_UNIT_ABILITIES }>,
    pub state: UnitState,
    pub conditions: Conditions,
}

impl Unit {
    pub fn new(id: UnitId, name: impl Into<String>, armor: u32) -> Self {
        Self {
            id,
            name: name.into(),
            armor,
            abilities: ArrayVec::new(),
            state: UnitState::Ready,
            conditions: Conditions::default(),
        }
    }

    /// Adds an ability. Abilities beyond the configured maximum are ignored.
    pub fn with_ability(mut self, ability: UnitAbility) -> Self {
        let _ = self.abilities.try_push(ability);
        self
    }

    pub fn is_ready(&self) -> bool {
        self.state == UnitState::Ready && !self.conditions.is_stunned()
    }

    /// Absorbs one wound. A `lethal` wound destroys the unit outright.
    ///
    /// Returns the resulting state.
    pub fn take_wound(&mut self, lethal: bool) -> UnitState {
        self.state = match self.state {
            UnitState::Ready | UnitState::Exhausted if !lethal => UnitState::Wounded,
            _ => UnitState::Destroyed,
        };
        self.state
    }
}
