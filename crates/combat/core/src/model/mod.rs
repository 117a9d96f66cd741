//! Combatant model: value types for enemies, allied units and the hero.

pub mod abilities;
pub mod conditions;
pub mod element;
pub mod enemy;
pub mod hero;
pub mod ids;
pub mod unit;

pub use abilities::{EnemyAbilities, Resistances};
pub use conditions::{ConditionFlags, Conditions};
pub use element::{Element, StrikeKind};
pub use enemy::{Enemy, EnemyDefinition};
pub use hero::Hero;
pub use ids::{CombatantId, EnemyId, UnitId};
pub use unit::{AbilityPhase, Unit, UnitAbility, UnitState};
