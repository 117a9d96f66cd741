use core::fmt;

/// Identifier of an enemy within one encounter.
///
/// Ids are handed out in roster order and never reused within an encounter,
/// so a status effect or pending wound that names a removed enemy simply
/// fails to resolve instead of hitting the wrong combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyId(pub u32);

impl fmt::Display for EnemyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "enemy#{}", self.0)
    }
}

/// Identifier of an allied unit, supplied by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit#{}", self.0)
    }
}

/// Non-owning reference to any combatant in a session.
///
/// Status effects store this key rather than the combatant itself and look
/// the target up again every time a hook fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatantId {
    Hero,
    Enemy(EnemyId),
    Unit(UnitId),
}

impl From<EnemyId> for CombatantId {
    fn from(id: EnemyId) -> Self {
        Self::Enemy(id)
    }
}

impl From<UnitId> for CombatantId {
    fn from(id: UnitId) -> Self {
        Self::Unit(id)
    }
}

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CombatantId::Hero => write!(f, "hero"),
            CombatantId::Enemy(id) => id.fmt(f),
            CombatantId::Unit(id) => id.fmt(f),
        }
    }
}
