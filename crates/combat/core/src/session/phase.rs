/// Phase of a combat encounter.
///
/// ```text
/// NotInCombat → Ranged → Block → (Damage) → Attack → Complete
/// ```
///
/// Variants are ordered, and a session only ever moves forward through them.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    #[default]
    NotInCombat,
    Ranged,
    Block,
    /// Entered only when unblocked damage is waiting for assignment.
    Damage,
    Attack,
    Complete,
}

impl Phase {
    /// Returns true while an encounter is running.
    pub const fn is_active(self) -> bool {
        matches!(
            self,
            Phase::Ranged | Phase::Block | Phase::Damage | Phase::Attack
        )
    }

    /// Returns true if a new encounter may be started.
    pub const fn accepts_new_encounter(self) -> bool {
        matches!(self, Phase::NotInCombat | Phase::Complete)
    }
}
