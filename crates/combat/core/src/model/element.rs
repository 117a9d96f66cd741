/// Element of an attack or block.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Element {
    #[default]
    Physical,
    Fire,
    Ice,
    /// Combined fire and ice; only cold-fire blocks it at full value.
    ColdFire,
}

impl Element {
    /// Returns true for every element other than physical.
    pub const fn is_elemental(self) -> bool {
        !matches!(self, Element::Physical)
    }
}

/// Kind of offensive points submitted before the block phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum StrikeKind {
    /// Plain ranged attack; stopped by fortification.
    Ranged,
    /// Siege attack; ignores fortification.
    Siege,
    /// Melee attack in the attack phase.
    Melee,
}
