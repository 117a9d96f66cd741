use bitflags::bitflags;

bitflags! {
    /// Control states set and cleared by status effect hooks.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ConditionFlags: u8 {
        /// Cannot act: an enemy deals no damage, the hero cannot attack.
        const STUNNED = 1 << 0;
        /// Block contributions are worth half.
        const FROZEN  = 1 << 1;
        /// Outgoing attack and incoming damage are doubled.
        const ENRAGED = 1 << 2;
    }
}

/// Status-driven modifiers carried by every combatant.
///
/// Only status effect hooks write here. Base stats are never touched, so
/// removing an effect always restores the combatant exactly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Conditions {
    pub flags: ConditionFlags,
    /// Points subtracted from outgoing attack.
    pub attack_penalty: u32,
}

impl Conditions {
    pub fn is_stunned(&self) -> bool {
        self.flags.contains(ConditionFlags::STUNNED)
    }

    pub fn is_frozen(&self) -> bool {
        self.flags.contains(ConditionFlags::FROZEN)
    }

    pub fn is_enraged(&self) -> bool {
        self.flags.contains(ConditionFlags::ENRAGED)
    }

    /// Applies enrage and weaken to an outgoing attack value.
    pub fn outgoing_attack(&self, base: u32) -> u32 {
        let raw = if self.is_enraged() { base.saturating_mul(2) } else { base };
        raw.saturating_sub(self.attack_penalty)
    }

    /// Applies enrage to incoming damage.
    pub fn incoming_damage(&self, damage: u32) -> u32 {
        if self.is_enraged() { damage.saturating_mul(2) } else { damage }
    }

    /// Applies freeze to a block value.
    pub fn block_value(&self, block: u32) -> u32 {
        if self.is_frozen() { block / 2 } else { block }
    }
}
