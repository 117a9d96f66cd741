//! Capability flags for enemies.
//!
//! Abilities are a fixed flag set rather than a list of behaviours: the damage
//! resolver reads them through an explicitly ordered modifier pipeline, so the
//! flag value itself never carries logic.

use bitflags::bitflags;

use super::Element;

bitflags! {
    /// Combat abilities an enemy may carry.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct EnemyAbilities: u16 {
        /// Immune to plain ranged attacks; siege still applies.
        const FORTIFIED  = 1 << 0;
        /// Block requirement is doubled.
        const SWIFT      = 1 << 1;
        /// Unblocked attack is doubled.
        const BRUTAL     = 1 << 2;
        /// Hero wounds are mirrored into the discard pile; wounded units are destroyed.
        const POISON     = 1 << 3;
        /// Any wound forces a discard of the hero's non-wound cards.
        const PARALYZE   = 1 << 4;
        /// Uses its reduced armor in the attack phase once blocked.
        const ELUSIVE    = 1 << 5;
        /// Gains armor after delivering wounds.
        const VAMPIRIC   = 1 << 6;
        /// Its wounds cannot be routed to units.
        const ASSASSIN   = 1 << 7;
        /// Unspent movement may substitute for missing block.
        const CUMBERSOME = 1 << 8;
        /// Brings another enemy into the encounter.
        const SUMMONER   = 1 << 9;
    }
}

bitflags! {
    /// Elemental resistances halving incoming attack points.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Resistances: u8 {
        const PHYSICAL = 1 << 0;
        const FIRE     = 1 << 1;
        const ICE      = 1 << 2;
    }
}

impl Resistances {
    /// Returns true if an attack of `element` is resisted.
    ///
    /// Cold-fire is only resisted by an enemy resistant to both fire and ice.
    pub fn resists(self, element: Element) -> bool {
        match element {
            Element::Physical => self.contains(Resistances::PHYSICAL),
            Element::Fire => self.contains(Resistances::FIRE),
            Element::Ice => self.contains(Resistances::ICE),
            Element::ColdFire => self.contains(Resistances::FIRE | Resistances::ICE),
        }
    }
}
