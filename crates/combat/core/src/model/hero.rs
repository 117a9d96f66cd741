use super::Conditions;

/// The hero as seen by the combat engine.
///
/// The host owns the full hero (deck, skills, map position); the engine only
/// needs the parts combat touches.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hero {
    /// Wound cards in hand.
    pub wounds: u32,
    /// Wound cards placed straight into the discard pile (poison).
    pub discarded_wounds: u32,
    /// Non-wound cards in hand.
    pub hand_cards: u32,
    /// Movement points left unspent this turn.
    pub movement_points: u32,
    pub fame: u32,
    pub conditions: Conditions,
}

impl Hero {
    pub fn new(hand_cards: u32, movement_points: u32) -> Self {
        Self {
            hand_cards,
            movement_points,
            ..Self::default()
        }
    }

    /// Discards every non-wound card in hand. Returns how many were discarded.
    pub fn discard_non_wounds(&mut self) -> u32 {
        core::mem::take(&mut self.hand_cards)
    }
}
