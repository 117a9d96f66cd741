/// Combat engine constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Armor gained by a vampiric enemy for each damage resolution in which
    /// it delivered at least one wound.
    pub vampiric_heal: u32,

    /// Block points granted per unspent movement point against a cumbersome enemy.
    pub cumbersome_rate: u32,

    /// Maximum number of undrained events the session buffers before the
    /// oldest are dropped.
    pub event_buffer_limit: usize,
}

impl CombatConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of enemies on a roster, summoned enemies included.
    pub const MAX_ENEMIES: usize = 16;
    pub const MAX_UNITS: usize = 8;
    pub const MAX_UNIT_ABILITIES: usize = 4;
    pub const MAX_BLOCK_CONTRIBUTIONS: usize = 8;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_VAMPIRIC_HEAL: u32 = 1;
    pub const DEFAULT_CUMBERSOME_RATE: u32 = 1;
    pub const DEFAULT_EVENT_BUFFER_LIMIT: usize = 256;

    pub fn new() -> Self {
        Self {
            vampiric_heal: Self::DEFAULT_VAMPIRIC_HEAL,
            cumbersome_rate: Self::DEFAULT_CUMBERSOME_RATE,
            event_buffer_limit: Self::DEFAULT_EVENT_BUFFER_LIMIT,
        }
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}
