//! Data-driven combat content and loaders.
//!
//! This crate houses static content and provides loaders for RON/TOML data files:
//! - Enemy catalog (data-driven via RON)
//! - Encounter scripts (data-driven via RON)
//! - Engine configuration (data-driven via TOML)
//!
//! Content is consumed through [`combat_core::EnemyOracle`] and never appears
//! in session state.

pub mod catalog;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalog::EnemyCatalog;

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentFactory, EncounterLoader, EncounterScript, EnemyLoader, HeroSpec,
    UnitSpec,
};
