//! Topic-based event bus for encounter events.
//!
//! The engine buffers [`combat_core::CombatEvent`]s; the host drains them
//! after every command and publishes them here, split by topic so
//! subscribers only receive what they care about.

mod bus;

pub use bus::{Event, EventBus, Topic};
