//! Host-side orchestration for combat encounters.
//!
//! The engine in `combat-core` is synchronous and holds no history. This crate
//! wraps it for hosts: [`EncounterHost`] drives a session, forwards its events
//! to subscribers, and keeps the undo history that commit points discard.
//!
//! Modules are organized by responsibility:
//! - [`host`] drives one encounter at a time
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`snapshot`] and [`store`] encode sessions as opaque, digest-checked blobs
//! - [`logging`] installs the tracing subscriber used by binaries
pub mod error;
pub mod events;
pub mod host;
pub mod logging;
pub mod snapshot;
pub mod store;

pub use error::{Result, RuntimeError};
pub use events::{Event, EventBus, Topic};
pub use host::{DEFAULT_HISTORY_LIMIT, EncounterHost};
pub use snapshot::SessionSnapshot;
pub use store::SnapshotStore;
