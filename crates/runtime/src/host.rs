//! Host-side encounter driver.
//!
//! [`EncounterHost`] owns one [`CombatSession`] together with the enemy
//! oracle it resolves summons through and the [`EventBus`] it forwards engine
//! events to. It also keeps the undo history the engine deliberately does
//! not: a snapshot is taken before every reversible command and the whole
//! history is dropped as soon as a commit point goes through.

use std::sync::Arc;

use combat_core::{
    CombatCommand, CombatConfig, CombatResult, CombatSession, CombatError, CommandOutcome,
    EncounterSetup, EnemyOracle, Phase,
};
use tokio::sync::broadcast;
use tracing::{debug, error, trace};

use crate::error::Result;
use crate::events::{Event, EventBus, Topic};
use crate::snapshot::SessionSnapshot;

/// Default number of undo snapshots kept between commit points.
pub const DEFAULT_HISTORY_LIMIT: usize = 32;

pub struct EncounterHost {
    session: CombatSession,
    oracle: Arc<dyn EnemyOracle>,
    bus: EventBus,
    history: Vec<SessionSnapshot>,
    history_limit: usize,
}

impl EncounterHost {
    pub fn new(config: CombatConfig, oracle: Arc<dyn EnemyOracle>) -> Self {
        Self {
            session: CombatSession::new(config),
            oracle,
            bus: EventBus::new(),
            history: Vec::new(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    /// Publishes to an existing bus instead of a private one.
    pub fn with_bus(mut self, bus: EventBus) -> Self {
        self.bus = bus;
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn session(&self) -> &CombatSession {
        &self.session
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    pub fn result(&self) -> Option<&CombatResult> {
        self.session.result()
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.bus.subscribe(topic)
    }

    pub fn undo_depth(&self) -> usize {
        self.history.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    /// Starts a new encounter.
    ///
    /// # Errors
    ///
    /// Fails with [`crate::RuntimeError::Config`] when the setup cannot be
    /// resolved against the oracle. The running session is left untouched.
    pub fn start(&mut self, setup: EncounterSetup) -> Result<CommandOutcome> {
        let outcome = self
            .session
            .initiate_combat(setup, self.oracle.as_ref())
            .inspect_err(|err| {
                error!(code = err.error_code(), %err, "encounter setup rejected");
            })?;

        if outcome.success {
            self.history.clear();
        }
        self.publish_pending();
        Ok(outcome)
    }

    /// Runs one command and publishes the events it produced.
    ///
    /// A successful reversible command pushes an undo snapshot. A successful
    /// commit point, or any command that moved the phase, clears the history.
    pub fn execute(&mut self, command: &CombatCommand) -> Result<CommandOutcome> {
        let checkpoint = if command.is_commit_point() || self.history_limit == 0 {
            None
        } else {
            Some(SessionSnapshot::capture(&self.session)?)
        };

        let before = self.session.phase();
        let outcome = self.session.execute(command);

        if outcome.success {
            if command.is_commit_point() || outcome.phase != before {
                self.clear_history(before, outcome.phase);
            } else if let Some(checkpoint) = checkpoint {
                if self.history.len() >= self.history_limit {
                    self.history.remove(0);
                }
                self.history.push(checkpoint);
            }
        }

        self.publish_pending();
        Ok(outcome)
    }

    /// Rolls back the most recent reversible command.
    ///
    /// Returns `false` when there is nothing left to undo, either because no
    /// command ran or because a commit point sealed the history.
    pub fn undo(&mut self) -> Result<bool> {
        let Some(snapshot) = self.history.last() else {
            return Ok(false);
        };
        let session = snapshot.restore()?;
        self.history.pop();
        self.session = session;
        debug!(depth = self.history.len(), phase = %self.session.phase(), "command undone");
        Ok(true)
    }

    pub fn snapshot(&self) -> Result<SessionSnapshot> {
        SessionSnapshot::capture(&self.session)
    }

    /// Replaces the session with a previously captured snapshot.
    ///
    /// Undo history from the replaced session is discarded.
    pub fn restore(&mut self, snapshot: &SessionSnapshot) -> Result<()> {
        self.session = snapshot.restore()?;
        self.history.clear();
        debug!(digest = snapshot.digest(), phase = %self.session.phase(), "session restored");
        self.publish_pending();
        Ok(())
    }

    fn clear_history(&mut self, from: Phase, to: Phase) {
        if !self.history.is_empty() {
            debug!(dropped = self.history.len(), %from, %to, "commit point, undo history cleared");
        }
        self.history.clear();
    }

    fn publish_pending(&mut self) {
        for event in self.session.drain_events() {
            trace!(?event, "publishing combat event");
            self.bus.publish(event);
        }
    }
}
