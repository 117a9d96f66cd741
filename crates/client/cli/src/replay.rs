//! Replays encounter scripts through an [`EncounterHost`].

use std::sync::Arc;

use anyhow::{Context, Result};
use combat_content::{ContentFactory, EncounterScript, EnemyCatalog};
use combat_core::{CombatConfig, CombatResult};
use runtime::{EncounterHost, EventBus, SnapshotStore};
use tracing::{info, warn};

use crate::config::CliConfig;

pub struct Replayer {
    factory: ContentFactory,
    catalog: Arc<EnemyCatalog>,
    config: CombatConfig,
    bus: EventBus,
    store: Option<SnapshotStore>,
    undo_limit: usize,
}

/// What one replayed script produced.
pub struct ReplaySummary {
    pub name: String,
    pub rejected: usize,
    pub result: Option<CombatResult>,
}

impl Replayer {
    pub fn new(config: &CliConfig, bus: EventBus) -> Result<Self> {
        let factory = ContentFactory::new(&config.data_dir);
        let catalog = factory
            .load_enemies()
            .with_context(|| format!("loading enemies from {}", config.data_dir.display()))?;
        let combat_config = factory.load_config()?;
        let store = config
            .snapshot_dir
            .as_ref()
            .map(SnapshotStore::new)
            .transpose()?;

        info!(
            enemies = catalog.len(),
            data_dir = %config.data_dir.display(),
            "content loaded"
        );

        Ok(Self {
            factory,
            catalog: Arc::new(catalog),
            config: combat_config,
            bus,
            store,
            undo_limit: config.undo_limit,
        })
    }

    /// Script names to replay: the requested ones, or every shipped script.
    pub fn resolve_names(&self, requested: Vec<String>) -> Result<Vec<String>> {
        if requested.is_empty() {
            self.factory.encounter_names()
        } else {
            Ok(requested)
        }
    }

    pub fn replay(&self, name: &str) -> Result<ReplaySummary> {
        let script = self.factory.load_encounter(name)?;
        let setup = script.setup(&*self.catalog)?;

        let mut host = EncounterHost::new(self.config.clone(), self.catalog.clone())
            .with_bus(self.bus.clone())
            .with_history_limit(self.undo_limit);

        let outcome = host.start(setup)?;
        info!(encounter = %script.name, key = outcome.message, "encounter started");

        let rejected = run_commands(&mut host, &script)?;

        if let Some(store) = &self.store {
            let path = store.save(name, &host.snapshot()?)?;
            info!(encounter = %script.name, path = %path.display(), "final snapshot saved");
        }

        Ok(ReplaySummary {
            name: script.name.clone(),
            rejected,
            result: host.result().cloned(),
        })
    }
}

fn run_commands(host: &mut EncounterHost, script: &EncounterScript) -> Result<usize> {
    let mut rejected = 0;
    for (step, command) in script.commands.iter().enumerate() {
        let outcome = host.execute(command)?;
        if outcome.success {
            info!(step, phase = %outcome.phase, key = outcome.message, "{} applied", command.kind());
        } else {
            rejected += 1;
            warn!(
                step,
                phase = %outcome.phase,
                key = outcome.message,
                error = ?outcome.error,
                "{} rejected",
                command.kind()
            );
        }
    }
    Ok(rejected)
}
