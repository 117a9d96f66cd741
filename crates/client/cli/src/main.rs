//! Encounter replay client.
//!
//! Usage: `client-cli [ENCOUNTER...]`. With no names every script under
//! `encounters/` is replayed.
mod config;
mod replay;

use anyhow::Result;
use config::CliConfig;
use replay::Replayer;
use runtime::{EventBus, Topic};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = CliConfig::from_env();
    runtime::logging::init(config.log_filter.as_deref())?;

    let bus = EventBus::new();
    let event_logger = spawn_event_logger(&bus);

    let replayer = Replayer::new(&config, bus)?;
    let names = replayer.resolve_names(std::env::args().skip(1).collect())?;

    let mut unfinished = 0;
    for name in &names {
        let summary = replayer.replay(name)?;
        match &summary.result {
            Some(result) => info!(
                encounter = %summary.name,
                outcome = %result.outcome,
                fame = result.fame_gained,
                wounds = result.wounds_received,
                defeated = result.enemies_defeated.len(),
                rejected = summary.rejected,
                "encounter finished"
            ),
            None => {
                unfinished += 1;
                warn!(encounter = %summary.name, rejected = summary.rejected, "script ended mid-combat");
            }
        }
    }

    // Last bus handle; the logger drains and exits once it is gone.
    drop(replayer);
    event_logger.await?;

    info!(replayed = names.len(), unfinished, "replay complete");
    Ok(())
}

/// Logs every published engine event until the bus goes away.
fn spawn_event_logger(bus: &EventBus) -> tokio::task::JoinHandle<()> {
    let mut combat = bus.subscribe(Topic::Combat);
    let mut status = bus.subscribe(Topic::Status);

    tokio::spawn(async move {
        let mut combat_open = true;
        let mut status_open = true;
        while combat_open || status_open {
            tokio::select! {
                event = combat.recv(), if combat_open => match event {
                    Ok(event) => debug!(topic = ?event.topic(), "{:?}", event.combat_event()),
                    Err(err) => combat_open = still_open(err),
                },
                event = status.recv(), if status_open => match event {
                    Ok(event) => debug!(topic = ?event.topic(), "{:?}", event.combat_event()),
                    Err(err) => status_open = still_open(err),
                },
            }
        }
    })
}

fn still_open(err: RecvError) -> bool {
    match err {
        RecvError::Lagged(skipped) => {
            warn!(skipped, "event logger lagged behind");
            true
        }
        RecvError::Closed => false,
    }
}
