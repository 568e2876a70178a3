//! Headless combat simulator.
//!
//! Loads content from a data directory, runs one encounter with a simple
//! autoplayer (first card that the engine accepts, otherwise end turn) and
//! prints the narration log.
//!
//! Environment:
//! - `COMBAT_DATA_DIR`: content directory (default: the bundled data)
//! - `COMBAT_ENCOUNTER`: encounter name under `encounters/` (default: `training`)
//! - `COMBAT_STEP_DELAY_MS`: pause between enemy actions (default: 0)
//! - `COMBAT_MAX_COMMANDS`: safety cap on issued commands (default: 2000)
//! - `COMBAT_SAVE_DIR`: when set, the final snapshot is saved there
//! - `RUST_LOG`: tracing filter

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use combat_content::ContentFactory;
use combat_core::{CombatCommand, CombatPhase, CombatState, GameError};
use combat_runtime::{
    CombatRuntime, CombatSession, FileRepository, RuntimeConfig, RuntimeError, SessionEvent,
    SessionHandle, SessionRepository,
};
use tokio::sync::broadcast::error::RecvError;

struct SimConfig {
    data_dir: PathBuf,
    encounter: String,
    step_delay: Duration,
    max_commands: usize,
    save_dir: Option<PathBuf>,
}

impl SimConfig {
    fn from_env() -> Self {
        let var = |key: &str| std::env::var(key).ok().filter(|v| !v.is_empty());
        Self {
            data_dir: var("COMBAT_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| {
                    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../content/data"))
                }),
            encounter: var("COMBAT_ENCOUNTER").unwrap_or_else(|| "training".to_string()),
            step_delay: Duration::from_millis(
                var("COMBAT_STEP_DELAY_MS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(0),
            ),
            max_commands: var("COMBAT_MAX_COMMANDS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(2000),
            save_dir: var("COMBAT_SAVE_DIR").map(PathBuf::from),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = SimConfig::from_env();
    let factory = ContentFactory::new(config.data_dir.clone());
    let tables = factory
        .load_tables()
        .with_context(|| format!("loading content from {}", config.data_dir.display()))?;
    let combat_config = factory.load_config().context("loading config.toml")?;
    let setup = factory
        .load_encounter(&config.encounter)
        .with_context(|| format!("loading encounter '{}'", config.encounter))?;

    let session = CombatSession::start(
        config.encounter.clone(),
        Arc::new(tables),
        combat_config,
        setup,
    )?;
    print_log(session.state());

    let runtime = CombatRuntime::start(
        session,
        RuntimeConfig {
            enemy_step_delay: config.step_delay,
            ..RuntimeConfig::default()
        },
    );
    let printer = tokio::spawn(print_events(runtime.subscribe_events()));

    let handle = runtime.handle();
    let issued = autoplay(&handle, config.max_commands).await?;
    drop(handle);

    let session = runtime.shutdown().await?;
    printer.await?;

    let state = session.state();
    println!();
    println!(
        "Result: {} on turn {} after {} commands (player hp {}/{})",
        state.phase.name(),
        state.turn,
        issued,
        state.player.stats.hp,
        state.player.stats.max_hp
    );

    if let Some(dir) = &config.save_dir {
        let repository = FileRepository::new(dir)?;
        let snapshot = session.snapshot()?;
        repository.save(&snapshot)?;
        println!("Snapshot saved to {} ({})", dir.display(), snapshot.digest);
    }
    Ok(())
}

/// Plays until the combat ends or the command cap is hit.
async fn autoplay(handle: &SessionHandle, max_commands: usize) -> Result<usize> {
    let mut issued = 0;
    while issued < max_commands {
        let state = handle.state().await?;
        let command = match &state.phase {
            CombatPhase::Victory | CombatPhase::Defeat => break,
            CombatPhase::PlayerTurn => match play_first_accepted(handle, &state).await? {
                true => {
                    issued += 1;
                    continue;
                }
                false => CombatCommand::end_turn(),
            },
            CombatPhase::EnemyTurn { .. } => CombatCommand::process_enemy_action(),
            CombatPhase::AwaitingDiscard(pending) => {
                CombatCommand::discard(first_hand_cards(&state, pending.count))
            }
            CombatPhase::AwaitingReturnToDeck { count } => {
                CombatCommand::return_to_deck(first_hand_cards(&state, *count))
            }
            CombatPhase::AwaitingCardChoice(pending) => match pending.options.first() {
                Some(card) => CombatCommand::choose_card(card.clone()),
                None => anyhow::bail!("card choice without options"),
            },
            CombatPhase::AwaitingEffectChoice { .. } => CombatCommand::choose_effect(0),
            CombatPhase::AwaitingTraceChoice { candidates, .. } => match candidates.first() {
                Some(card) => CombatCommand::choose_trace(*card),
                None => anyhow::bail!("trace choice without candidates"),
            },
        };
        handle.execute(command).await?;
        issued += 1;
    }
    Ok(issued)
}

/// Tries each hand card against the first alive enemy; rejected plays leave
/// no trace.
async fn play_first_accepted(handle: &SessionHandle, state: &CombatState) -> Result<bool> {
    let target = state.alive_enemy_ids().first().copied();
    for card in &state.zones.hand {
        match handle
            .execute(CombatCommand::play(card.instance_id, target))
            .await
        {
            Ok(_) => return Ok(true),
            Err(RuntimeError::Execute(error)) => {
                tracing::debug!(card = %card.card_id, code = error.error_code(), "play rejected: {error}");
            }
            Err(other) => return Err(other.into()),
        }
    }
    Ok(false)
}

fn first_hand_cards(state: &CombatState, count: usize) -> Vec<combat_core::CardInstanceId> {
    state
        .zones
        .hand
        .iter()
        .take(count)
        .map(|c| c.instance_id)
        .collect()
}

async fn print_events(mut events: tokio::sync::broadcast::Receiver<SessionEvent>) {
    loop {
        match events.recv().await {
            Ok(SessionEvent::Executed { outcome, .. }) => {
                for entry in &outcome.log {
                    println!("[turn {:>2}] {}", entry.turn, entry.message);
                }
            }
            Ok(SessionEvent::CombatOver { phase, turn }) => {
                println!("=== {} on turn {} ===", phase.name(), turn);
            }
            Ok(SessionEvent::WaveStarted { wave }) => println!("=== wave {wave} ==="),
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "event printer fell behind");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

fn print_log(state: &CombatState) {
    for entry in state.log.entries() {
        println!("[turn {:>2}] {}", entry.turn, entry.message);
    }
}
