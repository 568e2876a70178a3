//! Session runtime: worker task, handles and enemy-turn pacing.

mod common;

use std::time::Duration;

use combat_core::{CombatCommand, CombatEvent, CombatPhase, EnemyId};
use combat_runtime::{
    CombatRuntime, EnemyTurnDriver, RuntimeConfig, RuntimeError, SessionEvent,
};

fn immediate() -> RuntimeConfig {
    RuntimeConfig {
        enemy_step_delay: Duration::ZERO,
        ..RuntimeConfig::default()
    }
}

fn jab(state: &combat_core::CombatState) -> CombatCommand {
    CombatCommand::play(state.zones.hand[0].instance_id, Some(state.enemies[0].id))
}

#[tokio::test]
async fn end_turn_drives_the_enemy_turn() {
    let runtime = CombatRuntime::start(common::session("drive", "stalker"), immediate());
    let handle = runtime.handle();
    let mut events = handle.subscribe_events();

    let outcome = handle.execute(CombatCommand::end_turn()).await.unwrap();
    assert!(outcome.phase.is_enemy_turn());

    // Queries are served after the enemy turn has been driven.
    let state = handle.state().await.unwrap();
    assert_eq!(state.phase, CombatPhase::PlayerTurn);
    assert_eq!(state.turn, 2);
    assert!(state.player.stats.hp < 40);

    let mut commands = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let SessionEvent::Executed { command, .. } = event {
            commands.push(command);
        }
    }
    assert_eq!(commands.first(), Some(&"end_turn"));
    assert!(commands.len() >= 3);
    assert!(commands[1..].iter().all(|c| *c == "process_enemy_action"));

    drop(handle);
    let session = runtime.shutdown().await.unwrap();
    assert_eq!(session.state(), &state);
    assert_eq!(session.history().len(), commands.len());
}

#[tokio::test]
async fn rejected_commands_reach_the_caller() {
    let runtime = CombatRuntime::start(common::session("reject", "dummy"), immediate());
    let handle = runtime.handle();

    let result = handle
        .execute(CombatCommand::process_enemy_action())
        .await;
    assert!(matches!(result, Err(RuntimeError::Execute(_))));

    let snapshot = handle.snapshot().await.unwrap();
    assert!(snapshot.history.is_empty());

    drop(handle);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn victory_publishes_combat_over_and_allows_next_wave() {
    let runtime = CombatRuntime::start(common::session("waves", "dummy"), immediate());
    let handle = runtime.handle();
    let mut events = runtime.subscribe_events();

    for _ in 0..2 {
        let state = handle.state().await.unwrap();
        handle.execute(jab(&state)).await.unwrap();
    }
    assert_eq!(handle.state().await.unwrap().phase, CombatPhase::Victory);

    let event = CombatEvent {
        enemies: vec![EnemyId::from("dummy")],
        reinforcements: vec![],
    };
    handle.next_wave(event).await.unwrap();

    let mut over = false;
    let mut wave = None;
    while let Ok(event) = events.try_recv() {
        match event {
            SessionEvent::CombatOver { phase, .. } => {
                assert_eq!(phase, CombatPhase::Victory);
                over = true;
            }
            SessionEvent::WaveStarted { wave: number } => wave = Some(number),
            SessionEvent::Executed { .. } => {}
        }
    }
    assert!(over);
    assert_eq!(wave, Some(2));

    let state = handle.state().await.unwrap();
    assert_eq!(state.turn, 1);
    assert_eq!(state.phase, CombatPhase::PlayerTurn);

    drop(handle);
    let session = runtime.shutdown().await.unwrap();
    assert_eq!(session.wave(), 2);
}

#[tokio::test]
async fn shutdown_waits_for_outstanding_handles() {
    let runtime = CombatRuntime::start(common::session("closing", "dummy"), immediate());
    let handle = runtime.handle();
    let shutdown = tokio::spawn(runtime.shutdown());

    tokio::task::yield_now().await;
    assert!(!shutdown.is_finished());
    assert_eq!(handle.state().await.unwrap().turn, 1);

    drop(handle);
    let session = shutdown.await.unwrap().unwrap();
    assert_eq!(session.id(), "closing");
}

#[tokio::test]
async fn driver_steps_until_the_player_is_up() {
    let mut session = common::session("driver", "stalker");
    session.execute(&CombatCommand::end_turn()).unwrap();

    let mut phases = Vec::new();
    let steps = EnemyTurnDriver::new(Duration::from_millis(1))
        .run(&mut session, |outcome| phases.push(outcome.phase.clone()))
        .await
        .unwrap();

    assert_eq!(steps as usize, phases.len());
    assert!(steps >= 2);
    assert_eq!(phases.last(), Some(&CombatPhase::PlayerTurn));
    assert_eq!(session.state().turn, 2);
}

#[tokio::test]
async fn driver_is_a_no_op_outside_the_enemy_turn() {
    let mut session = common::session("idle", "dummy");
    let steps = EnemyTurnDriver::immediate()
        .run(&mut session, |_| panic!("no step expected"))
        .await
        .unwrap();
    assert_eq!(steps, 0);
    assert!(session.history().is_empty());
}
