//! Background task that owns the [`CombatSession`].
//!
//! Receives commands from [`SessionHandle`](crate::SessionHandle), executes
//! them, publishes events, and drives the enemy turn after the player ends
//! theirs.

use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::debug;

use combat_core::{CombatCommand, CombatEvent, CombatState, ExecutionOutcome};

use crate::driver::EnemyTurnDriver;
use crate::error::Result;
use crate::events::SessionEvent;
use crate::session::{CombatSession, SessionSnapshot};

/// Commands that can be sent to the session worker
pub(crate) enum Command {
    Execute {
        command: CombatCommand,
        reply: oneshot::Sender<Result<ExecutionOutcome>>,
    },
    QueryState {
        reply: oneshot::Sender<CombatState>,
    },
    Snapshot {
        reply: oneshot::Sender<Result<SessionSnapshot>>,
    },
    NextWave {
        event: CombatEvent,
        reply: oneshot::Sender<Result<()>>,
    },
}

pub(crate) struct SessionWorker {
    session: CombatSession,
    command_rx: mpsc::Receiver<Command>,
    event_tx: broadcast::Sender<SessionEvent>,
    driver: EnemyTurnDriver,
}

impl SessionWorker {
    pub(crate) fn new(
        session: CombatSession,
        command_rx: mpsc::Receiver<Command>,
        event_tx: broadcast::Sender<SessionEvent>,
        driver: EnemyTurnDriver,
    ) -> Self {
        Self {
            session,
            command_rx,
            event_tx,
            driver,
        }
    }

    /// Main worker loop. Ends once every handle is dropped and hands the
    /// session back.
    pub(crate) async fn run(mut self) -> CombatSession {
        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd).await;
        }
        debug!(session = self.session.id(), "session worker stopped");
        self.session
    }

    async fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Execute { command, reply } => {
                let result = self.session.execute(&command).map_err(Into::into);
                if let Ok(outcome) = &result {
                    self.publish_outcome(command.name(), outcome);
                }
                let hand_off = result.is_ok() && self.session.state().phase.is_enemy_turn();
                if reply.send(result).is_err() {
                    debug!("Execute reply channel closed (caller dropped)");
                }
                if hand_off {
                    self.drive_enemy_turn().await;
                }
            }
            Command::QueryState { reply } => {
                if reply.send(self.session.state().clone()).is_err() {
                    debug!("QueryState reply channel closed (caller dropped)");
                }
            }
            Command::Snapshot { reply } => {
                if reply.send(self.session.snapshot()).is_err() {
                    debug!("Snapshot reply channel closed (caller dropped)");
                }
            }
            Command::NextWave { event, reply } => {
                let result = self.session.next_wave(event);
                if result.is_ok() {
                    self.publish(SessionEvent::WaveStarted {
                        wave: self.session.wave(),
                    });
                }
                if reply.send(result).is_err() {
                    debug!("NextWave reply channel closed (caller dropped)");
                }
            }
        }
    }

    async fn drive_enemy_turn(&mut self) {
        let event_tx = self.event_tx.clone();
        let result = self
            .driver
            .run(&mut self.session, |outcome| {
                publish_to(&event_tx, SessionEvent::Executed {
                    command: "process_enemy_action",
                    outcome: outcome.clone(),
                });
            })
            .await;
        match result {
            Ok(_) => {
                if self.session.is_over() {
                    self.publish_over();
                }
            }
            Err(error) => tracing::error!("enemy turn failed: {error}"),
        }
    }

    fn publish_outcome(&self, command: &'static str, outcome: &ExecutionOutcome) {
        self.publish(SessionEvent::Executed {
            command,
            outcome: outcome.clone(),
        });
        if outcome.phase.is_terminal() {
            self.publish_over();
        }
    }

    fn publish_over(&self) {
        let state = self.session.state();
        self.publish(SessionEvent::CombatOver {
            phase: state.phase.clone(),
            turn: state.turn,
        });
    }

    fn publish(&self, event: SessionEvent) {
        publish_to(&self.event_tx, event);
    }
}

fn publish_to(event_tx: &broadcast::Sender<SessionEvent>, event: SessionEvent) {
    // No subscribers is fine.
    let _ = event_tx.send(event);
}
