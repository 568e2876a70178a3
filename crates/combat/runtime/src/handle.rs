use tokio::sync::{broadcast, mpsc, oneshot};

use combat_core::{CombatCommand, CombatEvent, CombatState, ExecutionOutcome};

use crate::error::{Result, RuntimeError};
use crate::events::SessionEvent;
use crate::session::SessionSnapshot;
use crate::worker::Command;

/// Client-facing handle to a running session
#[derive(Clone)]
pub struct SessionHandle {
    command_tx: mpsc::Sender<Command>,
    event_tx: broadcast::Sender<SessionEvent>,
}

impl SessionHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<Command>,
        event_tx: broadcast::Sender<SessionEvent>,
    ) -> Self {
        Self {
            command_tx,
            event_tx,
        }
    }

    /// Execute a command.
    ///
    /// After an accepted `EndTurn` the worker paces the enemy turn on its own;
    /// the steps arrive as events and later commands wait until it is done.
    pub async fn execute(&self, command: CombatCommand) -> Result<ExecutionOutcome> {
        let (reply, reply_rx) = oneshot::channel();
        self.send(Command::Execute { command, reply }).await?;
        reply_rx.await.map_err(|_| RuntimeError::WorkerClosed)?
    }

    /// Current state (a clone).
    pub async fn state(&self) -> Result<CombatState> {
        let (reply, reply_rx) = oneshot::channel();
        self.send(Command::QueryState { reply }).await?;
        reply_rx.await.map_err(|_| RuntimeError::WorkerClosed)
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot> {
        let (reply, reply_rx) = oneshot::channel();
        self.send(Command::Snapshot { reply }).await?;
        reply_rx.await.map_err(|_| RuntimeError::WorkerClosed)?
    }

    pub async fn next_wave(&self, event: CombatEvent) -> Result<()> {
        let (reply, reply_rx) = oneshot::channel();
        self.send(Command::NextWave { event, reply }).await?;
        reply_rx.await.map_err(|_| RuntimeError::WorkerClosed)?
    }

    /// Subscribe to session events
    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| RuntimeError::WorkerClosed)
    }
}
