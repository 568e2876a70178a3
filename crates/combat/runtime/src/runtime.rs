//! Runtime orchestrator: spawns the session worker and wires its channels.

use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use crate::driver::EnemyTurnDriver;
use crate::error::Result;
use crate::events::SessionEvent;
use crate::handle::SessionHandle;
use crate::session::CombatSession;
use crate::worker::SessionWorker;

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Pause between enemy actions.
    pub enemy_step_delay: Duration,
    pub command_buffer_size: usize,
    pub event_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            enemy_step_delay: EnemyTurnDriver::default().step_delay(),
            command_buffer_size: 32,
            event_buffer_size: 256,
        }
    }
}

/// Runs a [`CombatSession`] on a background task.
///
/// [`SessionHandle`] provides a cloneable façade for clients.
pub struct CombatRuntime {
    handle: SessionHandle,
    worker: JoinHandle<CombatSession>,
}

impl CombatRuntime {
    /// Spawns the worker. Must be called from within a tokio runtime.
    pub fn start(session: CombatSession, config: RuntimeConfig) -> Self {
        let (command_tx, command_rx) = mpsc::channel(config.command_buffer_size);
        let (event_tx, _) = broadcast::channel(config.event_buffer_size);
        let driver = EnemyTurnDriver::new(config.enemy_step_delay);

        let worker = SessionWorker::new(session, command_rx, event_tx.clone(), driver);
        let worker = tokio::spawn(worker.run());

        Self {
            handle: SessionHandle::new(command_tx, event_tx),
            worker,
        }
    }

    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.handle.subscribe_events()
    }

    /// Stops the worker and returns the session.
    ///
    /// Waits until every cloned handle has been dropped.
    pub async fn shutdown(self) -> Result<CombatSession> {
        drop(self.handle);
        Ok(self.worker.await?)
    }
}
