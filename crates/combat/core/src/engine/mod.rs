//! Command execution pipeline and the turn state machine.
//!
//! The [`CombatEngine`] is the authoritative reducer for [`CombatState`]. Every
//! command runs pre_validate → apply → post_validate; when any stage fails the
//! state is restored to its value before the command, so a command either
//! fully resolves or leaves no trace.

mod constructs;
mod errors;
mod setup;
mod ticker;
mod transition;
pub(crate) mod turns;

pub use errors::{ExecuteError, TransitionPhase, TransitionPhaseError};
pub use setup::{CombatEvent, CombatSetup, PlayerLoadout, SetupError};

use crate::action::CombatCommand;
use crate::env::CombatEnv;
use crate::error::GameError;
use crate::state::{CombatPhase, CombatState, LogEntry};

/// Outcome of a successfully executed command.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExecutionOutcome {
    /// Phase after the command.
    pub phase: CombatPhase,
    /// Narration entries appended by this command.
    pub log: Vec<LogEntry>,
}

/// Combat engine that routes commands through the transition pipeline.
pub struct CombatEngine<'a> {
    state: &'a mut CombatState,
}

impl<'a> CombatEngine<'a> {
    pub fn new(state: &'a mut CombatState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &CombatState {
        self.state
    }

    /// Executes one command.
    ///
    /// Commands that do not fit the current phase are rejected with
    /// [`TransitionPhase::PreValidate`]. On any error the state is rolled back.
    pub fn execute(
        &mut self,
        env: CombatEnv<'_>,
        command: &CombatCommand,
    ) -> Result<ExecutionOutcome, ExecuteError> {
        let before = self.state.clone();
        let first_new_entry = self.state.log.len();

        match transition::execute_transition(command, self.state, &env) {
            Ok(()) => {
                let log = self.state.log.entries()[first_new_entry..].to_vec();
                if self.state.phase.name() != before.phase.name() {
                    tracing::debug!(
                        command = command.name(),
                        from = before.phase.name(),
                        to = self.state.phase.name(),
                        "phase changed"
                    );
                }
                if self.state.phase.is_terminal() && !before.phase.is_terminal() {
                    tracing::info!(turn = self.state.turn, outcome = self.state.phase.name(), "combat over");
                }
                Ok(ExecutionOutcome {
                    phase: self.state.phase.clone(),
                    log,
                })
            }
            Err(error) => {
                if error.severity().is_internal() {
                    tracing::warn!(command = command.name(), code = error.error_code(), "{error}");
                } else {
                    tracing::debug!(command = command.name(), code = error.error_code(), "{error}");
                }
                *self.state = before;
                Err(error)
            }
        }
    }
}
