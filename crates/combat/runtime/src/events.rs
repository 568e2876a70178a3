//! Events broadcast to session subscribers.

use combat_core::{CombatPhase, ExecutionOutcome};

#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    /// A command was accepted.
    Executed {
        command: &'static str,
        outcome: ExecutionOutcome,
    },
    /// The wave ended in victory or defeat.
    CombatOver { phase: CombatPhase, turn: u32 },
    WaveStarted { wave: u32 },
}
