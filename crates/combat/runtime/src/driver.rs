//! Paced enemy-turn driver.
//!
//! The engine resolves one enemy action per `ProcessEnemyAction`; the driver
//! issues them with a delay in between so the presentation can animate each
//! step. The delay only affects scheduling, never the outcome.

use std::time::Duration;

use combat_core::{CombatCommand, ExecuteError, ExecutionOutcome};

use crate::session::CombatSession;

#[derive(Clone, Copy, Debug)]
pub struct EnemyTurnDriver {
    step_delay: Duration,
}

impl Default for EnemyTurnDriver {
    fn default() -> Self {
        Self::new(Duration::from_millis(400))
    }
}

impl EnemyTurnDriver {
    pub fn new(step_delay: Duration) -> Self {
        Self { step_delay }
    }

    /// A driver that never sleeps.
    pub fn immediate() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn step_delay(&self) -> Duration {
        self.step_delay
    }

    /// Steps the enemy turn until the player is up again or the combat ends.
    ///
    /// Returns the number of steps taken.
    pub async fn run(
        &self,
        session: &mut CombatSession,
        mut on_step: impl FnMut(&ExecutionOutcome),
    ) -> Result<u32, ExecuteError> {
        let mut steps = 0;
        while session.state().phase.is_enemy_turn() {
            if steps > 0 && !self.step_delay.is_zero() {
                tokio::time::sleep(self.step_delay).await;
            }
            let outcome = session.execute(&CombatCommand::process_enemy_action())?;
            on_step(&outcome);
            steps += 1;
        }
        tracing::debug!(steps, phase = session.state().phase.name(), "enemy turn driven");
        Ok(steps)
    }
}
