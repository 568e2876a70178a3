//! Turn-advancing commands.

use crate::action::execute::EffectContext;
use crate::action::{CommandError, CommandTransition};
use crate::engine::turns;
use crate::env::CombatEnv;
use crate::state::CombatState;

/// Ends the player turn and hands control to the enemies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EndTurnCommand;

impl CommandTransition for EndTurnCommand {
    type Error = CommandError;

    fn pre_validate(&self, state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        if state.phase.is_player_turn() {
            Ok(())
        } else {
            Err(CommandError::wrong_phase("player_turn", &state.phase))
        }
    }

    fn apply(&self, state: &mut CombatState, env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        let mut ctx = EffectContext::new(state, *env)?;
        turns::end_turn(&mut ctx);
        Ok(())
    }
}

/// Resolves the next queued enemy action (engine-driven).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProcessEnemyActionCommand;

impl CommandTransition for ProcessEnemyActionCommand {
    type Error = CommandError;

    fn pre_validate(&self, state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        if state.phase.is_enemy_turn() {
            Ok(())
        } else {
            Err(CommandError::wrong_phase("enemy_turn", &state.phase))
        }
    }

    fn apply(&self, state: &mut CombatState, env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        let mut ctx = EffectContext::new(state, *env)?;
        turns::process_enemy_step(&mut ctx);
        Ok(())
    }
}

/// Starts the next player turn once every enemy has acted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StartPlayerTurnCommand;

impl CommandTransition for StartPlayerTurnCommand {
    type Error = CommandError;

    fn pre_validate(&self, state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        if !state.phase.is_enemy_turn() {
            return Err(CommandError::wrong_phase("enemy_turn", &state.phase));
        }
        if !turns::enemy_turn_finished(state) {
            return Err(CommandError::EnemyTurnNotFinished);
        }
        Ok(())
    }

    fn apply(&self, state: &mut CombatState, env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        let mut ctx = EffectContext::new(state, *env)?;
        turns::finish_enemy_turn(&mut ctx);
        Ok(())
    }
}
