//! Command dispatch through the three-phase transition pipeline.

use crate::action::{CombatCommand, CommandTransition};
use crate::env::CombatEnv;
use crate::state::CombatState;

use super::errors::{ExecuteError, TransitionPhase, TransitionPhaseError};

/// Executes a transition through the three-phase pipeline.
///
/// Phases:
/// 1. `pre_validate` - Check preconditions before mutation
/// 2. `apply` - Mutate the combat state
/// 3. `post_validate` - Verify invariants after mutation
#[inline]
fn drive_transition<T>(
    transition: &T,
    state: &mut CombatState,
    env: &CombatEnv<'_>,
) -> Result<(), TransitionPhaseError<T::Error>>
where
    T: CommandTransition,
{
    transition
        .pre_validate(state, env)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PreValidate, error))?;

    transition
        .apply(state, env)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::Apply, error))?;

    transition
        .post_validate(state, env)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PostValidate, error))
}

/// Routes each command to its transition.
pub(super) fn execute_transition(
    command: &CombatCommand,
    state: &mut CombatState,
    env: &CombatEnv<'_>,
) -> Result<(), ExecuteError> {
    match command {
        CombatCommand::PlayCard(t) => {
            drive_transition(t, state, env).map_err(ExecuteError::PlayCard)
        }
        CombatCommand::EndTurn(t) => drive_transition(t, state, env).map_err(ExecuteError::EndTurn),
        CombatCommand::DiscardCards(t) => {
            drive_transition(t, state, env).map_err(ExecuteError::DiscardCards)
        }
        CombatCommand::ReturnCardsToDeck(t) => {
            drive_transition(t, state, env).map_err(ExecuteError::ReturnCardsToDeck)
        }
        CombatCommand::ChooseCardToGenerate(t) => {
            drive_transition(t, state, env).map_err(ExecuteError::ChooseCard)
        }
        CombatCommand::ChooseEffect(t) => {
            drive_transition(t, state, env).map_err(ExecuteError::ChooseEffect)
        }
        CombatCommand::ChooseTrace(t) => {
            drive_transition(t, state, env).map_err(ExecuteError::ChooseTrace)
        }
        CombatCommand::ProcessEnemyAction(t) => {
            drive_transition(t, state, env).map_err(ExecuteError::ProcessEnemyAction)
        }
        CombatCommand::StartPlayerTurn(t) => {
            drive_transition(t, state, env).map_err(ExecuteError::StartPlayerTurn)
        }
    }
}
