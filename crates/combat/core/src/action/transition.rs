use crate::env::CombatEnv;
use crate::state::{CombatState, InvariantViolation};

/// Defines how a concrete command mutates the combat state.
///
/// `pre_validate` must reject every command that cannot be fully applied, so
/// a rejected command never touches the state. All hooks receive read-only
/// access to the static data through `env`.
pub trait CommandTransition {
    type Error: From<InvariantViolation>;

    /// Validates pre-conditions using the state **before** mutation.
    fn pre_validate(&self, _state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Applies the command. Implementations may assume `pre_validate` passed.
    fn apply(&self, state: &mut CombatState, env: &CombatEnv<'_>) -> Result<(), Self::Error>;

    /// Validates post-conditions using the state **after** mutation.
    fn post_validate(&self, state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        state.check_invariants().map_err(Self::Error::from)
    }
}
