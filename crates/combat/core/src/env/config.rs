//! Configuration oracle for exposing combat tuning to the engine.

use crate::config::CombatConfig;

/// Provides access to combat tuning values.
pub trait ConfigOracle: Send + Sync {
    fn combat_config(&self) -> &CombatConfig;
}

impl ConfigOracle for CombatConfig {
    fn combat_config(&self) -> &CombatConfig {
        self
    }
}
