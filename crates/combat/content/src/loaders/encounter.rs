//! Encounter loader: player loadout, enemy roster and seed.

use std::path::Path;

use combat_core::CombatSetup;

use crate::loaders::{LoadResult, read_file, ron_options};

/// Loader for encounter files (a serialized [`CombatSetup`]).
pub struct EncounterLoader;

impl EncounterLoader {
    pub fn load(path: &Path) -> LoadResult<CombatSetup> {
        let content = read_file(path)?;
        let setup: CombatSetup = ron_options()
            .from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse encounter RON: {}", e))?;

        if setup.event.enemies.is_empty() {
            anyhow::bail!("Encounter {} has no enemies", path.display());
        }
        Ok(setup)
    }
}
