//! Enemy template loader.

use std::path::Path;

use combat_core::EnemyTemplate;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, ensure_unique, read_file, ron_options};

/// Enemy catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyCatalog {
    pub enemies: Vec<EnemyTemplate>,
}

/// Loader for enemy templates from RON files.
pub struct EnemyLoader;

impl EnemyLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<EnemyTemplate>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<EnemyTemplate>> {
        let catalog: EnemyCatalog = ron_options()
            .from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse enemy catalog RON: {}", e))?;

        ensure_unique("enemy", catalog.enemies.iter().map(|e| e.id.as_str()))?;
        for enemy in &catalog.enemies {
            if enemy.max_hp <= 0 {
                anyhow::bail!("Enemy '{}' must have positive max_hp", enemy.id);
            }
        }
        Ok(catalog.enemies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::CardId;

    #[test]
    fn parses_patterns_and_surges() {
        let ron = r#"(enemies: [
            (
                id: "warden",
                name: "Warden",
                max_hp: 80,
                attack: 7,
                pattern: [["slam"], ["guard", "slam"]],
                entropy_per_turn: 2,
                entropy_threshold: 6,
                surge: ["overload"],
                on_death: (apply_status: [(status: weak, duration: 2)]),
            ),
        ])"#;

        let enemies = EnemyLoader::parse(ron).unwrap();
        let warden = &enemies[0];
        assert_eq!(warden.defense, 0);
        assert_eq!(warden.pattern[1], vec![CardId::from("guard"), CardId::from("slam")]);
        assert_eq!(warden.surge, vec![CardId::from("overload")]);
        assert!(warden.on_death.is_some());
    }

    #[test]
    fn non_positive_hp_is_rejected() {
        let ron = r#"(enemies: [(id: "ghost", name: "Ghost", max_hp: 0, attack: 1, pattern: [])])"#;
        assert!(EnemyLoader::parse(ron).is_err());
    }
}
