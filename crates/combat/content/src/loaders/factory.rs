//! Content factory for building oracles from data files.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use combat_core::{
    CardDefinition, CardId, CombatConfig, CombatSetup, ConstructTemplate,
    ContentTables, EnemyTemplate, StatusTemplate,
};

use crate::loaders::{
    CardLoader, ConfigLoader, ConstructLoader, EncounterLoader, EnemyLoader, LoadResult,
    StatusLoader,
};

/// Content factory that loads all combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── cards.ron
/// ├── enemies.ron
/// ├── constructs.ron
/// ├── statuses.ron
/// └── encounters/
///     └── training.ron
/// ```
///
/// `constructs.ron` and `statuses.ron` are optional.
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load combat configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    pub fn load_cards(&self) -> LoadResult<Vec<CardDefinition>> {
        CardLoader::load(&self.data_dir.join("cards.ron"))
    }

    pub fn load_enemies(&self) -> LoadResult<Vec<EnemyTemplate>> {
        EnemyLoader::load(&self.data_dir.join("enemies.ron"))
    }

    pub fn load_constructs(&self) -> LoadResult<Vec<ConstructTemplate>> {
        let path = self.data_dir.join("constructs.ron");
        if !path.exists() {
            return Ok(Vec::new());
        }
        ConstructLoader::load(&path)
    }

    pub fn load_statuses(&self) -> LoadResult<Vec<StatusTemplate>> {
        let path = self.data_dir.join("statuses.ron");
        if !path.exists() {
            return Ok(Vec::new());
        }
        StatusLoader::load(&path)
    }

    /// Load every catalog into one [`ContentTables`].
    ///
    /// Dangling references (an enemy pattern naming an unknown card, a deploy
    /// of an unknown construct) are reported with `warn!`; the engine skips
    /// them at resolution time.
    pub fn load_tables(&self) -> LoadResult<ContentTables> {
        let cards = self.load_cards()?;
        let enemies = self.load_enemies()?;
        let constructs = self.load_constructs()?;
        let statuses = self.load_statuses()?;

        for dangling in dangling_references(&cards, &enemies, &constructs) {
            tracing::warn!("{dangling}");
        }

        let mut tables = ContentTables::new();
        for card in cards {
            tables.insert_card(card);
        }
        for enemy in enemies {
            tables.insert_enemy(enemy);
        }
        for construct in constructs {
            tables.insert_construct(construct);
        }
        for status in statuses {
            tables.insert_status(status);
        }
        tracing::info!(
            cards = tables.card_count(),
            enemies = tables.enemy_count(),
            data_dir = %self.data_dir.display(),
            "content loaded"
        );
        Ok(tables)
    }

    /// Load an encounter from `encounters/{name}.ron`.
    pub fn load_encounter(&self, name: &str) -> LoadResult<CombatSetup> {
        let path = self
            .data_dir
            .join("encounters")
            .join(format!("{}.ron", name));
        EncounterLoader::load(&path)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

/// Describes every card or construct id referenced but not defined.
fn dangling_references(
    cards: &[CardDefinition],
    enemies: &[EnemyTemplate],
    constructs: &[ConstructTemplate],
) -> Vec<String> {
    let card_ids: BTreeSet<&str> = cards.iter().map(|c| c.id.as_str()).collect();
    let construct_ids: BTreeSet<&str> = constructs.iter().map(|c| c.id.as_str()).collect();
    let mut dangling = Vec::new();

    let mut check_card = |owner: &str, id: &CardId| {
        if !card_ids.contains(id.as_str()) {
            dangling.push(format!("{owner} references unknown card '{id}'"));
        }
    };
    for enemy in enemies {
        for id in enemy.pattern.iter().flatten().chain(&enemy.surge) {
            check_card(enemy.id.as_str(), id);
        }
    }
    for card in cards {
        for effect in std::iter::once(&card.effect).chain(&card.on_discard) {
            if let Some(cards) = &effect.cards {
                for id in cards
                    .add_to_hand
                    .iter()
                    .chain(&cards.add_to_deck)
                    .chain(&cards.add_to_discard)
                {
                    check_card(card.id.as_str(), id);
                }
            }
        }
    }

    let deploys = cards
        .iter()
        .map(|c| (c.id.as_str(), &c.effect))
        .chain(
            enemies
                .iter()
                .filter_map(|e| e.on_death.as_ref().map(|effect| (e.id.as_str(), effect))),
        );
    for (owner, effect) in deploys {
        if let Some(construct) = &effect.deploy
            && !construct_ids.contains(construct.as_str())
        {
            dangling.push(format!("{owner} deploys unknown construct '{construct}'"));
        }
    }
    dangling
}
