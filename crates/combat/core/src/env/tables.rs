//! In-memory template store implementing the data oracles.

use std::collections::BTreeMap;

use super::{
    CardDefinition, CardOracle, ConstructOracle, ConstructTemplate, EnemyOracle, EnemyTemplate,
    CombatEnv, ConfigOracle, Env, RngOracle, StatusOracle, StatusTemplate,
};
use crate::state::{CardId, ConstructId, EnemyId, StatusId};

/// Card, enemy, status and construct tables keyed by id.
#[derive(Clone, Debug, Default)]
pub struct ContentTables {
    cards: BTreeMap<CardId, CardDefinition>,
    enemies: BTreeMap<EnemyId, EnemyTemplate>,
    statuses: BTreeMap<StatusId, StatusTemplate>,
    constructs: BTreeMap<ConstructId, ConstructTemplate>,
}

impl ContentTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_card(mut self, card: CardDefinition) -> Self {
        self.insert_card(card);
        self
    }

    pub fn with_enemy(mut self, enemy: EnemyTemplate) -> Self {
        self.insert_enemy(enemy);
        self
    }

    pub fn with_construct(mut self, construct: ConstructTemplate) -> Self {
        self.insert_construct(construct);
        self
    }

    pub fn insert_card(&mut self, card: CardDefinition) {
        self.cards.insert(card.id.clone(), card);
    }

    pub fn insert_enemy(&mut self, enemy: EnemyTemplate) {
        self.enemies.insert(enemy.id.clone(), enemy);
    }

    pub fn insert_status(&mut self, status: StatusTemplate) {
        self.statuses.insert(status.id, status);
    }

    pub fn insert_construct(&mut self, construct: ConstructTemplate) {
        self.constructs.insert(construct.id.clone(), construct);
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    pub fn enemy_count(&self) -> usize {
        self.enemies.len()
    }

    /// Bundles the tables with config and rng into a [`CombatEnv`].
    pub fn env<'a>(
        &'a self,
        config: &'a dyn ConfigOracle,
        rng: &'a dyn RngOracle,
    ) -> CombatEnv<'a> {
        Env::new(
            Some(self as &dyn CardOracle),
            Some(self as &dyn EnemyOracle),
            Some(self as &dyn StatusOracle),
            Some(self as &dyn ConstructOracle),
            Some(config),
            Some(rng),
        )
    }
}

impl CardOracle for ContentTables {
    fn card(&self, id: &CardId) -> Option<CardDefinition> {
        self.cards.get(id).cloned()
    }

    fn card_ids(&self) -> Vec<CardId> {
        self.cards.keys().cloned().collect()
    }
}

impl EnemyOracle for ContentTables {
    fn enemy(&self, id: &EnemyId) -> Option<EnemyTemplate> {
        self.enemies.get(id).cloned()
    }
}

impl StatusOracle for ContentTables {
    fn status(&self, id: StatusId) -> Option<StatusTemplate> {
        self.statuses.get(&id).cloned()
    }
}

impl ConstructOracle for ContentTables {
    fn construct(&self, id: &ConstructId) -> Option<ConstructTemplate> {
        self.constructs.get(id).cloned()
    }
}
