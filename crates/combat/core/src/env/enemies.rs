use crate::action::CardEffect;
use crate::state::{CardId, Combatant, EnemyId, EnemyState, EntityId};

pub trait EnemyOracle: Send + Sync {
    fn enemy(&self, id: &EnemyId) -> Option<EnemyTemplate>;
}

/// Enemy template: stats plus an action pattern of enemy cards.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyTemplate {
    pub id: EnemyId,
    pub name: String,
    pub max_hp: i32,
    pub attack: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub defense: i32,
    /// One entry per round, cycled; each entry lists that round's actions.
    pub pattern: Vec<Vec<CardId>>,
    /// Entropy gained every time an intent is planned.
    #[cfg_attr(feature = "serde", serde(default))]
    pub entropy_per_turn: i32,
    /// Entropy at which `surge` replaces the pattern (0 disables surges).
    #[cfg_attr(feature = "serde", serde(default))]
    pub entropy_threshold: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub surge: Vec<CardId>,
    /// Resolved by the enemy as it dies.
    #[cfg_attr(feature = "serde", serde(default))]
    pub on_death: Option<CardEffect>,
}

impl EnemyTemplate {
    pub fn new(id: impl Into<String>, max_hp: i32, attack: i32) -> Self {
        let id = EnemyId::new(id);
        Self {
            name: id.to_string(),
            id,
            max_hp,
            attack,
            defense: 0,
            pattern: Vec::new(),
            entropy_per_turn: 0,
            entropy_threshold: 0,
            surge: Vec::new(),
            on_death: None,
        }
    }

    pub fn with_pattern(mut self, pattern: Vec<Vec<CardId>>) -> Self {
        self.pattern = pattern;
        self
    }

    pub fn with_defense(mut self, defense: i32) -> Self {
        self.defense = defense;
        self
    }

    pub fn to_enemy(&self, id: EntityId) -> EnemyState {
        EnemyState {
            id,
            template: self.id.clone(),
            name: self.name.clone(),
            stats: Combatant::new(self.max_hp, self.attack, self.defense),
            entropy: 0,
            intent_cursor: 0,
        }
    }
}
