use crate::action::CardEffect;
use crate::state::{Combatant, ConstructId, ConstructState, EntityId, Owner};

pub trait ConstructOracle: Send + Sync {
    fn construct(&self, id: &ConstructId) -> Option<ConstructTemplate>;
}

/// Construct template. Stats are multiples of the owner's stats at deploy time.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstructTemplate {
    pub id: ConstructId,
    pub name: String,
    pub hp_multiplier: f64,
    pub attack_multiplier: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub defense_multiplier: f64,
    pub durability: i32,
    /// Resolved by the construct at the end of its owner's turn.
    #[cfg_attr(feature = "serde", serde(default))]
    pub on_turn_end: Option<CardEffect>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub on_destroy: Option<CardEffect>,
}

impl ConstructTemplate {
    pub fn new(id: impl Into<String>, hp_multiplier: f64, attack_multiplier: f64) -> Self {
        let id = ConstructId::new(id);
        Self {
            name: id.to_string(),
            id,
            hp_multiplier,
            attack_multiplier,
            defense_multiplier: 0.0,
            durability: 3,
            on_turn_end: None,
            on_destroy: None,
        }
    }

    pub fn to_construct(
        &self,
        id: EntityId,
        owner: Owner,
        owner_stats: &Combatant,
        target: Option<EntityId>,
    ) -> ConstructState {
        let scale = |value: i32, multiplier: f64| (f64::from(value) * multiplier).round() as i32;
        ConstructState {
            id,
            template: self.id.clone(),
            name: self.name.clone(),
            owner,
            stats: Combatant::new(
                scale(owner_stats.max_hp, self.hp_multiplier),
                scale(owner_stats.attack, self.attack_multiplier),
                scale(owner_stats.defense, self.defense_multiplier),
            ),
            durability: self.durability.max(1),
            target,
        }
    }
}
