//! Combatants: the player, enemies and constructs share [`Combatant`] stats.

use super::{ConstructId, EnemyId, EntityId, EquipmentBonuses, StatusEffects};

/// Stat block shared by every combatant.
///
/// `hp` is clamped to `0..=max_hp` and `block` is never negative.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub hp: i32,
    pub max_hp: i32,
    /// Transient absorption consumed before HP loss.
    pub block: i32,
    /// Flat reduction applied after block.
    pub defense: i32,
    pub attack: i32,
    pub status_effects: StatusEffects,
}

impl Combatant {
    pub fn new(max_hp: i32, attack: i32, defense: i32) -> Self {
        let max_hp = max_hp.max(1);
        Self {
            hp: max_hp,
            max_hp,
            block: 0,
            defense: defense.max(0),
            attack: attack.max(0),
            status_effects: StatusEffects::empty(),
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Removes HP directly (block and defense are not consulted).
    ///
    /// Returns the HP actually lost.
    pub fn lose_hp(&mut self, amount: i32) -> i32 {
        if amount <= 0 {
            return 0;
        }
        let before = self.hp;
        self.hp = (self.hp - amount).max(0);
        before - self.hp
    }

    /// Restores HP up to `max_hp` and returns the amount healed.
    pub fn heal(&mut self, amount: i32) -> i32 {
        if amount <= 0 || !self.is_alive() {
            return 0;
        }
        let before = self.hp;
        self.hp = (self.hp + amount).min(self.max_hp);
        self.hp - before
    }

    pub fn gain_block(&mut self, amount: i32) {
        self.block = (self.block + amount.max(0)).max(0);
    }

    /// Absorbs up to `amount` with block and returns what was left over.
    pub fn absorb(&mut self, amount: i32) -> i32 {
        let absorbed = amount.min(self.block).max(0);
        self.block -= absorbed;
        amount - absorbed
    }

    /// Fraction of max HP remaining, in `0.0..=1.0`.
    pub fn hp_ratio(&self) -> f64 {
        f64::from(self.hp) / f64::from(self.max_hp.max(1))
    }
}

/// The player combatant and its per-combat resources.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerState {
    /// `stats.block` is the player's shared block pool.
    pub stats: Combatant,
    pub cp: i32,
    pub max_cp: i32,
    pub charge: u32,
    pub entropy: u32,
    /// Base block granted per unit of block multiplier.
    pub block_power: i32,
    pub equipment: EquipmentBonuses,
}

impl PlayerState {
    pub fn new(stats: Combatant, max_cp: i32, block_power: i32) -> Self {
        Self {
            stats,
            cp: max_cp,
            max_cp,
            charge: 0,
            entropy: 0,
            block_power,
            equipment: EquipmentBonuses::default(),
        }
    }

    pub fn with_equipment(mut self, equipment: EquipmentBonuses) -> Self {
        self.equipment = equipment;
        self
    }
}

/// An enemy on the field. Dead enemies stay in the list for stable ordering.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyState {
    pub id: EntityId,
    pub template: EnemyId,
    pub name: String,
    pub stats: Combatant,
    /// Enemy entropy meter; a surge fires once it crosses the template threshold.
    pub entropy: i32,
    /// Position in the template's action pattern.
    pub intent_cursor: usize,
}

impl EnemyState {
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.stats.is_alive()
    }
}

/// Who a construct fights for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Owner {
    Player,
    Enemy(EntityId),
}

impl Owner {
    pub fn entity(self) -> EntityId {
        match self {
            Self::Player => EntityId::PLAYER,
            Self::Enemy(id) => id,
        }
    }
}

/// A summoned unit with its own HP and a limited lifetime.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstructState {
    pub id: EntityId,
    pub template: ConstructId,
    pub name: String,
    pub owner: Owner,
    pub stats: Combatant,
    /// Turns left before the construct expires.
    pub durability: i32,
    /// Target snapshot taken at deploy time.
    pub target: Option<EntityId>,
}

impl ConstructState {
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.stats.is_alive()
    }

    pub fn is_player_owned(&self) -> bool {
        self.owner == Owner::Player
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hp_is_clamped_both_ways() {
        let mut stats = Combatant::new(20, 5, 0);
        assert_eq!(stats.lose_hp(25), 20);
        assert_eq!(stats.hp, 0);
        assert_eq!(stats.heal(10), 0, "dead combatants are not healed");

        let mut stats = Combatant::new(20, 5, 0);
        stats.lose_hp(5);
        assert_eq!(stats.heal(50), 5);
        assert_eq!(stats.hp, 20);
    }

    #[test]
    fn absorb_consumes_block_first() {
        let mut stats = Combatant::new(20, 5, 0);
        stats.gain_block(10);
        assert_eq!(stats.absorb(4), 0);
        assert_eq!(stats.block, 6);
        assert_eq!(stats.absorb(10), 4);
        assert_eq!(stats.block, 0);
    }
}
