//! Authoritative combat state representation.
//!
//! [`CombatState`] is the aggregate root for one encounter. The presentation
//! layer reads it; all mutation flows through [`CombatEngine`](crate::engine::CombatEngine).
mod card;
mod common;
mod entity;
mod equipment;
mod log;
mod phase;
mod status;

use std::collections::{BTreeMap, VecDeque};

use arrayvec::ArrayVec;

pub use card::{CardKeywords, CardType, CardZones, CombatCard, LastPlayed, Rarity, Zone};
pub use common::{CardId, CardInstanceId, ConstructId, EnemyId, EntityId};
pub use entity::{Combatant, ConstructState, EnemyState, Owner, PlayerState};
pub use equipment::{EquipmentBonuses, Milestone, ProcChance};
pub use log::{AnimationKind, AnimationTrigger, CombatLog, LogEntry, LogKind};
pub use phase::{CombatPhase, PendingCardChoice, PendingDiscard};
pub use status::{
    PERMANENT_DURATION, StatusData, StatusEffect, StatusEffects, StatusId, StatusKind,
};

use crate::config::CombatConfig;
use crate::env::{RngOracle, compute_seed};
use crate::error::{ErrorSeverity, GameError};

/// Constructs on the field, bounded by [`CombatConfig::MAX_CONSTRUCTS`].
pub type Constructs = ArrayVec<ConstructState, { CombatConfig::MAX_CONSTRUCTS }>;

/// Per-turn bookkeeping, reset at the start of every player turn.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnCounters {
    pub cards_played: u32,
    pub debuffs_applied: u32,
    pub damage_taken: i32,
    pub first_attack_played: bool,
    pub first_discard_done: bool,
    pub bleed_damage_dealt: i32,
}

/// Cards and constructs carried from a won wave into the next one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterimCombatState {
    pub zones: CardZones,
    pub constructs: Vec<ConstructState>,
}

/// Canonical state of a single combat encounter.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatState {
    /// Base seed for every random draw in this encounter.
    pub seed: u64,
    /// Number of random values drawn so far.
    pub rng_cursor: u64,

    /// Sequential entity id allocator. 0 is reserved for the player.
    next_entity_id: u32,
    next_instance_id: u32,

    pub turn: u32,
    pub phase: CombatPhase,

    pub player: PlayerState,
    /// Turn-resolution order. Dead enemies stay so indices remain stable.
    pub enemies: Vec<EnemyState>,
    pub constructs: Constructs,
    pub zones: CardZones,

    pub counters: TurnCounters,
    pub last_played: Option<LastPlayed>,
    /// Plays per card template this combat (drives escalating costs).
    pub plays_by_card: BTreeMap<CardId, u32>,

    /// Actions each enemy will take this round, planned at player-turn start.
    pub enemy_actions: BTreeMap<EntityId, Vec<CardId>>,
    /// Enemies waiting to join once a slot opens up.
    pub reinforcements: VecDeque<EnemyId>,

    pub animation_triggers: BTreeMap<EntityId, AnimationTrigger>,
    animation_key: u64,
    pub log: CombatLog,
}

impl CombatState {
    pub fn new(seed: u64, player: PlayerState) -> Self {
        Self {
            seed,
            rng_cursor: 0,
            next_entity_id: 1,
            next_instance_id: 1,
            turn: 0,
            phase: CombatPhase::PlayerTurn,
            player,
            enemies: Vec::new(),
            constructs: ArrayVec::new(),
            zones: CardZones::default(),
            counters: TurnCounters::default(),
            last_played: None,
            plays_by_card: BTreeMap::new(),
            enemy_actions: BTreeMap::new(),
            reinforcements: VecDeque::new(),
            animation_triggers: BTreeMap::new(),
            animation_key: 0,
            log: CombatLog::default(),
        }
    }

    // ========================================================================
    // Allocators
    // ========================================================================

    pub fn allocate_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_entity_id);
        self.next_entity_id += 1;
        id
    }

    pub fn allocate_instance_id(&mut self) -> CardInstanceId {
        let id = CardInstanceId(self.next_instance_id);
        self.next_instance_id += 1;
        id
    }

    /// Creates a card instance with a fresh id.
    pub fn new_card(&mut self, card_id: CardId) -> CombatCard {
        let instance_id = self.allocate_instance_id();
        CombatCard::new(instance_id, card_id)
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    pub fn enemy(&self, id: EntityId) -> Option<&EnemyState> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn enemy_mut(&mut self, id: EntityId) -> Option<&mut EnemyState> {
        self.enemies.iter_mut().find(|e| e.id == id)
    }

    pub fn construct(&self, id: EntityId) -> Option<&ConstructState> {
        self.constructs.iter().find(|c| c.id == id)
    }

    pub fn construct_mut(&mut self, id: EntityId) -> Option<&mut ConstructState> {
        self.constructs.iter_mut().find(|c| c.id == id)
    }

    pub fn alive_enemies(&self) -> impl Iterator<Item = &EnemyState> {
        self.enemies.iter().filter(|e| e.is_alive())
    }

    pub fn alive_enemy_ids(&self) -> Vec<EntityId> {
        self.alive_enemies().map(|e| e.id).collect()
    }

    /// Stats of any combatant by id.
    pub fn combatant(&self, id: EntityId) -> Option<&Combatant> {
        if id.is_player() {
            return Some(&self.player.stats);
        }
        self.enemy(id)
            .map(|e| &e.stats)
            .or_else(|| self.construct(id).map(|c| &c.stats))
    }

    pub fn combatant_mut(&mut self, id: EntityId) -> Option<&mut Combatant> {
        if id.is_player() {
            return Some(&mut self.player.stats);
        }
        if let Some(index) = self.enemies.iter().position(|e| e.id == id) {
            return Some(&mut self.enemies[index].stats);
        }
        self.construct_mut(id).map(|c| &mut c.stats)
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        self.combatant(id).is_some_and(Combatant::is_alive)
    }

    pub fn display_name(&self, id: EntityId) -> String {
        if id.is_player() {
            return "Player".to_owned();
        }
        self.enemy(id)
            .map(|e| e.name.clone())
            .or_else(|| self.construct(id).map(|c| c.name.clone()))
            .unwrap_or_else(|| id.to_string())
    }

    pub fn is_over(&self) -> bool {
        self.phase.is_terminal()
    }

    // ========================================================================
    // Randomness
    // ========================================================================

    fn next_seed(&mut self) -> u64 {
        let seed = compute_seed(self.seed, self.rng_cursor, self.turn, 0);
        self.rng_cursor += 1;
        seed
    }

    /// Index in `0..len`; zero for an empty range.
    pub fn random_index(&mut self, rng: &dyn RngOracle, len: usize) -> usize {
        let bound = u32::try_from(len).unwrap_or(u32::MAX);
        let seed = self.next_seed();
        rng.below(seed, bound) as usize
    }

    /// Rolls a percent chance.
    pub fn roll_percent(&mut self, rng: &dyn RngOracle, chance: u32) -> bool {
        if chance == 0 {
            return false;
        }
        (self.random_index(rng, 100) as u32) < chance
    }

    /// Fisher-Yates shuffle of the deck.
    pub fn shuffle_deck(&mut self, rng: &dyn RngOracle) {
        let len = self.zones.deck.len();
        for i in (1..len).rev() {
            let j = self.random_index(rng, i + 1);
            self.zones.deck.swap(i, j);
        }
    }

    // ========================================================================
    // Presentation signals
    // ========================================================================

    pub fn push_log(&mut self, kind: LogKind, message: impl Into<String>) {
        self.log.push(self.turn, kind, message);
    }

    pub fn trigger_animation(&mut self, entity: EntityId, kind: AnimationKind) {
        self.animation_key += 1;
        self.animation_triggers.insert(
            entity,
            AnimationTrigger {
                kind,
                key: self.animation_key,
            },
        );
    }

    /// Returns pending animation signals and clears them.
    pub fn take_animation_triggers(&mut self) -> BTreeMap<EntityId, AnimationTrigger> {
        std::mem::take(&mut self.animation_triggers)
    }

    // ========================================================================
    // Wave carry-over and integrity
    // ========================================================================

    /// Tears a won wave down into the carry-over snapshot.
    ///
    /// Temporary cards are dropped and cost overrides cleared.
    pub fn to_interim(&self) -> InterimCombatState {
        InterimCombatState {
            zones: CardZones {
                deck: carry_over(self.zones.deck.iter()).into(),
                hand: carry_over(self.zones.hand.iter()),
                discard: carry_over(self.zones.discard.iter()),
                exhaust: carry_over(self.zones.exhaust.iter()),
            },
            constructs: self
                .constructs
                .iter()
                .filter(|c| c.is_player_owned() && c.is_alive())
                .cloned()
                .collect(),
        }
    }

    /// Checks the structural invariants that must hold after every commit.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let combatants = std::iter::once((EntityId::PLAYER, &self.player.stats))
            .chain(self.enemies.iter().map(|e| (e.id, &e.stats)))
            .chain(self.constructs.iter().map(|c| (c.id, &c.stats)));
        for (id, stats) in combatants {
            if stats.hp < 0 || stats.hp > stats.max_hp {
                return Err(InvariantViolation::HpOutOfRange {
                    entity: id,
                    hp: stats.hp,
                    max_hp: stats.max_hp,
                });
            }
            if stats.block < 0 {
                return Err(InvariantViolation::NegativeBlock {
                    entity: id,
                    block: stats.block,
                });
            }
        }

        let mut seen = std::collections::BTreeSet::new();
        for card in self.zones.iter() {
            if !seen.insert(card.instance_id) {
                return Err(InvariantViolation::DuplicateCardInstance(card.instance_id));
            }
        }
        Ok(())
    }

    /// SHA-256 over the canonical binary encoding of the state.
    #[cfg(feature = "serde")]
    pub fn digest(&self) -> Result<[u8; 32], bincode::Error> {
        use sha2::{Digest, Sha256};

        let bytes = bincode::serialize(self)?;
        Ok(Sha256::digest(&bytes).into())
    }
}

fn carry_over<'a>(cards: impl Iterator<Item = &'a CombatCard>) -> Vec<CombatCard> {
    cards
        .filter(|c| !c.temporary)
        .map(|c| CombatCard {
            cost_override: None,
            ..c.clone()
        })
        .collect()
}

/// Structural invariant broken by a transition.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InvariantViolation {
    #[error("{entity} has hp {hp} outside 0..={max_hp}")]
    HpOutOfRange {
        entity: EntityId,
        hp: i32,
        max_hp: i32,
    },

    #[error("{entity} has negative block {block}")]
    NegativeBlock { entity: EntityId, block: i32 },

    #[error("{0} appears in more than one zone slot")]
    DuplicateCardInstance(CardInstanceId),
}

impl GameError for InvariantViolation {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::HpOutOfRange { .. } => "STATE_HP_OUT_OF_RANGE",
            Self::NegativeBlock { .. } => "STATE_NEGATIVE_BLOCK",
            Self::DuplicateCardInstance(_) => "STATE_DUPLICATE_CARD_INSTANCE",
        }
    }
}
