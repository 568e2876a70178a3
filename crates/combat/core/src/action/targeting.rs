//! Target classes and the aggro resolver.
//!
//! Player-side sources (the player and player-owned constructs) aim at
//! enemies. Enemy-side sources aim at the player, with single-target intents
//! spread between the player and player-owned constructs by aggro weight.

use crate::config::CombatConfig;
use crate::env::RngOracle;
use crate::state::{CombatState, EntityId, Owner};

/// How an effect picks targets when the command names none.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TargetClass {
    /// First alive hostile.
    #[default]
    Enemy,
    /// Uniformly random alive hostile.
    RandomEnemy,
    AllEnemies,
    /// The source itself.
    SelfTarget,
}

/// Who is resolving an effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EffectSource {
    Player,
    Enemy(EntityId),
    Construct(EntityId),
}

impl EffectSource {
    pub fn entity(self) -> EntityId {
        match self {
            Self::Player => EntityId::PLAYER,
            Self::Enemy(id) | Self::Construct(id) => id,
        }
    }

    pub fn is_player(self) -> bool {
        matches!(self, Self::Player)
    }

    /// True when the source fights for the player.
    pub fn is_player_side(self, state: &CombatState) -> bool {
        match self {
            Self::Player => true,
            Self::Enemy(_) => false,
            Self::Construct(id) => state
                .construct(id)
                .is_some_and(|c| c.owner == Owner::Player),
        }
    }
}

/// Weighted pick between the player and alive player-owned constructs.
///
/// Falls back to the player without consuming randomness when no construct
/// can draw aggro.
pub fn pick_aggro_target(
    state: &mut CombatState,
    rng: &dyn RngOracle,
    config: &CombatConfig,
) -> EntityId {
    let constructs: Vec<EntityId> = state
        .constructs
        .iter()
        .filter(|c| c.is_player_owned() && c.is_alive())
        .map(|c| c.id)
        .collect();
    if constructs.is_empty() || config.construct_aggro_weight == 0 {
        return EntityId::PLAYER;
    }

    let player_weight = config.player_aggro_weight as usize;
    let construct_weight = config.construct_aggro_weight as usize;
    let total = player_weight + construct_weight * constructs.len();
    let roll = state.random_index(rng, total);
    if roll < player_weight {
        EntityId::PLAYER
    } else {
        constructs[(roll - player_weight) / construct_weight]
    }
}

/// Resolves the targets of one effect call.
///
/// An explicit target wins while it is alive. Returns an empty list when
/// nothing can be targeted.
pub fn resolve_targets(
    state: &mut CombatState,
    rng: &dyn RngOracle,
    config: &CombatConfig,
    source: EffectSource,
    class: Option<TargetClass>,
    explicit: Option<EntityId>,
) -> Vec<EntityId> {
    if let Some(target) = explicit {
        return if state.is_alive(target) {
            vec![target]
        } else {
            Vec::new()
        };
    }

    let class = class.unwrap_or_default();
    if class == TargetClass::SelfTarget {
        return vec![source.entity()];
    }

    if source.is_player_side(state) {
        if let EffectSource::Construct(id) = source {
            let snapshot = state.construct(id).and_then(|c| c.target);
            if class == TargetClass::Enemy {
                if let Some(target) = snapshot.filter(|t| state.is_alive(*t)) {
                    return vec![target];
                }
            }
        }
        let alive = state.alive_enemy_ids();
        return match class {
            TargetClass::Enemy => alive.into_iter().take(1).collect(),
            TargetClass::RandomEnemy if alive.is_empty() => Vec::new(),
            TargetClass::RandomEnemy => {
                let index = state.random_index(rng, alive.len());
                vec![alive[index]]
            }
            TargetClass::AllEnemies => alive,
            TargetClass::SelfTarget => Vec::new(),
        };
    }

    match class {
        TargetClass::AllEnemies => std::iter::once(EntityId::PLAYER)
            .chain(
                state
                    .constructs
                    .iter()
                    .filter(|c| c.is_player_owned() && c.is_alive())
                    .map(|c| c.id),
            )
            .collect(),
        _ => vec![pick_aggro_target(state, rng, config)],
    }
}
