use crate::state::{CombatState, EntityId, StatusId};

use super::CardEffect;

/// Predicate evaluated by conditional clauses.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Condition {
    MinCharge(u32),
    /// Source entropy (player or enemy meter) at least this high.
    MinEntropy(i32),
    TargetHasStatus(StatusId),
    SourceHasStatus(StatusId),
    TargetHasBlock,
    HandSizeAtLeast(usize),
    HandSizeAtMost(usize),
    /// Target HP below this percent of its max HP.
    TargetHpBelow(u32),
}

impl Condition {
    /// Evaluates the predicate. Conditions on a missing or dead target are false.
    pub fn evaluate(&self, state: &CombatState, source: EntityId, target: Option<EntityId>) -> bool {
        let target_stats = target.and_then(|id| state.combatant(id));
        match self {
            Self::MinCharge(min) => state.player.charge >= *min,
            Self::MinEntropy(min) => source_entropy(state, source) >= *min,
            Self::TargetHasStatus(status) => {
                target_stats.is_some_and(|t| t.status_effects.has(*status))
            }
            Self::SourceHasStatus(status) => state
                .combatant(source)
                .is_some_and(|s| s.status_effects.has(*status)),
            Self::TargetHasBlock => target_stats.is_some_and(|t| t.block > 0),
            Self::HandSizeAtLeast(n) => state.zones.hand.len() >= *n,
            Self::HandSizeAtMost(n) => state.zones.hand.len() <= *n,
            Self::TargetHpBelow(percent) => target_stats
                .is_some_and(|t| t.is_alive() && t.hp * 100 < t.max_hp * *percent as i32),
        }
    }
}

fn source_entropy(state: &CombatState, source: EntityId) -> i32 {
    if source.is_player() {
        state.player.entropy as i32
    } else {
        state.enemy(source).map(|e| e.entropy).unwrap_or(0)
    }
}

/// Branch on a predicate.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConditionalEffect {
    pub condition: Condition,
    pub then: Box<CardEffect>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub otherwise: Option<Box<CardEffect>>,
}
