//! Turn state machine tags and the payloads of interactive sub-phases.

use crate::action::{CardEffect, TraceMode};

use super::{CardId, CardInstanceId, EntityId, Zone};

/// A pending "choose cards to discard" prompt.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingDiscard {
    pub count: usize,
    /// Extra effect fired once per discarded card, in discard context.
    pub on_discard: Option<Box<CardEffect>>,
    pub source_card: Option<CardId>,
}

/// A pending "pick a card to create" prompt (generation or discover).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingCardChoice {
    pub options: Vec<CardId>,
    pub destination: Zone,
    /// Added to the template cost of the created instance.
    pub cost_delta: i32,
    pub temporary: bool,
}

/// Current phase of the encounter.
#[derive(Clone, Debug, Default, PartialEq, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CombatPhase {
    #[default]
    PlayerTurn,
    /// Enemy sequencing cursor: which enemy acts next and which of its actions.
    EnemyTurn {
        enemy_index: usize,
        action_index: usize,
    },
    AwaitingDiscard(PendingDiscard),
    AwaitingReturnToDeck {
        count: usize,
    },
    AwaitingCardChoice(PendingCardChoice),
    AwaitingEffectChoice {
        options: Vec<CardEffect>,
        source_card: Option<CardId>,
        target: Option<EntityId>,
    },
    AwaitingTraceChoice {
        candidates: Vec<CardInstanceId>,
        mode: TraceMode,
    },
    Victory,
    Defeat,
}

impl CombatPhase {
    pub fn name(&self) -> &'static str {
        self.into()
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Victory | Self::Defeat)
    }

    pub fn is_player_turn(&self) -> bool {
        matches!(self, Self::PlayerTurn)
    }

    pub fn is_enemy_turn(&self) -> bool {
        matches!(self, Self::EnemyTurn { .. })
    }

    /// True for the `awaiting_*` phases that need a player selection.
    pub fn is_awaiting(&self) -> bool {
        matches!(
            self,
            Self::AwaitingDiscard(_)
                | Self::AwaitingReturnToDeck { .. }
                | Self::AwaitingCardChoice(_)
                | Self::AwaitingEffectChoice { .. }
                | Self::AwaitingTraceChoice { .. }
        )
    }
}
