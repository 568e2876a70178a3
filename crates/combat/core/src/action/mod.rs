//! Player and engine commands, the effect grammar and its interpreter.
//!
//! A [`CombatCommand`] is the only way to advance a combat. Each command is a
//! [`CommandTransition`] driven by [`crate::engine::CombatEngine`].
pub mod effect;
pub mod execute;
pub mod targeting;

mod choice;
mod error;
mod play;
mod transition;
mod turn;

pub use choice::{
    ChooseCardCommand, ChooseEffectCommand, ChooseTraceCommand, DiscardCardsCommand,
    ReturnCardsToDeckCommand,
};
pub use effect::{
    BlockSpec, BonusBlock, CardEffect, CardManipulation, ChargeConsumption, Condition,
    ConditionalEffect, ConsumeStatusSpec, DamageSpec, DiscardSpec, DiscoverSource,
    EnemyEffectSpec, InteractiveSpec, OnKill, Resonance, ResonanceBonus, ResonanceTrigger,
    ResourceSpec, StatusApplication, TraceMode,
};
pub use error::CommandError;
pub use play::{PlayCardCommand, PlayCost, play_cost};
pub use targeting::{EffectSource, TargetClass};
pub use transition::CommandTransition;
pub use turn::{EndTurnCommand, ProcessEnemyActionCommand, StartPlayerTurnCommand};

use crate::state::{CardId, CardInstanceId, EntityId};

/// Every input the combat accepts.
///
/// Player intents come from the presentation layer; `ProcessEnemyAction` and
/// `StartPlayerTurn` are issued by the driver that paces the enemy turn.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CombatCommand {
    PlayCard(PlayCardCommand),
    EndTurn(EndTurnCommand),
    DiscardCards(DiscardCardsCommand),
    ReturnCardsToDeck(ReturnCardsToDeckCommand),
    ChooseCardToGenerate(ChooseCardCommand),
    ChooseEffect(ChooseEffectCommand),
    ChooseTrace(ChooseTraceCommand),
    ProcessEnemyAction(ProcessEnemyActionCommand),
    StartPlayerTurn(StartPlayerTurnCommand),
}

impl CombatCommand {
    pub fn play(card: CardInstanceId, target: Option<EntityId>) -> Self {
        Self::PlayCard(PlayCardCommand { card, target })
    }

    pub fn end_turn() -> Self {
        Self::EndTurn(EndTurnCommand)
    }

    pub fn discard(cards: Vec<CardInstanceId>) -> Self {
        Self::DiscardCards(DiscardCardsCommand { cards })
    }

    pub fn return_to_deck(cards: Vec<CardInstanceId>) -> Self {
        Self::ReturnCardsToDeck(ReturnCardsToDeckCommand { cards })
    }

    pub fn choose_card(card_id: CardId) -> Self {
        Self::ChooseCardToGenerate(ChooseCardCommand { card_id })
    }

    pub fn choose_effect(index: usize) -> Self {
        Self::ChooseEffect(ChooseEffectCommand { index })
    }

    pub fn choose_trace(card: CardInstanceId) -> Self {
        Self::ChooseTrace(ChooseTraceCommand { card })
    }

    pub fn process_enemy_action() -> Self {
        Self::ProcessEnemyAction(ProcessEnemyActionCommand)
    }

    pub fn start_player_turn() -> Self {
        Self::StartPlayerTurn(StartPlayerTurnCommand)
    }

    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::PlayCard(_) => "play_card",
            Self::EndTurn(_) => "end_turn",
            Self::DiscardCards(_) => "discard_cards",
            Self::ReturnCardsToDeck(_) => "return_cards_to_deck",
            Self::ChooseCardToGenerate(_) => "choose_card_to_generate",
            Self::ChooseEffect(_) => "choose_effect",
            Self::ChooseTrace(_) => "choose_trace",
            Self::ProcessEnemyAction(_) => "process_enemy_action",
            Self::StartPlayerTurn(_) => "start_player_turn",
        }
    }

    /// True for the commands the runtime issues on its own.
    pub fn is_engine_driven(&self) -> bool {
        matches!(self, Self::ProcessEnemyAction(_) | Self::StartPlayerTurn(_))
    }
}

impl From<PlayCardCommand> for CombatCommand {
    fn from(command: PlayCardCommand) -> Self {
        Self::PlayCard(command)
    }
}
