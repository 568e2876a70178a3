//! Commands that resolve an interactive prompt and return to the player turn.

use std::collections::BTreeSet;

use crate::action::execute::{
    EffectCall, EffectContext, apply_effect, create_card, discard_from_hand,
};
use crate::action::{CommandError, CommandTransition, EffectSource, TraceMode};
use crate::env::CombatEnv;
use crate::state::{CardId, CardInstanceId, CombatPhase, CombatState, LogKind, Zone};

/// Checks a hand selection: exact count, distinct, every card in hand.
fn validate_selection(
    state: &CombatState,
    cards: &[CardInstanceId],
    expected: usize,
) -> Result<(), CommandError> {
    if cards.len() != expected {
        return Err(CommandError::WrongSelectionCount {
            expected,
            got: cards.len(),
        });
    }
    let mut seen = BTreeSet::new();
    for &card in cards {
        if !seen.insert(card) {
            return Err(CommandError::CardNotSelectable(card));
        }
        if state.zones.hand_card(card).is_none() {
            return Err(CommandError::CardNotInHand(card));
        }
    }
    Ok(())
}

// ============================================================================
// Discard
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiscardCardsCommand {
    pub cards: Vec<CardInstanceId>,
}

impl CommandTransition for DiscardCardsCommand {
    type Error = CommandError;

    fn pre_validate(&self, state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        let CombatPhase::AwaitingDiscard(pending) = &state.phase else {
            return Err(CommandError::wrong_phase("awaiting_discard", &state.phase));
        };
        validate_selection(state, &self.cards, pending.count)
    }

    fn apply(&self, state: &mut CombatState, env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        let CombatPhase::AwaitingDiscard(pending) =
            std::mem::replace(&mut state.phase, CombatPhase::PlayerTurn)
        else {
            return Err(CommandError::wrong_phase("awaiting_discard", &state.phase));
        };
        let mut ctx = EffectContext::new(state, *env)?;
        for &card in &self.cards {
            if ctx.state.is_over() {
                break;
            }
            discard_from_hand(&mut ctx, card, pending.on_discard.as_deref(), 1);
        }
        Ok(())
    }
}

// ============================================================================
// Return to deck
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReturnCardsToDeckCommand {
    pub cards: Vec<CardInstanceId>,
}

impl CommandTransition for ReturnCardsToDeckCommand {
    type Error = CommandError;

    fn pre_validate(&self, state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        let CombatPhase::AwaitingReturnToDeck { count } = state.phase else {
            return Err(CommandError::wrong_phase("awaiting_return_to_deck", &state.phase));
        };
        validate_selection(state, &self.cards, count)
    }

    /// Selected cards go on top of the deck; the last selected ends up on top.
    fn apply(&self, state: &mut CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        state.phase = CombatPhase::PlayerTurn;
        for &card in &self.cards {
            let Some(card) = state.zones.take_from_hand(card) else {
                return Err(CommandError::CardNotInHand(card));
            };
            state.zones.deck.push_front(card);
        }
        state.push_log(
            LogKind::Card,
            format!("Returned {} card(s) to the deck", self.cards.len()),
        );
        Ok(())
    }
}

// ============================================================================
// Card generation / discover
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChooseCardCommand {
    pub card_id: CardId,
}

impl CommandTransition for ChooseCardCommand {
    type Error = CommandError;

    fn pre_validate(&self, state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        let CombatPhase::AwaitingCardChoice(choice) = &state.phase else {
            return Err(CommandError::wrong_phase("awaiting_card_choice", &state.phase));
        };
        if !choice.options.contains(&self.card_id) {
            return Err(CommandError::CardNotOffered(self.card_id.clone()));
        }
        Ok(())
    }

    fn apply(&self, state: &mut CombatState, env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        let CombatPhase::AwaitingCardChoice(choice) =
            std::mem::replace(&mut state.phase, CombatPhase::PlayerTurn)
        else {
            return Err(CommandError::wrong_phase("awaiting_card_choice", &state.phase));
        };
        let mut ctx = EffectContext::new(state, *env)?;
        create_card(
            &mut ctx,
            &self.card_id,
            choice.destination,
            choice.cost_delta,
            choice.temporary,
        );
        Ok(())
    }
}

// ============================================================================
// Effect choice
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChooseEffectCommand {
    pub index: usize,
}

impl CommandTransition for ChooseEffectCommand {
    type Error = CommandError;

    fn pre_validate(&self, state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        let CombatPhase::AwaitingEffectChoice { options, .. } = &state.phase else {
            return Err(CommandError::wrong_phase("awaiting_effect_choice", &state.phase));
        };
        if self.index >= options.len() {
            return Err(CommandError::OptionOutOfRange {
                index: self.index,
                len: options.len(),
            });
        }
        Ok(())
    }

    fn apply(&self, state: &mut CombatState, env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        let CombatPhase::AwaitingEffectChoice {
            options,
            source_card,
            target,
        } = std::mem::replace(&mut state.phase, CombatPhase::PlayerTurn)
        else {
            return Err(CommandError::wrong_phase("awaiting_effect_choice", &state.phase));
        };
        let Some(effect) = options.get(self.index) else {
            return Err(CommandError::OptionOutOfRange {
                index: self.index,
                len: options.len(),
            });
        };
        let mut ctx = EffectContext::new(state, *env)?;
        let target = target.filter(|t| ctx.state.is_alive(*t));
        let call = EffectCall {
            card: source_card,
            target,
            ..EffectCall::passive(EffectSource::Player, 1)
        };
        apply_effect(&mut ctx, effect, &call);
        Ok(())
    }
}

// ============================================================================
// Trace
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChooseTraceCommand {
    pub card: CardInstanceId,
}

impl CommandTransition for ChooseTraceCommand {
    type Error = CommandError;

    fn pre_validate(&self, state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        let CombatPhase::AwaitingTraceChoice { candidates, .. } = &state.phase else {
            return Err(CommandError::wrong_phase("awaiting_trace_choice", &state.phase));
        };
        if !candidates.contains(&self.card) || state.zones.zone_of(self.card) != Some(Zone::Discard)
        {
            return Err(CommandError::CardNotSelectable(self.card));
        }
        Ok(())
    }

    fn apply(&self, state: &mut CombatState, env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        let CombatPhase::AwaitingTraceChoice { mode, .. } =
            std::mem::replace(&mut state.phase, CombatPhase::PlayerTurn)
        else {
            return Err(CommandError::wrong_phase("awaiting_trace_choice", &state.phase));
        };
        let mut ctx = EffectContext::new(state, *env)?;

        match mode {
            TraceMode::PlayCopy => {
                let Some(card_id) = ctx
                    .state
                    .zones
                    .discard
                    .iter()
                    .find(|c| c.instance_id == self.card)
                    .map(|c| c.card_id.clone())
                else {
                    return Err(CommandError::CardNotSelectable(self.card));
                };
                let Some(definition) = ctx.card(&card_id) else {
                    return Ok(());
                };
                create_card(&mut ctx, &card_id, Zone::Exhaust, 0, true);
                ctx.log(LogKind::Card, format!("A copy of {} resolves", definition.name));
                let call = EffectCall {
                    depth: 1,
                    ..EffectCall::player_card(&definition, None)
                };
                apply_effect(&mut ctx, &definition.effect, &call);
            }
            TraceMode::ReturnToHand { cost_delta } => {
                let Some(card) = ctx.state.zones.take_from_discard(self.card) else {
                    return Err(CommandError::CardNotSelectable(self.card));
                };
                if ctx.state.zones.hand.len() >= ctx.config.max_hand_size {
                    ctx.state.zones.discard.push(card);
                    ctx.log(LogKind::Card, "Hand is full; the traced card stays in discard");
                    return Ok(());
                }
                let base = ctx.card(&card.card_id).map_or(0, |def| def.cost);
                let card = card.with_cost_override(base + cost_delta);
                ctx.log(LogKind::Card, "A traced card returns to hand");
                ctx.state.zones.hand.push(card);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::CardEffect;
    use crate::config::CombatConfig;
    use crate::env::{CardDefinition, ContentTables, PcgRng};
    use crate::state::{
        CardType, Combatant, EnemyId, EnemyState, EntityId, PendingCardChoice, PendingDiscard,
        PlayerState,
    };

    fn tables() -> ContentTables {
        ContentTables::new()
            .with_card(CardDefinition::new("jab", 1, CardType::Attack, CardEffect::damage(1.0)))
            .with_card(
                CardDefinition::new("vent", 0, CardType::Skill, CardEffect::default())
                    .with_on_discard(CardEffect::block(1.0)),
            )
    }

    fn state() -> (CombatState, EntityId) {
        let mut state = CombatState::new(2, PlayerState::new(Combatant::new(80, 10, 0), 5, 4));
        let enemy = state.allocate_entity_id();
        state.enemies.push(EnemyState {
            id: enemy,
            template: EnemyId::from("dummy"),
            name: "Dummy".into(),
            stats: Combatant::new(100, 0, 0),
            entropy: 0,
            intent_cursor: 0,
        });
        (state, enemy)
    }

    fn run<C>(state: &mut CombatState, command: &C) -> Result<(), CommandError>
    where
        C: CommandTransition<Error = CommandError>,
    {
        let tables = tables();
        let config = CombatConfig::default();
        let env = tables.env(&config, &PcgRng);
        command.pre_validate(state, &env)?;
        command.apply(state, &env)
    }

    fn hand(state: &mut CombatState, card: &str) -> CardInstanceId {
        let card = state.new_card(CardId::from(card));
        let id = card.instance_id;
        state.zones.hand.push(card);
        id
    }

    #[test]
    fn discard_fires_on_discard_effects() {
        let (mut state, _) = state();
        let vent = hand(&mut state, "vent");
        hand(&mut state, "jab");
        state.phase = CombatPhase::AwaitingDiscard(PendingDiscard {
            count: 1,
            on_discard: None,
            source_card: None,
        });

        run(&mut state, &DiscardCardsCommand { cards: vec![vent] }).unwrap();

        assert_eq!(state.phase, CombatPhase::PlayerTurn);
        assert_eq!(state.player.stats.block, 4);
        assert_eq!(state.zones.discard.len(), 1);
    }

    #[test]
    fn selection_must_match_the_prompt() {
        let (mut state, _) = state();
        let jab = hand(&mut state, "jab");
        state.phase = CombatPhase::AwaitingReturnToDeck { count: 2 };

        let err = run(&mut state, &ReturnCardsToDeckCommand { cards: vec![jab] }).unwrap_err();
        assert_eq!(err, CommandError::WrongSelectionCount { expected: 2, got: 1 });

        let err = run(&mut state, &ReturnCardsToDeckCommand { cards: vec![jab, jab] }).unwrap_err();
        assert_eq!(err, CommandError::CardNotSelectable(jab));
    }

    #[test]
    fn returned_cards_sit_on_top_of_the_deck() {
        let (mut state, _) = state();
        let jab = hand(&mut state, "jab");
        let bottom = state.new_card(CardId::from("vent"));
        state.zones.deck.push_back(bottom);
        state.phase = CombatPhase::AwaitingReturnToDeck { count: 1 };

        run(&mut state, &ReturnCardsToDeckCommand { cards: vec![jab] }).unwrap();

        assert_eq!(state.zones.deck.front().map(|c| c.instance_id), Some(jab));
        assert!(state.zones.hand.is_empty());
    }

    #[test]
    fn chosen_card_is_created_with_cost_delta() {
        let (mut state, _) = state();
        state.phase = CombatPhase::AwaitingCardChoice(PendingCardChoice {
            options: vec![CardId::from("jab")],
            destination: Zone::Hand,
            cost_delta: -1,
            temporary: true,
        });

        let err = run(&mut state, &ChooseCardCommand { card_id: CardId::from("vent") }).unwrap_err();
        assert_eq!(err, CommandError::CardNotOffered(CardId::from("vent")));

        run(&mut state, &ChooseCardCommand { card_id: CardId::from("jab") }).unwrap();
        let created = &state.zones.hand[0];
        assert_eq!(created.cost_override, Some(0));
        assert!(created.temporary);
    }

    #[test]
    fn effect_choice_resolves_the_picked_option() {
        let (mut state, enemy) = state();
        state.phase = CombatPhase::AwaitingEffectChoice {
            options: vec![CardEffect::block(2.0), CardEffect::damage(1.5)],
            source_card: None,
            target: Some(enemy),
        };

        let err = run(&mut state, &ChooseEffectCommand { index: 2 }).unwrap_err();
        assert_eq!(err, CommandError::OptionOutOfRange { index: 2, len: 2 });

        run(&mut state, &ChooseEffectCommand { index: 1 }).unwrap();
        assert_eq!(state.enemies[0].stats.hp, 85);
        assert_eq!(state.player.stats.block, 0);
    }

    #[test]
    fn trace_copy_resolves_and_leaves_original_in_discard() {
        let (mut state, _) = state();
        let jab = state.new_card(CardId::from("jab"));
        let jab_id = jab.instance_id;
        state.zones.discard.push(jab);
        state.phase = CombatPhase::AwaitingTraceChoice {
            candidates: vec![jab_id],
            mode: TraceMode::PlayCopy,
        };

        run(&mut state, &ChooseTraceCommand { card: jab_id }).unwrap();

        assert_eq!(state.enemies[0].stats.hp, 90);
        assert_eq!(state.zones.discard.len(), 1);
        assert_eq!(state.zones.exhaust.len(), 1);
        assert!(state.zones.exhaust[0].temporary);
    }

    #[test]
    fn trace_return_moves_card_to_hand_with_new_cost() {
        let (mut state, _) = state();
        let jab = state.new_card(CardId::from("jab"));
        let jab_id = jab.instance_id;
        state.zones.discard.push(jab);
        state.phase = CombatPhase::AwaitingTraceChoice {
            candidates: vec![jab_id],
            mode: TraceMode::ReturnToHand { cost_delta: -1 },
        };

        run(&mut state, &ChooseTraceCommand { card: jab_id }).unwrap();

        assert_eq!(state.zones.hand[0].instance_id, jab_id);
        assert_eq!(state.zones.hand[0].cost_override, Some(0));
    }
}
