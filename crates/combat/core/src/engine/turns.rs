//! Turn state machine steps shared by the commands.
//!
//! Player turn: `start_player_turn` → card plays → `end_turn`.
//! Enemy turn: repeated `process_enemy_step` until every enemy has acted, then
//! `finish_enemy_turn` which starts the next player turn.

use crate::action::execute::{
    EffectCall, EffectContext, apply_effect, discard_from_hand, draw_cards, handle_death,
    plan_intents,
};
use crate::state::{CardKeywords, CombatPhase, EntityId, LogKind, TurnCounters};

use super::constructs::tick_constructs;
use super::ticker::tick_statuses;

pub(crate) fn start_player_turn(ctx: &mut EffectContext<'_>) {
    if ctx.state.is_over() {
        return;
    }
    ctx.state.turn += 1;
    ctx.state.counters = TurnCounters::default();
    ctx.state.last_played = None;
    ctx.state.phase = CombatPhase::PlayerTurn;

    let player = &mut ctx.state.player;
    let retention = player.equipment.block_retention.min(100) as i32;
    player.stats.block = player.stats.block * retention / 100;
    player.cp = player.max_cp;

    let turn = ctx.state.turn;
    ctx.log(LogKind::Info, format!("Turn {turn} begins"));
    tracing::debug!(turn, "player turn started");

    tick_statuses(ctx, EntityId::PLAYER);
    if !ctx.state.player.stats.is_alive() {
        handle_death(ctx, EntityId::PLAYER, 0);
        return;
    }

    draw_cards(ctx, ctx.config.draw_per_turn);
    plan_intents(ctx);
}

/// Closes the player turn and hands control to the enemies.
pub(crate) fn end_turn(ctx: &mut EffectContext<'_>) {
    let decay = ctx.config.entropy_decay;
    ctx.state.player.entropy = ctx.state.player.entropy.saturating_sub(decay);

    let ethereal: Vec<_> = ctx
        .state
        .zones
        .hand
        .iter()
        .filter(|card| {
            ctx.card(&card.card_id)
                .is_some_and(|def| def.has(CardKeywords::ETHEREAL))
        })
        .map(|card| card.instance_id)
        .collect();
    ctx.prompts_closed = true;
    for instance_id in ethereal {
        if ctx.state.is_over() {
            break;
        }
        discard_from_hand(ctx, instance_id, None, 0);
    }
    ctx.prompts_closed = false;
    if ctx.state.is_over() {
        return;
    }

    tick_constructs(ctx, true);
    if ctx.state.is_over() {
        return;
    }

    ctx.log(LogKind::Enemy, "Enemy turn");
    ctx.state.phase = CombatPhase::EnemyTurn {
        enemy_index: 0,
        action_index: 0,
    };
}

/// Resolves at most one queued enemy action.
///
/// The first step of each enemy clears its block and ticks its statuses. Dead
/// enemies are skipped. Once nothing is left the player turn starts.
pub(crate) fn process_enemy_step(ctx: &mut EffectContext<'_>) {
    let CombatPhase::EnemyTurn {
        mut enemy_index,
        mut action_index,
    } = ctx.state.phase
    else {
        return;
    };

    while let Some(enemy) = ctx.state.enemies.get(enemy_index) {
        let id = enemy.id;
        // Enemies that arrived mid-turn have no plan yet.
        if !enemy.is_alive() || !ctx.state.enemy_actions.contains_key(&id) {
            enemy_index += 1;
            action_index = 0;
            continue;
        }

        if action_index == 0 {
            if let Some(enemy) = ctx.state.enemy_mut(id) {
                enemy.stats.block = 0;
            }
            if tick_statuses(ctx, id) {
                handle_death(ctx, id, 0);
                if ctx.state.is_over() {
                    return;
                }
                enemy_index += 1;
                continue;
            }
        }

        let actions = ctx.state.enemy_actions.get(&id).cloned().unwrap_or_default();
        let Some(card_id) = actions.get(action_index) else {
            enemy_index += 1;
            action_index = 0;
            continue;
        };

        ctx.state.phase = CombatPhase::EnemyTurn {
            enemy_index,
            action_index: action_index + 1,
        };
        if let Some(definition) = ctx.card(card_id) {
            let name = ctx.name(id);
            ctx.log(LogKind::Enemy, format!("{name} uses {}", definition.name));
            apply_effect(ctx, &definition.effect, &EffectCall::enemy_card(id, &definition));
        }
        return;
    }

    finish_enemy_turn(ctx);
}

/// True when no alive enemy at or after the cursor has anything left to do.
pub(crate) fn enemy_turn_finished(state: &crate::state::CombatState) -> bool {
    let CombatPhase::EnemyTurn {
        enemy_index,
        action_index,
    } = state.phase
    else {
        return false;
    };
    state
        .enemies
        .iter()
        .enumerate()
        .skip(enemy_index)
        .filter(|(_, enemy)| enemy.is_alive() && state.enemy_actions.contains_key(&enemy.id))
        .all(|(index, enemy)| {
            let queued = state.enemy_actions.get(&enemy.id).map_or(0, Vec::len);
            index == enemy_index && action_index > 0 && action_index >= queued
        })
}

/// Ticks enemy-owned constructs and starts the next player turn.
pub(crate) fn finish_enemy_turn(ctx: &mut EffectContext<'_>) {
    tick_constructs(ctx, false);
    if ctx.state.is_over() {
        return;
    }
    start_player_turn(ctx);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{CardEffect, InteractiveSpec, ResourceSpec, StatusApplication};
    use crate::config::CombatConfig;
    use crate::env::{CardDefinition, ContentTables, EnemyTemplate, PcgRng};
    use crate::state::{CardId, CardType, CombatState, Combatant, PlayerState, StatusId};

    fn tables() -> ContentTables {
        ContentTables::new()
            .with_card(CardDefinition::new("claw", 0, CardType::Attack, CardEffect::damage(1.0)))
            .with_card(CardDefinition::new(
                "hex",
                0,
                CardType::Skill,
                CardEffect::status(StatusApplication::new(StatusId::Bleed, 3, 0)),
            ))
            .with_card(
                CardDefinition::new("mist", 0, CardType::Skill, CardEffect::default())
                    .with_keywords(CardKeywords::ETHEREAL),
            )
            .with_card(
                CardDefinition::new("wisp", 0, CardType::Skill, CardEffect::default())
                    .with_keywords(CardKeywords::ETHEREAL)
                    .with_on_discard(CardEffect {
                        resources: Some(ResourceSpec {
                            draw: 1,
                            ..ResourceSpec::default()
                        }),
                        interactive: Some(InteractiveSpec::Generate {
                            options: vec![CardId::from("claw")],
                            cost_delta: 0,
                            temporary: false,
                        }),
                        ..CardEffect::default()
                    }),
            )
            .with_enemy(stalker())
    }

    fn stalker() -> EnemyTemplate {
        EnemyTemplate::new("stalker", 30, 6)
            .with_pattern(vec![vec![CardId::from("claw"), CardId::from("hex")]])
    }

    fn state() -> CombatState {
        let mut state =
            CombatState::new(11, PlayerState::new(Combatant::new(100, 10, 0), 3, 5));
        let id = state.allocate_entity_id();
        state.enemies.push(stalker().to_enemy(id));
        state
    }

    fn with_ctx(state: &mut CombatState, f: impl FnOnce(&mut EffectContext<'_>)) {
        let tables = tables();
        let config = CombatConfig::default();
        let mut ctx = EffectContext::new(state, tables.env(&config, &PcgRng)).unwrap();
        f(&mut ctx);
    }

    #[test]
    fn start_refills_cp_and_plans_intents() {
        let mut state = state();
        state.player.cp = 0;
        state.player.stats.block = 12;

        with_ctx(&mut state, start_player_turn);

        assert_eq!(state.turn, 1);
        assert_eq!(state.player.cp, 3);
        assert_eq!(state.player.stats.block, 0);
        let enemy = state.enemies[0].id;
        assert_eq!(state.enemy_actions[&enemy].len(), 2);
    }

    #[test]
    fn enemy_turn_steps_one_action_at_a_time() {
        let mut state = state();
        with_ctx(&mut state, start_player_turn);
        with_ctx(&mut state, end_turn);
        assert!(state.phase.is_enemy_turn());

        with_ctx(&mut state, process_enemy_step);
        assert_eq!(state.player.stats.hp, 94);
        assert!(!enemy_turn_finished(&state));

        with_ctx(&mut state, process_enemy_step);
        assert_eq!(state.player.stats.status_effects.stacks(StatusId::Bleed), 3);
        assert!(enemy_turn_finished(&state));

        with_ctx(&mut state, process_enemy_step);
        assert!(state.phase.is_player_turn());
        assert_eq!(state.turn, 2);
        assert_eq!(state.player.stats.hp, 91);
        assert_eq!(state.player.stats.status_effects.stacks(StatusId::Bleed), 2);
    }

    #[test]
    fn ethereal_cards_leave_hand_at_end_of_turn() {
        let mut state = state();
        let mist = state.new_card(CardId::from("mist"));
        let claw = state.new_card(CardId::from("claw"));
        state.zones.hand.push(mist);
        state.zones.hand.push(claw);

        with_ctx(&mut state, end_turn);

        assert_eq!(state.zones.hand.len(), 1);
        assert_eq!(state.zones.discard.len(), 1);
        assert_eq!(state.zones.discard[0].card_id, CardId::from("mist"));
    }

    #[test]
    fn closing_the_turn_never_opens_a_prompt() {
        let mut state = state();
        let wisp = state.new_card(CardId::from("wisp"));
        let spare = state.new_card(CardId::from("claw"));
        state.zones.hand.push(wisp);
        state.zones.deck.push_back(spare);
        let cursor = state.rng_cursor;

        with_ctx(&mut state, end_turn);

        assert_eq!(
            state.phase,
            CombatPhase::EnemyTurn {
                enemy_index: 0,
                action_index: 0
            }
        );
        // The rest of the on-discard effect still resolves.
        assert_eq!(state.zones.hand.len(), 1);
        assert_eq!(state.zones.discard[0].card_id, CardId::from("wisp"));
        assert_eq!(state.zones.total(), 2);
        assert_eq!(state.rng_cursor, cursor);
    }

    #[test]
    fn dead_enemies_are_skipped() {
        let mut state = state();
        with_ctx(&mut state, start_player_turn);
        with_ctx(&mut state, end_turn);
        state.enemies[0].stats.hp = 0;

        with_ctx(&mut state, process_enemy_step);

        assert!(state.phase.is_player_turn());
        assert_eq!(state.player.stats.hp, 100);
    }

    #[test]
    fn unplanned_arrivals_sit_out_the_enemy_turn() {
        let mut state = state();
        with_ctx(&mut state, start_player_turn);
        with_ctx(&mut state, end_turn);
        let late = state.allocate_entity_id();
        state.enemies.push(stalker().to_enemy(late));

        with_ctx(&mut state, process_enemy_step);
        with_ctx(&mut state, process_enemy_step);
        assert!(enemy_turn_finished(&state));

        with_ctx(&mut state, process_enemy_step);
        assert!(state.phase.is_player_turn());
        // Only the original stalker's claw landed.
        assert_eq!(state.player.stats.hp, 91);
        assert_eq!(state.enemy_actions[&late].len(), 2);
    }
}
