//! Draws, card creation, discards and the interactive prompts.

use std::collections::BTreeSet;

use crate::action::{CardEffect, CardManipulation, DiscoverSource, InteractiveSpec};
use crate::state::{
    CardId, CardInstanceId, CombatPhase, EntityId, LogKind, PendingCardChoice, PendingDiscard,
    Zone,
};

use super::{EffectCall, EffectContext, apply_effect};

/// Draws up to `count` cards, reshuffling discard into the deck when needed.
///
/// Stops early when the hand is full or no card is left anywhere.
pub(crate) fn draw_cards(ctx: &mut EffectContext<'_>, count: u32) -> u32 {
    let mut drawn = 0;
    for _ in 0..count {
        if ctx.state.zones.hand.len() >= ctx.config.max_hand_size {
            break;
        }
        if ctx.state.zones.deck.is_empty() {
            if ctx.state.zones.discard.is_empty() {
                break;
            }
            let discard = std::mem::take(&mut ctx.state.zones.discard);
            ctx.state.zones.deck.extend(discard);
            ctx.state.shuffle_deck(ctx.rng);
            ctx.log(LogKind::Card, "Discard pile shuffled into the deck");
        }
        let Some(card) = ctx.state.zones.deck.pop_front() else {
            break;
        };
        ctx.state.zones.hand.push(card);
        drawn += 1;
    }
    if drawn > 0 {
        ctx.log(LogKind::Card, format!("Drew {drawn} card(s)"));
    }
    drawn
}

/// Creates a new card instance in `zone`. Hand overflow lands in discard.
pub(crate) fn create_card(
    ctx: &mut EffectContext<'_>,
    card_id: &CardId,
    zone: Zone,
    cost_delta: i32,
    temporary: bool,
) -> Option<CardInstanceId> {
    let definition = ctx.card(card_id)?;
    let mut card = ctx.state.new_card(card_id.clone());
    if cost_delta != 0 {
        card = card.with_cost_override(definition.cost + cost_delta);
    }
    card.temporary = temporary;
    let instance_id = card.instance_id;

    let zone = match zone {
        Zone::Hand if ctx.state.zones.hand.len() >= ctx.config.max_hand_size => Zone::Discard,
        zone => zone,
    };
    match zone {
        Zone::Deck => ctx.state.zones.deck.push_back(card),
        Zone::Hand => ctx.state.zones.hand.push(card),
        Zone::Discard => ctx.state.zones.discard.push(card),
        Zone::Exhaust => ctx.state.zones.exhaust.push(card),
    }
    ctx.log(
        LogKind::CardCreated,
        format!("{} added to {zone}", definition.name),
    );
    Some(instance_id)
}

/// Moves a hand card to discard and fires its discard effects.
///
/// `extra` is the prompt-level effect fired for every discarded card.
pub(crate) fn discard_from_hand(
    ctx: &mut EffectContext<'_>,
    instance_id: CardInstanceId,
    extra: Option<&CardEffect>,
    depth: u32,
) -> bool {
    let Some(card) = ctx.state.zones.take_from_hand(instance_id) else {
        return false;
    };
    let card_id = card.card_id.clone();
    ctx.state.zones.discard.push(card);

    let Some(definition) = ctx.card(&card_id) else {
        return true;
    };
    ctx.log(LogKind::Card, format!("Discarded {}", definition.name));

    let call = EffectCall::discard(&definition, depth);
    if let Some(effect) = &definition.on_discard {
        apply_effect(ctx, effect, &call);
    }
    if let Some(effect) = extra {
        apply_effect(ctx, effect, &call);
    }

    if !ctx.state.counters.first_discard_done {
        ctx.state.counters.first_discard_done = true;
        let bonus = ctx.state.player.equipment.first_discard_draw;
        if bonus > 0 {
            draw_cards(ctx, bonus);
        }
    }
    true
}

/// Discards `count` random hand cards, firing `extra` for each.
pub(crate) fn discard_random(
    ctx: &mut EffectContext<'_>,
    count: usize,
    extra: Option<&CardEffect>,
    depth: u32,
) {
    for _ in 0..count {
        let len = ctx.state.zones.hand.len();
        if len == 0 || ctx.state.is_over() {
            return;
        }
        let index = ctx.state.random_index(ctx.rng, len);
        let instance_id = ctx.state.zones.hand[index].instance_id;
        discard_from_hand(ctx, instance_id, extra, depth + 1);
    }
}

pub(super) fn apply_card_manipulation(
    ctx: &mut EffectContext<'_>,
    spec: &CardManipulation,
    call: &EffectCall,
) {
    for card_id in &spec.add_to_hand {
        create_card(ctx, card_id, Zone::Hand, 0, false);
    }
    for card_id in &spec.add_to_discard {
        create_card(ctx, card_id, Zone::Discard, 0, false);
    }
    if !spec.add_to_deck.is_empty() {
        for card_id in &spec.add_to_deck {
            create_card(ctx, card_id, Zone::Deck, 0, false);
        }
        ctx.state.shuffle_deck(ctx.rng);
    }

    if let Some(discard) = &spec.discard
        && discard.count > 0
    {
        if discard.random {
            discard_random(ctx, discard.count, discard.on_discard.as_deref(), call.depth);
        } else if can_prompt(ctx, call) && !ctx.state.zones.hand.is_empty() {
            let count = discard.count.min(ctx.state.zones.hand.len());
            ctx.state.phase = CombatPhase::AwaitingDiscard(PendingDiscard {
                count,
                on_discard: discard.on_discard.clone(),
                source_card: call.card.clone(),
            });
        }
    }

    if spec.return_to_deck > 0 && can_prompt(ctx, call) && !ctx.state.zones.hand.is_empty() {
        let count = spec.return_to_deck.min(ctx.state.zones.hand.len());
        ctx.state.phase = CombatPhase::AwaitingReturnToDeck { count };
    }
}

/// Prompts need the player to be the source, an open player turn and no
/// other prompt pending.
fn can_prompt(ctx: &EffectContext<'_>, call: &EffectCall) -> bool {
    let allowed =
        call.source.is_player() && ctx.state.phase.is_player_turn() && !ctx.prompts_closed;
    if !allowed {
        tracing::debug!(
            "prompt skipped in phase {} for {:?}",
            ctx.state.phase.name(),
            call.source
        );
    }
    allowed
}

pub(super) fn open_interactive(
    ctx: &mut EffectContext<'_>,
    spec: &InteractiveSpec,
    call: &EffectCall,
    primary: Option<EntityId>,
) {
    if !can_prompt(ctx, call) {
        return;
    }
    match spec {
        InteractiveSpec::Generate {
            options,
            cost_delta,
            temporary,
        } => {
            if options.is_empty() {
                return;
            }
            ctx.state.phase = CombatPhase::AwaitingCardChoice(PendingCardChoice {
                options: options.clone(),
                destination: Zone::Hand,
                cost_delta: *cost_delta,
                temporary: *temporary,
            });
        }
        InteractiveSpec::Discover {
            count,
            source,
            cost_delta,
            temporary,
        } => {
            let pool = discover_pool(ctx, source);
            let options = sample(ctx, pool, *count);
            if options.is_empty() {
                tracing::debug!("discover pool empty; prompt skipped");
                return;
            }
            ctx.state.phase = CombatPhase::AwaitingCardChoice(PendingCardChoice {
                options,
                destination: Zone::Hand,
                cost_delta: *cost_delta,
                temporary: *temporary,
            });
        }
        InteractiveSpec::EffectChoice { options } => {
            if options.is_empty() {
                return;
            }
            ctx.state.phase = CombatPhase::AwaitingEffectChoice {
                options: options.clone(),
                source_card: call.card.clone(),
                target: primary,
            };
        }
        InteractiveSpec::Trace { card_type, mode } => {
            let discard: Vec<(CardInstanceId, CardId)> = ctx
                .state
                .zones
                .discard
                .iter()
                .map(|c| (c.instance_id, c.card_id.clone()))
                .collect();
            let candidates: Vec<CardInstanceId> = discard
                .into_iter()
                .filter(|(_, card_id)| {
                    card_type.is_none_or(|wanted| {
                        ctx.card(card_id).is_some_and(|def| def.card_type == wanted)
                    })
                })
                .map(|(instance_id, _)| instance_id)
                .collect();
            if candidates.is_empty() {
                tracing::debug!("no trace candidates in discard; prompt skipped");
                return;
            }
            ctx.state.phase = CombatPhase::AwaitingTraceChoice {
                candidates,
                mode: *mode,
            };
        }
    }
}

fn discover_pool(ctx: &EffectContext<'_>, source: &DiscoverSource) -> Vec<CardId> {
    match source {
        DiscoverSource::OwnedCards => {
            let owned: BTreeSet<CardId> = ctx
                .state
                .zones
                .deck
                .iter()
                .chain(ctx.state.zones.discard.iter())
                .map(|c| c.card_id.clone())
                .collect();
            owned.into_iter().collect()
        }
        DiscoverSource::Pool {
            rarity,
            card_type,
            keyword,
        } => {
            let Ok(cards) = ctx.env.cards() else {
                return Vec::new();
            };
            cards
                .card_ids()
                .into_iter()
                .filter_map(|id| cards.card(&id))
                .filter(|def| rarity.is_none_or(|r| def.rarity == r))
                .filter(|def| card_type.is_none_or(|t| def.card_type == t))
                .filter(|def| keyword.is_none_or(|k| def.keywords.contains(k)))
                .map(|def| def.id)
                .collect()
        }
    }
}

/// Picks up to `count` distinct entries with a partial Fisher-Yates pass.
fn sample(ctx: &mut EffectContext<'_>, mut pool: Vec<CardId>, count: usize) -> Vec<CardId> {
    let count = count.min(pool.len());
    for i in 0..count {
        let j = i + ctx.state.random_index(ctx.rng, pool.len() - i);
        pool.swap(i, j);
    }
    pool.truncate(count);
    pool
}
