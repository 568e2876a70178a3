//! Start-of-turn status resolution for a single combatant.

use crate::action::execute::{EffectContext, create_card, draw_cards, gain_charge};
use crate::state::{AnimationKind, EntityId, LogKind, StatusData, StatusId, Zone};

/// Resolves every status on `entity` once, in list order.
///
/// Damage-over-time ignores block. Expired effects are removed after the full
/// pass. Returns true only when a non-player combatant died during the tick;
/// the caller runs the death handling.
pub(crate) fn tick_statuses(ctx: &mut EffectContext<'_>, entity: EntityId) -> bool {
    let Some(stats) = ctx.state.combatant(entity) else {
        return false;
    };
    if !stats.is_alive() {
        return false;
    }
    let ids: Vec<StatusId> = stats.status_effects.iter().map(|e| e.id).collect();

    for id in ids {
        if !ctx.state.is_alive(entity) {
            break;
        }
        match id {
            StatusId::Bleed => {
                let damage = bleed_damage(ctx, entity);
                take_dot(ctx, entity, id, damage);
                decrement(ctx, entity, id, |value| value - 1);
            }
            StatusId::Poison => {
                let damage = poison_damage(ctx, entity);
                take_dot(ctx, entity, id, damage);
                decrement(ctx, entity, id, |value| value - 1);
            }
            StatusId::Burn => {
                let damage = burn_damage(ctx, entity);
                take_dot(ctx, entity, id, damage);
                decrement(ctx, entity, id, |value| value / 2);
            }
            StatusId::Capacitor if entity.is_player() => {
                let stacks = stacks_of(ctx, entity, id);
                gain_charge(ctx, stacks.max(0) as u32);
                decrement(ctx, entity, id, |_| 0);
            }
            StatusId::Foresight if entity.is_player() => {
                let extra = stacks_of_value(ctx, entity, id).max(1);
                ctx.log(LogKind::Status, "Foresight grants an extra draw");
                draw_cards(ctx, extra as u32);
            }
            StatusId::Overheat => {
                let stacks = stacks_of(ctx, entity, id);
                if stacks >= ctx.config.overheat_threshold {
                    let damage = stacks * ctx.config.overheat_damage_per_stack;
                    ctx.log(LogKind::Status, "Overheat vents");
                    take_dot(ctx, entity, id, damage);
                    decrement(ctx, entity, id, |_| 0);
                }
            }
            StatusId::Conjure if entity.is_player() => conjure(ctx),
            _ => {}
        }
    }

    let Some(stats) = ctx.state.combatant_mut(entity) else {
        return false;
    };
    for effect in stats.status_effects.as_mut_slice() {
        if !effect.id.is_stacking() && !effect.is_permanent() {
            effect.duration -= 1;
        }
    }
    stats.status_effects.remove_spent();
    let died = !stats.is_alive();

    died && !entity.is_player()
}

fn stacks_of(ctx: &EffectContext<'_>, entity: EntityId, id: StatusId) -> i32 {
    ctx.state
        .combatant(entity)
        .and_then(|s| s.status_effects.get(id))
        .map_or(0, |e| e.stacks())
}

fn stacks_of_value(ctx: &EffectContext<'_>, entity: EntityId, id: StatusId) -> i32 {
    ctx.state
        .combatant(entity)
        .and_then(|s| s.status_effects.get(id))
        .map_or(0, |e| e.value)
}

fn decrement(ctx: &mut EffectContext<'_>, entity: EntityId, id: StatusId, next: impl Fn(i32) -> i32) {
    if let Some(effect) = ctx
        .state
        .combatant_mut(entity)
        .and_then(|s| s.status_effects.get_mut(id))
    {
        effect.value = next(effect.value).max(0);
    }
}

/// Percentage reduction the player's equipment applies to incoming DoT.
fn dot_factor(ctx: &EffectContext<'_>, entity: EntityId) -> f64 {
    if entity.is_player() {
        let reduction = ctx.state.player.equipment.dot_reduction.min(100);
        1.0 - f64::from(reduction) / 100.0
    } else {
        1.0
    }
}

fn bleed_damage(ctx: &EffectContext<'_>, entity: EntityId) -> i32 {
    let max_hp = ctx.state.combatant(entity).map_or(0, |s| s.max_hp);
    let stacks = stacks_of(ctx, entity, StatusId::Bleed);
    let raw = f64::from(max_hp) * f64::from(stacks) / 100.0;
    (raw * dot_factor(ctx, entity)).ceil() as i32
}

fn poison_damage(ctx: &EffectContext<'_>, entity: EntityId) -> i32 {
    let max_hp = ctx.state.combatant(entity).map_or(0, |s| s.max_hp);
    let raw = (f64::from(max_hp) * ctx.config.poison_rate).round();
    (raw * dot_factor(ctx, entity)).round() as i32
}

/// Burn scales with the attack of whoever applied it. Burns the player put on
/// others get the equipment bonus; burns on the player may crit.
fn burn_damage(ctx: &mut EffectContext<'_>, entity: EntityId) -> i32 {
    let Some(burn) = ctx
        .state
        .combatant(entity)
        .and_then(|s| s.status_effects.get(StatusId::Burn))
    else {
        return 0;
    };
    let raw = f64::from(burn.value) * f64::from(burn.source_attack) * ctx.config.burn_rate;
    let mut damage = (raw.round() as i32).max(1);

    if entity.is_player() {
        if ctx.state.roll_percent(ctx.rng, ctx.config.burn_crit_chance) {
            damage = (f64::from(damage) * ctx.config.crit_multiplier).round() as i32;
            ctx.log(LogKind::Status, "The burn flares up!");
        }
        damage = (f64::from(damage) * dot_factor(ctx, entity)).round() as i32;
    } else {
        let bonus = ctx.state.player.equipment.burn_damage_bonus;
        if bonus > 0 {
            damage = (f64::from(damage) * (1.0 + f64::from(bonus) / 100.0)).round() as i32;
        }
    }
    damage
}

fn take_dot(ctx: &mut EffectContext<'_>, entity: EntityId, id: StatusId, damage: i32) {
    if damage <= 0 {
        return;
    }
    let Some(stats) = ctx.state.combatant_mut(entity) else {
        return;
    };
    let lost = stats.lose_hp(damage);
    if entity.is_player() {
        ctx.state.counters.damage_taken += lost;
    } else if id == StatusId::Bleed {
        ctx.state.counters.bleed_damage_dealt += lost;
    }
    let name = ctx.name(entity);
    ctx.log(LogKind::Damage, format!("{name} takes {lost} {id} damage"));
    ctx.state.trigger_animation(entity, AnimationKind::Hit);
}

fn conjure(ctx: &mut EffectContext<'_>) {
    let Some(effect) = ctx.state.player.stats.status_effects.get_mut(StatusId::Conjure) else {
        return;
    };
    let cards = match effect.data.take() {
        Some(StatusData::PendingCards(cards)) => cards,
        None => Vec::new(),
    };
    effect.duration = 0;
    for card_id in &cards {
        create_card(ctx, card_id, Zone::Hand, 0, true);
    }
}
