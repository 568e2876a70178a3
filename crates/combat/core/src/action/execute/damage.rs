//! Damage clause: base computation, per-target modifiers, pierce/block split
//! and on-hit hooks.

use crate::action::effect::{HIGH_HEALTH_RATIO, LOW_HEALTH_RATIO};
use crate::action::targeting::resolve_targets;
use crate::action::{DamageSpec, EffectSource, TargetClass};
use crate::state::{AnimationKind, Combatant, EntityId, LogKind, StatusEffect, StatusId};

use super::{EffectCall, EffectContext, apply_effect, cards, handle_death};

/// Result of a single hit against one target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Strike {
    pub hp_damage: i32,
    /// Block absorbed the whole normal portion.
    pub fully_blocked: bool,
    pub killed: bool,
}

pub(super) fn resolve_damage(
    ctx: &mut EffectContext<'_>,
    spec: &DamageSpec,
    class: Option<TargetClass>,
    call: &EffectCall,
    targets: &[EntityId],
) {
    let source = call.source.entity();
    let Some(attacker) = ctx.state.combatant(source).cloned() else {
        return;
    };

    let mut base = f64::from(attacker.attack) * spec.multiplier;
    base += consume_charge(ctx, spec, call, &attacker);
    base *= consume_empower(ctx, source);
    if attacker.status_effects.has(StatusId::Weak) {
        base *= 1.0 - ctx.config.weak_reduction;
    }

    let mut pierce = spec.pierce_multiplier;
    if call.source.is_player() && !ctx.state.counters.first_attack_played {
        let floor = f64::from(ctx.state.player.equipment.first_attack_pierce) / 100.0;
        pierce = pierce.max(floor);
    }
    let pierce = pierce.clamp(0.0, 1.0);

    for _ in 0..spec.hits.max(1) {
        for &target in targets {
            if !ctx.state.is_alive(target) {
                continue;
            }
            let strike = strike(ctx, spec, call, &attacker, base, pierce, target);
            on_hit(ctx, spec, call, target, strike);
            if ctx.state.is_over() {
                return;
            }
            if strike.killed {
                on_kill(ctx, spec, class, call, target);
                if ctx.state.is_over() {
                    return;
                }
            }
        }
    }
}

/// Extra damage from spending player charge.
fn consume_charge(
    ctx: &mut EffectContext<'_>,
    spec: &DamageSpec,
    call: &EffectCall,
    attacker: &Combatant,
) -> f64 {
    let Some(consumption) = &spec.consume_charge else {
        return 0.0;
    };
    if !call.source.is_player() {
        return 0.0;
    }
    let used = ctx.state.player.charge.min(consumption.max);
    if used == 0 {
        return 0.0;
    }
    ctx.state.player.charge -= used;
    ctx.log(LogKind::Card, format!("Consumed {used} charge"));
    if consumption.draw > 0 {
        cards::draw_cards(ctx, consumption.draw);
    }
    if consumption.discard > 0 {
        cards::discard_random(ctx, consumption.discard as usize, None, call.depth);
    }
    f64::from(used) * consumption.per_charge * f64::from(attacker.attack)
}

/// One-shot empower multiplier; the buff is removed once used.
fn consume_empower(ctx: &mut EffectContext<'_>, source: EntityId) -> f64 {
    let Some(stats) = ctx.state.combatant_mut(source) else {
        return 1.0;
    };
    match stats.status_effects.remove(StatusId::Empower) {
        Some(empower) => 1.0 + f64::from(empower.value) / 100.0,
        None => 1.0,
    }
}

fn strike(
    ctx: &mut EffectContext<'_>,
    spec: &DamageSpec,
    call: &EffectCall,
    attacker: &Combatant,
    base: f64,
    pierce: f64,
    target: EntityId,
) -> Strike {
    let Some(defender) = ctx.state.combatant(target) else {
        return Strike::default();
    };

    let mut bonus = 0.0;
    if defender.status_effects.has(StatusId::Bleed) {
        bonus += spec.bonus_vs_bleed;
    }
    if defender.status_effects.has_debuff() {
        bonus += spec.bonus_vs_debuffed;
    }
    let ratio = defender.hp_ratio();
    if ratio <= LOW_HEALTH_RATIO {
        bonus += spec.low_health_bonus;
    }
    if ratio >= HIGH_HEALTH_RATIO {
        bonus += spec.high_health_bonus;
    }
    let mut amount = base * (1.0 + bonus);
    if defender.status_effects.has(StatusId::Vulnerable) {
        amount += ctx.config.vulnerable_bonus * f64::from(attacker.attack);
    }
    let amount = amount.round().max(0.0) as i32;

    // Counter-stance reflects the next hostile hit on the player.
    if target.is_player()
        && !call.source.is_player_side(ctx.state)
        && defender.status_effects.has(StatusId::Counter)
    {
        ctx.state.player.stats.status_effects.remove(StatusId::Counter);
        let reflected = (f64::from(amount) * ctx.config.counter_multiplier).round() as i32;
        reflect(ctx, call.source.entity(), reflected, call.depth + 1);
        return Strike::default();
    }

    let pierced = (f64::from(amount) * pierce * ctx.config.pierce_efficiency).round() as i32;
    let normal = (f64::from(amount) * (1.0 - pierce)).round() as i32;
    let outcome = deal_damage(ctx, target, pierced, normal);

    if call.source.is_player_side(ctx.state) && outcome.hp_damage > 0 {
        splash_chaining(ctx, target, call.depth + 1);
    }
    outcome
}

/// Applies a split hit: `normal` goes through block, the rest of the
/// penetrating damage is reduced by defense with a floor of 1.
pub(crate) fn deal_damage(
    ctx: &mut EffectContext<'_>,
    target: EntityId,
    pierced: i32,
    normal: i32,
) -> Strike {
    let Some(defender) = ctx.state.combatant_mut(target) else {
        return Strike::default();
    };
    let was_alive = defender.is_alive();
    let remaining = defender.absorb(normal.max(0));
    let penetrating = pierced.max(0) + remaining;
    let hp_damage = if penetrating > 0 {
        (penetrating - defender.defense).max(1)
    } else {
        0
    };
    let lost = defender.lose_hp(hp_damage);
    let killed = was_alive && !defender.is_alive();

    if target.is_player() {
        ctx.state.counters.damage_taken += lost;
    }
    let name = ctx.name(target);
    if lost > 0 {
        ctx.log(LogKind::Damage, format!("{name} takes {lost} damage"));
        ctx.state.trigger_animation(target, AnimationKind::Hit);
    } else {
        ctx.log(LogKind::Block, format!("{name} blocks the hit"));
        ctx.state.trigger_animation(target, AnimationKind::Block);
    }
    Strike {
        hp_damage: lost,
        fully_blocked: remaining <= 0 && normal > 0,
        killed,
    }
}

fn reflect(ctx: &mut EffectContext<'_>, attacker: EntityId, amount: i32, depth: u32) {
    ctx.log(LogKind::Status, "Counter! The attack is turned back");
    let strike = deal_damage(ctx, attacker, 0, amount);
    if strike.killed {
        handle_death(ctx, attacker, depth);
    }
}

/// Chaining splashes its stack count to every other enemy and loses a stack.
fn splash_chaining(ctx: &mut EffectContext<'_>, target: EntityId, depth: u32) {
    let Some(chaining) = ctx
        .state
        .combatant(target)
        .and_then(|s| s.status_effects.get(StatusId::Chaining))
        .map(|s| s.value)
    else {
        return;
    };
    if let Some(stats) = ctx.state.combatant_mut(target) {
        stats.status_effects.consume(StatusId::Chaining, 1);
    }
    let others: Vec<EntityId> = ctx
        .state
        .alive_enemy_ids()
        .into_iter()
        .filter(|id| *id != target)
        .collect();
    for other in others {
        let strike = deal_damage(ctx, other, chaining, 0);
        if strike.killed {
            handle_death(ctx, other, depth);
            if ctx.state.is_over() {
                return;
            }
        }
    }
}

fn on_hit(
    ctx: &mut EffectContext<'_>,
    spec: &DamageSpec,
    call: &EffectCall,
    target: EntityId,
    strike: Strike,
) {
    if strike.hp_damage > 0
        && let Some(effect) = &spec.on_hp_damage
    {
        apply_effect(ctx, effect, &call.nested(Some(target)));
    }
    if strike.fully_blocked
        && let Some(effect) = &spec.on_blocked
    {
        apply_effect(ctx, effect, &call.nested(Some(target)));
    }
    if call.source == EffectSource::Player && strike.hp_damage > 0 && !strike.killed {
        equipment_procs(ctx, target);
    }
}

fn equipment_procs(ctx: &mut EffectContext<'_>, target: EntityId) {
    let equipment = ctx.state.player.equipment.clone();
    let attack = ctx.state.player.stats.attack;
    let procs = [
        (StatusId::Burn, equipment.on_hit_burn),
        (StatusId::Bleed, equipment.on_hit_bleed),
    ];
    for (status, proc_chance) in procs {
        let Some(proc_chance) = proc_chance else {
            continue;
        };
        if ctx.state.roll_percent(ctx.rng, proc_chance.chance) {
            let effect =
                StatusEffect::new(status, proc_chance.stacks, 0).with_source_attack(attack);
            super::apply_status_to(ctx, EffectSource::Player, target, effect);
        }
    }
}

fn on_kill(
    ctx: &mut EffectContext<'_>,
    spec: &DamageSpec,
    class: Option<TargetClass>,
    call: &EffectCall,
    target: EntityId,
) {
    if let Some(hook) = &spec.on_kill {
        let source = call.source.entity();
        if hook.heal > 0
            && let Some(stats) = ctx.state.combatant_mut(source)
        {
            let healed = stats.heal(hook.heal);
            if healed > 0 {
                let name = ctx.name(source);
                ctx.log(LogKind::Heal, format!("{name} heals {healed}"));
            }
        }
        if hook.draw > 0 && call.source.is_player() {
            cards::draw_cards(ctx, hook.draw);
        }
    }

    handle_death(ctx, target, call.depth + 1);
    if ctx.state.is_over() {
        return;
    }

    if spec.on_kill.as_ref().is_some_and(|hook| hook.recast) {
        let recast = call.nested(None);
        if recast.depth > ctx.config.max_effect_depth {
            return;
        }
        let targets = resolve_targets(
            ctx.state,
            ctx.rng,
            ctx.config,
            call.source,
            class,
            None,
        );
        if targets.is_empty() {
            return;
        }
        ctx.log(LogKind::Card, "Recast!");
        resolve_damage(ctx, spec, class, &recast, &targets);
    }
}
