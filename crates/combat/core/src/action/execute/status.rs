//! Status application and consumption clauses.

use crate::action::{ConsumeStatusSpec, EffectSource, StatusApplication};
use crate::state::{AnimationKind, EntityId, LogKind, StatusData, StatusEffect, StatusKind};

use super::{EffectCall, EffectContext, handle_death, resources};

pub(super) fn apply_statuses(
    ctx: &mut EffectContext<'_>,
    applications: &[StatusApplication],
    call: &EffectCall,
    targets: &[EntityId],
) {
    let source = call.source.entity();
    let source_attack = ctx.state.combatant(source).map(|s| s.attack).unwrap_or(0);
    for application in applications {
        let recipients = if application.on_self {
            vec![source]
        } else {
            targets.to_vec()
        };
        for recipient in recipients {
            let mut effect =
                StatusEffect::new(application.status, application.value, application.duration)
                    .with_source_attack(source_attack);
            if !application.pending_cards.is_empty() {
                effect = effect.with_data(StatusData::PendingCards(application.pending_cards.clone()));
            }
            apply_status_to(ctx, call.source, recipient, effect);
        }
    }
}

/// Puts one status on `recipient`, honouring the stacking rule of its id.
///
/// Debuffs landed by the player side on enemies count towards the turn's
/// debuff counter and may grant charge through equipment.
pub(crate) fn apply_status_to(
    ctx: &mut EffectContext<'_>,
    source: EffectSource,
    recipient: EntityId,
    mut effect: StatusEffect,
) {
    if !ctx.state.is_alive(recipient) {
        return;
    }
    if let Some(template) = ctx
        .env
        .statuses()
        .ok()
        .and_then(|statuses| statuses.status(effect.id))
    {
        effect.name = template.name;
    }

    let name = effect.name.clone();
    let shown = effect.stacks();
    let is_debuff = effect.kind == StatusKind::Debuff;
    let Some(stats) = ctx.state.combatant_mut(recipient) else {
        return;
    };
    stats.status_effects.apply(effect);

    let who = ctx.name(recipient);
    ctx.log(LogKind::Status, format!("{who} gains {name} ({shown})"));
    ctx.state.trigger_animation(recipient, AnimationKind::Status);

    if is_debuff && !recipient.is_player() && source.is_player_side(ctx.state) {
        ctx.state.counters.debuffs_applied += 1;
        let every = ctx.state.player.equipment.charge_every_n_debuffs;
        if every > 0 && ctx.state.counters.debuffs_applied % every == 0 {
            resources::gain_charge(ctx, 1);
        }
    }
}

pub(super) fn consume_status(
    ctx: &mut EffectContext<'_>,
    spec: &ConsumeStatusSpec,
    call: &EffectCall,
    primary: Option<EntityId>,
) {
    let source = call.source.entity();
    let holder = if spec.from_self { Some(source) } else { primary };
    let Some(holder) = holder else {
        return;
    };
    let Some(stats) = ctx.state.combatant_mut(holder) else {
        return;
    };
    let available = stats.status_effects.stacks(spec.status);
    if available <= 0 {
        tracing::debug!("no {} stacks to consume on {}", spec.status, holder);
        return;
    }
    let template = stats.status_effects.get(spec.status).cloned();
    let consumed = stats
        .status_effects
        .consume(spec.status, spec.stacks.unwrap_or(available));
    let remaining = stats.status_effects.stacks(spec.status);
    let holder_name = ctx.name(holder);
    ctx.log(
        LogKind::Status,
        format!("{holder_name} loses {consumed} {}", spec.status),
    );

    if spec.damage_per_stack > 0 {
        let victim = if spec.from_self { primary } else { Some(holder) };
        if let Some(victim) = victim {
            let strike = super::damage::deal_damage(ctx, victim, consumed * spec.damage_per_stack, 0);
            if strike.killed {
                handle_death(ctx, victim, call.depth + 1);
                if ctx.state.is_over() {
                    return;
                }
            }
        }
    }
    if spec.heal_per_stack > 0 {
        resources::heal(ctx, source, consumed * spec.heal_per_stack);
    }
    if spec.block_per_stack > 0
        && let Some(stats) = ctx.state.combatant_mut(source)
    {
        stats.gain_block(consumed * spec.block_per_stack);
    }
    if spec.cp_per_stack > 0 && call.source.is_player() {
        resources::gain_cp(ctx, consumed * spec.cp_per_stack);
    }

    let Some(template) = template else {
        return;
    };
    let mut remaining = remaining;
    if spec.multiply_remaining >= 2
        && remaining > 0
        && let Some(effect) = ctx
            .state
            .combatant_mut(holder)
            .and_then(|s| s.status_effects.get_mut(spec.status))
    {
        remaining *= spec.multiply_remaining;
        if effect.id.is_stacking() {
            effect.value = remaining;
        } else {
            effect.duration = remaining;
        }
    }
    if spec.spread_remaining && remaining > 0 {
        let others: Vec<EntityId> = ctx
            .state
            .alive_enemy_ids()
            .into_iter()
            .filter(|id| *id != holder)
            .collect();
        for other in others {
            let mut copy = template.clone();
            if copy.id.is_stacking() {
                copy.value = remaining;
            } else {
                copy.duration = remaining;
            }
            apply_status_to(ctx, call.source, other, copy);
        }
    }
}
