//! Block, resource and post-play passive clauses.

use crate::action::{BlockSpec, EffectSource, ResourceSpec};
use crate::state::{
    AnimationKind, CardType, EntityId, LogKind, PERMANENT_DURATION, StatusEffect, StatusId,
};

use super::{EffectCall, EffectContext, apply_effect, apply_status_to, cards};

pub(super) fn gain_block(
    ctx: &mut EffectContext<'_>,
    spec: &BlockSpec,
    call: &EffectCall,
    primary: Option<EntityId>,
) {
    let source = call.source.entity();
    let power = match call.source {
        EffectSource::Player => ctx.state.player.block_power,
        _ => ctx.state.combatant(source).map(|s| s.attack).unwrap_or(0),
    };
    let mut amount = spec.multiplier * f64::from(power);
    if call.source.is_player() {
        if call.card_type == Some(CardType::Skill) {
            let bonus = f64::from(ctx.state.player.equipment.skill_block_bonus) / 100.0;
            amount *= 1.0 + bonus;
        }
        amount += spec.per_charge * f64::from(ctx.state.player.charge) * f64::from(power);
    }
    let amount = amount.round().max(0.0) as i32;

    if amount > 0
        && let Some(stats) = ctx.state.combatant_mut(source)
    {
        stats.gain_block(amount);
        let name = ctx.name(source);
        ctx.log(LogKind::Block, format!("{name} gains {amount} block"));
        ctx.state.trigger_animation(source, AnimationKind::Block);
    }

    if let Some(bonus) = &spec.bonus
        && bonus.condition.evaluate(ctx.state, source, primary)
    {
        apply_effect(ctx, &bonus.effect, &call.nested(primary));
    }
}

pub(super) fn apply_resources(ctx: &mut EffectContext<'_>, spec: &ResourceSpec, call: &EffectCall) {
    let source = call.source.entity();
    if spec.heal > 0 {
        heal(ctx, source, spec.heal);
    }
    if !call.source.is_player() {
        return;
    }
    if spec.draw > 0 {
        cards::draw_cards(ctx, spec.draw);
    }
    if spec.gain_charge > 0 {
        gain_charge(ctx, spec.gain_charge);
    }
    if spec.gain_cp > 0 {
        gain_cp(ctx, spec.gain_cp);
    }
    if spec.gain_entropy > 0 {
        ctx.state.player.entropy += spec.gain_entropy;
        let entropy = ctx.state.player.entropy;
        ctx.log(LogKind::Info, format!("Entropy rises to {entropy}"));
    }
    if spec.counter_stance {
        let stance = StatusEffect::new(StatusId::Counter, 1, PERMANENT_DURATION);
        apply_status_to(ctx, call.source, EntityId::PLAYER, stance);
    }
}

/// Post-play passives: play-count milestones and power-card healing.
pub(super) fn play_passives(ctx: &mut EffectContext<'_>, card_type: CardType) {
    let equipment = ctx.state.player.equipment.clone();
    if let Some(milestone) = equipment.play_milestone
        && milestone.every > 0
        && ctx.state.counters.cards_played > 0
        && ctx.state.counters.cards_played % milestone.every == 0
    {
        if milestone.draw > 0 {
            cards::draw_cards(ctx, milestone.draw);
        }
        if milestone.heal > 0 {
            heal(ctx, EntityId::PLAYER, milestone.heal);
        }
    }
    if card_type == CardType::Power && equipment.power_heal > 0 {
        heal(ctx, EntityId::PLAYER, equipment.power_heal);
    }
}

pub(crate) fn heal(ctx: &mut EffectContext<'_>, entity: EntityId, amount: i32) {
    let Some(stats) = ctx.state.combatant_mut(entity) else {
        return;
    };
    let healed = stats.heal(amount);
    if healed > 0 {
        let name = ctx.name(entity);
        ctx.log(LogKind::Heal, format!("{name} heals {healed}"));
        ctx.state.trigger_animation(entity, AnimationKind::Heal);
    }
}

pub(crate) fn gain_charge(ctx: &mut EffectContext<'_>, amount: u32) {
    let player = &mut ctx.state.player;
    let before = player.charge;
    player.charge = (player.charge + amount).min(ctx.config.max_charge);
    let gained = player.charge - before;
    if gained > 0 {
        ctx.log(LogKind::Info, format!("Gained {gained} charge"));
    }
}

pub(crate) fn gain_cp(ctx: &mut EffectContext<'_>, amount: i32) {
    let player = &mut ctx.state.player;
    let before = player.cp;
    player.cp = (player.cp + amount).min(player.max_cp).max(before);
    let gained = player.cp - before;
    if gained > 0 {
        ctx.log(LogKind::Info, format!("Gained {gained} CP"));
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{add_enemy, player_state};
    use super::super::{EffectCall, EffectContext, apply_effect};
    use crate::action::{
        BlockSpec, BonusBlock, CardEffect, Condition, ConditionalEffect, EffectSource,
        ResourceSpec, TargetClass,
    };
    use crate::config::CombatConfig;
    use crate::env::{ContentTables, PcgRng};
    use crate::state::{CardType, StatusId};

    fn resolve(state: &mut crate::state::CombatState, effect: &CardEffect, card_type: CardType) {
        let tables = ContentTables::new();
        let config = CombatConfig::default();
        let mut ctx = EffectContext::new(state, tables.env(&config, &PcgRng)).unwrap();
        let call = EffectCall {
            card_type: Some(card_type),
            ..EffectCall::passive(EffectSource::Player, 0)
        };
        apply_effect(&mut ctx, effect, &call);
    }

    #[test]
    fn skill_block_uses_block_power_and_equipment_bonus() {
        let mut state = player_state();
        state.player.equipment.skill_block_bonus = 50;

        resolve(&mut state, &CardEffect::block(2.0), CardType::Skill);

        // 2.0 x 5 block power x 1.5
        assert_eq!(state.player.stats.block, 15);
    }

    #[test]
    fn charge_and_cp_are_capped() {
        let mut state = player_state();
        state.player.cp = 9;
        let effect = CardEffect::resources(ResourceSpec {
            gain_charge: 50,
            gain_cp: 5,
            counter_stance: true,
            ..ResourceSpec::default()
        });

        resolve(&mut state, &effect, CardType::Skill);

        assert_eq!(state.player.charge, CombatConfig::DEFAULT_MAX_CHARGE);
        assert_eq!(state.player.cp, 10);
        assert!(state.player.stats.status_effects.has(StatusId::Counter));
    }

    #[test]
    fn power_cards_trigger_power_heal() {
        let mut state = player_state();
        state.player.stats.hp = 50;
        state.player.equipment.power_heal = 4;

        resolve(&mut state, &CardEffect::default(), CardType::Power);

        assert_eq!(state.player.stats.hp, 54);
    }

    #[test]
    fn block_bonus_needs_its_condition() {
        let effect = CardEffect {
            block: Some(BlockSpec {
                bonus: Some(BonusBlock {
                    condition: Condition::MinCharge(3),
                    effect: Box::new(CardEffect::block(1.0)),
                }),
                ..BlockSpec::new(1.0)
            }),
            ..CardEffect::default()
        };

        let mut state = player_state();
        state.player.charge = 2;
        resolve(&mut state, &effect, CardType::Skill);
        assert_eq!(state.player.stats.block, 5);

        let mut state = player_state();
        state.player.charge = 3;
        resolve(&mut state, &effect, CardType::Skill);
        assert_eq!(state.player.stats.block, 10);
    }

    #[test]
    fn conditional_picks_a_branch_from_the_target() {
        let gain = |gain_charge| {
            Box::new(CardEffect::resources(ResourceSpec {
                gain_charge,
                ..ResourceSpec::default()
            }))
        };
        let effect = CardEffect {
            target: Some(TargetClass::Enemy),
            conditional: Some(ConditionalEffect {
                condition: Condition::TargetHpBelow(50),
                then: gain(3),
                otherwise: Some(gain(1)),
            }),
            ..CardEffect::default()
        };
        let mut state = player_state();
        add_enemy(&mut state, 20);

        resolve(&mut state, &effect, CardType::Skill);
        assert_eq!(state.player.charge, 1);

        state.enemies[0].stats.hp = 5;
        resolve(&mut state, &effect, CardType::Skill);
        assert_eq!(state.player.charge, 4);
    }

    #[test]
    fn conditional_without_otherwise_does_nothing_when_false() {
        let effect = CardEffect {
            conditional: Some(ConditionalEffect {
                condition: Condition::SourceHasStatus(StatusId::Empower),
                then: Box::new(CardEffect::block(2.0)),
                otherwise: None,
            }),
            ..CardEffect::default()
        };
        let mut state = player_state();

        resolve(&mut state, &effect, CardType::Skill);

        assert_eq!(state.player.stats.block, 0);
    }
}
