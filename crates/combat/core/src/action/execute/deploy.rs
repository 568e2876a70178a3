use crate::action::EffectSource;
use crate::config::CombatConfig;
use crate::state::{AnimationKind, ConstructId, EntityId, LogKind, Owner};

use super::{EffectCall, EffectContext};

/// Deploys a construct for the side of `call.source`.
///
/// Stats scale from the owner. Player-owned constructs lock onto the call
/// target (or the first alive enemy); enemy-owned ones always aim at the
/// player.
pub(super) fn deploy_construct(
    ctx: &mut EffectContext<'_>,
    template_id: &ConstructId,
    call: &EffectCall,
    primary: Option<EntityId>,
) {
    let Some(template) = ctx.construct_template(template_id) else {
        return;
    };
    if ctx.state.constructs.is_full() {
        ctx.log(
            LogKind::Construct,
            format!(
                "{} fizzles: at most {} constructs may be active",
                template.name,
                CombatConfig::MAX_CONSTRUCTS
            ),
        );
        return;
    }

    let owner = match call.source {
        EffectSource::Player => Owner::Player,
        EffectSource::Enemy(id) => Owner::Enemy(id),
        EffectSource::Construct(id) => match ctx.state.construct(id) {
            Some(construct) => construct.owner,
            None => return,
        },
    };
    let owner_stats = match owner {
        Owner::Player => ctx.state.player.stats.clone(),
        Owner::Enemy(id) => match ctx.state.enemy(id) {
            Some(enemy) if enemy.is_alive() => enemy.stats.clone(),
            _ => return,
        },
    };
    let target = match owner {
        Owner::Player => primary
            .filter(|id| !id.is_player())
            .or_else(|| ctx.state.alive_enemy_ids().first().copied()),
        Owner::Enemy(_) => Some(EntityId::PLAYER),
    };

    let id = ctx.state.allocate_entity_id();
    let construct = template.to_construct(id, owner, &owner_stats, target);
    let message = format!(
        "{} deploys {} ({} HP, {} turns)",
        ctx.name(owner.entity()),
        construct.name,
        construct.stats.hp,
        construct.durability
    );
    if ctx.state.constructs.try_push(construct).is_err() {
        return;
    }
    ctx.log(LogKind::Construct, message);
    ctx.state.trigger_animation(id, AnimationKind::Summon);
}

#[cfg(test)]
mod tests {
    use super::super::tests::{add_enemy, player_state};
    use super::super::{EffectContext, apply_effect};
    use super::*;
    use crate::action::CardEffect;
    use crate::env::{ConstructTemplate, ContentTables, PcgRng};

    fn deploy_effect() -> CardEffect {
        CardEffect {
            deploy: Some(ConstructId::from("turret")),
            ..CardEffect::default()
        }
    }

    #[test]
    fn player_turret_scales_from_player_and_targets_first_enemy() {
        let mut state = player_state();
        let first = add_enemy(&mut state, 40);
        add_enemy(&mut state, 40);
        let tables =
            ContentTables::new().with_construct(ConstructTemplate::new("turret", 0.5, 0.5));
        let config = CombatConfig::default();
        let mut ctx = EffectContext::new(&mut state, tables.env(&config, &PcgRng)).unwrap();

        apply_effect(&mut ctx, &deploy_effect(), &EffectCall::passive(EffectSource::Player, 0));

        assert_eq!(state.constructs.len(), 1);
        let turret = &state.constructs[0];
        assert_eq!(turret.owner, Owner::Player);
        assert_eq!(turret.stats.max_hp, 50);
        assert_eq!(turret.stats.attack, 5);
        assert_eq!(turret.target, Some(first));
    }

    #[test]
    fn fourth_construct_is_refused() {
        let mut state = player_state();
        add_enemy(&mut state, 40);
        let tables =
            ContentTables::new().with_construct(ConstructTemplate::new("turret", 0.5, 0.5));
        let config = CombatConfig::default();
        let mut ctx = EffectContext::new(&mut state, tables.env(&config, &PcgRng)).unwrap();

        for _ in 0..4 {
            apply_effect(&mut ctx, &deploy_effect(), &EffectCall::passive(EffectSource::Player, 0));
        }

        assert_eq!(state.constructs.len(), CombatConfig::MAX_CONSTRUCTS);
        assert!(
            state
                .log
                .last()
                .is_some_and(|entry| entry.message.contains("fizzles"))
        );
    }

    #[test]
    fn enemy_construct_aims_at_player() {
        let mut state = player_state();
        let enemy = add_enemy(&mut state, 40);
        let tables =
            ContentTables::new().with_construct(ConstructTemplate::new("turret", 1.0, 1.0));
        let config = CombatConfig::default();
        let mut ctx = EffectContext::new(&mut state, tables.env(&config, &PcgRng)).unwrap();

        apply_effect(&mut ctx, &deploy_effect(), &EffectCall::passive(EffectSource::Enemy(enemy), 0));

        let turret = &state.constructs[0];
        assert_eq!(turret.owner, Owner::Enemy(enemy));
        assert_eq!(turret.target, Some(EntityId::PLAYER));
        assert_eq!(turret.stats.max_hp, 40);
    }
}
