//! Deaths, reinforcements, construct removal and enemy intent planning.

use crate::action::{EffectSource, EnemyEffectSpec};
use crate::state::{AnimationKind, CombatPhase, EnemyId, EntityId, LogKind, Owner};

use super::{EffectCall, EffectContext, apply_effect, cards};

/// Runs everything that follows an hp-crossing-zero event.
///
/// Callers must invoke this exactly once per death.
pub(crate) fn handle_death(ctx: &mut EffectContext<'_>, entity: EntityId, depth: u32) {
    if entity.is_player() {
        if !ctx.state.is_over() {
            ctx.log(LogKind::Defeat, "You have been defeated");
            ctx.state.trigger_animation(EntityId::PLAYER, AnimationKind::Death);
            ctx.state.phase = CombatPhase::Defeat;
        }
        return;
    }
    if ctx.state.construct(entity).is_some() {
        destroy_construct(ctx, entity, depth);
        return;
    }
    let Some(enemy) = ctx.state.enemy(entity) else {
        return;
    };
    let template = enemy.template.clone();
    let name = enemy.name.clone();

    ctx.log(LogKind::Enemy, format!("{name} is destroyed"));
    ctx.state.trigger_animation(entity, AnimationKind::Death);
    ctx.state.enemy_actions.remove(&entity);

    if let Some(effect) = ctx.enemy_template(&template).and_then(|t| t.on_death) {
        let call = EffectCall::passive(EffectSource::Enemy(entity), depth + 1);
        apply_effect(ctx, &effect, &call);
    }

    let owned: Vec<EntityId> = ctx
        .state
        .constructs
        .iter()
        .filter(|c| c.owner == Owner::Enemy(entity))
        .map(|c| c.id)
        .collect();
    for id in owned {
        destroy_construct(ctx, id, depth);
    }

    backfill_reinforcements(ctx);
    check_victory(ctx);
}

/// Removes a construct, then fires its on-destroy effect for the owner.
pub(crate) fn destroy_construct(ctx: &mut EffectContext<'_>, id: EntityId, depth: u32) {
    let Some(index) = ctx.state.constructs.iter().position(|c| c.id == id) else {
        return;
    };
    let construct = ctx.state.constructs.remove(index);
    ctx.log(LogKind::Construct, format!("{} collapses", construct.name));
    ctx.state.trigger_animation(id, AnimationKind::Death);

    let Some(effect) = ctx
        .construct_template(&construct.template)
        .and_then(|t| t.on_destroy)
    else {
        return;
    };
    let source = match construct.owner {
        Owner::Player => EffectSource::Player,
        Owner::Enemy(owner) if ctx.state.is_alive(owner) => EffectSource::Enemy(owner),
        Owner::Enemy(_) => return,
    };
    let call = EffectCall {
        target: construct.target,
        ..EffectCall::passive(source, depth + 1)
    };
    apply_effect(ctx, &effect, &call);
}

/// Destroys every construct at hp zero or below.
pub(crate) fn collect_dead_constructs(ctx: &mut EffectContext<'_>) {
    let dead: Vec<EntityId> = ctx
        .state
        .constructs
        .iter()
        .filter(|c| !c.is_alive())
        .map(|c| c.id)
        .collect();
    for id in dead {
        destroy_construct(ctx, id, 0);
    }
}

pub(crate) fn check_victory(ctx: &mut EffectContext<'_>) {
    if ctx.state.is_over() {
        return;
    }
    if ctx.state.alive_enemies().next().is_none() && ctx.state.reinforcements.is_empty() {
        ctx.log(LogKind::Victory, "Victory! All enemies defeated");
        ctx.state.phase = CombatPhase::Victory;
    }
}

fn backfill_reinforcements(ctx: &mut EffectContext<'_>) {
    while ctx.state.alive_enemies().count() < ctx.config.max_active_enemies {
        let Some(template) = ctx.state.reinforcements.pop_front() else {
            break;
        };
        if spawn_enemy(ctx, &template).is_some() {
            ctx.log(LogKind::Enemy, "Reinforcements arrive");
        }
    }
}

/// Adds a fresh enemy to the roster.
///
/// Arrivals during the player turn plan their actions at once. Arrivals
/// during the enemy turn stay unplanned and first act next enemy turn.
pub(crate) fn spawn_enemy(ctx: &mut EffectContext<'_>, template_id: &EnemyId) -> Option<EntityId> {
    let template = ctx.enemy_template(template_id)?;
    let id = ctx.state.allocate_entity_id();
    let enemy = template.to_enemy(id);
    ctx.log(LogKind::Enemy, format!("{} enters the fight", enemy.name));
    ctx.state.enemies.push(enemy);
    ctx.state.trigger_animation(id, AnimationKind::Summon);
    if !ctx.state.phase.is_enemy_turn() {
        plan_enemy(ctx, id);
    }
    Some(id)
}

/// Fills the action queue of every alive enemy for the coming enemy turn.
pub(crate) fn plan_intents(ctx: &mut EffectContext<'_>) {
    ctx.state.enemy_actions.clear();
    for id in ctx.state.alive_enemy_ids() {
        plan_enemy(ctx, id);
    }
}

/// Surges once entropy reaches the template threshold, otherwise follows
/// the pattern. Entropy accumulates after every plan.
fn plan_enemy(ctx: &mut EffectContext<'_>, id: EntityId) {
    let Some(template_id) = ctx.state.enemy(id).map(|e| e.template.clone()) else {
        return;
    };
    let Some(template) = ctx.enemy_template(&template_id) else {
        return;
    };
    let Some(enemy) = ctx.state.enemy_mut(id) else {
        return;
    };

    let surging = template.entropy_threshold > 0
        && enemy.entropy >= template.entropy_threshold
        && !template.surge.is_empty();
    let actions = if surging {
        enemy.entropy = 0;
        template.surge.clone()
    } else if template.pattern.is_empty() {
        Vec::new()
    } else {
        let step = template.pattern[enemy.intent_cursor % template.pattern.len()].clone();
        enemy.intent_cursor += 1;
        step
    };
    enemy.entropy += template.entropy_per_turn;
    let name = enemy.name.clone();

    if surging {
        ctx.log(LogKind::Enemy, format!("{name} surges with entropy"));
        ctx.state.trigger_animation(id, AnimationKind::Shake);
    }
    ctx.state.enemy_actions.insert(id, actions);
}

/// Extras an enemy action card carries beyond the shared primitives.
pub(super) fn apply_enemy_extras(
    ctx: &mut EffectContext<'_>,
    spec: &EnemyEffectSpec,
    enemy: EntityId,
    depth: u32,
) {
    if spec.force_discard > 0 {
        cards::discard_random(ctx, spec.force_discard, None, depth);
    }

    for template in &spec.summon {
        if ctx.state.is_over() {
            return;
        }
        if ctx.state.alive_enemies().count() < ctx.config.max_active_enemies {
            spawn_enemy(ctx, template);
        } else {
            ctx.log(LogKind::Enemy, format!("{template} waits in reserve"));
            ctx.state.reinforcements.push_back(template.clone());
        }
    }

    if spec.entropy != 0
        && let Some(state) = ctx.state.enemy_mut(enemy)
    {
        state.entropy = (state.entropy + spec.entropy).max(0);
    }

    if spec.recoil > 0
        && let Some(stats) = ctx.state.combatant_mut(enemy)
    {
        let was_alive = stats.is_alive();
        let lost = stats.lose_hp(spec.recoil);
        let dead = was_alive && !stats.is_alive();
        let name = ctx.name(enemy);
        ctx.log(LogKind::Damage, format!("{name} suffers {lost} recoil"));
        if dead {
            handle_death(ctx, enemy, depth);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{add_enemy, player_state};
    use super::*;
    use crate::action::CardEffect;
    use crate::config::CombatConfig;
    use crate::env::{ContentTables, EnemyTemplate, PcgRng};
    use crate::state::{CardId, CombatState};

    fn tables() -> ContentTables {
        ContentTables::new()
            .with_enemy(
                EnemyTemplate::new("drone", 20, 4)
                    .with_pattern(vec![vec![CardId::from("zap")], vec![CardId::from("shield")]]),
            )
            .with_enemy(EnemyTemplate::new("warden", 30, 6))
    }

    fn with_ctx(state: &mut CombatState, f: impl FnOnce(&mut EffectContext<'_>)) {
        let tables = tables();
        let config = CombatConfig::default();
        let mut ctx = EffectContext::new(state, tables.env(&config, &PcgRng)).unwrap();
        f(&mut ctx);
    }

    #[test]
    fn death_backfills_from_reinforcements() {
        let mut state = player_state();
        let enemy = add_enemy(&mut state, 10);
        state.reinforcements.push_back(EnemyId::from("warden"));
        state.enemies[0].stats.hp = 0;

        with_ctx(&mut state, |ctx| handle_death(ctx, enemy, 0));

        assert_eq!(state.phase, CombatPhase::PlayerTurn);
        assert!(state.reinforcements.is_empty());
        assert_eq!(state.alive_enemies().count(), 1);
        assert_eq!(state.enemies[1].name, "warden");
        assert!(state.enemy_actions.contains_key(&state.enemies[1].id));
    }

    #[test]
    fn last_death_without_reserves_is_victory() {
        let mut state = player_state();
        let enemy = add_enemy(&mut state, 10);
        state.enemies[0].stats.hp = 0;

        with_ctx(&mut state, |ctx| handle_death(ctx, enemy, 0));

        assert_eq!(state.phase, CombatPhase::Victory);
    }

    #[test]
    fn player_death_is_defeat() {
        let mut state = player_state();
        add_enemy(&mut state, 10);
        state.player.stats.hp = 0;

        with_ctx(&mut state, |ctx| handle_death(ctx, EntityId::PLAYER, 0));

        assert_eq!(state.phase, CombatPhase::Defeat);
    }

    #[test]
    fn intents_cycle_through_the_pattern() {
        let mut state = player_state();
        let enemy = add_enemy(&mut state, 10);

        with_ctx(&mut state, plan_intents);
        assert_eq!(state.enemy_actions[&enemy], vec![CardId::from("zap")]);
        with_ctx(&mut state, plan_intents);
        assert_eq!(state.enemy_actions[&enemy], vec![CardId::from("shield")]);
        with_ctx(&mut state, plan_intents);
        assert_eq!(state.enemy_actions[&enemy], vec![CardId::from("zap")]);
    }

    #[test]
    fn summons_past_the_cap_are_queued() {
        let mut state = player_state();
        let boss = add_enemy(&mut state, 50);
        add_enemy(&mut state, 10);
        add_enemy(&mut state, 10);

        let effect = CardEffect {
            enemy: Some(EnemyEffectSpec {
                summon: vec![EnemyId::from("warden")],
                ..EnemyEffectSpec::default()
            }),
            ..CardEffect::default()
        };
        with_ctx(&mut state, |ctx| {
            apply_effect(ctx, &effect, &EffectCall::passive(EffectSource::Enemy(boss), 0));
        });

        assert_eq!(state.enemies.len(), 3);
        assert_eq!(state.reinforcements, vec![EnemyId::from("warden")]);
    }

    #[test]
    fn summons_join_the_field_with_planned_actions() {
        let mut state = player_state();
        let boss = add_enemy(&mut state, 50);

        let effect = CardEffect {
            enemy: Some(EnemyEffectSpec {
                summon: vec![EnemyId::from("drone")],
                ..EnemyEffectSpec::default()
            }),
            ..CardEffect::default()
        };
        with_ctx(&mut state, |ctx| {
            apply_effect(ctx, &effect, &EffectCall::passive(EffectSource::Enemy(boss), 0));
        });

        assert_eq!(state.enemies.len(), 2);
        let summoned = &state.enemies[1];
        assert_eq!(summoned.template, EnemyId::from("drone"));
        assert_eq!(summoned.stats.hp, 20);
        assert!(summoned.is_alive());
        assert_eq!(state.enemy_actions[&summoned.id], vec![CardId::from("zap")]);
        assert!(state.reinforcements.is_empty());
    }

    #[test]
    fn enemy_turn_arrivals_wait_for_the_next_plan() {
        let mut state = player_state();
        let boss = add_enemy(&mut state, 50);
        state.phase = CombatPhase::EnemyTurn {
            enemy_index: 0,
            action_index: 1,
        };

        let effect = CardEffect {
            enemy: Some(EnemyEffectSpec {
                summon: vec![EnemyId::from("drone")],
                ..EnemyEffectSpec::default()
            }),
            ..CardEffect::default()
        };
        with_ctx(&mut state, |ctx| {
            apply_effect(ctx, &effect, &EffectCall::passive(EffectSource::Enemy(boss), 0));
        });

        let summoned = state.enemies[1].id;
        assert!(state.is_alive(summoned));
        assert!(!state.enemy_actions.contains_key(&summoned));

        with_ctx(&mut state, plan_intents);
        assert_eq!(state.enemy_actions[&summoned], vec![CardId::from("zap")]);
    }
}
