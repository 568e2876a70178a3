use crate::action::execute::{EffectCall, EffectContext, apply_effect, destroy_construct};
use crate::action::EffectSource;
use crate::state::{EntityId, LogKind};

/// Runs the end-of-turn behaviour of one side's constructs, then wears them
/// down. A construct whose durability reaches zero is destroyed.
pub(crate) fn tick_constructs(ctx: &mut EffectContext<'_>, player_owned: bool) {
    let ids: Vec<EntityId> = ctx
        .state
        .constructs
        .iter()
        .filter(|c| c.is_player_owned() == player_owned)
        .map(|c| c.id)
        .collect();

    for id in ids {
        if ctx.state.is_over() {
            return;
        }
        let Some(construct) = ctx.state.construct(id) else {
            continue;
        };
        if !construct.is_alive() {
            continue;
        }
        let template = construct.template.clone();
        let snapshot = construct.target;

        if let Some(effect) = ctx
            .construct_template(&template)
            .and_then(|t| t.on_turn_end)
        {
            // A dead snapshot target falls back to the effect's own target class.
            let target = snapshot.filter(|t| ctx.state.is_alive(*t));
            let call = EffectCall {
                target,
                ..EffectCall::passive(EffectSource::Construct(id), 0)
            };
            apply_effect(ctx, &effect, &call);
        }

        let Some(construct) = ctx.state.construct_mut(id) else {
            continue;
        };
        construct.durability -= 1;
        if construct.durability <= 0 {
            let name = construct.name.clone();
            ctx.log(LogKind::Construct, format!("{name} winds down"));
            destroy_construct(ctx, id, 0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::CardEffect;
    use crate::config::CombatConfig;
    use crate::env::{ConstructTemplate, ContentTables, PcgRng};
    use crate::state::{
        CombatState, Combatant, ConstructId, EnemyId, EnemyState, Owner, PlayerState,
    };

    fn setup() -> (CombatState, EntityId, ContentTables) {
        let mut state = CombatState::new(3, PlayerState::new(Combatant::new(100, 10, 0), 10, 5));
        let enemy = state.allocate_entity_id();
        state.enemies.push(EnemyState {
            id: enemy,
            template: EnemyId::from("husk"),
            name: "Husk".into(),
            stats: Combatant::new(40, 5, 0),
            entropy: 0,
            intent_cursor: 0,
        });

        let mut template = ConstructTemplate::new("turret", 0.5, 1.0);
        template.durability = 2;
        template.on_turn_end = Some(CardEffect::damage(1.0));
        let construct_id = state.allocate_entity_id();
        let construct = template.to_construct(
            construct_id,
            Owner::Player,
            &state.player.stats.clone(),
            Some(enemy),
        );
        state.constructs.push(construct);
        (state, enemy, ContentTables::new().with_construct(template))
    }

    #[test]
    fn turret_fires_and_wears_out() {
        let (mut state, _, tables) = setup();
        let config = CombatConfig::default();
        {
            let mut ctx = EffectContext::new(&mut state, tables.env(&config, &PcgRng)).unwrap();
            tick_constructs(&mut ctx, true);
        }
        assert_eq!(state.enemies[0].stats.hp, 30);
        assert_eq!(state.constructs[0].durability, 1);

        {
            let mut ctx = EffectContext::new(&mut state, tables.env(&config, &PcgRng)).unwrap();
            tick_constructs(&mut ctx, true);
        }
        assert_eq!(state.enemies[0].stats.hp, 20);
        assert!(state.constructs.is_empty());
    }

    #[test]
    fn only_the_requested_side_ticks() {
        let (mut state, _, tables) = setup();
        let config = CombatConfig::default();
        let mut ctx = EffectContext::new(&mut state, tables.env(&config, &PcgRng)).unwrap();
        tick_constructs(&mut ctx, false);

        assert_eq!(state.enemies[0].stats.hp, 40);
        assert_eq!(state.constructs[0].durability, 2);
        assert_eq!(state.constructs[0].template, ConstructId::from("turret"));
    }
}
