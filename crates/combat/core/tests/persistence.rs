//! Snapshot round-trips and digest stability.
#![cfg(feature = "serde")]

use combat_core::{
    CardDefinition, CardEffect, CardId, CardType, CombatCommand, CombatConfig, CombatEngine,
    CombatEvent, CombatSetup, CombatState, ContentTables, EnemyId, EnemyTemplate,
    EquipmentBonuses, PcgRng, PlayerLoadout,
};

fn tables() -> ContentTables {
    ContentTables::new()
        .with_card(CardDefinition::new("jab", 1, CardType::Attack, CardEffect::damage(1.0)))
        .with_card(CardDefinition::new("heavy", 5, CardType::Attack, CardEffect::damage(3.0)))
        .with_card(CardDefinition::new("claw", 0, CardType::Attack, CardEffect::damage(1.0)))
        .with_enemy(
            EnemyTemplate::new("stalker", 60, 5).with_pattern(vec![vec![CardId::from("claw")]]),
        )
}

fn setup_state(tables: &ContentTables, config: &CombatConfig) -> CombatState {
    let player = PlayerLoadout {
        max_hp: 80,
        hp: Some(70),
        attack: 9,
        defense: 1,
        max_cp: 3,
        block_power: 5,
        deck: ["jab", "jab", "heavy", "jab", "heavy", "jab"]
            .into_iter()
            .map(CardId::from)
            .collect(),
        equipment: EquipmentBonuses::default(),
    };
    let event = CombatEvent {
        enemies: vec![EnemyId::from("stalker")],
        reinforcements: vec![EnemyId::from("stalker")],
    };
    CombatSetup::new(99, player, event)
        .build(tables.env(config, &PcgRng))
        .expect("setup should succeed")
}

#[test]
fn json_round_trip_preserves_state_and_behavior() {
    let tables = tables();
    let config = CombatConfig::default();
    let mut state = setup_state(&tables, &config);
    CombatEngine::new(&mut state)
        .execute(tables.env(&config, &PcgRng), &CombatCommand::end_turn())
        .expect("end turn should succeed");

    let json = serde_json::to_string(&state).expect("serialize");
    let mut restored: CombatState = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(restored, state);

    for _ in 0..3 {
        let command = CombatCommand::process_enemy_action();
        let a = CombatEngine::new(&mut state).execute(tables.env(&config, &PcgRng), &command);
        let b = CombatEngine::new(&mut restored).execute(tables.env(&config, &PcgRng), &command);
        assert_eq!(a, b);
    }
    assert_eq!(restored, state);
    assert_eq!(restored.digest().unwrap(), state.digest().unwrap());
}

#[test]
fn rejected_commands_keep_the_digest() {
    let tables = tables();
    let config = CombatConfig::default();
    let mut state = setup_state(&tables, &config);
    let before = hex::encode(state.digest().unwrap());

    let mut engine = CombatEngine::new(&mut state);
    let rejected = [
        CombatCommand::process_enemy_action(),
        CombatCommand::start_player_turn(),
        CombatCommand::choose_effect(0),
        CombatCommand::discard(vec![]),
    ];
    for command in &rejected {
        assert!(engine.execute(tables.env(&config, &PcgRng), command).is_err());
    }
    let heavy = engine
        .state()
        .zones
        .hand
        .iter()
        .find(|c| c.card_id.as_str() == "heavy")
        .map(|c| c.instance_id);
    if let Some(card) = heavy {
        assert!(
            engine
                .execute(tables.env(&config, &PcgRng), &CombatCommand::play(card, None))
                .is_err()
        );
    }

    assert_eq!(hex::encode(state.digest().unwrap()), before);
}

#[test]
fn same_seed_same_combat() {
    let tables = tables();
    let config = CombatConfig::default();
    let a = setup_state(&tables, &config);
    let b = setup_state(&tables, &config);
    assert_eq!(a.digest().unwrap(), b.digest().unwrap());
    assert_eq!(a.reinforcements.len(), 1);
    assert_eq!(a.player.stats.hp, 70);
}
