#![allow(dead_code)]

use std::sync::Arc;

use combat_core::{
    CardDefinition, CardEffect, CardId, CardType, CombatConfig, CombatEvent, CombatSetup,
    ContentTables, EnemyId, EnemyTemplate, EquipmentBonuses, PlayerLoadout,
};
use combat_runtime::CombatSession;

pub fn tables() -> Arc<ContentTables> {
    Arc::new(
        ContentTables::new()
            .with_card(CardDefinition::new("jab", 1, CardType::Attack, CardEffect::damage(1.0)))
            .with_card(CardDefinition::new("claw", 0, CardType::Attack, CardEffect::damage(1.0)))
            .with_enemy(EnemyTemplate::new("dummy", 12, 0))
            .with_enemy(
                EnemyTemplate::new("stalker", 60, 4)
                    .with_pattern(vec![vec![CardId::from("claw"), CardId::from("claw")]]),
            ),
    )
}

pub fn setup(enemy: &str) -> CombatSetup {
    let player = PlayerLoadout {
        max_hp: 40,
        hp: None,
        attack: 10,
        defense: 0,
        max_cp: 3,
        block_power: 5,
        deck: vec![CardId::from("jab"); 8],
        equipment: EquipmentBonuses::default(),
    };
    let event = CombatEvent {
        enemies: vec![EnemyId::from(enemy)],
        reinforcements: vec![],
    };
    CombatSetup::new(5, player, event)
}

pub fn session(id: &str, enemy: &str) -> CombatSession {
    CombatSession::start(id, tables(), CombatConfig::default(), setup(enemy))
        .expect("session should start")
}
