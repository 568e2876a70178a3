//! Building the initial state of a combat wave.

use crate::action::execute::EffectContext;
use crate::env::{CombatEnv, OracleError};
use crate::error::{ErrorSeverity, GameError};
use crate::state::{
    CardId, CombatState, Combatant, EnemyId, EquipmentBonuses, InterimCombatState,
    LogKind, Owner, PlayerState,
};

use super::turns;

/// The player's side of a combat: stats, deck and equipment.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerLoadout {
    pub max_hp: i32,
    /// Current HP carried from earlier fights; `None` starts at full.
    #[cfg_attr(feature = "serde", serde(default))]
    pub hp: Option<i32>,
    pub attack: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub defense: i32,
    pub max_cp: i32,
    pub block_power: i32,
    pub deck: Vec<CardId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub equipment: EquipmentBonuses,
}

/// Enemy roster of one wave.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatEvent {
    /// Enemies that start on the field, in turn order.
    pub enemies: Vec<EnemyId>,
    /// Enemies that arrive as earlier ones fall.
    #[cfg_attr(feature = "serde", serde(default))]
    pub reinforcements: Vec<EnemyId>,
}

/// Everything needed to start a combat.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatSetup {
    pub seed: u64,
    pub player: PlayerLoadout,
    pub event: CombatEvent,
    /// Cards and constructs carried over from the previous wave.
    #[cfg_attr(feature = "serde", serde(default))]
    pub interim: Option<InterimCombatState>,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("combat event has no enemies")]
    EmptyRoster,

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl GameError for SetupError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::EmptyRoster => ErrorSeverity::Validation,
            Self::Oracle(error) => error.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyRoster => "SETUP_EMPTY_ROSTER",
            Self::Oracle(error) => error.error_code(),
        }
    }
}

impl CombatSetup {
    pub fn new(seed: u64, player: PlayerLoadout, event: CombatEvent) -> Self {
        Self {
            seed,
            player,
            event,
            interim: None,
        }
    }

    pub fn with_interim(mut self, interim: InterimCombatState) -> Self {
        self.interim = Some(interim);
        self
    }

    /// Builds the state and runs the first `start_player_turn`.
    ///
    /// Carried hand and discard are shuffled back into the deck; exhausted
    /// cards stay exhausted. Roster entries beyond the active-enemy cap wait
    /// at the front of the reinforcement queue.
    pub fn build(&self, env: CombatEnv<'_>) -> Result<CombatState, SetupError> {
        if self.event.enemies.is_empty() {
            return Err(SetupError::EmptyRoster);
        }
        let cards = env.cards()?;
        let enemies = env.enemies()?;
        let config = env.config()?.combat_config();

        let enemy_templates = self
            .event
            .enemies
            .iter()
            .chain(&self.event.reinforcements)
            .map(|id| {
                enemies
                    .enemy(id)
                    .map(|template| (id.clone(), template))
                    .ok_or_else(|| OracleError::EnemyNotFound(id.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let loadout = &self.player;
        let mut stats = Combatant::new(loadout.max_hp, loadout.attack, loadout.defense);
        if let Some(hp) = loadout.hp {
            stats.hp = hp.clamp(1, stats.max_hp);
        }
        let player = PlayerState::new(stats, loadout.max_cp, loadout.block_power)
            .with_equipment(loadout.equipment.clone());
        let mut state = CombatState::new(self.seed, player);

        // Cards
        let deck: Vec<CardId> = match &self.interim {
            Some(interim) => {
                let zones = &interim.zones;
                for card in &zones.exhaust {
                    let carried = state.new_card(card.card_id.clone());
                    state.zones.exhaust.push(carried);
                }
                zones
                    .deck
                    .iter()
                    .chain(&zones.hand)
                    .chain(&zones.discard)
                    .filter(|card| !card.temporary)
                    .map(|card| card.card_id.clone())
                    .collect()
            }
            None => loadout.deck.clone(),
        };
        for card_id in deck {
            if cards.card(&card_id).is_none() {
                return Err(OracleError::CardNotFound(card_id).into());
            }
            let card = state.new_card(card_id);
            state.zones.deck.push_back(card);
        }

        // Enemies
        let active = self.event.enemies.len().min(config.max_active_enemies.max(1));
        for (index, (template_id, template)) in enemy_templates.iter().enumerate() {
            if index < active {
                let id = state.allocate_entity_id();
                state.enemies.push(template.to_enemy(id));
            } else {
                state.reinforcements.push_back(template_id.clone());
            }
        }

        // Constructs
        if let Some(interim) = &self.interim {
            let target = state.alive_enemy_ids().first().copied();
            for construct in interim.constructs.iter().filter(|c| c.is_alive()) {
                let mut carried = construct.clone();
                carried.id = state.allocate_entity_id();
                carried.owner = Owner::Player;
                carried.target = target;
                carried.stats.block = 0;
                if state.constructs.try_push(carried).is_err() {
                    break;
                }
            }
        }

        let rng = env.rng()?;
        state.shuffle_deck(rng);
        let names: Vec<String> = state.enemies.iter().map(|e| e.name.clone()).collect();
        state.push_log(
            LogKind::Info,
            format!("Combat begins against {}", names.join(", ")),
        );
        tracing::info!(
            seed = self.seed,
            enemies = state.enemies.len(),
            reinforcements = state.reinforcements.len(),
            deck = state.zones.deck.len(),
            "combat set up"
        );

        {
            let mut ctx = EffectContext::new(&mut state, env)?;
            turns::start_player_turn(&mut ctx);
        }
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::CardEffect;
    use crate::config::CombatConfig;
    use crate::env::{CardDefinition, ContentTables, EnemyTemplate, PcgRng};
    use crate::state::{CardType, CombatPhase};

    fn tables() -> ContentTables {
        ContentTables::new()
            .with_card(CardDefinition::new("jab", 1, CardType::Attack, CardEffect::damage(1.0)))
            .with_enemy(EnemyTemplate::new("grunt", 20, 3))
            .with_enemy(EnemyTemplate::new("brute", 40, 6))
    }

    fn loadout(cards: usize) -> PlayerLoadout {
        PlayerLoadout {
            max_hp: 60,
            hp: None,
            attack: 10,
            defense: 0,
            max_cp: 3,
            block_power: 5,
            deck: vec![CardId::from("jab"); cards],
            equipment: EquipmentBonuses::default(),
        }
    }

    #[test]
    fn build_starts_the_first_turn() {
        let tables = tables();
        let config = CombatConfig::default();
        let setup = CombatSetup::new(
            42,
            loadout(8),
            CombatEvent {
                enemies: vec![EnemyId::from("grunt"), EnemyId::from("brute")],
                reinforcements: vec![],
            },
        );

        let state = setup.build(tables.env(&config, &PcgRng)).unwrap();

        assert_eq!(state.turn, 1);
        assert_eq!(state.phase, CombatPhase::PlayerTurn);
        assert_eq!(state.zones.hand.len(), 5);
        assert_eq!(state.zones.deck.len(), 3);
        assert_eq!(state.enemies.len(), 2);
        assert!(state.check_invariants().is_ok());
    }

    #[test]
    fn roster_overflow_waits_in_reserve() {
        let tables = tables();
        let config = CombatConfig::default();
        let setup = CombatSetup::new(
            1,
            loadout(5),
            CombatEvent {
                enemies: vec![EnemyId::from("grunt"); 4],
                reinforcements: vec![EnemyId::from("brute")],
            },
        );

        let state = setup.build(tables.env(&config, &PcgRng)).unwrap();

        assert_eq!(state.enemies.len(), config.max_active_enemies);
        assert_eq!(
            state.reinforcements,
            vec![EnemyId::from("grunt"), EnemyId::from("brute")]
        );
    }

    #[test]
    fn unknown_templates_are_reported() {
        let tables = tables();
        let config = CombatConfig::default();
        let event = CombatEvent {
            enemies: vec![EnemyId::from("ghost")],
            reinforcements: vec![],
        };
        let err = CombatSetup::new(1, loadout(1), event)
            .build(tables.env(&config, &PcgRng))
            .unwrap_err();
        assert_eq!(err, SetupError::Oracle(OracleError::EnemyNotFound(EnemyId::from("ghost"))));

        let err = CombatSetup::new(1, loadout(0), CombatEvent::default())
            .build(tables.env(&config, &PcgRng))
            .unwrap_err();
        assert_eq!(err, SetupError::EmptyRoster);
    }

    #[test]
    fn interim_cards_return_to_the_deck() {
        let tables = tables();
        let config = CombatConfig::default();
        let event = CombatEvent {
            enemies: vec![EnemyId::from("grunt")],
            reinforcements: vec![],
        };
        let first = CombatSetup::new(3, loadout(7), event.clone())
            .build(tables.env(&config, &PcgRng))
            .unwrap();
        let mut interim = first.to_interim();
        let exhausted = interim.zones.deck.pop_front().unwrap();
        interim.zones.exhaust.push(exhausted);

        let second = CombatSetup::new(4, loadout(0), event)
            .with_interim(interim)
            .build(tables.env(&config, &PcgRng))
            .unwrap();

        assert_eq!(second.zones.total(), 7);
        assert_eq!(second.zones.exhaust.len(), 1);
        assert_eq!(second.zones.hand.len(), 5);
        assert!(second.check_invariants().is_ok());
    }
}
