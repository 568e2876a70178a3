//! Playing a card from hand.

use crate::action::execute::{EffectCall, EffectContext, apply_effect, handle_death};
use crate::action::{CommandError, CommandTransition};
use crate::config::CombatConfig;
use crate::env::{CardDefinition, CombatEnv};
use crate::state::{
    CardInstanceId, CardKeywords, CardType, CombatCard, CombatState, EntityId, LastPlayed,
    LogKind, StatusId,
};

/// Plays `card` from hand, optionally aimed at `target`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayCardCommand {
    pub card: CardInstanceId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub target: Option<EntityId>,
}

/// What a play costs once every modifier is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayCost {
    /// Effective cost after keyword, discount and jam modifiers.
    pub cost: i32,
    /// HP paid instead of CP (overclock cards); zero otherwise.
    pub hp: i32,
    pub charge: u32,
    pub entropy: u32,
}

impl PlayCardCommand {
    pub fn new(card: CardInstanceId) -> Self {
        Self { card, target: None }
    }

    pub fn at(mut self, target: EntityId) -> Self {
        self.target = Some(target);
        self
    }
}

/// Computes the effective cost of playing `card`.
///
/// Base cost (or the instance override), plus one per earlier play of an
/// escalating card, minus the first-attack discount, plus pending jam stacks
/// on attacks. Never negative.
pub fn play_cost(
    state: &CombatState,
    card: &CombatCard,
    definition: &CardDefinition,
    config: &CombatConfig,
) -> PlayCost {
    let mut cost = card.cost_override.unwrap_or(definition.cost);
    if definition.has(CardKeywords::ESCALATING) {
        let plays = state.plays_by_card.get(&card.card_id).copied().unwrap_or(0);
        cost += plays as i32;
    }
    if definition.card_type == CardType::Attack {
        if !state.counters.first_attack_played {
            cost -= state.player.equipment.first_attack_discount;
        }
        cost += state.player.stats.status_effects.stacks(StatusId::Jammed);
    }
    let cost = cost.max(0);
    let hp = if definition.has(CardKeywords::OVERCLOCK) {
        cost * config.overclock_hp_per_cp
    } else {
        0
    };
    PlayCost {
        cost,
        hp,
        charge: definition.charge_cost,
        entropy: definition.entropy_cost,
    }
}

impl PlayCardCommand {
    fn lookup(
        &self,
        state: &CombatState,
        env: &CombatEnv<'_>,
    ) -> Result<(CombatCard, CardDefinition), CommandError> {
        let card = state
            .zones
            .hand_card(self.card)
            .ok_or(CommandError::CardNotInHand(self.card))?;
        let definition = env
            .cards()?
            .card(&card.card_id)
            .ok_or_else(|| CommandError::UnknownCard(card.card_id.clone()))?;
        Ok((card.clone(), definition))
    }
}

impl CommandTransition for PlayCardCommand {
    type Error = CommandError;

    fn pre_validate(&self, state: &CombatState, env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        if !state.phase.is_player_turn() {
            return Err(CommandError::wrong_phase("player_turn", &state.phase));
        }
        let (card, definition) = self.lookup(state, env)?;

        if let Some(target) = self.target
            && !state.enemy(target).is_some_and(|e| e.is_alive())
        {
            return Err(CommandError::InvalidTarget(target));
        }

        let config = env.config()?.combat_config();
        let cost = play_cost(state, &card, &definition, config);
        let player = &state.player;
        if cost.charge > player.charge {
            return Err(CommandError::InsufficientCharge {
                required: cost.charge,
                available: player.charge,
            });
        }
        if cost.entropy > player.entropy {
            return Err(CommandError::InsufficientEntropy {
                required: cost.entropy,
                available: player.entropy,
            });
        }
        if definition.has(CardKeywords::OVERCLOCK) {
            if cost.hp > player.stats.hp {
                return Err(CommandError::InsufficientHp {
                    required: cost.hp,
                    available: player.stats.hp,
                });
            }
        } else if cost.cost > player.cp {
            return Err(CommandError::InsufficientCp {
                required: cost.cost,
                available: player.cp,
            });
        }
        Ok(())
    }

    fn apply(&self, state: &mut CombatState, env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        let (card, definition) = self.lookup(state, env)?;
        let mut ctx = EffectContext::new(state, *env)?;
        let cost = play_cost(ctx.state, &card, &definition, ctx.config);
        let is_attack = definition.card_type == CardType::Attack;

        // Costs
        let player = &mut ctx.state.player;
        player.charge -= cost.charge;
        player.entropy -= cost.entropy;
        if definition.has(CardKeywords::OVERCLOCK) {
            let lost = player.stats.lose_hp(cost.hp);
            ctx.log(LogKind::Damage, format!("Overclock burns {lost} HP"));
        } else {
            player.cp -= cost.cost;
        }
        if is_attack {
            ctx.state
                .player
                .stats
                .status_effects
                .remove(StatusId::Jammed);
        }
        if definition.self_bleed > 0 {
            let max_hp = f64::from(ctx.state.player.stats.max_hp);
            let damage = (max_hp * f64::from(definition.self_bleed) / 100.0).ceil() as i32;
            let lost = ctx.state.player.stats.lose_hp(damage);
            ctx.log(LogKind::Damage, format!("You bleed for {lost}"));
        }
        if !ctx.state.player.stats.is_alive() {
            handle_death(&mut ctx, EntityId::PLAYER, 0);
            return Ok(());
        }

        // Resolution
        let Some(mut played) = ctx.state.zones.take_from_hand(self.card) else {
            return Err(CommandError::CardNotInHand(self.card));
        };
        ctx.state.counters.cards_played += 1;
        *ctx.state.plays_by_card.entry(card.card_id.clone()).or_insert(0) += 1;
        ctx.log(LogKind::Card, format!("You play {}", definition.name));
        tracing::debug!(card = %definition.id, cost = cost.cost, "card played");

        apply_effect(&mut ctx, &definition.effect, &EffectCall::player_card(&definition, self.target));

        // Routing
        played.cost_override = None;
        let zones = &mut ctx.state.zones;
        if played.temporary || definition.has(CardKeywords::EXHAUST) {
            zones.exhaust.push(played);
        } else if definition.has(CardKeywords::RETURN)
            && zones.hand.len() < ctx.config.max_hand_size
        {
            zones.hand.push(played);
        } else {
            zones.discard.push(played);
        }

        if is_attack {
            ctx.state.counters.first_attack_played = true;
        }
        ctx.state.last_played = Some(LastPlayed {
            card_id: definition.id.clone(),
            card_type: definition.card_type,
            keywords: definition.keywords,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{CardEffect, DamageSpec};
    use crate::env::{ContentTables, PcgRng};
    use crate::state::{
        CardId, CombatPhase, Combatant, EnemyId, EnemyState, PlayerState, StatusEffect,
    };

    struct Fixture {
        tables: ContentTables,
        config: CombatConfig,
    }

    impl Fixture {
        fn new() -> Self {
            let tables = ContentTables::new()
                .with_card(CardDefinition::new("slash", 3, CardType::Attack, CardEffect::damage(1.0)))
                .with_card(
                    CardDefinition::new("surge", 1, CardType::Attack, CardEffect::damage(1.0))
                        .with_keywords(CardKeywords::ESCALATING),
                )
                .with_card(
                    CardDefinition::new("redline", 2, CardType::Attack, CardEffect::damage(2.0))
                        .with_keywords(CardKeywords::OVERCLOCK | CardKeywords::EXHAUST),
                )
                .with_card(CardDefinition {
                    self_bleed: 10,
                    ..CardDefinition::new("bloodlet", 0, CardType::Attack, CardEffect::damage(1.0))
                })
                .with_card(
                    CardDefinition::new("boomerang", 1, CardType::Attack, CardEffect {
                        damage: Some(DamageSpec::new(0.5)),
                        ..CardEffect::default()
                    })
                    .with_keywords(CardKeywords::RETURN),
                );
            Self {
                tables,
                config: CombatConfig::default(),
            }
        }

        fn run(&self, state: &mut CombatState, command: &PlayCardCommand) -> Result<(), CommandError> {
            let env = self.tables.env(&self.config, &PcgRng);
            command.pre_validate(state, &env)?;
            command.apply(state, &env)
        }
    }

    fn state_with(card: &str) -> (CombatState, CardInstanceId, EntityId) {
        let mut state = CombatState::new(1, PlayerState::new(Combatant::new(100, 10, 0), 10, 5));
        let enemy = state.allocate_entity_id();
        state.enemies.push(EnemyState {
            id: enemy,
            template: EnemyId::from("dummy"),
            name: "Dummy".into(),
            stats: Combatant::new(200, 0, 0),
            entropy: 0,
            intent_cursor: 0,
        });
        let card = state.new_card(CardId::from(card));
        let id = card.instance_id;
        state.zones.hand.push(card);
        (state, id, enemy)
    }

    #[test]
    fn attack_spends_cp_and_lands_in_discard() {
        let fixture = Fixture::new();
        let (mut state, card, enemy) = state_with("slash");

        fixture.run(&mut state, &PlayCardCommand::new(card).at(enemy)).unwrap();

        assert_eq!(state.player.cp, 7);
        assert_eq!(state.enemies[0].stats.hp, 190);
        assert_eq!(state.zones.discard.len(), 1);
        assert!(state.counters.first_attack_played);
        assert_eq!(state.last_played.as_ref().map(|p| p.card_type), Some(CardType::Attack));
    }

    #[test]
    fn rejected_play_reports_missing_cp() {
        let fixture = Fixture::new();
        let (mut state, card, _) = state_with("slash");
        state.player.cp = 2;

        let err = fixture.run(&mut state, &PlayCardCommand::new(card)).unwrap_err();

        assert_eq!(
            err,
            CommandError::InsufficientCp {
                required: 3,
                available: 2
            }
        );
        assert_eq!(state.zones.hand.len(), 1);
    }

    #[test]
    fn escalating_cards_cost_more_each_play() {
        let fixture = Fixture::new();
        let (mut state, card, _) = state_with("surge");
        fixture.run(&mut state, &PlayCardCommand::new(card)).unwrap();
        assert_eq!(state.player.cp, 9);

        let again = state.zones.take_from_discard(card).unwrap();
        state.zones.hand.push(again);
        fixture.run(&mut state, &PlayCardCommand::new(card)).unwrap();
        assert_eq!(state.player.cp, 7);
    }

    #[test]
    fn overclock_pays_hp_and_exhausts() {
        let fixture = Fixture::new();
        let (mut state, card, _) = state_with("redline");

        fixture.run(&mut state, &PlayCardCommand::new(card)).unwrap();

        let paid = 2 * fixture.config.overclock_hp_per_cp;
        assert_eq!(state.player.stats.hp, 100 - paid);
        assert_eq!(state.player.cp, 10);
        assert_eq!(state.zones.exhaust.len(), 1);
    }

    #[test]
    fn overclock_paying_the_last_hp_is_defeat() {
        let fixture = Fixture::new();
        let (mut state, card, _) = state_with("redline");
        let paid = 2 * fixture.config.overclock_hp_per_cp;
        state.player.stats.hp = paid;

        fixture.run(&mut state, &PlayCardCommand::new(card)).unwrap();

        assert_eq!(state.player.stats.hp, 0);
        assert_eq!(state.phase, CombatPhase::Defeat);
        assert_eq!(state.enemies[0].stats.hp, 200, "the card never resolves");
        assert_eq!(state.counters.cards_played, 0);
    }

    #[test]
    fn self_bleed_takes_a_share_of_max_hp() {
        let fixture = Fixture::new();
        let (mut state, card, _) = state_with("bloodlet");

        fixture.run(&mut state, &PlayCardCommand::new(card)).unwrap();

        assert_eq!(state.player.stats.hp, 90);
        assert_eq!(state.enemies[0].stats.hp, 190);
    }

    #[test]
    fn self_bleed_can_kill_the_player() {
        let fixture = Fixture::new();
        let (mut state, card, _) = state_with("bloodlet");
        state.player.stats.hp = 7;

        fixture.run(&mut state, &PlayCardCommand::new(card)).unwrap();

        assert_eq!(state.player.stats.hp, 0);
        assert_eq!(state.phase, CombatPhase::Defeat);
        assert_eq!(state.enemies[0].stats.hp, 200);
    }

    #[test]
    fn jam_raises_cost_once() {
        let fixture = Fixture::new();
        let (mut state, card, _) = state_with("boomerang");
        state
            .player
            .stats
            .status_effects
            .apply(StatusEffect::new(StatusId::Jammed, 2, 0));

        fixture.run(&mut state, &PlayCardCommand::new(card)).unwrap();
        assert_eq!(state.player.cp, 7);
        assert!(!state.player.stats.status_effects.has(StatusId::Jammed));
        assert_eq!(state.zones.hand.len(), 1);

        fixture.run(&mut state, &PlayCardCommand::new(card)).unwrap();
        assert_eq!(state.player.cp, 6);
    }

    #[test]
    fn dead_targets_are_rejected() {
        let fixture = Fixture::new();
        let (mut state, card, enemy) = state_with("slash");
        state.enemies[0].stats.hp = 0;

        let err = fixture.run(&mut state, &PlayCardCommand::new(card).at(enemy)).unwrap_err();
        assert_eq!(err, CommandError::InvalidTarget(enemy));
    }
}
