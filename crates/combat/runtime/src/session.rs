//! A combat session: the authoritative state plus the content it runs against.

use std::sync::Arc;

use combat_core::{
    CombatCommand, CombatConfig, CombatEngine, CombatEvent, CombatPhase, CombatSetup,
    CombatState, ContentTables, ExecuteError, ExecutionOutcome, PcgRng, env::compute_seed,
};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RuntimeError};

/// Serializable session state.
///
/// `setup` is the setup of the current wave; replaying `history` on top of it
/// reproduces `state` exactly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub wave: u32,
    pub setup: CombatSetup,
    pub state: CombatState,
    pub history: Vec<CombatCommand>,
    /// Hex SHA-256 of `state`.
    pub digest: String,
}

/// Owns one combat and routes every command through the engine.
pub struct CombatSession {
    id: String,
    tables: Arc<ContentTables>,
    config: CombatConfig,
    setup: CombatSetup,
    state: CombatState,
    history: Vec<CombatCommand>,
    wave: u32,
}

impl CombatSession {
    /// Builds the first wave and starts turn 1.
    pub fn start(
        id: impl Into<String>,
        tables: Arc<ContentTables>,
        config: CombatConfig,
        setup: CombatSetup,
    ) -> Result<Self> {
        let state = setup.build(tables.env(&config, &PcgRng))?;
        let id = id.into();
        tracing::info!(session = %id, seed = setup.seed, "session started");
        Ok(Self {
            id,
            tables,
            config,
            setup,
            state,
            history: Vec::new(),
            wave: 1,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> &CombatState {
        &self.state
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn tables(&self) -> &ContentTables {
        &self.tables
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    pub fn history(&self) -> &[CombatCommand] {
        &self.history
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    /// Executes one command; rejected commands leave the session untouched.
    pub fn execute(
        &mut self,
        command: &CombatCommand,
    ) -> std::result::Result<ExecutionOutcome, ExecuteError> {
        let env = self.tables.env(&self.config, &PcgRng);
        let outcome = CombatEngine::new(&mut self.state).execute(env, command)?;
        self.history.push(command.clone());
        Ok(outcome)
    }

    /// Starts the next wave after a victory.
    ///
    /// Player HP, non-temporary cards and player-owned constructs carry over.
    pub fn next_wave(&mut self, event: CombatEvent) -> Result<()> {
        if self.state.phase != CombatPhase::Victory {
            return Err(RuntimeError::WaveNotWon(self.state.phase.name()));
        }
        let mut player = self.setup.player.clone();
        player.hp = Some(self.state.player.stats.hp);
        let seed = compute_seed(self.setup.seed, u64::from(self.wave), self.state.turn, 0);
        let setup =
            CombatSetup::new(seed, player, event).with_interim(self.state.to_interim());

        self.state = setup.build(self.tables.env(&self.config, &PcgRng))?;
        self.setup = setup;
        self.history.clear();
        self.wave += 1;
        tracing::info!(session = %self.id, wave = self.wave, "next wave");
        Ok(())
    }

    pub fn snapshot(&self) -> Result<SessionSnapshot> {
        Ok(SessionSnapshot {
            session_id: self.id.clone(),
            wave: self.wave,
            setup: self.setup.clone(),
            state: self.state.clone(),
            history: self.history.clone(),
            digest: state_digest(&self.state)?,
        })
    }

    /// Resumes from a snapshot, trusting its state once the digest checks out.
    pub fn restore(
        tables: Arc<ContentTables>,
        config: CombatConfig,
        snapshot: SessionSnapshot,
    ) -> Result<Self> {
        verify_digest(&snapshot.digest, &snapshot.state)?;
        Ok(Self {
            id: snapshot.session_id,
            tables,
            config,
            setup: snapshot.setup,
            state: snapshot.state,
            history: snapshot.history,
            wave: snapshot.wave,
        })
    }

    /// Rebuilds the wave from its setup and re-executes the recorded history.
    ///
    /// Fails when the result differs from the snapshot, e.g. because the
    /// content changed since it was taken.
    pub fn replay(
        tables: Arc<ContentTables>,
        config: CombatConfig,
        snapshot: &SessionSnapshot,
    ) -> Result<Self> {
        let mut session = Self::start(
            snapshot.session_id.clone(),
            tables,
            config,
            snapshot.setup.clone(),
        )?;
        session.wave = snapshot.wave;
        for command in &snapshot.history {
            session.execute(command)?;
        }
        verify_digest(&snapshot.digest, &session.state)?;
        Ok(session)
    }
}

fn state_digest(state: &CombatState) -> Result<String> {
    let digest = state
        .digest()
        .map_err(|e| RuntimeError::Digest(e.to_string()))?;
    Ok(hex::encode(digest))
}

fn verify_digest(expected: &str, state: &CombatState) -> Result<()> {
    let actual = state_digest(state)?;
    if actual != expected {
        return Err(RuntimeError::DigestMismatch {
            expected: expected.to_string(),
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{
        CardDefinition, CardEffect, CardId, CardType, EnemyId, EnemyTemplate, EquipmentBonuses,
        PlayerLoadout,
    };

    fn tables() -> Arc<ContentTables> {
        Arc::new(
            ContentTables::new()
                .with_card(CardDefinition::new("jab", 1, CardType::Attack, CardEffect::damage(1.0)))
                .with_enemy(EnemyTemplate::new("dummy", 12, 0)),
        )
    }

    fn setup() -> CombatSetup {
        let player = PlayerLoadout {
            max_hp: 40,
            hp: None,
            attack: 10,
            defense: 0,
            max_cp: 3,
            block_power: 5,
            deck: vec![CardId::from("jab"); 6],
            equipment: EquipmentBonuses::default(),
        };
        let event = CombatEvent {
            enemies: vec![EnemyId::from("dummy")],
            reinforcements: vec![],
        };
        CombatSetup::new(11, player, event)
    }

    fn jab(session: &CombatSession) -> CombatCommand {
        let card = session.state().zones.hand[0].instance_id;
        let target = session.state().enemies[0].id;
        CombatCommand::play(card, Some(target))
    }

    #[test]
    fn rejected_commands_are_not_recorded() {
        let mut session = CombatSession::start("s1", tables(), CombatConfig::default(), setup())
            .unwrap();
        assert!(session.execute(&CombatCommand::process_enemy_action()).is_err());
        assert!(session.history().is_empty());

        session.execute(&jab(&session)).unwrap();
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn replay_reproduces_the_snapshot() {
        let mut session = CombatSession::start("s2", tables(), CombatConfig::default(), setup())
            .unwrap();
        session.execute(&jab(&session)).unwrap();
        session.execute(&CombatCommand::end_turn()).unwrap();
        session.execute(&CombatCommand::process_enemy_action()).unwrap();

        let snapshot = session.snapshot().unwrap();
        let replayed =
            CombatSession::replay(tables(), CombatConfig::default(), &snapshot).unwrap();
        assert_eq!(replayed.state(), session.state());

        let mut tampered = snapshot.clone();
        tampered.state.player.stats.hp -= 1;
        assert!(matches!(
            CombatSession::restore(tables(), CombatConfig::default(), tampered),
            Err(RuntimeError::DigestMismatch { .. })
        ));
    }

    #[test]
    fn next_wave_carries_hp_and_cards() {
        let mut session = CombatSession::start("s3", tables(), CombatConfig::default(), setup())
            .unwrap();
        assert!(matches!(
            session.next_wave(CombatEvent::default()),
            Err(RuntimeError::WaveNotWon("player_turn"))
        ));

        session.execute(&jab(&session)).unwrap();
        session.execute(&jab(&session)).unwrap();
        assert_eq!(session.state().phase, CombatPhase::Victory);

        let event = CombatEvent {
            enemies: vec![EnemyId::from("dummy"), EnemyId::from("dummy")],
            reinforcements: vec![],
        };
        session.next_wave(event).unwrap();
        assert_eq!(session.wave(), 2);
        assert_eq!(session.state().turn, 1);
        assert_eq!(session.state().enemies.len(), 2);
        assert_eq!(session.state().zones.total(), 6);
        assert!(session.history().is_empty());
    }
}
