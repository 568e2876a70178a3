//! Deterministic combat rules for a turn-based deck-building battler.
//!
//! `combat-core` defines the canonical rules (commands, effect interpreter,
//! turn state machine, combat state) and exposes pure APIs reused by the
//! runtime and offline tools. All state mutation flows through
//! [`engine::CombatEngine`]; content arrives through the oracle traits in
//! [`env`], and randomness is derived from the state's seed and cursor so a
//! combat replays identically from the same inputs.
pub mod action;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod state;

pub use action::{
    CardEffect, ChooseCardCommand, ChooseEffectCommand, ChooseTraceCommand, CombatCommand,
    CommandError, CommandTransition, DiscardCardsCommand, EffectSource, EndTurnCommand,
    PlayCardCommand, PlayCost, ProcessEnemyActionCommand, ReturnCardsToDeckCommand,
    StartPlayerTurnCommand, TargetClass, play_cost,
};
pub use config::CombatConfig;
pub use engine::{
    CombatEngine, CombatEvent, CombatSetup, ExecuteError, ExecutionOutcome, PlayerLoadout,
    SetupError, TransitionPhase, TransitionPhaseError,
};
pub use env::{
    CardDefinition, CardOracle, CombatEnv, ConfigOracle, ConstructOracle, ConstructTemplate,
    ContentTables, EnemyOracle, EnemyTemplate, Env, OracleError, PcgRng, RngOracle,
    StatusOracle, StatusTemplate,
};
pub use error::{ErrorSeverity, GameError};
pub use state::{
    CardId, CardInstanceId, CardKeywords, CardType, CardZones, CombatCard, CombatPhase,
    CombatState, Combatant, ConstructId, ConstructState, EnemyId, EnemyState, EntityId,
    EquipmentBonuses, InterimCombatState, InvariantViolation, LogEntry, LogKind, Owner,
    PlayerState, Rarity, StatusEffect, StatusId, Zone,
};
