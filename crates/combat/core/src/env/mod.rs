//! Traits describing read-only combat data.
//!
//! Oracles expose card, enemy, status and construct templates, tuning values
//! and deterministic randomness. The [`Env`] aggregate bundles them so the
//! engine can reach everything it needs without coupling to a concrete store.
mod cards;
mod config;
mod constructs;
mod enemies;
mod error;
mod rng;
mod statuses;
mod tables;

pub use cards::{CardDefinition, CardOracle};
pub use config::ConfigOracle;
pub use constructs::{ConstructOracle, ConstructTemplate};
pub use enemies::{EnemyOracle, EnemyTemplate};
pub use error::OracleError;
pub use rng::{PcgRng, RngOracle, compute_seed};
pub use statuses::{StatusOracle, StatusTemplate};
pub use tables::ContentTables;

/// Aggregates the read-only oracles required by the engine.
pub struct Env<'a, D, E, S, U, C, R>
where
    D: CardOracle + ?Sized,
    E: EnemyOracle + ?Sized,
    S: StatusOracle + ?Sized,
    U: ConstructOracle + ?Sized,
    C: ConfigOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    cards: Option<&'a D>,
    enemies: Option<&'a E>,
    statuses: Option<&'a S>,
    constructs: Option<&'a U>,
    config: Option<&'a C>,
    rng: Option<&'a R>,
}

pub type CombatEnv<'a> = Env<
    'a,
    dyn CardOracle + 'a,
    dyn EnemyOracle + 'a,
    dyn StatusOracle + 'a,
    dyn ConstructOracle + 'a,
    dyn ConfigOracle + 'a,
    dyn RngOracle + 'a,
>;

// Manual impls: the oracle types are usually unsized trait objects.
impl<D, E, S, U, C, R> Clone for Env<'_, D, E, S, U, C, R>
where
    D: CardOracle + ?Sized,
    E: EnemyOracle + ?Sized,
    S: StatusOracle + ?Sized,
    U: ConstructOracle + ?Sized,
    C: ConfigOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<D, E, S, U, C, R> Copy for Env<'_, D, E, S, U, C, R>
where
    D: CardOracle + ?Sized,
    E: EnemyOracle + ?Sized,
    S: StatusOracle + ?Sized,
    U: ConstructOracle + ?Sized,
    C: ConfigOracle + ?Sized,
    R: RngOracle + ?Sized,
{
}

impl<'a, D, E, S, U, C, R> Env<'a, D, E, S, U, C, R>
where
    D: CardOracle + ?Sized,
    E: EnemyOracle + ?Sized,
    S: StatusOracle + ?Sized,
    U: ConstructOracle + ?Sized,
    C: ConfigOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    pub fn new(
        cards: Option<&'a D>,
        enemies: Option<&'a E>,
        statuses: Option<&'a S>,
        constructs: Option<&'a U>,
        config: Option<&'a C>,
        rng: Option<&'a R>,
    ) -> Self {
        Self {
            cards,
            enemies,
            statuses,
            constructs,
            config,
            rng,
        }
    }

    pub fn with_all(
        cards: &'a D,
        enemies: &'a E,
        statuses: &'a S,
        constructs: &'a U,
        config: &'a C,
        rng: &'a R,
    ) -> Self {
        Self::new(
            Some(cards),
            Some(enemies),
            Some(statuses),
            Some(constructs),
            Some(config),
            Some(rng),
        )
    }

    pub fn empty() -> Self {
        Self {
            cards: None,
            enemies: None,
            statuses: None,
            constructs: None,
            config: None,
            rng: None,
        }
    }

    /// Returns the CardOracle, or an error if not available.
    pub fn cards(&self) -> Result<&'a D, OracleError> {
        self.cards.ok_or(OracleError::CardsNotAvailable)
    }

    /// Returns the EnemyOracle, or an error if not available.
    pub fn enemies(&self) -> Result<&'a E, OracleError> {
        self.enemies.ok_or(OracleError::EnemiesNotAvailable)
    }

    /// Returns the StatusOracle, or an error if not available.
    pub fn statuses(&self) -> Result<&'a S, OracleError> {
        self.statuses.ok_or(OracleError::StatusesNotAvailable)
    }

    /// Returns the ConstructOracle, or an error if not available.
    pub fn constructs(&self) -> Result<&'a U, OracleError> {
        self.constructs.ok_or(OracleError::ConstructsNotAvailable)
    }

    /// Returns the ConfigOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::ConfigNotAvailable` if no config oracle was provided.
    pub fn config(&self) -> Result<&'a C, OracleError> {
        self.config.ok_or(OracleError::ConfigNotAvailable)
    }

    /// Returns the RngOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::RngNotAvailable` if no rng oracle was provided.
    pub fn rng(&self) -> Result<&'a R, OracleError> {
        self.rng.ok_or(OracleError::RngNotAvailable)
    }
}

impl<'a, D, E, S, U, C, R> Env<'a, D, E, S, U, C, R>
where
    D: CardOracle + 'a,
    E: EnemyOracle + 'a,
    S: StatusOracle + 'a,
    U: ConstructOracle + 'a,
    C: ConfigOracle + 'a,
    R: RngOracle + 'a,
{
    /// Converts this environment into the trait-object based [`CombatEnv`].
    pub fn into_combat_env(self) -> CombatEnv<'a> {
        let cards: Option<&'a dyn CardOracle> = self.cards.map(|o| o as _);
        let enemies: Option<&'a dyn EnemyOracle> = self.enemies.map(|o| o as _);
        let statuses: Option<&'a dyn StatusOracle> = self.statuses.map(|o| o as _);
        let constructs: Option<&'a dyn ConstructOracle> = self.constructs.map(|o| o as _);
        let config: Option<&'a dyn ConfigOracle> = self.config.map(|o| o as _);
        let rng: Option<&'a dyn RngOracle> = self.rng.map(|o| o as _);
        Env::new(cards, enemies, statuses, constructs, config, rng)
    }
}
