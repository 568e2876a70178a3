//! Oracle access errors.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{CardId, EnemyId};

/// Errors that occur when accessing oracle data.
///
/// Missing oracles are fatal. Unknown template ids are only reported where a
/// lookup is mandatory (combat setup); inside effect resolution a missing
/// template skips the clause instead.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    #[error("CardOracle not available")]
    CardsNotAvailable,

    #[error("EnemyOracle not available")]
    EnemiesNotAvailable,

    #[error("StatusOracle not available")]
    StatusesNotAvailable,

    #[error("ConstructOracle not available")]
    ConstructsNotAvailable,

    #[error("ConfigOracle not available")]
    ConfigNotAvailable,

    #[error("RngOracle not available")]
    RngNotAvailable,

    #[error("card template '{0}' not found")]
    CardNotFound(CardId),

    #[error("enemy template '{0}' not found")]
    EnemyNotFound(EnemyId),
}

impl GameError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        use OracleError::*;
        match self {
            CardsNotAvailable | EnemiesNotAvailable | StatusesNotAvailable
            | ConstructsNotAvailable | ConfigNotAvailable | RngNotAvailable => {
                ErrorSeverity::Fatal
            }
            CardNotFound(_) | EnemyNotFound(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            CardsNotAvailable => "ORACLE_CARDS_NOT_AVAILABLE",
            EnemiesNotAvailable => "ORACLE_ENEMIES_NOT_AVAILABLE",
            StatusesNotAvailable => "ORACLE_STATUSES_NOT_AVAILABLE",
            ConstructsNotAvailable => "ORACLE_CONSTRUCTS_NOT_AVAILABLE",
            ConfigNotAvailable => "ORACLE_CONFIG_NOT_AVAILABLE",
            RngNotAvailable => "ORACLE_RNG_NOT_AVAILABLE",
            CardNotFound(_) => "ORACLE_CARD_NOT_FOUND",
            EnemyNotFound(_) => "ORACLE_ENEMY_NOT_FOUND",
        }
    }
}
