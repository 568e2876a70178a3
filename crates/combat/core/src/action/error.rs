//! Command rejection errors.

use crate::env::OracleError;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{CardId, CardInstanceId, EntityId, InvariantViolation};

/// Reasons a command is refused.
///
/// Rejections raised by `pre_validate` leave the state untouched; the engine
/// also rolls back any failure surfaced later in the pipeline.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CommandError {
    #[error("command expects phase {expected}, combat is in {actual}")]
    WrongPhase {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("{0} is not in hand")]
    CardNotInHand(CardInstanceId),

    #[error("card template '{0}' is unknown")]
    UnknownCard(CardId),

    #[error("not enough CP: need {required}, have {available}")]
    InsufficientCp { required: i32, available: i32 },

    #[error("not enough HP to overclock: need {required}, have {available}")]
    InsufficientHp { required: i32, available: i32 },

    #[error("not enough charge: need {required}, have {available}")]
    InsufficientCharge { required: u32, available: u32 },

    #[error("not enough entropy: need {required}, have {available}")]
    InsufficientEntropy { required: u32, available: u32 },

    #[error("{0} is not a valid target")]
    InvalidTarget(EntityId),

    #[error("expected {expected} selected cards, got {got}")]
    WrongSelectionCount { expected: usize, got: usize },

    #[error("{0} cannot be selected")]
    CardNotSelectable(CardInstanceId),

    #[error("option {index} out of range (0..{len})")]
    OptionOutOfRange { index: usize, len: usize },

    #[error("card '{0}' was not offered")]
    CardNotOffered(CardId),

    #[error("enemies still have actions queued")]
    EnemyTurnNotFinished,

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error("state invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),
}

impl CommandError {
    pub(crate) fn wrong_phase(expected: &'static str, actual: &crate::state::CombatPhase) -> Self {
        Self::WrongPhase {
            expected,
            actual: actual.name(),
        }
    }
}

impl GameError for CommandError {
    fn severity(&self) -> ErrorSeverity {
        use CommandError::*;
        match self {
            WrongPhase { .. } | EnemyTurnNotFinished => ErrorSeverity::Recoverable,
            InsufficientCp { .. }
            | InsufficientHp { .. }
            | InsufficientCharge { .. }
            | InsufficientEntropy { .. } => ErrorSeverity::Recoverable,
            CardNotInHand(_)
            | UnknownCard(_)
            | InvalidTarget(_)
            | WrongSelectionCount { .. }
            | CardNotSelectable(_)
            | OptionOutOfRange { .. }
            | CardNotOffered(_) => ErrorSeverity::Validation,
            Oracle(error) => error.severity(),
            Invariant(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        use CommandError::*;
        match self {
            WrongPhase { .. } => "COMMAND_WRONG_PHASE",
            CardNotInHand(_) => "COMMAND_CARD_NOT_IN_HAND",
            UnknownCard(_) => "COMMAND_UNKNOWN_CARD",
            InsufficientCp { .. } => "COMMAND_INSUFFICIENT_CP",
            InsufficientHp { .. } => "COMMAND_INSUFFICIENT_HP",
            InsufficientCharge { .. } => "COMMAND_INSUFFICIENT_CHARGE",
            InsufficientEntropy { .. } => "COMMAND_INSUFFICIENT_ENTROPY",
            InvalidTarget(_) => "COMMAND_INVALID_TARGET",
            WrongSelectionCount { .. } => "COMMAND_WRONG_SELECTION_COUNT",
            CardNotSelectable(_) => "COMMAND_CARD_NOT_SELECTABLE",
            OptionOutOfRange { .. } => "COMMAND_OPTION_OUT_OF_RANGE",
            CardNotOffered(_) => "COMMAND_CARD_NOT_OFFERED",
            EnemyTurnNotFinished => "COMMAND_ENEMY_TURN_NOT_FINISHED",
            Oracle(error) => error.error_code(),
            Invariant(error) => error.error_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_shortfalls_are_recoverable() {
        let error = CommandError::InsufficientCp {
            required: 3,
            available: 1,
        };
        assert!(error.severity().is_recoverable());
        assert_eq!(error.error_code(), "COMMAND_INSUFFICIENT_CP");
        assert_eq!(error.to_string(), "not enough CP: need 3, have 1");
    }

    #[test]
    fn invariant_breaks_are_internal() {
        let error = CommandError::from(InvariantViolation::DuplicateCardInstance(CardInstanceId(4)));
        assert!(error.severity().is_internal());
        assert_eq!(error.severity().as_str(), "internal");
        assert!(!CommandError::CardNotInHand(CardInstanceId(1)).severity().is_internal());
    }
}
