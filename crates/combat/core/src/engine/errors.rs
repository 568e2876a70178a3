//! Error types for the command pipeline.

use crate::action::{
    ChooseCardCommand, ChooseEffectCommand, ChooseTraceCommand, CommandTransition,
    DiscardCardsCommand, EndTurnCommand, PlayCardCommand, ProcessEnemyActionCommand,
    ReturnCardsToDeckCommand, StartPlayerTurnCommand,
};
use crate::error::{ErrorSeverity, GameError};

/// Identifies which stage of the transition pipeline produced an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionPhase {
    PreValidate,
    Apply,
    PostValidate,
}

impl TransitionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionPhase::PreValidate => "pre_validate",
            TransitionPhase::Apply => "apply",
            TransitionPhase::PostValidate => "post_validate",
        }
    }
}

/// Associates a transition phase with the underlying error.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionPhaseError<E> {
    pub phase: TransitionPhase,
    pub error: E,
}

impl<E> TransitionPhaseError<E> {
    pub fn new(phase: TransitionPhase, error: E) -> Self {
        Self { phase, error }
    }
}

impl<E: std::fmt::Display> std::fmt::Display for TransitionPhaseError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.phase.as_str(), self.error)
    }
}

impl<E: std::fmt::Display + std::fmt::Debug> std::error::Error for TransitionPhaseError<E> {}

type PhaseError<C> = TransitionPhaseError<<C as CommandTransition>::Error>;

/// Errors surfaced while executing a command through the engine.
///
/// The state is restored to its pre-command value whenever one is returned.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ExecuteError {
    #[error("play card failed: {0}")]
    PlayCard(PhaseError<PlayCardCommand>),

    #[error("end turn failed: {0}")]
    EndTurn(PhaseError<EndTurnCommand>),

    #[error("discard failed: {0}")]
    DiscardCards(PhaseError<DiscardCardsCommand>),

    #[error("return to deck failed: {0}")]
    ReturnCardsToDeck(PhaseError<ReturnCardsToDeckCommand>),

    #[error("card choice failed: {0}")]
    ChooseCard(PhaseError<ChooseCardCommand>),

    #[error("effect choice failed: {0}")]
    ChooseEffect(PhaseError<ChooseEffectCommand>),

    #[error("trace choice failed: {0}")]
    ChooseTrace(PhaseError<ChooseTraceCommand>),

    #[error("enemy action failed: {0}")]
    ProcessEnemyAction(PhaseError<ProcessEnemyActionCommand>),

    #[error("start player turn failed: {0}")]
    StartPlayerTurn(PhaseError<StartPlayerTurnCommand>),
}

impl ExecuteError {
    /// The pipeline stage that failed.
    pub fn phase(&self) -> TransitionPhase {
        self.command_error().0
    }

    /// The command-level error behind this failure.
    pub fn command_error(&self) -> (TransitionPhase, &crate::action::CommandError) {
        match self {
            Self::PlayCard(e) => (e.phase, &e.error),
            Self::EndTurn(e) => (e.phase, &e.error),
            Self::DiscardCards(e) => (e.phase, &e.error),
            Self::ReturnCardsToDeck(e) => (e.phase, &e.error),
            Self::ChooseCard(e) => (e.phase, &e.error),
            Self::ChooseEffect(e) => (e.phase, &e.error),
            Self::ChooseTrace(e) => (e.phase, &e.error),
            Self::ProcessEnemyAction(e) => (e.phase, &e.error),
            Self::StartPlayerTurn(e) => (e.phase, &e.error),
        }
    }
}

impl GameError for ExecuteError {
    fn severity(&self) -> ErrorSeverity {
        self.command_error().1.severity()
    }

    fn error_code(&self) -> &'static str {
        self.command_error().1.error_code()
    }
}
