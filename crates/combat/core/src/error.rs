//! Shared error classification.
//!
//! Each failure domain keeps its own enum next to the code that raises it
//! (`CommandError` in `action`, `OracleError` in `env`, `SetupError` in
//! `engine`). They all implement [`GameError`] so callers can decide how to
//! react without matching on every variant. Errors carry only ids and
//! numbers, so a rejected command fails the same way on replay.

/// How a caller should treat an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// The command is fine in general but not right now (wrong phase, not
    /// enough CP).
    Recoverable,
    /// The command names something that does not exist or cannot be chosen.
    Validation,
    /// State and content disagree; a bug.
    Internal,
    /// A required oracle is missing; nothing can run.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Internal and fatal errors point at a bug or a broken setup.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Implemented by every combat-core error enum.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier for logs and clients. Defaults to the type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
