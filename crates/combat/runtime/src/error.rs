//! Errors surfaced by the runtime.

use combat_core::{ExecuteError, SetupError};
use thiserror::Error;

use crate::repository::RepositoryError;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error(transparent)]
    Execute(#[from] ExecuteError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("next wave requires a won combat (phase {0})")]
    WaveNotWon(&'static str),

    #[error("state digest failed: {0}")]
    Digest(String),

    #[error("snapshot digest mismatch: expected {expected}, found {actual}")]
    DigestMismatch { expected: String, actual: String },

    #[error("session worker is no longer running")]
    WorkerClosed,

    #[error("worker task failed: {0}")]
    WorkerJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
