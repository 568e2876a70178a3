//! Session persistence.

mod error;
mod file;
mod memory;

pub use error::{RepositoryError, Result};
pub use file::FileRepository;
pub use memory::InMemoryRepository;

use crate::session::SessionSnapshot;

/// Repository for session snapshots, keyed by session id.
pub trait SessionRepository: Send + Sync {
    /// Save a snapshot, replacing any earlier one for the same session.
    fn save(&self, snapshot: &SessionSnapshot) -> Result<()>;

    fn load(&self, session_id: &str) -> Result<Option<SessionSnapshot>>;

    fn exists(&self, session_id: &str) -> bool;

    fn delete(&self, session_id: &str) -> Result<()>;

    /// List all stored session ids
    fn list_sessions(&self) -> Result<Vec<String>> {
        Ok(vec![])
    }
}

/// Session ids double as file names.
pub(crate) fn validate_session_id(session_id: &str) -> Result<()> {
    let valid = !session_id.is_empty()
        && session_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(RepositoryError::InvalidSessionId(session_id.to_string()))
    }
}
