//! In-memory SessionRepository implementation.

use std::collections::BTreeMap;
use std::sync::RwLock;

use super::{RepositoryError, Result, SessionRepository, validate_session_id};
use crate::session::SessionSnapshot;

/// Keeps snapshots in a map. Useful for tests and short-lived simulations.
#[derive(Default)]
pub struct InMemoryRepository {
    snapshots: RwLock<BTreeMap<String, SessionSnapshot>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionRepository for InMemoryRepository {
    fn save(&self, snapshot: &SessionSnapshot) -> Result<()> {
        validate_session_id(&snapshot.session_id)?;
        self.snapshots
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?
            .insert(snapshot.session_id.clone(), snapshot.clone());
        Ok(())
    }

    fn load(&self, session_id: &str) -> Result<Option<SessionSnapshot>> {
        let snapshots = self
            .snapshots
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(snapshots.get(session_id).cloned())
    }

    fn exists(&self, session_id: &str) -> bool {
        self.snapshots
            .read()
            .map(|snapshots| snapshots.contains_key(session_id))
            .unwrap_or(false)
    }

    fn delete(&self, session_id: &str) -> Result<()> {
        self.snapshots
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?
            .remove(session_id);
        Ok(())
    }

    fn list_sessions(&self) -> Result<Vec<String>> {
        let snapshots = self
            .snapshots
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(snapshots.keys().cloned().collect())
    }
}
