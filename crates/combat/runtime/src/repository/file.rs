//! File-based SessionRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use super::{RepositoryError, Result, SessionRepository, validate_session_id};
use crate::session::SessionSnapshot;

/// Stores each session as `session_{id}.json`.
///
/// Writes go to a temp file first and are renamed into place, so a crash never
/// leaves a half-written snapshot behind.
pub struct FileRepository {
    base_dir: PathBuf,
}

impl FileRepository {
    /// Create a new file-based repository, creating `base_dir` if needed.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir).map_err(RepositoryError::Io)?;
        Ok(Self { base_dir })
    }

    fn session_path(&self, session_id: &str) -> PathBuf {
        self.base_dir.join(format!("session_{}.json", session_id))
    }
}

impl SessionRepository for FileRepository {
    fn save(&self, snapshot: &SessionSnapshot) -> Result<()> {
        validate_session_id(&snapshot.session_id)?;
        let path = self.session_path(&snapshot.session_id);
        let temp_path = path.with_extension("json.tmp");

        let bytes = serde_json::to_vec_pretty(snapshot)
            .map_err(|e| RepositoryError::Json(e.to_string()))?;
        fs::write(&temp_path, bytes).map_err(RepositoryError::Io)?;
        fs::rename(&temp_path, &path).map_err(RepositoryError::Io)?;

        tracing::debug!(
            session = %snapshot.session_id,
            turn = snapshot.state.turn,
            "saved snapshot to {}",
            path.display()
        );
        Ok(())
    }

    fn load(&self, session_id: &str) -> Result<Option<SessionSnapshot>> {
        validate_session_id(session_id)?;
        let path = self.session_path(session_id);
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path).map_err(RepositoryError::Io)?;
        let snapshot: SessionSnapshot =
            serde_json::from_slice(&bytes).map_err(|e| RepositoryError::Json(e.to_string()))?;

        tracing::debug!(session = %session_id, "loaded snapshot from {}", path.display());
        Ok(Some(snapshot))
    }

    fn exists(&self, session_id: &str) -> bool {
        validate_session_id(session_id).is_ok() && self.session_path(session_id).exists()
    }

    fn delete(&self, session_id: &str) -> Result<()> {
        validate_session_id(session_id)?;
        let path = self.session_path(session_id);
        if path.exists() {
            fs::remove_file(&path).map_err(RepositoryError::Io)?;
            tracing::debug!(session = %session_id, "deleted snapshot");
        }
        Ok(())
    }

    fn list_sessions(&self) -> Result<Vec<String>> {
        let mut sessions = Vec::new();
        for entry in fs::read_dir(&self.base_dir).map_err(RepositoryError::Io)? {
            let path = entry.map_err(RepositoryError::Io)?.path();
            if let Some(filename) = path.file_name().and_then(|s| s.to_str())
                && let Some(id) = filename
                    .strip_prefix("session_")
                    .and_then(|s| s.strip_suffix(".json"))
            {
                sessions.push(id.to_string());
            }
        }
        sessions.sort_unstable();
        Ok(sessions)
    }
}
