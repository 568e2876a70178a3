//! Snapshot repositories.

mod common;

use combat_core::{CombatCommand, CombatConfig};
use combat_runtime::{
    CombatSession, FileRepository, InMemoryRepository, RepositoryError, SessionRepository,
    SessionSnapshot,
};

fn snapshot(id: &str) -> SessionSnapshot {
    let mut session = common::session(id, "stalker");
    session.execute(&CombatCommand::end_turn()).unwrap();
    session.snapshot().unwrap()
}

fn exercise(repo: &dyn SessionRepository) {
    assert!(repo.load("alpha").unwrap().is_none());
    assert!(!repo.exists("alpha"));

    let alpha = snapshot("alpha");
    repo.save(&alpha).unwrap();
    repo.save(&snapshot("beta_2")).unwrap();

    assert!(repo.exists("alpha"));
    assert_eq!(repo.load("alpha").unwrap(), Some(alpha.clone()));
    assert_eq!(repo.list_sessions().unwrap(), vec!["alpha", "beta_2"]);

    repo.delete("alpha").unwrap();
    assert!(!repo.exists("alpha"));
    assert_eq!(repo.list_sessions().unwrap(), vec!["beta_2"]);
    // Deleting twice is fine.
    repo.delete("alpha").unwrap();
}

#[test]
fn in_memory_repository_round_trip() {
    exercise(&InMemoryRepository::new());
}

#[test]
fn file_repository_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileRepository::new(dir.path().join("saves")).unwrap();
    exercise(&repo);

    // No temp files are left behind.
    let leftovers: Vec<_> = std::fs::read_dir(dir.path().join("saves"))
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn invalid_session_ids_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileRepository::new(dir.path()).unwrap();

    let mut bad = snapshot("ok");
    bad.session_id = "../escape".to_string();
    assert!(matches!(
        repo.save(&bad),
        Err(RepositoryError::InvalidSessionId(_))
    ));
    assert!(matches!(
        repo.load(""),
        Err(RepositoryError::InvalidSessionId(_))
    ));
    assert!(!repo.exists("a/b"));
    assert!(matches!(
        InMemoryRepository::new().save(&bad),
        Err(RepositoryError::InvalidSessionId(_))
    ));
}

#[test]
fn loaded_snapshot_resumes_and_replays() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileRepository::new(dir.path()).unwrap();
    let saved = snapshot("resume");
    repo.save(&saved).unwrap();

    let loaded = repo.load("resume").unwrap().unwrap();
    let restored =
        CombatSession::restore(common::tables(), CombatConfig::default(), loaded.clone()).unwrap();
    let replayed = CombatSession::replay(common::tables(), CombatConfig::default(), &loaded).unwrap();

    assert_eq!(restored.state(), &saved.state);
    assert_eq!(replayed.state(), &saved.state);
    assert_eq!(replayed.history(), saved.history.as_slice());
}

#[test]
fn corrupt_files_surface_as_json_errors() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileRepository::new(dir.path()).unwrap();
    std::fs::write(dir.path().join("session_broken.json"), b"{ not json").unwrap();
    assert!(matches!(repo.load("broken"), Err(RepositoryError::Json(_))));
}
