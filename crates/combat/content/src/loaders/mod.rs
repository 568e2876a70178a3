//! Content loaders for reading combat data from files.
//!
//! Each loader turns one RON/TOML file into `combat-core` types; the
//! [`ContentFactory`] ties them together into a [`combat_core::ContentTables`].

pub mod cards;
pub mod config;
pub mod constructs;
pub mod encounter;
pub mod enemies;
pub mod factory;
pub mod statuses;

pub use cards::CardLoader;
pub use config::ConfigLoader;
pub use constructs::ConstructLoader;
pub use encounter::EncounterLoader;
pub use enemies::EnemyLoader;
pub use factory::ContentFactory;
pub use statuses::StatusLoader;

use std::collections::BTreeSet;
use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// RON options shared by every loader: `Some(..)` may be omitted.
pub(crate) fn ron_options() -> ron::Options {
    ron::Options::default().with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
}

/// Rejects catalogs that define the same id twice.
pub(crate) fn ensure_unique<'a>(
    kind: &str,
    ids: impl IntoIterator<Item = &'a str>,
) -> LoadResult<()> {
    let mut seen = BTreeSet::new();
    for id in ids {
        if !seen.insert(id) {
            anyhow::bail!("Duplicate {} id '{}'", kind, id);
        }
    }
    Ok(())
}
