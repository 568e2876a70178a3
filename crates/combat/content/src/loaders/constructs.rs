//! Construct template loader.

use std::path::Path;

use combat_core::ConstructTemplate;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, ensure_unique, read_file, ron_options};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstructCatalog {
    pub constructs: Vec<ConstructTemplate>,
}

/// Loader for construct templates from RON files.
pub struct ConstructLoader;

impl ConstructLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<ConstructTemplate>> {
        let content = read_file(path)?;
        let catalog: ConstructCatalog = ron_options()
            .from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse construct catalog RON: {}", e))?;

        ensure_unique("construct", catalog.constructs.iter().map(|c| c.id.as_str()))?;
        Ok(catalog.constructs)
    }
}
