//! Status display-name loader.

use std::path::Path;

use combat_core::StatusTemplate;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file, ron_options};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusCatalog {
    pub statuses: Vec<StatusTemplate>,
}

/// Loader for status templates from RON files.
pub struct StatusLoader;

impl StatusLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<StatusTemplate>> {
        let content = read_file(path)?;
        let catalog: StatusCatalog = ron_options()
            .from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse status catalog RON: {}", e))?;

        Ok(catalog.statuses)
    }
}
