//! Data-driven combat content and loaders.
//!
//! This crate provides loaders for RON/TOML data files:
//! - Card catalog (RON)
//! - Enemy templates (RON)
//! - Construct templates (RON)
//! - Status display names (RON)
//! - Encounters: player loadout plus enemy roster (RON)
//! - Combat tuning (TOML)
//!
//! Content is consumed through the `combat-core` oracles and never appears in
//! combat state.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    CardLoader, ConfigLoader, ConstructLoader, ContentFactory, EncounterLoader, EnemyLoader,
    LoadResult, StatusLoader,
};
