//! Bulk data: preset rows for seeding a fresh store, and full-table dumps.

use serde::{Deserialize, Serialize};

use crate::{ranking::Ranking, target::Target, translation::Translation};

/// Preset rows with caller-chosen ids, as stored in the example data file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedData {
  pub targets:      Vec<Target>,
  #[serde(default)]
  pub translations: Vec<Translation>,
  #[serde(default)]
  pub rankings:     Vec<Ranking>,
}

/// Which parts of a [`SeedData`] to load. Targets are always loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedOptions {
  pub include_translations: bool,
  pub include_rankings:     bool,
}

impl Default for SeedOptions {
  fn default() -> Self {
    Self { include_translations: true, include_rankings: true }
  }
}

/// Every row of every table, ordered by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
  pub targets:      Vec<Target>,
  pub translations: Vec<Translation>,
  pub rankings:     Vec<Ranking>,
}
