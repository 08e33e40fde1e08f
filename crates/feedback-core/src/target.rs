//! Target — a source phrase plus the text surrounding it.
//!
//! Targets are immutable once created. Every translation points at exactly
//! one target.

use serde::{Deserialize, Serialize};

use crate::TargetId;

/// A phrase to be translated, shown to evaluators between its two contexts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
  pub id:       TargetId,
  pub target:   String,
  /// Text preceding the target.
  pub context1: String,
  /// Text following the target.
  pub context2: String,
}

/// Input for appending a target; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTarget {
  pub target:   String,
  pub context1: String,
  pub context2: String,
}

impl NewTarget {
  pub fn new(
    context1: impl Into<String>,
    target: impl Into<String>,
    context2: impl Into<String>,
  ) -> Self {
    Self {
      target:   target.into(),
      context1: context1.into(),
      context2: context2.into(),
    }
  }
}
