//! Translations and the candidate set handed to an evaluator.

use serde::{Deserialize, Serialize};

use crate::{TargetId, TranslationId, target::Target};

/// One candidate rendering of a target, attributed to the model that
/// produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
  pub id:          TranslationId,
  pub target_id:   TargetId,
  pub translation: String,
  pub model:       String,
  /// Number of rankings referencing this translation. Maintained by the
  /// store, never written by callers; ignored when seeding.
  #[serde(default)]
  pub num_evals:   i64,
}

/// Input for appending a translation; the store assigns the id and starts
/// the evaluation counter at zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTranslation {
  pub target_id:   TargetId,
  pub translation: String,
  pub model:       String,
}

/// A target with every translation of it, ordered by id. This is the unit
/// of work an evaluator ranks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationSet {
  pub target:       Target,
  pub translations: Vec<Translation>,
}
