//! Error types for `feedback-core`.

use thiserror::Error;

use crate::{TargetId, TranslationId};

/// Reasons a submitted batch (rankings, translations, targets) is rejected
/// before anything is written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("batch is empty")]
  EmptyBatch,

  #[error("translation {0} does not exist")]
  UnknownTranslation(TranslationId),

  #[error(
    "translation {translation_id} belongs to target {found}, expected target {expected}"
  )]
  MixedTargets {
    translation_id: TranslationId,
    expected:       TargetId,
    found:          TargetId,
  },

  #[error("translation {0} is ranked more than once")]
  DuplicateTranslation(TranslationId),

  #[error("translation {0} is neither ranked nor discarded")]
  Unranked(TranslationId),

  #[error("rank {rank} of translation {translation_id} is outside 1..={max}")]
  RankOutOfRange {
    translation_id: TranslationId,
    rank:           i64,
    max:            i64,
  },

  #[error("rank {rank} is given to more than one translation")]
  DuplicateRank { rank: i64 },

  #[error("target {0} does not exist")]
  UnknownTarget(TargetId),
}

/// The error taxonomy every store backend maps its failures into.
#[derive(Debug, Error)]
pub enum Error {
  /// Bad configuration, e.g. the process runs from an unexpected directory.
  #[error("configuration error: {0}")]
  Configuration(String),

  #[error("validation error: {0}")]
  Validation(#[from] ValidationError),

  /// Stored data contradicts itself, e.g. a translation without a target.
  #[error("integrity error: {0}")]
  Integrity(String),

  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
