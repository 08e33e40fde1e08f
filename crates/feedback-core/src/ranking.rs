//! Rankings — one evaluator's judgement of one translation.
//!
//! Rankings are append-only. All rows written by a single submission share an
//! [`EvalId`] and cover translations of a single target.

use serde::{Deserialize, Serialize};

use crate::{EvalId, TranslationId};

/// A stored ranking row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ranking {
  pub id:             i64,
  pub translation_id: TranslationId,
  pub eval_id:        EvalId,
  pub rank:           Option<i64>,
  #[serde(default)]
  pub discarded:      bool,
}

/// One entry of a submitted evaluation: either a rank or a discard for a
/// single translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
  pub translation_id: TranslationId,
  #[serde(default)]
  pub rank:           Option<i64>,
  #[serde(default)]
  pub discarded:      bool,
}

impl RankingEntry {
  pub fn ranked(translation_id: TranslationId, rank: i64) -> Self {
    Self { translation_id, rank: Some(rank), discarded: false }
  }

  pub fn discarded(translation_id: TranslationId) -> Self {
    Self { translation_id, rank: None, discarded: true }
  }
}
