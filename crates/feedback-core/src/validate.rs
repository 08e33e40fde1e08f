//! Batch validation shared by every store backend.
//!
//! Checks that need stored data (which target a translation belongs to,
//! whether a target exists) are expressed as lookup closures, so a backend
//! can run them inside the same transaction that performs the writes.

use std::collections::HashSet;

use crate::{
  TargetId, TranslationId, ValidationError, ranking::RankingEntry,
  translation::NewTranslation,
};

/// Validate one evaluation pass and return the target it covers.
///
/// Checks, in order:
///
/// 1. the batch is non-empty;
/// 2. every translation exists and belongs to the same target as the first;
/// 3. no translation appears twice;
/// 4. every entry is discarded or ranked within `1..=entries.len()`, and no
///    two ranked entries share a rank.
pub fn validate_rankings<F, E>(
  entries: &[RankingEntry],
  mut target_of: F,
) -> Result<TargetId, E>
where
  F: FnMut(TranslationId) -> Result<Option<TargetId>, E>,
  E: From<ValidationError>,
{
  let first = entries.first().ok_or(ValidationError::EmptyBatch)?;
  let expected = target_of(first.translation_id)?
    .ok_or(ValidationError::UnknownTranslation(first.translation_id))?;

  for entry in &entries[1..] {
    let found = target_of(entry.translation_id)?
      .ok_or(ValidationError::UnknownTranslation(entry.translation_id))?;
    if found != expected {
      return Err(
        ValidationError::MixedTargets {
          translation_id: entry.translation_id,
          expected,
          found,
        }
        .into(),
      );
    }
  }

  let mut seen = HashSet::with_capacity(entries.len());
  for entry in entries {
    if !seen.insert(entry.translation_id) {
      return Err(ValidationError::DuplicateTranslation(entry.translation_id).into());
    }
  }

  check_ranks(entries)?;
  Ok(expected)
}

/// Every entry must be discarded or hold a distinct rank in `1..=len`.
/// A rank of `0` counts as unranked. Ranks on discarded entries are not
/// inspected.
pub fn check_ranks(entries: &[RankingEntry]) -> Result<(), ValidationError> {
  let max = entries.len() as i64;
  let mut taken = HashSet::with_capacity(entries.len());

  for entry in entries.iter().filter(|e| !e.discarded) {
    let rank = entry
      .rank
      .filter(|&r| r != 0)
      .ok_or(ValidationError::Unranked(entry.translation_id))?;
    if !(1..=max).contains(&rank) {
      return Err(ValidationError::RankOutOfRange {
        translation_id: entry.translation_id,
        rank,
        max,
      });
    }
    if !taken.insert(rank) {
      return Err(ValidationError::DuplicateRank { rank });
    }
  }

  Ok(())
}

/// Validate translations about to be appended: the batch is non-empty and
/// every referenced target exists.
pub fn validate_new_translations<F, E>(
  translations: &[NewTranslation],
  mut target_exists: F,
) -> Result<(), E>
where
  F: FnMut(TargetId) -> Result<bool, E>,
  E: From<ValidationError>,
{
  if translations.is_empty() {
    return Err(ValidationError::EmptyBatch.into());
  }
  for t in translations {
    if !target_exists(t.target_id)? {
      return Err(ValidationError::UnknownTarget(t.target_id).into());
    }
  }
  Ok(())
}
