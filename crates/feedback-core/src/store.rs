//! Capability traits implemented by storage backends.
//!
//! A backend (e.g. `feedback-store-sqlite`) implements all three on one store
//! type. The HTTP layer only needs [`EvaluationStore`]; maintenance tooling
//! uses the schema traits as well.

use std::future::Future;

use crate::{
  EvalId, TargetId, TranslationId,
  ranking::RankingEntry,
  seed::{SeedData, SeedOptions},
  target::{NewTarget, Target},
  translation::{EvaluationSet, NewTranslation, Translation},
};

/// Creates the schema and bulk-loads preset rows.
pub trait SchemaInitializer: Send + Sync {
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  /// Drop and recreate every table, index and trigger. Always leaves the
  /// store empty.
  fn initialize_schema(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Insert preset rows with their own ids, all-or-nothing. Foreign keys are
  /// enforced exactly as for ordinary inserts.
  fn load_seed(
    &self,
    seed: SeedData,
    options: SeedOptions,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

/// Removes tables or their contents.
pub trait SchemaDropper: Send + Sync {
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  /// Drop all three tables, children first.
  fn drop_all_tables(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Delete every row while keeping the schema.
  fn clear_all_tables(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

/// Selection of work for evaluators and recording of their rankings.
///
/// Rankings are append-only; the per-translation evaluation counter is
/// derived by the backend and never written directly.
pub trait EvaluationStore: Send + Sync {
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  // ── Selection ─────────────────────────────────────────────────────────

  /// The translation with the fewest rankings, ties broken by smallest id.
  /// `None` if there are no translations.
  fn least_evaluated_translation(
    &self,
  ) -> impl Future<Output = Result<Option<Translation>, Self::Error>> + Send + '_;

  /// The least-evaluated translation's target together with every
  /// translation of that target, ordered by id.
  ///
  /// Returns `None` if there are no translations, and an integrity error if
  /// the winning translation's target cannot be found.
  fn least_evaluated_with_siblings(
    &self,
  ) -> impl Future<Output = Result<Option<EvaluationSet>, Self::Error>> + Send + '_;

  // ── Rankings ──────────────────────────────────────────────────────────

  /// Validate and record one evaluation pass under a freshly allocated
  /// evaluation id, which is returned. Nothing is written on failure.
  fn submit_evaluation(
    &self,
    entries: Vec<RankingEntry>,
  ) -> impl Future<Output = Result<EvalId, Self::Error>> + Send + '_;

  /// `max(existing evalId) + 1`, or `1` for an empty rankings table.
  fn next_eval_id(&self) -> impl Future<Output = Result<EvalId, Self::Error>> + Send + '_;

  // ── Appends ───────────────────────────────────────────────────────────

  /// Append targets, returning them with their assigned ids.
  fn add_targets(
    &self,
    targets: Vec<NewTarget>,
  ) -> impl Future<Output = Result<Vec<Target>, Self::Error>> + Send + '_;

  /// Append translations of existing targets, returning them with their
  /// assigned ids and a zero evaluation count.
  fn add_translations(
    &self,
    translations: Vec<NewTranslation>,
  ) -> impl Future<Output = Result<Vec<Translation>, Self::Error>> + Send + '_;

  /// The target a translation belongs to, if the translation exists.
  fn target_id_of(
    &self,
    translation_id: TranslationId,
  ) -> impl Future<Output = Result<Option<TargetId>, Self::Error>> + Send + '_;
}
