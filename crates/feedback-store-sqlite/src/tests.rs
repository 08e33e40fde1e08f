//! Integration tests for `SqliteStore` against a temporary on-disk database.

use feedback_core::{
  ValidationError,
  ranking::{Ranking, RankingEntry},
  seed::{SeedData, SeedOptions, Snapshot},
  store::{EvaluationStore, SchemaDropper, SchemaInitializer},
  target::{NewTarget, Target},
  translation::{NewTranslation, Translation},
};
use tempfile::TempDir;

use crate::{Error, SqliteStore, StoreConfig};

/// A freshly initialised store. The directory is removed when the returned
/// guard drops, so keep it alive for the whole test.
async fn store() -> (TempDir, SqliteStore) {
  let dir = tempfile::tempdir().expect("temp dir");
  let store = SqliteStore::new(StoreConfig {
    folder:  dir.path().join("data"),
    name:    "feedback.db".into(),
    root:    "".into(),
    example: dir.path().join("example_data.json"),
  });
  store.initialize_schema().await.expect("schema");
  (dir, store)
}

fn target(id: i64, text: &str) -> Target {
  Target {
    id,
    target: text.into(),
    context1: "a".into(),
    context2: "b".into(),
  }
}

fn translation(id: i64, target_id: i64) -> Translation {
  Translation {
    id,
    target_id,
    translation: format!("translation {id}"),
    model: "model-a".into(),
    num_evals: 0,
  }
}

/// Target 1 ("cat") with translations 1, 2; target 2 ("dog") with 3, 4.
fn two_targets() -> SeedData {
  SeedData {
    targets:      vec![target(1, "cat"), target(2, "dog")],
    translations: vec![
      translation(1, 1),
      translation(2, 1),
      translation(3, 2),
      translation(4, 2),
    ],
    rankings:     vec![],
  }
}

async fn seeded(seed: SeedData) -> (TempDir, SqliteStore) {
  let (dir, s) = store().await;
  s.load_seed(seed, SeedOptions::default()).await.unwrap();
  (dir, s)
}

async fn num_evals(s: &SqliteStore) -> Vec<(i64, i64)> {
  s.snapshot()
    .await
    .unwrap()
    .translations
    .iter()
    .map(|t| (t.id, t.num_evals))
    .collect()
}

// ─── Schema ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn initialize_schema_always_yields_empty_tables() {
  let (_dir, s) = seeded(two_targets()).await;
  s.submit_evaluation(vec![RankingEntry::ranked(1, 1), RankingEntry::ranked(2, 2)])
    .await
    .unwrap();

  s.initialize_schema().await.unwrap();

  let snap = s.snapshot().await.unwrap();
  assert!(snap.targets.is_empty());
  assert!(snap.translations.is_empty());
  assert!(snap.rankings.is_empty());

  // Idempotent.
  s.initialize_schema().await.unwrap();
  assert_eq!(s.snapshot().await.unwrap(), Snapshot::default());
}

#[tokio::test]
async fn clear_keeps_schema_and_drop_removes_it() {
  let (_dir, s) = seeded(two_targets()).await;

  s.clear_all_tables().await.unwrap();
  let snap = s.snapshot().await.unwrap();
  assert!(snap.targets.is_empty() && snap.translations.is_empty());

  s.drop_all_tables().await.unwrap();
  assert!(s.snapshot().await.is_err());
}

#[tokio::test]
async fn wrong_working_directory_is_a_configuration_error() {
  let dir = tempfile::tempdir().unwrap();
  let s = SqliteStore::new(StoreConfig {
    folder:  dir.path().to_path_buf(),
    name:    "feedback.db".into(),
    root:    "no/such/process/root".into(),
    example: dir.path().join("example_data.json"),
  });

  let err = s.initialize_schema().await.unwrap_err();
  assert!(matches!(err, Error::WorkingDirectory { .. }));
  assert!(matches!(
    feedback_core::Error::from(err),
    feedback_core::Error::Configuration(_)
  ));

  let err = s.least_evaluated_with_siblings().await.unwrap_err();
  assert!(matches!(err, Error::WorkingDirectory { .. }));
  assert!(!dir.path().join("feedback.db").exists());
}

// ─── Scoped access ───────────────────────────────────────────────────────────

#[tokio::test]
async fn read_only_scope_rejects_writes() {
  let (_dir, s) = store().await;

  let result = s
    .read_only(|conn| {
      conn.execute(
        "INSERT INTO Targets (target, context1, context2) VALUES ('x', 'y', 'z')",
        [],
      )?;
      Ok(())
    })
    .await;

  assert!(matches!(result, Err(Error::Sqlite(_))));
  assert!(s.snapshot().await.unwrap().targets.is_empty());
}

#[tokio::test]
async fn transaction_rolls_back_when_closure_fails() {
  let (_dir, s) = store().await;

  let result: crate::Result<()> = s
    .transaction(|tx| {
      tx.execute(
        "INSERT INTO Targets (target, context1, context2) VALUES ('x', 'y', 'z')",
        [],
      )?;
      Err(ValidationError::EmptyBatch.into())
    })
    .await;

  assert!(matches!(result, Err(Error::Validation(ValidationError::EmptyBatch))));
  assert!(s.snapshot().await.unwrap().targets.is_empty());
}

#[tokio::test]
async fn foreign_keys_are_enforced() {
  let (_dir, s) = store().await;

  let seed = SeedData {
    targets:      vec![target(1, "cat")],
    translations: vec![translation(1, 42)],
    rankings:     vec![],
  };
  assert!(s.load_seed(seed, SeedOptions::default()).await.is_err());

  // All-or-nothing: the valid target row was rolled back too.
  assert!(s.snapshot().await.unwrap().targets.is_empty());
}

// ─── Seeding ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn seed_rankings_drive_num_evals() {
  let mut seed = two_targets();
  seed.translations[0].num_evals = 17; // ignored
  seed.rankings = vec![
    Ranking { id: 1, translation_id: 1, eval_id: 1, rank: Some(1), discarded: false },
    Ranking { id: 2, translation_id: 2, eval_id: 1, rank: Some(2), discarded: false },
    Ranking { id: 3, translation_id: 1, eval_id: 2, rank: None, discarded: true },
  ];
  let (_dir, s) = seeded(seed).await;

  assert_eq!(num_evals(&s).await, vec![(1, 2), (2, 1), (3, 0), (4, 0)]);
  assert_eq!(s.next_eval_id().await.unwrap(), 3);
}

#[tokio::test]
async fn seed_options_exclude_translations_and_rankings() {
  let mut seed = two_targets();
  seed.rankings = vec![Ranking {
    id: 1, translation_id: 1, eval_id: 1, rank: Some(1), discarded: false,
  }];
  let (_dir, s) = store().await;

  s.load_seed(seed, SeedOptions { include_translations: false, include_rankings: false })
    .await
    .unwrap();

  let snap = s.snapshot().await.unwrap();
  assert_eq!(snap.targets.len(), 2);
  assert!(snap.translations.is_empty());
  assert!(snap.rankings.is_empty());
}

#[tokio::test]
async fn load_seed_file_reads_configured_example() {
  let (dir, s) = store().await;
  let json = serde_json::json!({
    "targets": [{ "id": 1, "target": "cat", "context1": "a", "context2": "b" }],
    "translations": [
      { "id": 1, "targetId": 1, "translation": "chat", "model": "m1", "numEvals": 0 },
      { "id": 2, "targetId": 1, "translation": "minou", "model": "m2" }
    ],
    "rankings": [
      { "id": 1, "translationId": 2, "evalId": 5, "rank": 1, "discarded": false }
    ]
  });
  std::fs::write(dir.path().join("example_data.json"), json.to_string()).unwrap();

  s.load_seed_file(SeedOptions::default()).await.unwrap();

  assert_eq!(num_evals(&s).await, vec![(1, 0), (2, 1)]);
  assert_eq!(s.next_eval_id().await.unwrap(), 6);
}

// ─── Selector ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn selector_on_empty_store_returns_none() {
  let (_dir, s) = store().await;
  assert!(s.least_evaluated_translation().await.unwrap().is_none());
  assert!(s.least_evaluated_with_siblings().await.unwrap().is_none());
}

#[tokio::test]
async fn selector_prefers_fewest_evaluations_then_lowest_id() {
  let (_dir, s) = seeded(two_targets()).await;

  let first = s.least_evaluated_translation().await.unwrap().unwrap();
  assert_eq!(first.id, 1);

  // Evaluate target 1 once: translations 3 and 4 now have fewer rankings.
  s.submit_evaluation(vec![RankingEntry::ranked(1, 1), RankingEntry::ranked(2, 2)])
    .await
    .unwrap();

  let set = s.least_evaluated_with_siblings().await.unwrap().unwrap();
  assert_eq!(set.target.id, 2);
  assert_eq!(set.target.target, "dog");
  let ids: Vec<_> = set.translations.iter().map(|t| t.id).collect();
  assert_eq!(ids, vec![3, 4]);
}

#[tokio::test]
async fn selector_reports_missing_target_as_integrity_error() {
  let (_dir, s) = store().await;

  // Plant an orphaned translation through a raw connection with foreign
  // keys switched off.
  let raw = rusqlite::Connection::open(s.db_path()).unwrap();
  raw.execute_batch("PRAGMA foreign_keys = OFF;").unwrap();
  raw
    .execute(
      "INSERT INTO Translations (id, targetId, translation, model) VALUES (1, 99, 'x', 'm')",
      [],
    )
    .unwrap();
  drop(raw);

  // The single-translation query still works; only the set lookup fails.
  assert_eq!(s.least_evaluated_translation().await.unwrap().unwrap().id, 1);

  let err = s.least_evaluated_with_siblings().await.unwrap_err();
  assert!(matches!(err, Error::MissingTarget { translation_id: 1, target_id: 99 }));
  assert!(matches!(
    feedback_core::Error::from(err),
    feedback_core::Error::Integrity(_)
  ));
}

#[tokio::test]
async fn cat_scenario() {
  let seed = SeedData {
    targets:      vec![target(1, "cat")],
    translations: vec![translation(1, 1), translation(2, 1)],
    rankings:     vec![],
  };
  let (_dir, s) = seeded(seed).await;

  let set = s.least_evaluated_with_siblings().await.unwrap().unwrap();
  assert_eq!(set.target, target(1, "cat"));
  assert_eq!(set.translations.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1, 2]);
  assert!(set.translations.iter().all(|t| t.num_evals == 0));

  s.submit_evaluation(vec![RankingEntry::ranked(1, 1), RankingEntry::ranked(2, 2)])
    .await
    .unwrap();

  let set = s.least_evaluated_with_siblings().await.unwrap().unwrap();
  assert_eq!(set.translations.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1, 2]);
  assert!(set.translations.iter().all(|t| t.num_evals == 1));
  assert_eq!(s.least_evaluated_translation().await.unwrap().unwrap().id, 1);
}

// ─── Submission ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn submission_increments_only_submitted_translations() {
  let (_dir, s) = seeded(two_targets()).await;

  s.submit_evaluation(vec![RankingEntry::ranked(3, 1), RankingEntry::discarded(4)])
    .await
    .unwrap();

  assert_eq!(num_evals(&s).await, vec![(1, 0), (2, 0), (3, 1), (4, 1)]);

  let snap = s.snapshot().await.unwrap();
  assert_eq!(snap.rankings.len(), 2);
  assert!(snap.rankings.iter().all(|r| r.eval_id == 1));
  let discarded = snap.rankings.iter().find(|r| r.translation_id == 4).unwrap();
  assert!(discarded.discarded);
  assert_eq!(discarded.rank, None);
}

#[tokio::test]
async fn sequential_submissions_get_increasing_eval_ids() {
  let (_dir, s) = seeded(two_targets()).await;
  assert_eq!(s.next_eval_id().await.unwrap(), 1);

  let first = s
    .submit_evaluation(vec![RankingEntry::ranked(1, 1), RankingEntry::ranked(2, 2)])
    .await
    .unwrap();
  let second = s
    .submit_evaluation(vec![RankingEntry::ranked(1, 2), RankingEntry::ranked(2, 1)])
    .await
    .unwrap();

  assert_eq!((first, second), (1, 2));
  assert_eq!(num_evals(&s).await, vec![(1, 2), (2, 2), (3, 0), (4, 0)]);
}

async fn assert_rejected(s: &SqliteStore, entries: Vec<RankingEntry>) -> ValidationError {
  let before = s.snapshot().await.unwrap();
  let err = s.submit_evaluation(entries).await.unwrap_err();
  assert_eq!(s.snapshot().await.unwrap(), before, "rejected batch wrote rows");
  match err {
    Error::Validation(v) => v,
    other => panic!("expected validation error, got {other:?}"),
  }
}

#[tokio::test]
async fn empty_submission_is_rejected() {
  let (_dir, s) = seeded(two_targets()).await;
  assert_eq!(assert_rejected(&s, vec![]).await, ValidationError::EmptyBatch);
}

#[tokio::test]
async fn mixed_target_submission_is_rejected() {
  let (_dir, s) = seeded(two_targets()).await;
  let err = assert_rejected(
    &s,
    vec![RankingEntry::ranked(1, 1), RankingEntry::ranked(3, 2)],
  )
  .await;
  assert_eq!(
    err,
    ValidationError::MixedTargets { translation_id: 3, expected: 1, found: 2 }
  );
}

#[tokio::test]
async fn duplicate_translation_submission_is_rejected() {
  let (_dir, s) = seeded(two_targets()).await;
  let err = assert_rejected(
    &s,
    vec![RankingEntry::ranked(1, 1), RankingEntry::ranked(1, 2)],
  )
  .await;
  assert_eq!(err, ValidationError::DuplicateTranslation(1));
}

#[tokio::test]
async fn unknown_translation_submission_is_rejected() {
  let (_dir, s) = seeded(two_targets()).await;
  let err = assert_rejected(&s, vec![RankingEntry::ranked(42, 1)]).await;
  assert_eq!(err, ValidationError::UnknownTranslation(42));
}

#[tokio::test]
async fn duplicate_rank_submission_is_rejected() {
  let (_dir, s) = seeded(two_targets()).await;
  let err = assert_rejected(
    &s,
    vec![RankingEntry::ranked(1, 1), RankingEntry::ranked(2, 1)],
  )
  .await;
  assert_eq!(err, ValidationError::DuplicateRank { rank: 1 });
}

#[tokio::test]
async fn submission_without_schema_is_a_storage_error() {
  let (_dir, s) = store().await;
  s.drop_all_tables().await.unwrap();

  let err = s
    .submit_evaluation(vec![RankingEntry::ranked(1, 1)])
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Sqlite(_)), "{err:?}");
  assert!(matches!(
    feedback_core::Error::from(err),
    feedback_core::Error::Storage(_)
  ));
}

// ─── Appends ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_targets_and_translations_assign_ids() {
  let (_dir, s) = seeded(two_targets()).await;

  let targets = s
    .add_targets(vec![NewTarget::new("before", "bird", "after")])
    .await
    .unwrap();
  assert_eq!(targets.len(), 1);
  assert_eq!(targets[0].id, 3);
  assert_eq!(targets[0].context1, "before");

  let translations = s
    .add_translations(vec![NewTranslation {
      target_id:   targets[0].id,
      translation: "oiseau".into(),
      model:       "model-b".into(),
    }])
    .await
    .unwrap();
  assert_eq!(translations[0].id, 5);
  assert_eq!(translations[0].num_evals, 0);

  assert_eq!(s.target_id_of(5).await.unwrap(), Some(3));
  assert_eq!(s.target_id_of(500).await.unwrap(), None);

  // Everything is still unranked, so the lowest id wins.
  let set = s.least_evaluated_with_siblings().await.unwrap();
  assert_eq!(set.unwrap().target.id, 1);
}

#[tokio::test]
async fn add_translations_requires_existing_target() {
  let (_dir, s) = seeded(two_targets()).await;

  let err = s
    .add_translations(vec![
      NewTranslation { target_id: 1, translation: "ok".into(), model: "m".into() },
      NewTranslation { target_id: 9, translation: "bad".into(), model: "m".into() },
    ])
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Validation(ValidationError::UnknownTarget(9))));
  assert_eq!(s.snapshot().await.unwrap().translations.len(), 4);

  let err = s.add_translations(vec![]).await.unwrap_err();
  assert!(matches!(err, Error::Validation(ValidationError::EmptyBatch)));
}
