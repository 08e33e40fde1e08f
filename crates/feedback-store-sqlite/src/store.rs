//! [`SqliteStore`] — the SQLite implementation of the feedback store traits.

use std::{path::PathBuf, sync::Arc};

use feedback_core::{
  EvalId, TargetId, TranslationId,
  ranking::RankingEntry,
  seed::{SeedData, SeedOptions, Snapshot},
  store::{EvaluationStore, SchemaDropper, SchemaInitializer},
  target::{NewTarget, Target},
  translation::{EvaluationSet, NewTranslation, Translation},
  validate::{validate_new_translations, validate_rankings},
};
use rusqlite::{Connection, OpenFlags, Transaction};
use tracing::{error, info, warn};

use crate::{
  Error, Result, StoreConfig, queries,
  schema::{CLEAR_TABLES, CONNECTION_PRAGMAS, CREATE_TABLES, DROP_TABLES},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A feedback store backed by a single SQLite file.
///
/// Holds no open connection: every operation acquires its own and releases
/// it before returning. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct SqliteStore {
  config: Arc<StoreConfig>,
}

impl SqliteStore {
  pub fn new(config: StoreConfig) -> Self { Self { config: Arc::new(config) } }

  pub fn config(&self) -> &StoreConfig { &self.config }

  pub fn db_path(&self) -> PathBuf { self.config.db_path() }

  fn check_working_dir(&self) -> Result<()> {
    let cwd = std::env::current_dir()?;
    self.config.check_working_dir(&cwd)
  }

  // ── Scoped access ─────────────────────────────────────────────────────────

  /// Run `f` inside a transaction on a fresh read-write connection.
  ///
  /// Commits if `f` returns `Ok`, rolls back if it returns any error
  /// (validation errors included). The connection is closed on every path.
  pub async fn transaction<F, R>(&self, f: F) -> Result<R>
  where
    F: FnOnce(&Transaction<'_>) -> Result<R> + Send + 'static,
    R: Send + 'static,
  {
    self.check_working_dir()?;
    let conn = tokio_rusqlite::Connection::open(self.db_path()).await?;

    let outcome = conn
      .call(move |conn| {
        conn.execute_batch(CONNECTION_PRAGMAS)?;
        let tx = conn.transaction()?;
        // An early return drops `tx`, which rolls it back.
        let out = f(&tx).map_err(Error::tunnel)?;
        tx.commit()?;
        Ok(out)
      })
      .await;

    release(conn).await;
    Ok(outcome?)
  }

  /// Run `f` on a fresh connection opened with `SQLITE_OPEN_READ_ONLY`.
  /// Any write attempted by `f` fails. The connection is closed on every
  /// path.
  pub async fn read_only<F, R>(&self, f: F) -> Result<R>
  where
    F: FnOnce(&Connection) -> Result<R> + Send + 'static,
    R: Send + 'static,
  {
    self.check_working_dir()?;
    let conn = tokio_rusqlite::Connection::open_with_flags(
      self.db_path(),
      OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .await?;

    let outcome = conn.call(move |conn| f(conn).map_err(Error::tunnel)).await;

    release(conn).await;
    Ok(outcome?)
  }

  // ── Seed file & inspection ────────────────────────────────────────────────

  /// Load the JSON seed file named by [`StoreConfig::example`].
  pub async fn load_seed_file(&self, options: SeedOptions) -> Result<()> {
    self.check_working_dir()?;
    let bytes = tokio::fs::read(&self.config.example).await?;
    let seed: SeedData = serde_json::from_slice(&bytes)?;
    self.load_seed(seed, options).await
  }

  /// Every row of every table.
  pub async fn snapshot(&self) -> Result<Snapshot> { self.read_only(queries::snapshot).await }
}

async fn release(conn: tokio_rusqlite::Connection) {
  if let Err(e) = conn.close().await {
    warn!(error = %e, "failed to close sqlite connection");
  }
}

// ─── SchemaInitializer / SchemaDropper impls ─────────────────────────────────

impl SchemaInitializer for SqliteStore {
  type Error = Error;

  async fn initialize_schema(&self) -> Result<()> {
    self.check_working_dir()?;
    tokio::fs::create_dir_all(&self.config.folder).await?;

    self
      .transaction(|tx| {
        tx.execute_batch(DROP_TABLES)?;
        tx.execute_batch(CREATE_TABLES)?;
        Ok(())
      })
      .await?;

    info!(path = %self.db_path().display(), "database schema initialized");
    Ok(())
  }

  async fn load_seed(&self, seed: SeedData, options: SeedOptions) -> Result<()> {
    let counts = (seed.targets.len(), seed.translations.len(), seed.rankings.len());

    self
      .transaction(move |tx| queries::insert_seed(tx, &seed, options))
      .await?;

    info!(
      targets = counts.0,
      translations = if options.include_translations { counts.1 } else { 0 },
      rankings = if options.include_rankings { counts.2 } else { 0 },
      "seed data loaded"
    );
    Ok(())
  }
}

impl SchemaDropper for SqliteStore {
  type Error = Error;

  async fn drop_all_tables(&self) -> Result<()> {
    self
      .transaction(|tx| Ok(tx.execute_batch(DROP_TABLES)?))
      .await?;
    info!("all tables dropped");
    Ok(())
  }

  async fn clear_all_tables(&self) -> Result<()> {
    self
      .transaction(|tx| Ok(tx.execute_batch(CLEAR_TABLES)?))
      .await?;
    info!("all table data cleared");
    Ok(())
  }
}

// ─── EvaluationStore impl ────────────────────────────────────────────────────

impl EvaluationStore for SqliteStore {
  type Error = Error;

  async fn least_evaluated_translation(&self) -> Result<Option<Translation>> {
    self.read_only(queries::least_evaluated).await
  }

  async fn least_evaluated_with_siblings(&self) -> Result<Option<EvaluationSet>> {
    self.read_only(queries::least_evaluated_set).await
  }

  async fn submit_evaluation(&self, entries: Vec<RankingEntry>) -> Result<EvalId> {
    let count = entries.len();

    // Validation, id allocation and inserts share one transaction. The
    // MAX(evalId) read is not serialised against other writers, so two
    // concurrent submissions may still be handed the same id.
    let outcome = self
      .transaction(move |tx| {
        let target_id = validate_rankings(&entries, |id| queries::target_id_of(tx, id))?;
        let eval_id = queries::next_eval_id(tx)?;
        queries::insert_rankings(tx, eval_id, &entries)?;
        Ok((target_id, eval_id))
      })
      .await;

    match outcome {
      Ok((target_id, eval_id)) => {
        info!(eval_id, target_id, entries = count, "evaluation recorded");
        Ok(eval_id)
      }
      Err(Error::Validation(v)) => {
        warn!(error = %v, entries = count, "evaluation rejected");
        Err(Error::Validation(v))
      }
      Err(e) => {
        error!(error = %e, entries = count, "failed to record evaluation");
        Err(e)
      }
    }
  }

  async fn next_eval_id(&self) -> Result<EvalId> {
    self.read_only(queries::next_eval_id).await
  }

  async fn add_targets(&self, targets: Vec<NewTarget>) -> Result<Vec<Target>> {
    let added = self
      .transaction(move |tx| queries::insert_targets(tx, &targets))
      .await?;
    info!(count = added.len(), "targets added");
    Ok(added)
  }

  async fn add_translations(
    &self,
    translations: Vec<NewTranslation>,
  ) -> Result<Vec<Translation>> {
    let added = self
      .transaction(move |tx| {
        validate_new_translations(&translations, |id| queries::target_exists(tx, id))?;
        queries::insert_translations(tx, &translations)
      })
      .await?;
    info!(count = added.len(), "translations added");
    Ok(added)
  }

  async fn target_id_of(&self, translation_id: TranslationId) -> Result<Option<TargetId>> {
    self
      .read_only(move |conn| queries::target_id_of(conn, translation_id))
      .await
  }
}
