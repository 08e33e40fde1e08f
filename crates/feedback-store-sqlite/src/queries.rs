//! Statement-level helpers run inside a scoped connection.
//!
//! Everything here takes a plain [`Connection`]; a
//! [`rusqlite::Transaction`] derefs to one, so the same helpers serve both
//! read-only and transactional scopes.

use feedback_core::{
  EvalId, TargetId, TranslationId,
  ranking::{Ranking, RankingEntry},
  seed::{SeedData, SeedOptions, Snapshot},
  target::{NewTarget, Target},
  translation::{EvaluationSet, NewTranslation, Translation},
};
use rusqlite::{Connection, OptionalExtension as _, params};

use crate::{
  Error, Result,
  rows::{self, RANKING_COLUMNS, TARGET_COLUMNS, TRANSLATION_COLUMNS},
};

// ─── Lookups ─────────────────────────────────────────────────────────────────

pub fn target_id_of(conn: &Connection, id: TranslationId) -> Result<Option<TargetId>> {
  Ok(
    conn
      .query_row(
        "SELECT targetId FROM Translations WHERE id = ?1",
        params![id],
        |row| row.get(0),
      )
      .optional()?,
  )
}

pub fn target_exists(conn: &Connection, id: TargetId) -> Result<bool> {
  Ok(conn.query_row(
    "SELECT EXISTS (SELECT 1 FROM Targets WHERE id = ?1)",
    params![id],
    |row| row.get(0),
  )?)
}

pub fn next_eval_id(conn: &Connection) -> Result<EvalId> {
  Ok(conn.query_row(
    "SELECT COALESCE(MAX(evalId), 0) + 1 FROM Rankings",
    [],
    |row| row.get(0),
  )?)
}

// ─── Selection ───────────────────────────────────────────────────────────────

/// Minimum `numEvals`, ties broken by smallest id. Served by the
/// `(numEvals, id)` index.
pub fn least_evaluated(conn: &Connection) -> Result<Option<Translation>> {
  Ok(
    conn
      .query_row(
        &format!(
          "SELECT {TRANSLATION_COLUMNS} FROM Translations
           ORDER BY numEvals ASC, id ASC
           LIMIT 1"
        ),
        [],
        rows::translation,
      )
      .optional()?,
  )
}

pub fn translations_of(conn: &Connection, target_id: TargetId) -> Result<Vec<Translation>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {TRANSLATION_COLUMNS} FROM Translations WHERE targetId = ?1 ORDER BY id"
  ))?;
  let translations = stmt
    .query_map(params![target_id], rows::translation)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(translations)
}

pub fn least_evaluated_set(conn: &Connection) -> Result<Option<EvaluationSet>> {
  let Some(winner) = least_evaluated(conn)? else {
    return Ok(None);
  };

  let target = conn
    .query_row(
      &format!("SELECT {TARGET_COLUMNS} FROM Targets WHERE id = ?1"),
      params![winner.target_id],
      rows::target,
    )
    .optional()?
    .ok_or(Error::MissingTarget {
      translation_id: winner.id,
      target_id:      winner.target_id,
    })?;

  let translations = translations_of(conn, target.id)?;
  Ok(Some(EvaluationSet { target, translations }))
}

// ─── Writes ──────────────────────────────────────────────────────────────────

/// Insert one row per entry under `eval_id`. Each insert fires the
/// `numEvals` recount trigger for its translation.
pub fn insert_rankings(
  conn: &Connection,
  eval_id: EvalId,
  entries: &[RankingEntry],
) -> Result<()> {
  let mut stmt = conn.prepare(
    "INSERT INTO Rankings (translationId, evalId, rank, discarded) VALUES (?1, ?2, ?3, ?4)",
  )?;
  for entry in entries {
    stmt.execute(params![entry.translation_id, eval_id, entry.rank, entry.discarded])?;
  }
  Ok(())
}

pub fn insert_targets(conn: &Connection, targets: &[NewTarget]) -> Result<Vec<Target>> {
  let mut stmt = conn
    .prepare("INSERT INTO Targets (target, context1, context2) VALUES (?1, ?2, ?3)")?;
  let mut out = Vec::with_capacity(targets.len());
  for t in targets {
    stmt.execute(params![t.target, t.context1, t.context2])?;
    out.push(Target {
      id:       conn.last_insert_rowid(),
      target:   t.target.clone(),
      context1: t.context1.clone(),
      context2: t.context2.clone(),
    });
  }
  Ok(out)
}

pub fn insert_translations(
  conn: &Connection,
  translations: &[NewTranslation],
) -> Result<Vec<Translation>> {
  let mut stmt = conn.prepare(
    "INSERT INTO Translations (targetId, translation, model, numEvals) VALUES (?1, ?2, ?3, 0)",
  )?;
  let mut out = Vec::with_capacity(translations.len());
  for t in translations {
    stmt.execute(params![t.target_id, t.translation, t.model])?;
    out.push(Translation {
      id:          conn.last_insert_rowid(),
      target_id:   t.target_id,
      translation: t.translation.clone(),
      model:       t.model.clone(),
      num_evals:   0,
    });
  }
  Ok(out)
}

/// Insert preset rows with their own ids. Seeded `numEvals` values are not
/// written; the ranking triggers derive them.
pub fn insert_seed(conn: &Connection, seed: &SeedData, options: SeedOptions) -> Result<()> {
  let mut stmt = conn.prepare(
    "INSERT INTO Targets (id, target, context1, context2) VALUES (?1, ?2, ?3, ?4)",
  )?;
  for t in &seed.targets {
    stmt.execute(params![t.id, t.target, t.context1, t.context2])?;
  }

  if options.include_translations {
    let mut stmt = conn.prepare(
      "INSERT INTO Translations (id, targetId, translation, model) VALUES (?1, ?2, ?3, ?4)",
    )?;
    for t in &seed.translations {
      stmt.execute(params![t.id, t.target_id, t.translation, t.model])?;
    }
  }

  if options.include_rankings {
    let mut stmt = conn.prepare(
      "INSERT INTO Rankings (id, translationId, evalId, rank, discarded)
       VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    for r in &seed.rankings {
      stmt.execute(params![r.id, r.translation_id, r.eval_id, r.rank, r.discarded])?;
    }
  }

  Ok(())
}

// ─── Inspection ──────────────────────────────────────────────────────────────

pub fn snapshot(conn: &Connection) -> Result<Snapshot> {
  let targets = conn
    .prepare(&format!("SELECT {TARGET_COLUMNS} FROM Targets ORDER BY id"))?
    .query_map([], rows::target)?
    .collect::<rusqlite::Result<Vec<Target>>>()?;

  let translations = conn
    .prepare(&format!("SELECT {TRANSLATION_COLUMNS} FROM Translations ORDER BY id"))?
    .query_map([], rows::translation)?
    .collect::<rusqlite::Result<Vec<Translation>>>()?;

  let rankings = conn
    .prepare(&format!("SELECT {RANKING_COLUMNS} FROM Rankings ORDER BY id"))?
    .query_map([], rows::ranking)?
    .collect::<rusqlite::Result<Vec<Ranking>>>()?;

  Ok(Snapshot { targets, translations, rankings })
}
