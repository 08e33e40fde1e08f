//! Column lists and row mappers between SQLite rows and domain types.
//!
//! Each `*_COLUMNS` constant lists columns in the order its mapper reads
//! them; queries splice the constant into their `SELECT`.

use feedback_core::{ranking::Ranking, target::Target, translation::Translation};
use rusqlite::Row;

pub const TARGET_COLUMNS: &str = "id, target, context1, context2";

pub const TRANSLATION_COLUMNS: &str = "id, targetId, translation, model, numEvals";

pub const RANKING_COLUMNS: &str = "id, translationId, evalId, rank, discarded";

pub fn target(row: &Row<'_>) -> rusqlite::Result<Target> {
  Ok(Target {
    id:       row.get(0)?,
    target:   row.get(1)?,
    context1: row.get(2)?,
    context2: row.get(3)?,
  })
}

pub fn translation(row: &Row<'_>) -> rusqlite::Result<Translation> {
  Ok(Translation {
    id:          row.get(0)?,
    target_id:   row.get(1)?,
    translation: row.get(2)?,
    model:       row.get(3)?,
    num_evals:   row.get(4)?,
  })
}

pub fn ranking(row: &Row<'_>) -> rusqlite::Result<Ranking> {
  Ok(Ranking {
    id:             row.get(0)?,
    translation_id: row.get(1)?,
    eval_id:        row.get(2)?,
    rank:           row.get(3)?,
    discarded:      row.get::<_, Option<bool>>(4)?.unwrap_or(false),
  })
}
