//! Error type for `feedback-store-sqlite`.

use std::path::PathBuf;

use feedback_core::ValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error(transparent)]
  Validation(#[from] ValidationError),

  /// The process is not running from the configured root directory.
  #[error("expected working directory to end with {expected:?}, got {actual:?}")]
  WorkingDirectory { expected: PathBuf, actual: PathBuf },

  #[error("translation {translation_id} references missing target {target_id}")]
  MissingTarget { translation_id: i64, target_id: i64 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
  /// Pass a crate error through [`tokio_rusqlite::Connection::call`], whose
  /// closures must return [`tokio_rusqlite::Error`].
  pub(crate) fn tunnel(self) -> tokio_rusqlite::Error {
    match self {
      Error::Sqlite(e) => tokio_rusqlite::Error::Rusqlite(e),
      other => tokio_rusqlite::Error::Other(Box::new(other)),
    }
  }
}

impl From<tokio_rusqlite::Error> for Error {
  fn from(e: tokio_rusqlite::Error) -> Self {
    match e {
      tokio_rusqlite::Error::Rusqlite(e) => Error::Sqlite(e),
      tokio_rusqlite::Error::Other(inner) => match inner.downcast::<Error>() {
        Ok(ours) => *ours,
        Err(inner) => Error::Database(tokio_rusqlite::Error::Other(inner)),
      },
      other => Error::Database(other),
    }
  }
}

impl From<Error> for feedback_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Validation(v) => Self::Validation(v),
      Error::Json(j) => Self::Serialization(j),
      e @ Error::WorkingDirectory { .. } => Self::Configuration(e.to_string()),
      e @ Error::MissingTarget { .. } => Self::Integrity(e.to_string()),
      other => Self::Storage(Box::new(other)),
    }
  }
}
