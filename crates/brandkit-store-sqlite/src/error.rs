//! Error type for `brandkit-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] brandkit_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A UNIQUE constraint fired — duplicate email or slug.
  #[error("duplicate value: {0}")]
  Duplicate(String),
}

impl Error {
  /// Translate a UNIQUE-constraint failure into [`Error::Duplicate`] with a
  /// caller-supplied remediation message; everything else passes through.
  pub(crate) fn duplicate_as(
    err: tokio_rusqlite::Error,
    message: &str,
  ) -> Self {
    if let tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(
      e,
      _,
    )) = &err
      && e.code == rusqlite::ErrorCode::ConstraintViolation
    {
      return Error::Duplicate(message.to_string());
    }
    Error::Database(err)
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
