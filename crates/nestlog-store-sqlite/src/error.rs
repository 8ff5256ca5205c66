//! Error type for `nestlog-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] nestlog_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

impl Error {
  /// Whether SQLite rejected the statement on a constraint, such as an event
  /// whose `user_id` references no user.
  pub fn is_constraint_violation(&self) -> bool {
    matches!(
      self,
      Self::Database(tokio_rusqlite::Error::Rusqlite(
        rusqlite::Error::SqliteFailure(e, _)
      )) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
