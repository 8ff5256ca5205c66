//! Error types for `nestlog-core`.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::event::EventKind;

#[derive(Debug, Error)]
pub enum Error {
  #[error("{metadata} metadata attached to a {kind} event")]
  MetadataMismatch {
    kind:     EventKind,
    metadata: EventKind,
  },

  #[error("timestamp {0} is outside years 0000-9999")]
  TimestampOutOfRange(DateTime<Utc>),

  #[error("event ends before it starts")]
  EndBeforeStart,

  #[error("feed amount {amount} exceeds the maximum of {max}")]
  AmountOutOfRange { amount: u32, max: u32 },

  #[error("unknown event type: {0:?}")]
  UnknownEventKind(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
