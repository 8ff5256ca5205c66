//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 UTC strings with a fixed microsecond
//! width, so lexical order in SQL equals chronological order. Metadata is
//! stored as compact JSON. UUIDs are stored as hyphenated lowercase strings.

use chrono::{DateTime, SecondsFormat, SubsecRound as _, Utc};
use nestlog_core::{
  event::{Event, EventKind, EventMetadata},
  user::User,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

/// Drop precision the column cannot hold.
pub fn truncate_dt(dt: DateTime<Utc>) -> DateTime<Utc> { dt.trunc_subsecs(6) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Metadata ────────────────────────────────────────────────────────────────

pub fn encode_metadata(metadata: &EventMetadata) -> Result<String> {
  Ok(metadata.to_json()?.to_string())
}

/// Decode a stored payload, treating one that no longer fits its kind as
/// absent.
pub fn decode_metadata(
  event_id: &str,
  kind: EventKind,
  raw: &str,
) -> Option<EventMetadata> {
  let decoded = serde_json::from_str(raw)
    .map_err(nestlog_core::Error::from)
    .and_then(|value| EventMetadata::from_parts(kind, value));

  match decoded {
    Ok(metadata) => Some(metadata),
    Err(e) => {
      tracing::warn!(event_id, %kind, error = %e, "ignoring malformed event metadata");
      None
    }
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list shared by every `events` query, in [`RawEvent::from_row`] order.
pub const EVENT_COLUMNS: &str =
  "event_id, user_id, event_type, start_time, end_time, metadata, created_at";

/// Raw strings read directly from an `events` row.
pub struct RawEvent {
  pub event_id:   String,
  pub user_id:    String,
  pub event_type: String,
  pub start_time: String,
  pub end_time:   Option<String>,
  pub metadata:   Option<String>,
  pub created_at: String,
}

impl RawEvent {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      event_id:   row.get(0)?,
      user_id:    row.get(1)?,
      event_type: row.get(2)?,
      start_time: row.get(3)?,
      end_time:   row.get(4)?,
      metadata:   row.get(5)?,
      created_at: row.get(6)?,
    })
  }

  pub fn into_event(self) -> Result<Event> {
    let kind = EventKind::parse(&self.event_type)?;
    let metadata = self
      .metadata
      .as_deref()
      .and_then(|raw| decode_metadata(&self.event_id, kind, raw));

    Ok(Event {
      event_id: decode_uuid(&self.event_id)?,
      user_id: decode_uuid(&self.user_id)?,
      kind,
      start_time: decode_dt(&self.start_time)?,
      end_time: self.end_time.as_deref().map(decode_dt).transpose()?,
      metadata,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:    String,
  pub name:       Option<String>,
  pub created_at: String,
}

impl RawUser {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:    row.get(0)?,
      name:       row.get(1)?,
      created_at: row.get(2)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:    decode_uuid(&self.user_id)?,
      name:       self.name,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
