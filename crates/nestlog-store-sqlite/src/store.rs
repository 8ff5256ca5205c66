//! [`SqliteStore`] — the SQLite implementation of [`ActivityStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use nestlog_core::{
  event::{Event, EventKind, NewEvent},
  store::ActivityStore,
  user::User,
};

use crate::{
  encode::{
    EVENT_COLUMNS, RawEvent, RawUser, encode_dt, encode_metadata, encode_uuid,
    truncate_dt,
  },
  schema::SCHEMA,
  Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A nestlog store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All clones
/// share one connection, so a write is visible to the next read from any of
/// them.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert a fully-built [`Event`] into the `events` table.
  async fn insert_event(&self, event: &Event) -> Result<()> {
    let event_id_str   = encode_uuid(event.event_id);
    let user_id_str    = encode_uuid(event.user_id);
    let event_type     = event.kind.as_str();
    let start_time_str = encode_dt(event.start_time);
    let end_time_str   = event.end_time.map(encode_dt);
    let metadata_str   = event
      .metadata
      .as_ref()
      .map(encode_metadata)
      .transpose()?;
    let created_at_str = encode_dt(event.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO events (
             event_id, user_id, event_type, start_time, end_time,
             metadata, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            event_id_str,
            user_id_str,
            event_type,
            start_time_str,
            end_time_str,
            metadata_str,
            created_at_str,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── ActivityStore impl ──────────────────────────────────────────────────────

impl ActivityStore for SqliteStore {
  type Error = crate::Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn add_user(&self, name: Option<String>) -> Result<User> {
    let user = User {
      user_id:    Uuid::new_v4(),
      name,
      created_at: truncate_dt(Utc::now()),
    };

    let id_str   = encode_uuid(user.user_id);
    let at_str   = encode_dt(user.created_at);
    let name_str = user.name.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (user_id, name, created_at) VALUES (?1, ?2, ?3)",
          rusqlite::params![id_str, name_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(user)
  }

  async fn get_primary_user(&self) -> Result<Option<User>> {
    let raw: Option<RawUser> = self
      .conn
      .call(|conn| {
        Ok(conn
          .query_row(
            "SELECT user_id, name, created_at FROM users
             ORDER BY created_at ASC, rowid ASC
             LIMIT 1",
            [],
            RawUser::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  // ── Events — append-only writes ───────────────────────────────────────────

  async fn append_event(&self, input: NewEvent) -> Result<Event> {
    let input = input.normalized();
    input.validate()?;

    let event = Event {
      event_id:   Uuid::new_v4(),
      user_id:    input.user_id,
      kind:       input.kind,
      start_time: truncate_dt(input.start_time),
      end_time:   input.end_time.map(truncate_dt),
      metadata:   input.metadata,
      created_at: truncate_dt(Utc::now()),
    };

    self.insert_event(&event).await?;
    tracing::debug!(event_id = %event.event_id, kind = %event.kind, "event appended");
    Ok(event)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn list_recent_events(&self, limit: usize) -> Result<Vec<Event>> {
    let limit_val = i64::try_from(limit).unwrap_or(i64::MAX);

    let raws: Vec<RawEvent> = self
      .conn
      .call(move |conn| {
        // Ties on start_time fall back to insertion order so that repeated
        // reads return the same sequence.
        let mut stmt = conn.prepare(&format!(
          "SELECT {EVENT_COLUMNS} FROM events
           ORDER BY start_time DESC, created_at DESC, rowid DESC
           LIMIT ?1"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![limit_val], RawEvent::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEvent::into_event).collect()
  }

  async fn last_event_of_kind(&self, kind: EventKind) -> Result<Option<Event>> {
    let kind_str = kind.as_str();

    let raw: Option<RawEvent> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {EVENT_COLUMNS} FROM events
               WHERE event_type = ?1
               ORDER BY start_time DESC, created_at DESC, rowid DESC
               LIMIT 1"
            ),
            rusqlite::params![kind_str],
            RawEvent::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawEvent::into_event).transpose()
  }
}
