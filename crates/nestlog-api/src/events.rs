//! Handlers for `/events` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/events` | Optional `?limit=N` (default 50) |
//! | `POST` | `/events` | Body: [`NewEventBody`]; returns 201 + stored event |
//! | `GET`  | `/events/latest` | Last event of each kind |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{DateTime, Utc};
use nestlog_core::{
  event::{Event, EventKind, EventMetadata, NewEvent},
  store::{ActivityStore, DEFAULT_RECENT_LIMIT},
  summary::LastEvents,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// Maximum number of events to return. Defaults to 50.
  pub limit: Option<usize>,
}

/// `GET /events[?limit=N]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Event>>, ApiError>
where
  S: ActivityStore,
{
  let events = store
    .list_recent_events(params.limit.unwrap_or(DEFAULT_RECENT_LIMIT))
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(events))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /events`.
#[derive(Debug, Deserialize)]
pub struct NewEventBody {
  /// Defaults to the primary user.
  pub user_id:    Option<Uuid>,
  pub kind:       EventKind,
  /// Defaults to the time the request is handled.
  pub start_time: Option<DateTime<Utc>>,
  pub end_time:   Option<DateTime<Utc>>,
  /// Raw payload, decoded against `kind`.
  pub metadata:   Option<serde_json::Value>,
}

impl NewEventBody {
  fn into_new_event(self, user_id: Uuid) -> Result<NewEvent, ApiError> {
    let metadata = self
      .metadata
      .filter(|m| !m.is_null())
      .map(|m| EventMetadata::from_parts(self.kind, m))
      .transpose()?;

    let input = NewEvent {
      user_id,
      kind: self.kind,
      start_time: self.start_time.unwrap_or_else(Utc::now),
      end_time: self.end_time,
      metadata,
    }
    .normalized();
    input.validate()?;
    Ok(input)
  }
}

/// `POST /events` — returns 201 + the stored [`Event`].
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewEventBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ActivityStore,
{
  let user_id = match body.user_id {
    Some(id) => id,
    None => {
      store
        .get_primary_user()
        .await
        .map_err(|e| ApiError::Store(Box::new(e)))?
        .ok_or_else(|| {
          ApiError::Conflict("no primary user; logging is disabled".into())
        })?
        .user_id
    }
  };

  let event = store
    .append_event(body.into_new_event(user_id)?)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  tracing::info!(event_id = %event.event_id, kind = %event.kind, "event logged");
  Ok((StatusCode::CREATED, Json(event)))
}

// ─── Latest ───────────────────────────────────────────────────────────────────

/// `GET /events/latest` — `{"feed": ..., "sleep": ..., "diaper": ...}`.
pub async fn latest<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<LastEvents>, ApiError>
where
  S: ActivityStore,
{
  let window = store
    .list_recent_events(DEFAULT_RECENT_LIMIT)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  let last = LastEvents::resolve(store.as_ref(), &window)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(last))
}
