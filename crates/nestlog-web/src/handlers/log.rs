//! Form endpoints: `POST /log/feed`, `/log/sleep`, `/log/diaper`.
//!
//! Each appends one event for the primary user and answers with a
//! `303 See Other` back to the dashboard, so the browser's next request is a
//! fresh read that already includes the new event.

use axum::{
  extract::{Form, State},
  response::Redirect,
};
use nestlog_core::{
  event::{
    DiaperKind, DiaperMetadata, EventKind, EventMetadata, FeedKind,
    FeedMetadata, NewEvent, SleepMetadata,
  },
  store::ActivityStore,
};
use serde::Deserialize;

use crate::{AppState, error::Error, render::slug};

#[derive(Debug, Deserialize)]
pub struct FeedForm {
  pub feed_type: String,
  /// Empty or absent for breast feeds.
  #[serde(default)]
  pub amount:    Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SleepForm {
  #[serde(default)]
  pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DiaperForm {
  pub diaper_type: String,
}

/// Shared write path. Without a primary user nothing is written.
async fn log_event<S>(
  state: &AppState<S>,
  kind: EventKind,
  metadata: Option<EventMetadata>,
) -> Result<Redirect, Error>
where
  S: ActivityStore + 'static,
{
  let Some(user) = state
    .store
    .get_primary_user()
    .await
    .map_err(Error::store)?
  else {
    tracing::warn!(%kind, "no primary user; ignoring log request");
    return Ok(Redirect::to("/"));
  };

  let input = NewEvent {
    metadata,
    ..NewEvent::now(user.user_id, kind)
  }
  .normalized();
  input.validate()?;

  let event = state
    .store
    .append_event(input)
    .await
    .map_err(Error::store)?;

  tracing::info!(event_id = %event.event_id, %kind, "event logged");
  Ok(Redirect::to(&format!("/?logged={}", slug(kind))))
}

/// `POST /log/feed` — `feed_type=bottle|breast|solid&amount=120`
pub async fn feed<S>(
  State(state): State<AppState<S>>,
  Form(form): Form<FeedForm>,
) -> Result<Redirect, Error>
where
  S: ActivityStore + 'static,
{
  let kind: FeedKind = form
    .feed_type
    .parse()
    .map_err(|_| Error::BadRequest(format!("unknown feed type {:?}", form.feed_type)))?;

  let amount = match (kind, form.amount.as_deref().map(str::trim)) {
    (FeedKind::Breast, _) | (_, None | Some("")) => None,
    (_, Some(raw)) => Some(
      raw
        .parse::<u32>()
        .map_err(|_| Error::BadRequest(format!("invalid amount {raw:?}")))?,
    ),
  };

  let metadata = EventMetadata::Feed(FeedMetadata { kind, amount });
  log_event(&state, EventKind::Feed, Some(metadata)).await
}

/// `POST /log/sleep` — `notes=...` (optional)
pub async fn sleep<S>(
  State(state): State<AppState<S>>,
  Form(form): Form<SleepForm>,
) -> Result<Redirect, Error>
where
  S: ActivityStore + 'static,
{
  let metadata = EventMetadata::Sleep(SleepMetadata { notes: form.notes });
  log_event(&state, EventKind::Sleep, Some(metadata)).await
}

/// `POST /log/diaper` — `diaper_type=wet|dirty|both`
pub async fn diaper<S>(
  State(state): State<AppState<S>>,
  Form(form): Form<DiaperForm>,
) -> Result<Redirect, Error>
where
  S: ActivityStore + 'static,
{
  let kind: DiaperKind = form.diaper_type.parse().map_err(|_| {
    Error::BadRequest(format!("unknown diaper type {:?}", form.diaper_type))
  })?;

  let metadata = EventMetadata::Diaper(DiaperMetadata { kind });
  log_event(&state, EventKind::Diaper, Some(metadata)).await
}
