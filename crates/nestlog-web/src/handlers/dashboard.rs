//! `GET /` — the dashboard page.

use axum::{
  extract::{Query, State},
  http::{HeaderMap, StatusCode, header},
  response::{IntoResponse, Response},
};
use chrono::Utc;
use nestlog_core::{event::EventKind, store::ActivityStore, summary::LastEvents};
use serde::Deserialize;

use crate::{
  AppState,
  error::Error,
  etag::{compute_etag, if_none_match},
  handlers::{CONTENT_TYPE_HTML, no_cache},
  render::{DashboardView, dashboard, notice_for},
};

#[derive(Debug, Default, Deserialize)]
pub struct DashboardParams {
  /// Set by the form endpoints' redirect, e.g. `?logged=feed`.
  pub logged: Option<String>,
}

pub async fn handler<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<DashboardParams>,
  headers: HeaderMap,
) -> Result<Response, Error>
where
  S: ActivityStore + 'static,
{
  let store = state.store.as_ref();

  let user = store.get_primary_user().await.map_err(Error::store)?;
  let events = store
    .list_recent_events(state.config.recent_limit)
    .await
    .map_err(Error::store)?;
  let last = LastEvents::resolve(store, &events)
    .await
    .map_err(Error::store)?;

  let offset = state.config.utc_offset();
  let notice = params
    .logged
    .and_then(|k| EventKind::parse(&k.to_ascii_uppercase()).ok())
    .and_then(|kind| last.get(kind))
    .map(|event| notice_for(event, offset));

  let html = dashboard(&DashboardView {
    user: user.as_ref(),
    events: &events,
    last: &last,
    notice,
    now: Utc::now(),
    offset,
  });
  let etag = compute_etag(html.as_bytes());

  let mut res = if if_none_match(&headers, &etag) {
    (StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response()
  } else {
    (
      StatusCode::OK,
      [(header::CONTENT_TYPE, CONTENT_TYPE_HTML.to_owned()), (header::ETAG, etag)],
      html,
    )
      .into_response()
  };

  no_cache(&mut res);
  Ok(res)
}
