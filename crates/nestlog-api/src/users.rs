//! Handler for `GET /user`.

use std::sync::Arc;

use axum::{Json, extract::State};
use nestlog_core::{store::ActivityStore, user::User};

use crate::error::ApiError;

/// `GET /user` — the primary user, or 404 when none has been seeded.
pub async fn primary<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<User>, ApiError>
where
  S: ActivityStore,
{
  let user = store
    .get_primary_user()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound("no primary user".into()))?;
  Ok(Json(user))
}
