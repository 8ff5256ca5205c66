//! Error types and axum `IntoResponse` implementation.

use axum::{
  http::StatusCode,
  response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::render::error_page;

#[derive(Debug, Error)]
pub enum Error {
  #[error("bad request: {0}")]
  BadRequest(String),
  #[error("invalid event: {0}")]
  Invalid(#[from] nestlog_core::Error),
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let (status, heading) = match &self {
      Error::BadRequest(_) | Error::Invalid(_) => {
        (StatusCode::BAD_REQUEST, "Bad Request")
      }
      Error::Store(e) => {
        tracing::error!(error = %e, "store operation failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong")
      }
    };
    (status, Html(error_page(heading, &self.to_string()))).into_response()
  }
}
