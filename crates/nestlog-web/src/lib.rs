//! Web front end for nestlog.
//!
//! Serves the server-rendered dashboard, the form endpoints that log events,
//! and mounts the JSON API under `/api`. Backed by any [`ActivityStore`].

pub mod error;
pub mod etag;
pub mod handlers;
pub mod relative;
pub mod render;

pub use error::Error;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::{
  Router,
  routing::{get, post},
};
use chrono::{FixedOffset, Offset, Utc};
use nestlog_core::store::{ActivityStore, DEFAULT_RECENT_LIMIT};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use handlers::{dashboard, log};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `nestlog.toml` and
/// `NESTLOG_*` environment variables. Every field has a default.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:               String,
  #[serde(default = "default_port")]
  pub port:               u16,
  #[serde(default = "default_store_path")]
  pub store_path:         PathBuf,
  /// Number of events shown on the dashboard timeline.
  #[serde(default = "default_recent_limit")]
  pub recent_limit:       usize,
  /// Offset from UTC for clock times on the dashboard.
  #[serde(default)]
  pub utc_offset_minutes: i32,
}

fn default_host() -> String { "127.0.0.1".to_owned() }

fn default_port() -> u16 { 3000 }

fn default_store_path() -> PathBuf { PathBuf::from("local.db") }

fn default_recent_limit() -> usize { DEFAULT_RECENT_LIMIT }

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:               default_host(),
      port:               default_port(),
      store_path:         default_store_path(),
      recent_limit:       default_recent_limit(),
      utc_offset_minutes: 0,
    }
  }
}

impl ServerConfig {
  /// Layer the optional TOML file at `path` under `NESTLOG_*` variables.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("NESTLOG"))
      .build()?
      .try_deserialize()
  }

  /// Point the store at a `DATABASE_URL`-style location; a `file:` prefix
  /// is accepted and stripped.
  pub fn apply_database_url(&mut self, url: &str) {
    self.store_path = PathBuf::from(url.strip_prefix("file:").unwrap_or(url));
  }

  /// Offsets outside ±24h fall back to UTC.
  pub fn utc_offset(&self) -> FixedOffset {
    FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60))
      .unwrap_or_else(|| Utc.fix())
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:  Arc::clone(&self.store),
      config: Arc::clone(&self.config),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router: dashboard, form endpoints, and the
/// JSON API nested under `/api`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: ActivityStore + 'static,
{
  let api = nestlog_api::api_router(Arc::clone(&state.store));

  Router::new()
    .route("/",           get(dashboard::handler::<S>))
    .route("/log/feed",   post(log::feed::<S>))
    .route("/log/sleep",  post(log::sleep::<S>))
    .route("/log/diaper", post(log::diaper::<S>))
    .with_state(state)
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
}
