//! JSON REST API for nestlog.
//!
//! Exposes an axum [`Router`] backed by any
//! [`nestlog_core::store::ActivityStore`]. TLS and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", nestlog_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod events;
pub mod users;

use std::sync::Arc;

use axum::{Router, routing::get};
use nestlog_core::store::ActivityStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: ActivityStore + 'static,
{
  Router::new()
    .route("/user", get(users::primary::<S>))
    .route("/events", get(events::list::<S>).post(events::create::<S>))
    .route("/events/latest", get(events::latest::<S>))
    .with_state(store)
}
