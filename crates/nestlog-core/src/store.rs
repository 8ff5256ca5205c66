//! The `ActivityStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `nestlog-store-sqlite`).
//! Higher layers (`nestlog-api`, `nestlog-web`) depend on this abstraction,
//! not on any concrete backend, and receive the store as an explicit handle.

use std::future::Future;

use crate::{
  event::{Event, EventKind, NewEvent},
  user::User,
};

/// Window size used by the dashboard and by `GET /events` without `limit`.
pub const DEFAULT_RECENT_LIMIT: usize = 50;

/// Abstraction over a nestlog store backend.
///
/// Events are append-only; there is no update or delete path. Every write is
/// visible to the next read issued through the same handle.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ActivityStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Create and persist a new user. Used by the seed step.
  fn add_user(
    &self,
    name: Option<String>,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// The oldest user, or `None` when the table is empty. A missing user is
  /// not an error: callers treat it as "logging disabled".
  fn get_primary_user(
    &self,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  // ── Events — append-only writes ───────────────────────────────────────

  /// Validate and record a new event, returning the persisted [`Event`].
  ///
  /// A `user_id` that references no user is rejected by the store's foreign
  /// key constraint; that error is returned as-is.
  fn append_event(
    &self,
    input: NewEvent,
  ) -> impl Future<Output = Result<Event, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Up to `limit` events, most recent `start_time` first.
  fn list_recent_events(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<Event>, Self::Error>> + Send + '_;

  /// The event of `kind` with the latest `start_time`, regardless of how far
  /// back it lies.
  fn last_event_of_kind(
    &self,
    kind: EventKind,
  ) -> impl Future<Output = Result<Option<Event>, Self::Error>> + Send + '_;
}
