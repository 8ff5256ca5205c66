//! User — the caregiver account that owns logged events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A caregiver. Created once by the seed step and never modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub user_id:    Uuid,
  /// Display name; the dashboard falls back to "Parent" when absent.
  pub name:       Option<String>,
  pub created_at: DateTime<Utc>,
}
