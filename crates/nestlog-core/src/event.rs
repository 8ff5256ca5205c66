//! Event types — one logged caregiving activity.
//!
//! Events are append-only: once written, no field is ever updated and no row
//! is ever deleted. Every event carries a [`EventKind`] and, optionally, a
//! typed [`EventMetadata`] payload whose variant is determined by that kind.

use chrono::{DateTime, Datelike as _, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};
use uuid::Uuid;

use crate::{Error, Result};

/// Largest feed amount (ml or g) accepted at the write boundary.
pub const MAX_FEED_AMOUNT: u32 = 500;

/// Years representable as a four-digit RFC 3339 timestamp.
pub const TIMESTAMP_YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

// ─── Kinds ───────────────────────────────────────────────────────────────────

/// The closed set of activities that can be logged.
///
/// The SCREAMING_SNAKE_CASE spelling is the value stored in the `event_type`
/// column and used on the wire.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
  Feed,
  Sleep,
  Diaper,
}

impl EventKind {
  /// The discriminant string stored in the `event_type` column.
  pub fn as_str(self) -> &'static str { self.into() }

  /// Parse a stored discriminant, mapping failures onto [`Error`].
  pub fn parse(s: &str) -> Result<Self> {
    s.parse().map_err(|_| Error::UnknownEventKind(s.to_owned()))
  }
}

/// How a feed was given.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum FeedKind {
  Bottle,
  Breast,
  Solid,
}

impl FeedKind {
  /// Unit the `amount` field is measured in.
  pub fn unit(self) -> &'static str {
    match self {
      Self::Bottle | Self::Breast => "ml",
      Self::Solid => "g",
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Self::Bottle => "Bottle",
      Self::Breast => "Breast",
      Self::Solid => "Solid",
    }
  }
}

/// What a diaper change contained.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DiaperKind {
  Wet,
  Dirty,
  Both,
}

// ─── Metadata ────────────────────────────────────────────────────────────────

/// Detail for a [`EventKind::Feed`] event, e.g. `{"type":"BOTTLE","amount":120}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedMetadata {
  #[serde(rename = "type")]
  pub kind:   FeedKind,
  /// Millilitres for bottle and breast feeds, grams for solids.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub amount: Option<u32>,
}

/// Detail for a [`EventKind::Diaper`] event, e.g. `{"type":"wet"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiaperMetadata {
  #[serde(rename = "type")]
  pub kind: DiaperKind,
}

/// Detail for a [`EventKind::Sleep`] event, e.g. `{"notes":"in the car seat"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SleepMetadata {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub notes: Option<String>,
}

/// The typed payload of an event.
///
/// Serialised untagged: the payload alone is what lands in the `metadata`
/// column, and the owning event's `kind` says which variant it is. Prefer
/// [`EventMetadata::from_parts`] over plain deserialisation whenever the kind
/// is known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventMetadata {
  // Order matters for untagged deserialisation: sleep accepts `{}`.
  Feed(FeedMetadata),
  Diaper(DiaperMetadata),
  Sleep(SleepMetadata),
}

impl EventMetadata {
  /// The event kind this payload belongs to.
  pub fn kind(&self) -> EventKind {
    match self {
      Self::Feed(_) => EventKind::Feed,
      Self::Diaper(_) => EventKind::Diaper,
      Self::Sleep(_) => EventKind::Sleep,
    }
  }

  /// Serialise the payload for the `metadata` column.
  pub fn to_json(&self) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(self)?)
  }

  /// Decode a stored payload for an event of the given `kind`.
  pub fn from_parts(kind: EventKind, data: serde_json::Value) -> Result<Self> {
    Ok(match kind {
      EventKind::Feed => Self::Feed(serde_json::from_value(data)?),
      EventKind::Diaper => Self::Diaper(serde_json::from_value(data)?),
      EventKind::Sleep => Self::Sleep(serde_json::from_value(data)?),
    })
  }
}

// ─── Event ───────────────────────────────────────────────────────────────────

/// A persisted event. Never updated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
  pub event_id:   Uuid,
  pub user_id:    Uuid,
  pub kind:       EventKind,
  /// When the activity began. All ordering uses this field.
  pub start_time: DateTime<Utc>,
  /// Reserved for activities with a duration; no write path sets it yet.
  pub end_time:   Option<DateTime<Utc>>,
  pub metadata:   Option<EventMetadata>,
  /// Server-assigned insertion timestamp.
  pub created_at: DateTime<Utc>,
}

// ─── NewEvent ────────────────────────────────────────────────────────────────

/// Input to [`crate::store::ActivityStore::append_event`].
/// `event_id` and `created_at` are always set by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
  pub user_id:    Uuid,
  pub kind:       EventKind,
  pub start_time: DateTime<Utc>,
  pub end_time:   Option<DateTime<Utc>>,
  pub metadata:   Option<EventMetadata>,
}

impl NewEvent {
  /// An event of `kind` starting now, with no metadata.
  pub fn now(user_id: Uuid, kind: EventKind) -> Self {
    Self {
      user_id,
      kind,
      start_time: Utc::now(),
      end_time: None,
      metadata: None,
    }
  }

  pub fn with_metadata(mut self, metadata: EventMetadata) -> Self {
    self.metadata = Some(metadata);
    self
  }

  pub fn with_start_time(mut self, start_time: DateTime<Utc>) -> Self {
    self.start_time = start_time;
    self
  }

  pub fn with_end_time(mut self, end_time: DateTime<Utc>) -> Self {
    self.end_time = Some(end_time);
    self
  }

  /// Trim sleep notes; a sleep event without notes carries no metadata.
  pub fn normalized(mut self) -> Self {
    let blank = match &mut self.metadata {
      Some(EventMetadata::Sleep(sleep)) => {
        sleep.notes = sleep
          .notes
          .take()
          .map(|n| n.trim().to_owned())
          .filter(|n| !n.is_empty());
        sleep.notes.is_none()
      }
      _ => false,
    };
    if blank {
      self.metadata = None;
    }
    self
  }

  /// Check the input before it reaches the store. Reports the first
  /// violation found.
  pub fn validate(&self) -> Result<()> {
    for at in std::iter::once(self.start_time).chain(self.end_time) {
      if !TIMESTAMP_YEARS.contains(&at.year()) {
        return Err(Error::TimestampOutOfRange(at));
      }
    }

    if let Some(end) = self.end_time
      && end < self.start_time
    {
      return Err(Error::EndBeforeStart);
    }

    let Some(metadata) = &self.metadata else {
      return Ok(());
    };

    if metadata.kind() != self.kind {
      return Err(Error::MetadataMismatch {
        kind:     self.kind,
        metadata: metadata.kind(),
      });
    }

    if let EventMetadata::Feed(FeedMetadata { amount: Some(amount), .. }) =
      metadata
      && *amount > MAX_FEED_AMOUNT
    {
      return Err(Error::AmountOutOfRange {
        amount: *amount,
        max:    MAX_FEED_AMOUNT,
      });
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use chrono::Duration;
  use serde_json::json;

  use super::*;

  fn bottle(amount: u32) -> EventMetadata {
    EventMetadata::Feed(FeedMetadata {
      kind:   FeedKind::Bottle,
      amount: Some(amount),
    })
  }

  #[test]
  fn event_kind_uses_screaming_discriminants() {
    assert_eq!(EventKind::Feed.as_str(), "FEED");
    assert_eq!(EventKind::Diaper.to_string(), "DIAPER");
    assert_eq!(EventKind::parse("SLEEP").unwrap(), EventKind::Sleep);
    assert!(matches!(
      EventKind::parse("sleep"),
      Err(Error::UnknownEventKind(s)) if s == "sleep"
    ));
  }

  #[test]
  fn feed_metadata_matches_stored_shape() {
    let value = bottle(120).to_json().unwrap();
    assert_eq!(value, json!({ "type": "BOTTLE", "amount": 120 }));

    let breast = EventMetadata::Feed(FeedMetadata {
      kind:   FeedKind::Breast,
      amount: None,
    });
    assert_eq!(breast.to_json().unwrap(), json!({ "type": "BREAST" }));
  }

  #[test]
  fn from_parts_decodes_by_kind() {
    let diaper =
      EventMetadata::from_parts(EventKind::Diaper, json!({ "type": "both" }))
        .unwrap();
    assert_eq!(
      diaper,
      EventMetadata::Diaper(DiaperMetadata { kind: DiaperKind::Both })
    );

    let sleep = EventMetadata::from_parts(EventKind::Sleep, json!({})).unwrap();
    assert_eq!(sleep, EventMetadata::Sleep(SleepMetadata::default()));

    // A diaper payload is not a valid feed payload.
    assert!(
      EventMetadata::from_parts(EventKind::Feed, json!({ "type": "wet" }))
        .is_err()
    );
  }

  #[test]
  fn untagged_deserialise_picks_variant_from_shape() {
    let meta: EventMetadata =
      serde_json::from_value(json!({ "type": "SOLID", "amount": 40 })).unwrap();
    assert_eq!(meta.kind(), EventKind::Feed);

    let meta: EventMetadata =
      serde_json::from_value(json!({ "type": "dirty" })).unwrap();
    assert_eq!(meta.kind(), EventKind::Diaper);

    let meta: EventMetadata =
      serde_json::from_value(json!({ "notes": "nap" })).unwrap();
    assert_eq!(meta.kind(), EventKind::Sleep);
  }

  #[test]
  fn feed_kind_parses_form_values() {
    assert_eq!("bottle".parse::<FeedKind>().unwrap(), FeedKind::Bottle);
    assert_eq!("SOLID".parse::<FeedKind>().unwrap(), FeedKind::Solid);
    assert_eq!(FeedKind::Solid.unit(), "g");
    assert_eq!("wet".parse::<DiaperKind>().unwrap(), DiaperKind::Wet);
  }

  #[test]
  fn validate_rejects_mismatched_metadata() {
    let input = NewEvent::now(Uuid::new_v4(), EventKind::Sleep)
      .with_metadata(bottle(90));
    assert!(matches!(
      input.validate(),
      Err(Error::MetadataMismatch {
        kind:     EventKind::Sleep,
        metadata: EventKind::Feed,
      })
    ));
  }

  #[test]
  fn validate_bounds_feed_amount() {
    let user = Uuid::new_v4();
    let ok = NewEvent::now(user, EventKind::Feed).with_metadata(bottle(500));
    assert!(ok.validate().is_ok());

    let too_much =
      NewEvent::now(user, EventKind::Feed).with_metadata(bottle(501));
    assert!(matches!(
      too_much.validate(),
      Err(Error::AmountOutOfRange { amount: 501, max: 500 })
    ));
  }

  #[test]
  fn validate_rejects_end_before_start() {
    let input = NewEvent::now(Uuid::new_v4(), EventKind::Sleep);
    let end = input.start_time - Duration::minutes(5);
    assert!(matches!(
      input.with_end_time(end).validate(),
      Err(Error::EndBeforeStart)
    ));
  }

  #[test]
  fn validate_rejects_five_digit_years() {
    use chrono::TimeZone as _;

    let user = Uuid::new_v4();
    let far = Utc.with_ymd_and_hms(10_000, 1, 1, 0, 0, 0).unwrap();
    let input = NewEvent::now(user, EventKind::Sleep).with_start_time(far);
    assert!(matches!(
      input.validate(),
      Err(Error::TimestampOutOfRange(at)) if at == far
    ));

    let ancient = Utc.with_ymd_and_hms(-1, 6, 1, 0, 0, 0).unwrap();
    let input = NewEvent::now(user, EventKind::Sleep)
      .with_start_time(ancient)
      .with_end_time(far);
    assert!(matches!(
      input.validate(),
      Err(Error::TimestampOutOfRange(at)) if at == ancient
    ));

    let last_day = Utc.with_ymd_and_hms(9999, 12, 31, 23, 59, 59).unwrap();
    let input = NewEvent::now(user, EventKind::Sleep)
      .with_start_time(last_day - Duration::hours(1))
      .with_end_time(last_day);
    assert!(input.validate().is_ok());
  }

  #[test]
  fn validate_accepts_missing_metadata() {
    let input = NewEvent::now(Uuid::new_v4(), EventKind::Diaper);
    assert!(input.validate().is_ok());
  }

  #[test]
  fn normalized_drops_blank_sleep_notes() {
    let user = Uuid::new_v4();
    let blank = NewEvent::now(user, EventKind::Sleep)
      .with_metadata(EventMetadata::Sleep(SleepMetadata {
        notes: Some("   ".into()),
      }))
      .normalized();
    assert_eq!(blank.metadata, None);

    let noted = NewEvent::now(user, EventKind::Sleep)
      .with_metadata(EventMetadata::Sleep(SleepMetadata {
        notes: Some("  fell asleep in car seat ".into()),
      }))
      .normalized();
    assert_eq!(
      noted.metadata,
      Some(EventMetadata::Sleep(SleepMetadata {
        notes: Some("fell asleep in car seat".into()),
      }))
    );
  }
}
