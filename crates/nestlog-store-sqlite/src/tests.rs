//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{DateTime, TimeZone, Utc};
use nestlog_core::{
  event::{
    DiaperKind, DiaperMetadata, EventKind, EventMetadata, FeedKind,
    FeedMetadata, NewEvent, SleepMetadata,
  },
  store::{ActivityStore, DEFAULT_RECENT_LIMIT},
  summary::LastEvents,
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn at(secs: i64) -> DateTime<Utc> {
  Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

fn feed(user_id: Uuid, secs: i64, amount: u32) -> NewEvent {
  NewEvent::now(user_id, EventKind::Feed)
    .with_start_time(at(secs))
    .with_metadata(EventMetadata::Feed(FeedMetadata {
      kind:   FeedKind::Bottle,
      amount: Some(amount),
    }))
}

fn sleep(user_id: Uuid, secs: i64) -> NewEvent {
  NewEvent::now(user_id, EventKind::Sleep).with_start_time(at(secs))
}

fn diaper(user_id: Uuid, secs: i64, kind: DiaperKind) -> NewEvent {
  NewEvent::now(user_id, EventKind::Diaper)
    .with_start_time(at(secs))
    .with_metadata(EventMetadata::Diaper(DiaperMetadata { kind }))
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn primary_user_absent_on_empty_store() {
  let s = store().await;
  assert!(s.get_primary_user().await.unwrap().is_none());
}

#[tokio::test]
async fn add_and_get_primary_user() {
  let s = store().await;

  let user = s.add_user(Some("Parent".into())).await.unwrap();
  let fetched = s.get_primary_user().await.unwrap().unwrap();
  assert_eq!(fetched, user);
  assert_eq!(fetched.name.as_deref(), Some("Parent"));
}

#[tokio::test]
async fn primary_user_is_the_oldest() {
  let s = store().await;

  let first = s.add_user(Some("First".into())).await.unwrap();
  s.add_user(Some("Second".into())).await.unwrap();
  s.add_user(None).await.unwrap();

  let primary = s.get_primary_user().await.unwrap().unwrap();
  assert_eq!(primary.user_id, first.user_id);
}

// ─── Appending ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn appended_event_is_first_in_recent() {
  let s = store().await;
  let user = s.add_user(None).await.unwrap();

  s.append_event(sleep(user.user_id, 0)).await.unwrap();
  let event = s.append_event(feed(user.user_id, 60, 120)).await.unwrap();

  let recent = s.list_recent_events(1).await.unwrap();
  assert_eq!(recent, vec![event]);
}

#[tokio::test]
async fn append_returns_what_is_stored() {
  let s = store().await;
  let user = s.add_user(None).await.unwrap();

  // Utc::now() carries nanoseconds; the stored and returned values must
  // still agree.
  let event = s
    .append_event(NewEvent::now(user.user_id, EventKind::Diaper))
    .await
    .unwrap();

  let recent = s.list_recent_events(DEFAULT_RECENT_LIMIT).await.unwrap();
  assert_eq!(recent[0], event);
}

#[tokio::test]
async fn feed_metadata_roundtrip() {
  let s = store().await;
  let user = s.add_user(None).await.unwrap();

  s.append_event(feed(user.user_id, 0, 120)).await.unwrap();

  let recent = s.list_recent_events(1).await.unwrap();
  match &recent[0].metadata {
    Some(EventMetadata::Feed(meta)) => {
      assert_eq!(meta.kind, FeedKind::Bottle);
      assert_eq!(meta.amount, Some(120));
    }
    other => panic!("unexpected metadata: {other:?}"),
  }
}

#[tokio::test]
async fn sleep_notes_and_end_time_roundtrip() {
  let s = store().await;
  let user = s.add_user(None).await.unwrap();

  let input = sleep(user.user_id, 0)
    .with_end_time(at(3600))
    .with_metadata(EventMetadata::Sleep(SleepMetadata {
      notes: Some("fell asleep in car seat".into()),
    }));
  let event = s.append_event(input).await.unwrap();

  let recent = s.list_recent_events(1).await.unwrap();
  assert_eq!(recent[0].end_time, Some(at(3600)));
  assert_eq!(recent[0].metadata, event.metadata);
}

#[tokio::test]
async fn blank_sleep_notes_store_no_metadata() {
  let s = store().await;
  let user = s.add_user(None).await.unwrap();

  let input = sleep(user.user_id, 0).with_metadata(EventMetadata::Sleep(
    SleepMetadata { notes: Some("  ".into()) },
  ));
  let event = s.append_event(input).await.unwrap();
  assert_eq!(event.metadata, None);

  let recent = s.list_recent_events(1).await.unwrap();
  assert_eq!(recent[0].metadata, None);
}

#[tokio::test]
async fn append_with_unknown_user_fails_without_writing() {
  let s = store().await;
  let user = s.add_user(None).await.unwrap();
  s.append_event(sleep(user.user_id, 0)).await.unwrap();

  let err = s
    .append_event(feed(Uuid::new_v4(), 10, 90))
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::Database(_)), "got {err:?}");
  assert!(err.is_constraint_violation());

  let recent = s.list_recent_events(DEFAULT_RECENT_LIMIT).await.unwrap();
  assert_eq!(recent.len(), 1);
}

#[tokio::test]
async fn append_rejects_invalid_input() {
  let s = store().await;
  let user = s.add_user(None).await.unwrap();

  let mismatched = sleep(user.user_id, 0).with_metadata(EventMetadata::Feed(
    FeedMetadata { kind: FeedKind::Solid, amount: Some(20) },
  ));
  let err = s.append_event(mismatched).await.unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(nestlog_core::Error::MetadataMismatch { .. })
  ));
  assert!(!err.is_constraint_violation());

  assert!(s.list_recent_events(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn unrepresentable_year_is_rejected_and_reads_keep_working() {
  let s = store().await;
  let user = s.add_user(None).await.unwrap();
  s.append_event(sleep(user.user_id, 0)).await.unwrap();

  let far = Utc.with_ymd_and_hms(10_000, 1, 1, 0, 0, 0).unwrap();
  let err = s
    .append_event(NewEvent::now(user.user_id, EventKind::Sleep).with_start_time(far))
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(nestlog_core::Error::TimestampOutOfRange(_))
  ));

  let recent = s.list_recent_events(DEFAULT_RECENT_LIMIT).await.unwrap();
  assert_eq!(recent.len(), 1);
  assert_eq!(recent[0].start_time, at(0));
}

// ─── Listing ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn recent_events_respect_limit_and_order() {
  let s = store().await;
  let user = s.add_user(None).await.unwrap();

  // Insert out of chronological order.
  for secs in [30, 10, 50, 20, 40] {
    s.append_event(sleep(user.user_id, secs)).await.unwrap();
  }

  let recent = s.list_recent_events(3).await.unwrap();
  assert_eq!(recent.len(), 3);
  let times: Vec<_> = recent.iter().map(|e| e.start_time).collect();
  assert_eq!(times, vec![at(50), at(40), at(30)]);

  let all = s.list_recent_events(DEFAULT_RECENT_LIMIT).await.unwrap();
  assert_eq!(all.len(), 5);
  assert!(all.windows(2).all(|w| w[0].start_time >= w[1].start_time));
}

#[tokio::test]
async fn zero_limit_returns_nothing() {
  let s = store().await;
  let user = s.add_user(None).await.unwrap();
  s.append_event(sleep(user.user_id, 0)).await.unwrap();

  assert!(s.list_recent_events(0).await.unwrap().is_empty());
}

#[tokio::test]
async fn listing_is_repeatable_with_tied_start_times() {
  let s = store().await;
  let user = s.add_user(None).await.unwrap();

  for _ in 0..4 {
    s.append_event(diaper(user.user_id, 0, DiaperKind::Wet))
      .await
      .unwrap();
  }
  s.append_event(feed(user.user_id, 0, 60)).await.unwrap();

  let first = s.list_recent_events(DEFAULT_RECENT_LIMIT).await.unwrap();
  let second = s.list_recent_events(DEFAULT_RECENT_LIMIT).await.unwrap();
  assert_eq!(first.len(), 5);
  assert_eq!(first, second);
}

// ─── Last of kind ────────────────────────────────────────────────────────────

#[tokio::test]
async fn last_event_of_kind_ignores_other_kinds() {
  let s = store().await;
  let user = s.add_user(None).await.unwrap();

  let old_feed = s.append_event(feed(user.user_id, 0, 60)).await.unwrap();
  let new_feed = s.append_event(feed(user.user_id, 100, 90)).await.unwrap();
  s.append_event(sleep(user.user_id, 200)).await.unwrap();

  let last = s.last_event_of_kind(EventKind::Feed).await.unwrap();
  assert_eq!(last.as_ref(), Some(&new_feed));
  assert_ne!(last.as_ref(), Some(&old_feed));
  assert!(s.last_event_of_kind(EventKind::Diaper).await.unwrap().is_none());
}

#[tokio::test]
async fn window_derivation_and_resolve() {
  let s = store().await;
  let user = s.add_user(None).await.unwrap();

  let diaper_event = s
    .append_event(diaper(user.user_id, 0, DiaperKind::Dirty))
    .await
    .unwrap();
  let old_feed = s.append_event(feed(user.user_id, 10, 60)).await.unwrap();
  let sleep_event = s.append_event(sleep(user.user_id, 20)).await.unwrap();
  let new_feed = s.append_event(feed(user.user_id, 30, 120)).await.unwrap();

  // A three-row window holds FEED@30, SLEEP@20, FEED@10.
  let window = s.list_recent_events(3).await.unwrap();
  assert_eq!(window.len(), 3);

  let from_window = LastEvents::from_recent(&window);
  assert_eq!(from_window.feed.as_ref(), Some(&new_feed));
  assert_eq!(from_window.sleep.as_ref(), Some(&sleep_event));
  assert!(from_window.diaper.is_none());
  assert_ne!(from_window.feed.as_ref(), Some(&old_feed));

  let resolved = LastEvents::resolve(&s, &window).await.unwrap();
  assert_eq!(resolved.diaper.as_ref(), Some(&diaper_event));
  assert_eq!(resolved.feed, from_window.feed);
  assert!(resolved.missing().is_empty());
}

#[tokio::test]
async fn open_on_disk_applies_schema_once() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("test.db");

  {
    let s = SqliteStore::open(&path).await.unwrap();
    let user = s.add_user(Some("Parent".into())).await.unwrap();
    s.append_event(sleep(user.user_id, 0)).await.unwrap();
  }

  // Re-opening an existing file keeps its rows.
  let s = SqliteStore::open(&path).await.unwrap();
  assert!(s.get_primary_user().await.unwrap().is_some());
  assert_eq!(
    s.list_recent_events(DEFAULT_RECENT_LIMIT).await.unwrap().len(),
    1
  );
  let last = s.last_event_of_kind(EventKind::Sleep).await.unwrap().unwrap();
  assert_eq!(last.start_time, at(0));
}
