//! "Last event of each kind", derived from a recent-events window.

use serde::Serialize;
use strum::IntoEnumIterator as _;

use crate::{
  event::{Event, EventKind},
  store::ActivityStore,
};

/// The most recent event of each kind, if known.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LastEvents {
  pub feed:   Option<Event>,
  pub sleep:  Option<Event>,
  pub diaper: Option<Event>,
}

impl LastEvents {
  /// Take the first event of each kind from `window`, which must already be
  /// ordered by `start_time` descending.
  ///
  /// A kind with no event inside the window is reported as absent even if an
  /// older one exists in the store. Use [`LastEvents::resolve`] to fill those
  /// gaps.
  pub fn from_recent(window: &[Event]) -> Self {
    let mut last = Self::default();
    for kind in EventKind::iter() {
      *last.slot_mut(kind) = window.iter().find(|e| e.kind == kind).cloned();
    }
    last
  }

  /// Derive from `window`, then ask `store` directly for any kind the window
  /// did not contain.
  pub async fn resolve<S: ActivityStore>(
    store: &S,
    window: &[Event],
  ) -> Result<Self, S::Error> {
    let mut last = Self::from_recent(window);
    for kind in last.missing() {
      *last.slot_mut(kind) = store.last_event_of_kind(kind).await?;
    }
    Ok(last)
  }

  pub fn get(&self, kind: EventKind) -> Option<&Event> {
    match kind {
      EventKind::Feed => self.feed.as_ref(),
      EventKind::Sleep => self.sleep.as_ref(),
      EventKind::Diaper => self.diaper.as_ref(),
    }
  }

  /// Kinds with no known last event.
  pub fn missing(&self) -> Vec<EventKind> {
    EventKind::iter().filter(|k| self.get(*k).is_none()).collect()
  }

  fn slot_mut(&mut self, kind: EventKind) -> &mut Option<Event> {
    match kind {
      EventKind::Feed => &mut self.feed,
      EventKind::Sleep => &mut self.sleep,
      EventKind::Diaper => &mut self.diaper,
    }
  }
}
