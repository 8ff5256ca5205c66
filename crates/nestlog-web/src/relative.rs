//! Human-readable "5 minutes ago" descriptions of timestamps.
//!
//! Thresholds follow the usual distance-in-words buckets: a bucket's value is
//! rounded, and the wording softens ("about", "over", "almost") as the
//! distance grows.

use chrono::{DateTime, Utc};

const MINUTES_IN_DAY: i64 = 1_440;
const MINUTES_IN_MONTH: i64 = 43_200;
const MINUTES_IN_TWO_MONTHS: i64 = 86_400;

/// Describe `then` relative to `now`, e.g. `"about 2 hours ago"` or
/// `"in 3 days"`.
pub fn describe(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
  let delta = now.signed_duration_since(then);
  let distance = distance_in_words(delta.num_seconds().abs());
  if delta.num_seconds() >= 0 {
    format!("{distance} ago")
  } else {
    format!("in {distance}")
  }
}

fn plural(n: i64, unit: &str) -> String {
  if n == 1 {
    format!("1 {unit}")
  } else {
    format!("{n} {unit}s")
  }
}

fn distance_in_words(seconds: i64) -> String {
  let minutes = (seconds + 30) / 60;

  if minutes == 0 {
    return "less than a minute".to_owned();
  }
  if minutes < 45 {
    return plural(minutes, "minute");
  }
  if minutes < 90 {
    return "about 1 hour".to_owned();
  }
  if minutes < MINUTES_IN_DAY {
    return format!("about {}", plural((minutes + 30) / 60, "hour"));
  }
  if minutes < 2_520 {
    return "1 day".to_owned();
  }
  if minutes < MINUTES_IN_MONTH {
    return plural((minutes + MINUTES_IN_DAY / 2) / MINUTES_IN_DAY, "day");
  }
  if minutes < MINUTES_IN_TWO_MONTHS {
    let months = (minutes + MINUTES_IN_MONTH / 2) / MINUTES_IN_MONTH;
    return format!("about {}", plural(months, "month"));
  }

  let months = minutes / MINUTES_IN_MONTH;
  if months < 12 {
    return plural(months, "month");
  }

  let years = months / 12;
  match months % 12 {
    0..3 => format!("about {}", plural(years, "year")),
    3..9 => format!("over {}", plural(years, "year")),
    _ => format!("almost {}", plural(years + 1, "year")),
  }
}
