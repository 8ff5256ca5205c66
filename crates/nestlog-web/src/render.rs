//! Server-side HTML rendering for the dashboard.

use chrono::{DateTime, FixedOffset, Utc};
use nestlog_core::{
  event::{Event, EventKind, EventMetadata, FeedKind},
  summary::LastEvents,
  user::User,
};
use quick_xml::escape::escape;
use strum::IntoEnumIterator as _;

use crate::relative;

/// Everything the dashboard page shows.
pub struct DashboardView<'a> {
  pub user:   Option<&'a User>,
  /// Recent events, most recent first.
  pub events: &'a [Event],
  pub last:   &'a LastEvents,
  /// Confirmation for the write that redirected here, if any.
  pub notice: Option<String>,
  pub now:    DateTime<Utc>,
  /// Offset used for clock times.
  pub offset: FixedOffset,
}

// ─── Text helpers ────────────────────────────────────────────────────────────

/// Path segment used by the form endpoints, e.g. `feed`.
pub fn slug(kind: EventKind) -> String { kind.as_str().to_ascii_lowercase() }

fn title(kind: EventKind) -> &'static str {
  match kind {
    EventKind::Feed => "Feed",
    EventKind::Sleep => "Sleep",
    EventKind::Diaper => "Diaper",
  }
}

fn timeline_label(kind: EventKind) -> &'static str {
  match kind {
    EventKind::Feed => "Feeding",
    EventKind::Sleep => "Sleep",
    EventKind::Diaper => "Diaper",
  }
}

fn clock(at: DateTime<Utc>, offset: FixedOffset) -> String {
  at.with_timezone(&offset).format("%H:%M").to_string()
}

/// Short detail shown next to a timeline entry, e.g. `120ml` or `wet`.
pub fn badge(event: &Event) -> Option<String> {
  match event.metadata.as_ref()? {
    EventMetadata::Feed(feed) => {
      feed.amount.map(|amount| format!("{amount}{}", feed.kind.unit()))
    }
    EventMetadata::Diaper(diaper) => Some(diaper.kind.to_string()),
    EventMetadata::Sleep(_) => None,
  }
}

/// Confirmation line for a just-logged event.
pub fn notice_for(event: &Event, offset: FixedOffset) -> String {
  match (&event.kind, &event.metadata) {
    (EventKind::Feed, Some(EventMetadata::Feed(feed))) => match feed.amount {
      Some(amount) => format!(
        "Feed logged! {} - {amount}{}",
        feed.kind.label(),
        feed.kind.unit()
      ),
      None => format!("Feed logged! {}", feed.kind.label()),
    },
    (EventKind::Feed, _) => "Feed logged!".to_owned(),
    (EventKind::Sleep, _) => format!(
      "Sleep logged! Started at {}",
      clock(event.start_time, offset)
    ),
    (EventKind::Diaper, Some(EventMetadata::Diaper(diaper))) => {
      let mut label = diaper.kind.to_string();
      label[..1].make_ascii_uppercase();
      format!("Diaper change logged! {label} diaper")
    }
    (EventKind::Diaper, _) => "Diaper change logged!".to_owned(),
  }
}

// ─── Page shell ──────────────────────────────────────────────────────────────

const STYLE: &str = "
body { font-family: system-ui, sans-serif; max-width: 32rem; margin: 0 auto; padding: 1.5rem 1rem; }
.cards { display: grid; grid-template-columns: repeat(3, 1fr); gap: .75rem; }
.card { border: 1px solid #ddd; border-radius: .75rem; padding: .75rem; }
.card h3 { font-size: .65rem; text-transform: uppercase; margin: 0 0 .25rem; color: #666; }
.card .ago { font-weight: bold; margin: 0; }
.card .at, .muted { font-size: .75rem; color: #666; margin: 0; }
form { border: 1px solid #ddd; border-radius: .75rem; padding: 1rem; margin: 1rem 0; }
.notice { background: #e8f5e9; border-radius: .5rem; padding: .5rem .75rem; }
.warning { background: #fff3e0; border-radius: .5rem; padding: .5rem .75rem; }
.timeline { list-style: none; padding: 0; }
.timeline li { display: flex; justify-content: space-between; padding: .5rem 0; border-bottom: 1px solid #eee; }
.badge { font-size: .65rem; background: #eee; border-radius: .25rem; padding: 0 .3rem; margin-left: .4rem; }
";

fn page(title: &str, body: &str) -> String {
  format!(
    "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
     <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
     <title>{}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{body}</body>\n</html>\n",
    escape(title)
  )
}

/// A minimal page for 4xx/5xx responses.
pub fn error_page(heading: &str, message: &str) -> String {
  page(
    heading,
    &format!(
      "<h1>{}</h1>\n<p>{}</p>\n<p><a href=\"/\">Back to the dashboard</a></p>\n",
      escape(heading),
      escape(message)
    ),
  )
}

// ─── Dashboard ───────────────────────────────────────────────────────────────

pub fn dashboard(view: &DashboardView<'_>) -> String {
  let mut body = String::new();

  let name = view
    .user
    .and_then(|u| u.name.as_deref())
    .unwrap_or("Parent");
  body.push_str(&format!(
    "<header>\n<h1>Baby Tracker</h1>\n<p class=\"muted\">Welcome back, {}</p>\n</header>\n",
    escape(name)
  ));

  if let Some(notice) = &view.notice {
    body.push_str(&format!(
      "<p class=\"notice\" role=\"status\">{}</p>\n",
      escape(notice)
    ));
  }

  body.push_str("<section class=\"cards\">\n");
  for kind in EventKind::iter() {
    body.push_str(&summary_card(view, kind));
  }
  body.push_str("</section>\n");

  if view.user.is_none() {
    body.push_str(
      "<p class=\"warning\">No user found. Run <code>server --seed</code> to \
       enable logging.</p>\n",
    );
  }
  body.push_str(&forms(view.user.is_some()));

  body.push_str(&timeline(view));

  page("Baby Tracker", &body)
}

fn summary_card(view: &DashboardView<'_>, kind: EventKind) -> String {
  let (ago, at) = match view.last.get(kind) {
    Some(event) => (
      relative::describe(event.start_time, view.now),
      format!(
        "<p class=\"at\">{}</p>",
        clock(event.start_time, view.offset)
      ),
    ),
    None => ("---".to_owned(), String::new()),
  };
  format!(
    "<div class=\"card\" id=\"last-{slug}\">\n<h3>Last {title}</h3>\n\
     <p class=\"ago\">{ago}</p>{at}\n</div>\n",
    slug = slug(kind),
    title = title(kind),
  )
}

fn forms(enabled: bool) -> String {
  let disabled = if enabled { "" } else { " disabled" };

  let feed_options: String = FeedKind::iter()
    .map(|k| {
      format!(
        "<option value=\"{k}\">{} ({})</option>",
        k.label(),
        k.unit()
      )
    })
    .collect();

  format!(
    "<form method=\"post\" action=\"/log/feed\">\n<fieldset{disabled}>\n\
     <legend>Feed</legend>\n\
     <label>Type <select name=\"feed_type\">{feed_options}</select></label>\n\
     <label>Amount <input type=\"number\" name=\"amount\" value=\"120\" min=\"0\" \
     max=\"{max}\" step=\"30\"></label>\n\
     <button type=\"submit\">Log Feed</button>\n</fieldset>\n</form>\n\
     <form method=\"post\" action=\"/log/sleep\">\n<fieldset{disabled}>\n\
     <legend>Sleep</legend>\n\
     <label>Notes (optional) <input type=\"text\" name=\"notes\" \
     placeholder=\"e.g., fell asleep in car seat\"></label>\n\
     <button type=\"submit\">Log Sleep</button>\n</fieldset>\n</form>\n\
     <form method=\"post\" action=\"/log/diaper\">\n<fieldset{disabled}>\n\
     <legend>Diaper</legend>\n\
     <label><input type=\"radio\" name=\"diaper_type\" value=\"wet\" checked> Wet</label>\n\
     <label><input type=\"radio\" name=\"diaper_type\" value=\"dirty\"> Dirty</label>\n\
     <label><input type=\"radio\" name=\"diaper_type\" value=\"both\"> Both</label>\n\
     <button type=\"submit\">Log Diaper Change</button>\n</fieldset>\n</form>\n",
    max = nestlog_core::event::MAX_FEED_AMOUNT,
  )
}

fn timeline(view: &DashboardView<'_>) -> String {
  let mut out = format!(
    "<section>\n<h2>Recent Activity</h2>\n<p class=\"muted\" id=\"event-count\">{} events</p>\n",
    view.events.len()
  );

  if view.events.is_empty() {
    out.push_str(
      "<p class=\"empty\">No events yet</p>\n<p class=\"muted\">Start tracking above!</p>\n",
    );
  } else {
    out.push_str("<ul class=\"timeline\">\n");
    for event in view.events {
      let badge = badge(event)
        .map(|b| format!("<span class=\"badge\">{}</span>", escape(b.as_str())))
        .unwrap_or_default();
      out.push_str(&format!(
        "<li data-kind=\"{slug}\">\n<div><strong>{label}</strong>{badge}\
         <p class=\"muted\">{ago}</p></div>\n<time datetime=\"{iso}\">{clock}</time>\n</li>\n",
        slug = slug(event.kind),
        label = timeline_label(event.kind),
        ago = relative::describe(event.start_time, view.now),
        iso = event.start_time.to_rfc3339(),
        clock = clock(event.start_time, view.offset),
      ));
    }
    out.push_str("</ul>\n");
  }

  out.push_str("</section>\n");
  out
}
