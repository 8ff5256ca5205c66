pub mod dashboard;
pub mod log;

use axum::{
  http::{HeaderValue, header},
  response::Response,
};

pub(super) const CONTENT_TYPE_HTML: &str = "text/html; charset=utf-8";

/// Pages reflect live state: caches must revalidate on every use.
pub(super) fn no_cache(res: &mut Response) {
  res
    .headers_mut()
    .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
}
