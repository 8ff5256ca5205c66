//! ETag computation and `If-None-Match` evaluation for rendered pages.
//!
//! The dashboard ETag is a SHA-256 hash over the rendered body. Logging an
//! event changes the body, so every cached copy is invalidated by the next
//! revalidation.

use axum::http::{HeaderMap, header};
use sha2::{Digest, Sha256};

/// Compute a strong, quoted ETag for `body`.
pub fn compute_etag(body: &[u8]) -> String {
  let hash = Sha256::digest(body);
  format!("\"{}\"", hex::encode(hash))
}

/// Whether the request's `If-None-Match` header already names `etag`.
///
/// Accepts `*`, comma-separated lists, weak validators, and bare tags sent
/// without the surrounding double quotes.
pub fn if_none_match(headers: &HeaderMap, etag: &str) -> bool {
  let Some(value) = headers
    .get(header::IF_NONE_MATCH)
    .and_then(|v| v.to_str().ok())
  else {
    return false;
  };

  let wanted = etag.trim_matches('"');
  value.split(',').map(str::trim).any(|candidate| {
    candidate == "*"
      || candidate.trim_start_matches("W/").trim_matches('"') == wanted
  })
}
