//! Shared-secret authentication for the inbound update endpoint.

use axum::http::{header, HeaderMap};
use subtle::ConstantTimeEq;

/// Token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    scheme
        .eq_ignore_ascii_case("bearer")
        .then(|| token.trim())
        .filter(|t| !t.is_empty())
}

/// Compare two secrets without short-circuiting on the first differing byte.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// True when the request carries the expected bearer token.
///
/// An empty expected token authorizes nothing.
pub fn is_authorized(headers: &HeaderMap, expected: &str) -> bool {
    !expected.is_empty()
        && bearer_token(headers)
            .is_some_and(|token| constant_time_eq(token.as_bytes(), expected.as_bytes()))
}
