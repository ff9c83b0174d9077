//! Conditional request support
//!
//! `ETag` generation for asset bodies and `If-None-Match` evaluation.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Compute a quoted `ETag` for a response body
///
/// The tag is a hash of the content, so it changes whenever the underlying
/// file changes and is stable across requests for the same bytes.
pub fn etag_for(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("\"{:x}\"", hasher.finish())
}

/// Evaluate a client's `If-None-Match` header against the current `ETag`
///
/// A match means the client's cached copy is still valid and a 304 should be
/// returned. The header may carry several comma-separated tags or the `*`
/// wildcard.
pub fn not_modified(if_none_match: Option<&str>, etag: &str) -> bool {
    let Some(client_tags) = if_none_match else {
        return false;
    };
    client_tags
        .split(',')
        .map(str::trim)
        .any(|tag| tag == "*" || tag == etag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_etag_is_quoted() {
        let etag = etag_for(b"body bytes");
        assert!(etag.starts_with('"') && etag.ends_with('"'));
        assert!(etag.len() > 2);
    }

    #[test]
    fn test_etag_tracks_content() {
        assert_eq!(etag_for(b"same"), etag_for(b"same"));
        assert_ne!(etag_for(b"one"), etag_for(b"two"));
    }

    #[test]
    fn test_not_modified_matching() {
        let etag = etag_for(b"asset");
        assert!(not_modified(Some(etag.as_str()), &etag));
        assert!(not_modified(Some("*"), &etag));

        let multiple = format!("\"stale\", {etag}");
        assert!(not_modified(Some(multiple.as_str()), &etag));

        assert!(!not_modified(Some("\"stale\""), &etag));
        assert!(!not_modified(None, &etag));
    }
}
