//! Range header parsing
//!
//! Single-range `bytes=` parsing per RFC 7233, used when serving static
//! assets. Multi-range and non-byte units are ignored and answered with the
//! full body.

/// A satisfiable byte range within a file of known size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: usize,
    /// Inclusive end position, already clamped to the file size
    pub end: usize,
}

impl ByteRange {
    /// Number of bytes covered by this range
    pub const fn len(&self) -> usize {
        self.end - self.start + 1
    }
}

/// Outcome of parsing a `Range` header against a file of `file_size` bytes
#[derive(Debug)]
pub enum RangeOutcome {
    /// Serve the requested slice with 206
    Partial(ByteRange),
    /// Range cannot be satisfied, answer 416
    Unsatisfiable,
    /// No usable range, serve the full body
    Full,
}

/// Parse a `Range` header value
///
/// Accepted forms: `bytes=start-end`, `bytes=start-`, `bytes=-suffix`.
pub fn parse_range(header: Option<&str>, file_size: usize) -> RangeOutcome {
    let Some(spec) = header.and_then(|h| h.strip_prefix("bytes=")) else {
        return RangeOutcome::Full;
    };

    // Only single ranges are supported
    if spec.contains(',') || file_size == 0 {
        return RangeOutcome::Full;
    }

    let Some((start_str, end_str)) = spec.split_once('-') else {
        return RangeOutcome::Full;
    };
    let (start_str, end_str) = (start_str.trim(), end_str.trim());

    if start_str.is_empty() {
        // Suffix form: the last N bytes
        return match end_str.parse::<usize>() {
            Ok(0) => RangeOutcome::Unsatisfiable,
            Ok(suffix) => RangeOutcome::Partial(ByteRange {
                start: file_size.saturating_sub(suffix),
                end: file_size - 1,
            }),
            Err(_) => RangeOutcome::Full,
        };
    }

    let Ok(start) = start_str.parse::<usize>() else {
        return RangeOutcome::Full;
    };
    if start >= file_size {
        return RangeOutcome::Unsatisfiable;
    }

    let end = if end_str.is_empty() {
        file_size - 1
    } else {
        match end_str.parse::<usize>() {
            Ok(e) => e.min(file_size - 1),
            Err(_) => return RangeOutcome::Full,
        }
    };

    if start > end {
        return RangeOutcome::Unsatisfiable;
    }

    RangeOutcome::Partial(ByteRange { start, end })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_header() {
        assert!(matches!(parse_range(None, 100), RangeOutcome::Full));
    }

    #[test]
    fn test_bounded_range() {
        match parse_range(Some("bytes=0-9"), 100) {
            RangeOutcome::Partial(r) => {
                assert_eq!(r, ByteRange { start: 0, end: 9 });
                assert_eq!(r.len(), 10);
            }
            other => panic!("expected Partial, got {other:?}"),
        }
    }

    #[test]
    fn test_open_ended_range() {
        match parse_range(Some("bytes=40-"), 100) {
            RangeOutcome::Partial(r) => assert_eq!(r, ByteRange { start: 40, end: 99 }),
            other => panic!("expected Partial, got {other:?}"),
        }
    }

    #[test]
    fn test_suffix_range() {
        match parse_range(Some("bytes=-25"), 100) {
            RangeOutcome::Partial(r) => assert_eq!(r, ByteRange { start: 75, end: 99 }),
            other => panic!("expected Partial, got {other:?}"),
        }
    }

    #[test]
    fn test_end_clamped_to_file() {
        match parse_range(Some("bytes=90-500"), 100) {
            RangeOutcome::Partial(r) => assert_eq!(r, ByteRange { start: 90, end: 99 }),
            other => panic!("expected Partial, got {other:?}"),
        }
    }

    #[test]
    fn test_unsatisfiable() {
        assert!(matches!(
            parse_range(Some("bytes=100-"), 100),
            RangeOutcome::Unsatisfiable
        ));
        assert!(matches!(
            parse_range(Some("bytes=-0"), 100),
            RangeOutcome::Unsatisfiable
        ));
        assert!(matches!(
            parse_range(Some("bytes=9-5"), 100),
            RangeOutcome::Unsatisfiable
        ));
    }

    #[test]
    fn test_malformed_served_in_full() {
        assert!(matches!(
            parse_range(Some("bytes=a-b"), 100),
            RangeOutcome::Full
        ));
        assert!(matches!(
            parse_range(Some("bytes=0-9,20-29"), 100),
            RangeOutcome::Full
        ));
        assert!(matches!(
            parse_range(Some("items=0-9"), 100),
            RangeOutcome::Full
        ));
    }
}
