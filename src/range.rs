//! `Range` header parsing and validation against a file size.
//!
//! Parsing and clamping are split so each can be tested on its own: `parse`
//! classifies the header text, `resolve` turns the classification into a
//! concrete inclusive byte interval for the file being served. A header the
//! parser cannot classify degrades to a full-content response rather than an
//! error; only a syntactically valid range that fails validation is
//! unsatisfiable.

/// Classified `Range` request header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ByteRange {
    /// No `Range` header on the request.
    Full,
    /// `bytes=-N`: the last N bytes.
    Suffix(u64),
    /// `bytes=N-`: from N to the end of the file.
    Open(u64),
    /// `bytes=N-M`: N through M, inclusive.
    Closed(u64, u64),
    /// Present but not a single well-formed `bytes=` range.
    Malformed,
}

/// Range is syntactically valid but cannot be satisfied by the file.
#[derive(Debug, PartialEq, Eq)]
pub struct Unsatisfiable;

impl ByteRange {
    pub fn parse(header: Option<&str>) -> Self {
        let Some(value) = header else {
            return ByteRange::Full;
        };
        let Some(spec) = value.trim().strip_prefix("bytes=") else {
            return ByteRange::Malformed;
        };
        if spec.contains(',') {
            // Multipart ranges are not supported.
            return ByteRange::Malformed;
        }
        let Some((start, end)) = spec.split_once('-') else {
            return ByteRange::Malformed;
        };

        match (parse_bound(start), parse_bound(end)) {
            (Some(None), Some(Some(suffix))) => ByteRange::Suffix(suffix),
            (Some(Some(start)), Some(None)) => ByteRange::Open(start),
            (Some(Some(start)), Some(Some(end))) => ByteRange::Closed(start, end),
            _ => ByteRange::Malformed,
        }
    }

    /// Validates and clamps the range against the file's current length.
    ///
    /// `Ok(None)` means serve the whole file (200), `Ok(Some((start, end)))`
    /// an inclusive slice (206).
    pub fn resolve(self, size: u64) -> Result<Option<(u64, u64)>, Unsatisfiable> {
        let (start, end) = match self {
            ByteRange::Full | ByteRange::Malformed => return Ok(None),
            ByteRange::Suffix(0) => return Err(Unsatisfiable),
            ByteRange::Suffix(suffix) => (size.saturating_sub(suffix), size.saturating_sub(1)),
            ByteRange::Open(start) => (start, size.saturating_sub(1)),
            ByteRange::Closed(start, end) => (start, end),
        };

        if size == 0 || end < start || start >= size {
            return Err(Unsatisfiable);
        }

        Ok(Some((start, end.min(size - 1))))
    }
}

/// `None` for an absent bound, `Some(n)` for a digit run. Outer `None` when
/// the text is neither.
fn parse_bound(text: &str) -> Option<Option<u64>> {
    if text.is_empty() {
        return Some(None);
    }
    text.parse::<u64>().ok().map(Some)
}

#[cfg(test)]
mod tests {
    use super::{ByteRange, Unsatisfiable};

    #[test]
    fn absent_header_is_full() {
        assert_eq!(ByteRange::parse(None), ByteRange::Full);
    }

    #[test]
    fn parses_closed_open_and_suffix_forms() {
        assert_eq!(ByteRange::parse(Some("bytes=0-99")), ByteRange::Closed(0, 99));
        assert_eq!(ByteRange::parse(Some("bytes=500-")), ByteRange::Open(500));
        assert_eq!(ByteRange::parse(Some("bytes=-200")), ByteRange::Suffix(200));
        assert_eq!(ByteRange::parse(Some(" bytes=3-7")), ByteRange::Closed(3, 7));
    }

    #[test]
    fn malformed_headers_are_classified_as_such() {
        for header in [
            "bytes",
            "bytes=",
            "bytes=-",
            "bytes=a-b",
            "bytes=1-2-3",
            "bytes=0-99,200-",
            "items=0-99",
            "bytes= 0-99",
        ] {
            assert_eq!(
                ByteRange::parse(Some(header)),
                ByteRange::Malformed,
                "header {header:?}"
            );
        }
    }

    #[test]
    fn closed_range_within_file_resolves_as_is() {
        assert_eq!(ByteRange::Closed(2, 5).resolve(10), Ok(Some((2, 5))));
    }

    #[test]
    fn closed_end_clamps_to_file_size() {
        assert_eq!(ByteRange::Closed(4, 5000).resolve(10), Ok(Some((4, 9))));
    }

    #[test]
    fn open_range_runs_to_end_of_file() {
        assert_eq!(ByteRange::Open(7).resolve(10), Ok(Some((7, 9))));
    }

    #[test]
    fn suffix_serves_last_n_bytes() {
        assert_eq!(ByteRange::Suffix(3).resolve(10), Ok(Some((7, 9))));
    }

    #[test]
    fn oversized_suffix_clamps_to_whole_file() {
        assert_eq!(ByteRange::Suffix(25).resolve(10), Ok(Some((0, 9))));
    }

    #[test]
    fn start_at_or_past_size_is_unsatisfiable() {
        assert_eq!(ByteRange::Open(10).resolve(10), Err(Unsatisfiable));
        assert_eq!(ByteRange::Closed(10, 12).resolve(10), Err(Unsatisfiable));
    }

    #[test]
    fn inverted_range_is_unsatisfiable() {
        assert_eq!(ByteRange::Closed(6, 2).resolve(10), Err(Unsatisfiable));
    }

    #[test]
    fn zero_suffix_is_unsatisfiable() {
        assert_eq!(ByteRange::Suffix(0).resolve(10), Err(Unsatisfiable));
    }

    #[test]
    fn any_range_against_empty_file_is_unsatisfiable() {
        assert_eq!(ByteRange::Open(0).resolve(0), Err(Unsatisfiable));
        assert_eq!(ByteRange::Suffix(5).resolve(0), Err(Unsatisfiable));
    }

    #[test]
    fn full_and_malformed_resolve_to_whole_file() {
        assert_eq!(ByteRange::Full.resolve(10), Ok(None));
        assert_eq!(ByteRange::Malformed.resolve(10), Ok(None));
        assert_eq!(ByteRange::Full.resolve(0), Ok(None));
    }
}
