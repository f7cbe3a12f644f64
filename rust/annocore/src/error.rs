//! Range validation errors
//!
//! The render path never returns these: it clamps or skips. They exist for
//! callers that want to reject bad input up front (strict mode).

use crate::range::TextRange;

/// Validation failure for a range list
#[derive(Debug, Clone, PartialEq)]
pub enum RangeError {
    /// `end < start`
    InvalidBounds { id: usize, start: usize, end: usize },
    /// Start lies at or past the end of the text
    OutOfText { id: usize, start: usize, text_len: usize },
    /// Two ranges carrying replacements cover a common offset
    OverlappingReplacements { first: usize, second: usize },
}

impl std::fmt::Display for RangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RangeError::InvalidBounds { id, start, end } => {
                write!(f, "range #{} has end {} before start {}", id, end, start)
            }
            RangeError::OutOfText { id, start, text_len } => {
                write!(f, "range #{} starts at {} but text has {} code units", id, start, text_len)
            }
            RangeError::OverlappingReplacements { first, second } => {
                write!(f, "replacement ranges #{} and #{} overlap", first, second)
            }
        }
    }
}

impl std::error::Error for RangeError {}

/// Check every range against a text of `text_len` UTF-16 code units.
///
/// An `end` past the text is accepted (it is clamped when rendering).
pub fn validate_ranges(ranges: &[TextRange], text_len: usize) -> Result<(), RangeError> {
    for (id, r) in ranges.iter().enumerate() {
        if r.end < r.start {
            return Err(RangeError::InvalidBounds { id, start: r.start, end: r.end });
        }
        if r.start >= text_len {
            return Err(RangeError::OutOfText { id, start: r.start, text_len });
        }
    }
    Ok(())
}

/// Reject replacement-carrying ranges that overlap each other.
///
/// Pure highlight ranges may overlap freely. Unplaced ranges never apply, so
/// they never conflict.
pub fn validate_replacements(ranges: &[TextRange]) -> Result<(), RangeError> {
    let with_replacement: Vec<(usize, &TextRange)> = ranges
        .iter()
        .enumerate()
        .filter(|(_, r)| r.replacement_text().is_some() && !r.is_unplaced())
        .collect();

    for (i, (first, a)) in with_replacement.iter().enumerate() {
        for (second, b) in &with_replacement[i + 1..] {
            if a.overlaps(b) {
                return Err(RangeError::OverlappingReplacements {
                    first: *first,
                    second: *second,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_ranges_pass() {
        let ranges = vec![TextRange::new(0, 2), TextRange::new(3, 40)];
        assert!(validate_ranges(&ranges, 10).is_ok());
    }

    #[test]
    fn test_inverted_range_rejected() {
        let ranges = vec![TextRange::new(0, 2), TextRange::new(6, 4)];
        assert_eq!(
            validate_ranges(&ranges, 10),
            Err(RangeError::InvalidBounds { id: 1, start: 6, end: 4 })
        );
    }

    #[test]
    fn test_start_past_text_rejected() {
        let ranges = vec![TextRange::new(10, 12)];
        assert!(matches!(
            validate_ranges(&ranges, 10),
            Err(RangeError::OutOfText { id: 0, .. })
        ));
    }

    #[test]
    fn test_overlapping_replacements_rejected() {
        let ranges = vec![
            TextRange::new(0, 4).with_replacement("a"),
            TextRange::new(2, 3),
            TextRange::new(4, 6).with_replacement("b"),
        ];
        assert_eq!(
            validate_replacements(&ranges),
            Err(RangeError::OverlappingReplacements { first: 0, second: 2 })
        );
    }

    #[test]
    fn test_highlight_overlap_allowed() {
        let ranges = vec![
            TextRange::new(0, 4).with_replacement("a"),
            TextRange::new(2, 3),
            TextRange::new(1, 6).with_replacement(""),
        ];
        assert!(validate_replacements(&ranges).is_ok());
    }

    #[test]
    fn test_unplaced_replacements_ignored() {
        let mut a = TextRange::unplaced();
        a.replacement = Some("x".to_string());
        let b = a.clone();
        assert!(validate_replacements(&[a, b]).is_ok());
    }

    #[test]
    fn test_display() {
        let err = RangeError::OverlappingReplacements { first: 1, second: 3 };
        assert_eq!(err.to_string(), "replacement ranges #1 and #3 overlap");
    }
}
