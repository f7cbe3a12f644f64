//! Boundary adapters: analysis-service shapes → TextRange
//!
//! The service reports flagged spans in three shapes:
//!
//! | Shape             | Replacement field | Tooltip                 |
//! |-------------------|-------------------|-------------------------|
//! | `TextCorrection`  | `corrected`       | `Incorrect: {conf}%`    |
//! | `DetectedIssue`   | `suggestion`      | `Potentially Incorrect` |
//! | `DetectedSection` | none              | `AI-Generated`          |
//!
//! Positions are signed UTF-16 offsets on the wire. A negative start is
//! clamped to 0, offsets too large for `usize` saturate, and a negative end
//! (or an entry that does not parse) becomes [`TextRange::unplaced`]. The
//! converted list always has one range per wire entry, so a range id is
//! also the entry's index in the caller's array.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::range::{TextRange, UNPLACED};

pub const LABEL_ISSUE: &str = "Potentially Incorrect";
pub const LABEL_AI_SECTION: &str = "AI-Generated";

// =============================================================================
// Wire shapes
// =============================================================================

/// `{ start, end }` as sent by the service (inclusive end)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    #[serde(default)]
    pub start: i64,
    #[serde(default)]
    pub end: i64,
}

/// Extracted-text verification entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextCorrection {
    #[serde(default)]
    pub original: String,
    #[serde(default)]
    pub corrected: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub confidence: f64,
}

/// Misinformation detection entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectedIssue {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub suggestion: String,
}

/// AI-generated section marker
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectedSection {
    #[serde(default)]
    pub start: i64,
    #[serde(default)]
    pub end: i64,
    #[serde(default)]
    pub confidence: f64,
}

/// Generic range as accepted by `render` and `reconstructText`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeInput {
    #[serde(default)]
    pub start: i64,
    #[serde(default)]
    pub end: i64,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub replacement: Option<String>,
}

// =============================================================================
// Conversion
// =============================================================================

/// Anything that can be rendered as a flagged span
pub trait RangeSource {
    /// Unplaced when the span cannot cover any character
    fn to_text_range(&self) -> TextRange;
}

/// Saturating conversion; `as` would wrap on 32-bit targets
fn offset(value: i64) -> usize {
    usize::try_from(value.max(0)).unwrap_or(usize::MAX)
}

fn bounds(start: i64, end: i64) -> Option<(usize, usize)> {
    if end < 0 {
        return None;
    }
    Some((offset(start), offset(end)))
}

fn place(start: i64, end: i64, confidence: f64, label: Option<String>, replacement: Option<String>) -> TextRange {
    match bounds(start, end) {
        Some((start, end)) => TextRange {
            start,
            end,
            confidence,
            label,
            replacement,
        },
        None => TextRange {
            start: UNPLACED,
            end: UNPLACED,
            confidence,
            label,
            replacement: None,
        },
    }
}

fn optional(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

impl RangeSource for TextCorrection {
    fn to_text_range(&self) -> TextRange {
        place(
            self.position.start,
            self.position.end,
            self.confidence,
            Some(format!("Incorrect: {}%", self.confidence)),
            optional(&self.corrected),
        )
    }
}

impl RangeSource for DetectedIssue {
    fn to_text_range(&self) -> TextRange {
        place(
            self.position.start,
            self.position.end,
            self.confidence,
            Some(LABEL_ISSUE.to_string()),
            optional(&self.suggestion),
        )
    }
}

impl RangeSource for DetectedSection {
    fn to_text_range(&self) -> TextRange {
        place(self.start, self.end, self.confidence, Some(LABEL_AI_SECTION.to_string()), None)
    }
}

impl RangeSource for RangeInput {
    fn to_text_range(&self) -> TextRange {
        place(self.start, self.end, self.confidence, self.label.clone(), self.replacement.clone())
    }
}

/// Convert a wire list, one range per entry
pub fn to_ranges<T: RangeSource>(items: &[T]) -> Vec<TextRange> {
    items.iter().map(|item| item.to_text_range()).collect()
}

/// Convert an untyped wire list entry by entry.
///
/// Entries that fail to parse become unplaced ranges instead of failing the
/// list. Anything other than an array yields no ranges.
pub fn ranges_from_value<T: RangeSource + DeserializeOwned>(value: &Value) -> Vec<TextRange> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| {
                serde_json::from_value::<T>(item.clone())
                    .map(|parsed| parsed.to_text_range())
                    .unwrap_or_else(|_| TextRange::unplaced())
            })
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correction_parsing() {
        let json = r#"{"original": "teh", "corrected": "the", "position": {"start": 4, "end": 6}, "confidence": 92}"#;
        let correction: TextCorrection = serde_json::from_str(json).unwrap();
        let range = correction.to_text_range();

        assert_eq!((range.start, range.end), (4, 6));
        assert_eq!(range.replacement.as_deref(), Some("the"));
        assert_eq!(range.label.as_deref(), Some("Incorrect: 92%"));
    }

    #[test]
    fn test_issue_parsing() {
        let json = r#"{"text": "The moon is cheese", "position": {"start": 0, "end": 17}, "confidence": 81.5, "suggestion": "The moon is rock"}"#;
        let issue: DetectedIssue = serde_json::from_str(json).unwrap();
        let range = issue.to_text_range();

        assert_eq!(range.label.as_deref(), Some(LABEL_ISSUE));
        assert_eq!(range.replacement.as_deref(), Some("The moon is rock"));
        assert_eq!(range.confidence, 81.5);
    }

    #[test]
    fn test_section_is_highlight_only() {
        let section = DetectedSection { start: 10, end: 40, confidence: 77.0 };
        let range = section.to_text_range();

        assert!(range.replacement.is_none());
        assert_eq!(range.label.as_deref(), Some(LABEL_AI_SECTION));
    }

    #[test]
    fn test_missing_fields_default() {
        let issue: DetectedIssue = serde_json::from_str(r#"{"position": {"start": 2, "end": 3}}"#).unwrap();
        let range = issue.to_text_range();

        assert_eq!(range.confidence, 0.0);
        assert!(range.replacement.is_none());
    }

    #[test]
    fn test_negative_positions() {
        let clamped = DetectedSection { start: -5, end: 3, confidence: 50.0 };
        let range = clamped.to_text_range();
        assert_eq!((range.start, range.end), (0, 3));

        let dropped = DetectedSection { start: -5, end: -1, confidence: 50.0 };
        let range = dropped.to_text_range();
        assert!(range.is_unplaced());
        assert_eq!(range.label.as_deref(), Some(LABEL_AI_SECTION));
    }

    #[test]
    fn test_unplaced_correction_loses_replacement() {
        let correction = TextCorrection {
            original: "teh".to_string(),
            corrected: "the".to_string(),
            position: Position { start: 0, end: -1 },
            confidence: 80.0,
        };
        let range = correction.to_text_range();

        assert!(range.is_unplaced());
        assert!(range.replacement.is_none());
        assert_eq!(range.confidence, 80.0);
    }

    #[test]
    fn test_huge_offsets_saturate() {
        let section = DetectedSection { start: 1, end: (1_i64 << 32) + 2, confidence: 70.0 };
        let range = section.to_text_range();
        assert_eq!(range.start, 1);
        assert!(range.end >= u32::MAX as usize);
        assert_eq!(offset(-4), 0);

        let clamped = range.clamp_to(10).unwrap();
        assert_eq!((clamped.start, clamped.end), (1, 9));
    }

    #[test]
    fn test_to_ranges_keeps_ids_stable() {
        let sections = vec![
            DetectedSection { start: 0, end: 4, confidence: 90.0 },
            DetectedSection { start: 0, end: -2, confidence: 90.0 },
            DetectedSection { start: 8, end: 9, confidence: 60.0 },
        ];
        let ranges = to_ranges(&sections);
        assert_eq!(ranges.len(), 3);
        assert!(ranges[1].is_unplaced());
        assert_eq!(ranges[2].start, 8);
    }

    #[test]
    fn test_ranges_from_value_is_lenient() {
        let value: Value = serde_json::from_str(
            r#"[{"start": -1, "end": 2}, {"start": 0, "end": 1, "replacement": "x"}, {"start": "a"}, {"start": 4, "end": -3}]"#,
        )
        .unwrap();
        let ranges = ranges_from_value::<RangeInput>(&value);

        assert_eq!(ranges.len(), 4);
        assert_eq!((ranges[0].start, ranges[0].end), (0, 2));
        assert_eq!(ranges[1].replacement.as_deref(), Some("x"));
        assert!(ranges[2].is_unplaced());
        assert!(ranges[3].is_unplaced());
    }

    #[test]
    fn test_ranges_from_value_non_array() {
        assert!(ranges_from_value::<RangeInput>(&Value::Null).is_empty());
        assert!(ranges_from_value::<DetectedSection>(&serde_json::json!({"start": 0})).is_empty());
    }
}
