//! RangeIndex: Flagged Spans over a Base Text
//!
//! Ranges arrive from the analysis service with **inclusive** ends:
//! a span covering offsets 5 and 6 is `start = 5, end = 6`.
//! Offsets count UTF-16 code units of the base text, the unit JavaScript
//! strings index by (see [`crate::units`]).
//!
//! Ranges are never trusted. Anything pointing outside the text is clamped
//! (end past the last character) or dropped (start past the end, `end < start`),
//! so the render path can run on every update without failing.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::units::{utf16_len, UnitMap};

/// Offset of a range that covers nothing in any text
pub const UNPLACED: usize = usize::MAX;

// =============================================================================
// TextRange
// =============================================================================

/// A flagged span of the base text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRange {
    /// First covered offset (inclusive)
    pub start: usize,
    /// Last covered offset (inclusive)
    pub end: usize,
    /// Advisory score 0-100, never used for ordering
    #[serde(default)]
    pub confidence: f64,
    /// Tooltip text ("Incorrect", "AI-Generated", ...)
    #[serde(default)]
    pub label: Option<String>,
    /// Substitution used when reconstructing corrected text
    #[serde(default)]
    pub replacement: Option<String>,
}

impl TextRange {
    pub fn new(start: usize, end: usize) -> Self {
        TextRange {
            start,
            end,
            confidence: 0.0,
            label: None,
            replacement: None,
        }
    }

    /// Placeholder for a span the service sent with unusable offsets.
    ///
    /// Keeps its slot (and so the ids of every later range) but never
    /// covers, anchors or replaces anything.
    pub fn unplaced() -> Self {
        TextRange::new(UNPLACED, UNPLACED)
    }

    pub fn is_unplaced(&self) -> bool {
        self.start == UNPLACED
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_replacement(mut self, replacement: impl Into<String>) -> Self {
        self.replacement = Some(replacement.into());
        self
    }

    /// Number of covered code units (0 for a malformed range)
    pub fn len(&self) -> usize {
        if self.end < self.start {
            0
        } else {
            self.end - self.start + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inclusive membership test
    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index <= self.end
    }

    /// True if the two inclusive spans share at least one offset
    pub fn overlaps(&self, other: &TextRange) -> bool {
        !self.is_empty() && !other.is_empty() && self.start <= other.end && other.start <= self.end
    }

    /// Replacement text, if present and non-empty
    pub fn replacement_text(&self) -> Option<&str> {
        self.replacement.as_deref().filter(|r| !r.is_empty())
    }

    /// Clamp to a text of `len` code units.
    ///
    /// Returns `None` for an empty text, a start past the end, or `end < start`.
    pub fn clamp_to(&self, len: usize) -> Option<TextRange> {
        if len == 0 || self.start >= len || self.end < self.start {
            return None;
        }
        let mut clamped = self.clone();
        clamped.end = self.end.min(len - 1);
        Some(clamped)
    }

    /// Extract the covered text from `source`, clamped to its length.
    ///
    /// A bound inside a surrogate pair takes the whole character.
    pub fn slice(&self, source: &str) -> String {
        UnitMap::new(source)
            .byte_span(self.start, self.end)
            .map(|span| source[span].to_string())
            .unwrap_or_default()
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}..={}]", self.start, self.end)
    }
}

// =============================================================================
// Point queries over raw range lists
// =============================================================================

/// All ranges covering `index`, in input order
pub fn covers(ranges: &[TextRange], index: usize) -> Vec<&TextRange> {
    ranges.iter().filter(|r| r.contains(index)).collect()
}

/// First range (input order) covering `index`.
///
/// When ranges overlap, the earliest in the list wins, not the longest and
/// not a union. Two ranges sharing a start are therefore resolved purely by
/// list position.
pub fn first_covering(ranges: &[TextRange], index: usize) -> Option<&TextRange> {
    ranges.iter().find(|r| r.contains(index))
}

/// True iff `index` is where `range` begins (tooltip anchor)
pub fn is_range_start(range: &TextRange, index: usize) -> bool {
    index == range.start
}

// =============================================================================
// RangeIndex
// =============================================================================

/// A clamped range borrowed from the caller's list
#[derive(Debug, Clone, Copy)]
pub struct IndexedRange<'a> {
    /// Position in the caller's list
    pub id: usize,
    /// The caller's range, unmodified
    pub range: &'a TextRange,
    /// Clamped start
    pub start: usize,
    /// Clamped inclusive end
    pub end: usize,
}

impl IndexedRange<'_> {
    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index <= self.end
    }

    /// True if the clamped span shares a unit with `start..=end`
    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        self.start <= end && start <= self.end
    }
}

/// Snapshot of a range list clamped to one base text.
///
/// Preserves input order so first-match semantics carry over unchanged.
#[derive(Debug, Clone)]
pub struct RangeIndex<'a> {
    entries: Vec<IndexedRange<'a>>,
    text_len: usize,
    skipped: usize,
}

impl<'a> RangeIndex<'a> {
    /// Build an index for a text of `text_len` code units
    pub fn new(ranges: &'a [TextRange], text_len: usize) -> Self {
        let mut entries = Vec::with_capacity(ranges.len());
        let mut skipped = 0;

        for (id, range) in ranges.iter().enumerate() {
            match range.clamp_to(text_len) {
                Some(clamped) => entries.push(IndexedRange {
                    id,
                    range,
                    start: clamped.start,
                    end: clamped.end,
                }),
                None => skipped += 1,
            }
        }

        RangeIndex {
            entries,
            text_len,
            skipped,
        }
    }

    /// Build an index sized to `text`
    pub fn for_text(ranges: &'a [TextRange], text: &str) -> Self {
        Self::new(ranges, utf16_len(text))
    }

    /// All ranges covering `index`, in input order
    pub fn covers(&self, index: usize) -> Vec<&IndexedRange<'a>> {
        self.entries.iter().filter(|e| e.contains(index)).collect()
    }

    /// First range (input order) covering `index`
    pub fn first_covering(&self, index: usize) -> Option<&IndexedRange<'a>> {
        self.entries.iter().find(|e| e.contains(index))
    }

    /// First range (input order) whose clamped start is `index`
    pub fn starting_at(&self, index: usize) -> Option<&IndexedRange<'a>> {
        self.entries.iter().find(|e| e.start == index)
    }

    pub fn is_range_start(&self, index: usize) -> bool {
        self.starting_at(index).is_some()
    }

    /// First range (input order) sharing a unit with `start..=end`.
    ///
    /// Used per character: an astral character spans two units and is
    /// covered when either is.
    pub fn first_overlapping(&self, start: usize, end: usize) -> Option<&IndexedRange<'a>> {
        self.entries.iter().find(|e| e.overlaps(start, end))
    }

    /// Tooltip anchor among the ranges starting inside `start..=end`.
    ///
    /// Input order decides, except that a labelled range beats an unlabelled
    /// one: a later range sharing the start still gets its tooltip shown.
    pub fn anchor_within(&self, start: usize, end: usize) -> Option<&IndexedRange<'a>> {
        let mut starting = self
            .entries
            .iter()
            .filter(move |e| start <= e.start && e.start <= end);
        let first = starting.next()?;
        if first.range.label.is_some() {
            return Some(first);
        }
        starting.find(|e| e.range.label.is_some()).or(Some(first))
    }

    /// Ranges that survived clamping
    pub fn ranges(&self) -> &[IndexedRange<'a>] {
        &self.entries
    }

    /// Number of ranges dropped as malformed or out of the text
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn text_len(&self) -> usize {
        self.text_len
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of code units covered by at least one range
    pub fn flagged_count(&self) -> usize {
        (0..self.text_len)
            .filter(|&i| self.entries.iter().any(|e| e.contains(i)))
            .count()
    }
}

// =============================================================================
// Tests
// =============================================================================
