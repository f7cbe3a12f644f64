//! Annotator: Per-Character Render Descriptors
//!
//! Walks the base text once and describes every character: is it flagged,
//! which range owns its styling, and does a tooltip anchor here.
//!
//! # Rules
//!
//! | Situation                    | Result                                  |
//! |------------------------------|-----------------------------------------|
//! | No covering range            | not flagged, no owner                   |
//! | Several covering ranges      | owner = first in input order            |
//! | `highlight_enabled == false` | never flagged, owner data still present |
//! | Range end past the text      | clamped to the last character           |
//! | Several ranges start here    | tooltip = first labelled, else first    |
//!
//! Offsets are UTF-16 code units. A character outside the BMP is still one
//! descriptor, with `width == 2`, and is covered when either unit is.
//!
//! `annotate` is lazy and cheap to clone; calling it twice with the same
//! inputs yields the same sequence.

use serde::{Deserialize, Serialize};
use std::str::Chars;

use crate::range::{RangeIndex, TextRange};

// =============================================================================
// Types
// =============================================================================

/// Render metadata for one base-text character
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharAnnotation<'a> {
    /// UTF-16 offset of the character in the base text
    pub index: usize,
    /// Code units the character occupies (1, or 2 for a surrogate pair)
    pub width: usize,
    pub ch: char,
    /// Whether the view should decorate this character
    pub is_flagged: bool,
    /// First covering range (input order), regardless of the toggle
    pub owning_range: Option<&'a TextRange>,
    /// Position of `owning_range` in the caller's list
    pub owning_id: Option<usize>,
    /// True iff some range starts here
    pub is_range_start: bool,
    /// Range starting here whose tooltip is shown
    anchor: Option<&'a TextRange>,
}

impl<'a> CharAnnotation<'a> {
    /// Range that anchors its tooltip on this character
    pub fn anchor(&self) -> Option<&'a TextRange> {
        self.anchor
    }

    /// Tooltip text to show here, if any.
    ///
    /// Tooltips hide together with the highlighting.
    pub fn tooltip(&self) -> Option<&'a str> {
        if !self.is_flagged || !self.is_range_start {
            return None;
        }
        self.anchor.and_then(|r| r.label.as_deref())
    }

    /// Owned, serializable copy
    pub fn to_record(&self) -> AnnotationRecord {
        AnnotationRecord {
            index: self.index,
            width: self.width,
            ch: self.ch,
            is_flagged: self.is_flagged,
            is_range_start: self.is_range_start,
            range_id: self.owning_id,
            tooltip: self.tooltip().map(str::to_string),
        }
    }
}

/// Owned form of [`CharAnnotation`] for crossing the WASM boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    pub index: usize,
    pub width: usize,
    pub ch: char,
    pub is_flagged: bool,
    pub is_range_start: bool,
    pub range_id: Option<usize>,
    pub tooltip: Option<String>,
}

/// A run of consecutive characters sharing the same decoration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// First code unit
    pub start: usize,
    /// Last code unit (inclusive)
    pub end: usize,
    pub text: String,
    pub is_flagged: bool,
    /// Owning range id when flagged
    pub range_id: Option<usize>,
    /// Tooltip anchored on the first character of the run
    pub tooltip: Option<String>,
}

// =============================================================================
// Annotations iterator
// =============================================================================

/// Lazy per-character annotation sequence
#[derive(Debug, Clone)]
pub struct Annotations<'a> {
    chars: Chars<'a>,
    unit: usize,
    index: RangeIndex<'a>,
    highlight_enabled: bool,
}

impl<'a> Annotations<'a> {
    /// The clamped range snapshot driving this sequence
    pub fn range_index(&self) -> &RangeIndex<'a> {
        &self.index
    }
}

impl<'a> Iterator for Annotations<'a> {
    type Item = CharAnnotation<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let ch = self.chars.next()?;
        let i = self.unit;
        let width = ch.len_utf16();
        self.unit += width;

        let last = i + width - 1;
        let owner = self.index.first_overlapping(i, last);
        let anchor = self.index.anchor_within(i, last);

        Some(CharAnnotation {
            index: i,
            width,
            ch,
            is_flagged: self.highlight_enabled && owner.is_some(),
            owning_range: owner.map(|e| e.range),
            owning_id: owner.map(|e| e.id),
            is_range_start: anchor.is_some(),
            anchor: anchor.map(|e| e.range),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chars.size_hint()
    }
}

// =============================================================================
// Entry points
// =============================================================================

/// Annotate `text` under `ranges`.
///
/// Produces exactly one [`CharAnnotation`] per character, in text order.
pub fn annotate<'a>(text: &'a str, ranges: &'a [TextRange], highlight_enabled: bool) -> Annotations<'a> {
    Annotations {
        chars: text.chars(),
        unit: 0,
        index: RangeIndex::for_text(ranges, text),
        highlight_enabled,
    }
}

/// UTF-16 offsets of every flagged character
pub fn flagged_indices(text: &str, ranges: &[TextRange], highlight_enabled: bool) -> Vec<usize> {
    annotate(text, ranges, highlight_enabled)
        .filter(|a| a.is_flagged)
        .map(|a| a.index)
        .collect()
}

/// Collapse the annotation sequence into runs.
///
/// A new run starts whenever the flag flips, the owning range changes, or a
/// flagged range starts (so each tooltip keeps its own run).
/// Concatenating every `Segment::text` gives back `text`.
pub fn segments(text: &str, ranges: &[TextRange], highlight_enabled: bool) -> Vec<Segment> {
    collect_segments(annotate(text, ranges, highlight_enabled))
}

/// Group an existing annotation sequence into runs
pub fn collect_segments<'a>(annotations: impl Iterator<Item = CharAnnotation<'a>>) -> Vec<Segment> {
    let mut out: Vec<Segment> = Vec::new();

    for a in annotations {
        let range_id = if a.is_flagged { a.owning_id } else { None };

        let continues = match out.last() {
            Some(seg) => {
                seg.is_flagged == a.is_flagged
                    && seg.range_id == range_id
                    && !(a.is_flagged && a.is_range_start)
            }
            None => false,
        };

        if continues {
            if let Some(seg) = out.last_mut() {
                seg.end = a.index + a.width - 1;
                seg.text.push(a.ch);
            }
        } else {
            out.push(Segment {
                start: a.index,
                end: a.index + a.width - 1,
                text: a.ch.to_string(),
                is_flagged: a.is_flagged,
                range_id,
                tooltip: a.tooltip().map(str::to_string),
            });
        }
    }

    out
}

// =============================================================================
// Tests
// =============================================================================
