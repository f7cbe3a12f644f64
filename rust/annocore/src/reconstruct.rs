//! TextReconstructor: Corrected Text from Replacement Ranges
//!
//! Replacements are spliced from the highest start offset to the lowest.
//! A splice only shifts characters to its right, so every range still
//! waiting to be applied keeps valid offsets. Unit offsets are resolved to
//! byte spans once, against the untouched base text.
//!
//! Overlapping replacement ranges have no natural precedence. With
//! [`OverlapPolicy::SkipOverlapping`] the range applied first (highest start,
//! then earliest in the list) keeps its span and any later range touching it
//! is skipped. [`OverlapPolicy::Reject`] refuses the whole list instead.
//!
//! The corrected text can be annotated again: [`locate_all`] finds where each
//! replacement ended up by searching the output, the way the verified-text
//! panel underlines what changed.

use aho_corasick::AhoCorasick;
use serde::{Deserialize, Serialize};

use crate::annotate::{annotate, collect_segments, Annotations, Segment};
use crate::error::{validate_replacements, RangeError};
use crate::range::TextRange;
use crate::units::{utf16_len, UnitMap};

// =============================================================================
// Types
// =============================================================================

/// What to do with replacement ranges that overlap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OverlapPolicy {
    /// Keep the first-applied range, skip the ones touching it
    #[default]
    SkipOverlapping,
    /// Fail with [`RangeError::OverlappingReplacements`]
    Reject,
}

/// Outcome of a reconstruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reconstruction {
    pub text: String,
    /// Range ids in application order (descending start)
    pub applied: Vec<usize>,
    /// Range ids carrying a replacement that were not applied
    pub skipped: Vec<usize>,
}

// =============================================================================
// Reconstruction
// =============================================================================

/// Apply every non-empty replacement to `text`.
///
/// Ranges without a replacement are ignored. Never fails: out-of-text and
/// overlapping ranges are skipped.
pub fn reconstruct(text: &str, ranges: &[TextRange]) -> String {
    splice_descending(text, ranges).text
}

/// Apply replacements under an explicit overlap policy
pub fn reconstruct_detailed(
    text: &str,
    ranges: &[TextRange],
    policy: OverlapPolicy,
) -> Result<Reconstruction, RangeError> {
    if policy == OverlapPolicy::Reject {
        validate_replacements(ranges)?;
    }
    Ok(splice_descending(text, ranges))
}

fn splice_descending(text: &str, ranges: &[TextRange]) -> Reconstruction {
    let map = UnitMap::new(text);
    let mut out = text.to_string();

    let mut work: Vec<(usize, &TextRange, &str)> = ranges
        .iter()
        .enumerate()
        .filter_map(|(id, r)| r.replacement_text().map(|rep| (id, r, rep)))
        .collect();

    // Stable: equal starts keep list order
    work.sort_by(|a, b| b.1.start.cmp(&a.1.start));

    let mut applied = Vec::with_capacity(work.len());
    let mut skipped = Vec::new();
    // Lowest base-text byte already rewritten
    let mut floor = text.len();

    for (id, range, replacement) in work {
        let span = match map.byte_span(range.start, range.end) {
            Some(span) => span,
            None => {
                skipped.push(id);
                continue;
            }
        };
        if span.end > floor {
            skipped.push(id);
            continue;
        }

        floor = span.start;
        out.replace_range(span, replacement);
        applied.push(id);
    }

    Reconstruction {
        text: out,
        applied,
        skipped,
    }
}

// =============================================================================
// Locating replacements in the output
// =============================================================================

fn corrected_label(original_span: &str) -> String {
    if original_span.is_empty() {
        "Corrected".to_string()
    } else {
        format!("Was: {}", original_span)
    }
}

fn unit_offset(text: &str, byte: usize) -> usize {
    utf16_len(&text[..byte])
}

/// Find the first occurrence of `replacement` in `output`.
///
/// This is a search, not an offset carry-through: if the replacement text
/// appears earlier in the output for unrelated reasons, that earlier spot is
/// marked. Empty replacements are never located.
pub fn locate_replacement_in_output(
    output: &str,
    original_span: &str,
    replacement: &str,
) -> Option<TextRange> {
    if replacement.is_empty() {
        return None;
    }
    let byte = output.find(replacement)?;
    let start = unit_offset(output, byte);
    let len = utf16_len(replacement);

    Some(TextRange::new(start, start + len - 1).with_label(corrected_label(original_span)))
}

/// Locate every distinct replacement of `ranges` in `output` in one pass.
///
/// `base` is the text the ranges index into; it supplies the original spans
/// for the tooltips. Each distinct replacement is marked at most once, at
/// its first occurrence.
pub fn locate_all(base: &str, output: &str, ranges: &[TextRange]) -> Vec<TextRange> {
    let mut patterns: Vec<&str> = Vec::new();
    let mut sources: Vec<&TextRange> = Vec::new();

    for range in ranges {
        if let Some(rep) = range.replacement_text() {
            if !patterns.contains(&rep) {
                patterns.push(rep);
                sources.push(range);
            }
        }
    }

    if patterns.is_empty() || output.is_empty() {
        return Vec::new();
    }

    let automaton = match AhoCorasick::new(&patterns) {
        Ok(a) => a,
        Err(_e) => {
            #[cfg(target_arch = "wasm32")]
            web_sys::console::warn_1(&format!("[TextReconstructor] Failed to build automaton: {}", _e).into());
            return Vec::new();
        }
    };

    // Overlapping search so a replacement nested in another is still found
    let mut first_byte: Vec<Option<usize>> = vec![None; patterns.len()];
    for mat in automaton.find_overlapping_iter(output) {
        let slot = &mut first_byte[mat.pattern().as_usize()];
        if slot.map_or(true, |b| mat.start() < b) {
            *slot = Some(mat.start());
        }
    }

    first_byte
        .iter()
        .enumerate()
        .filter_map(|(pid, byte)| {
            let byte = (*byte)?;
            let source = sources[pid];
            let start = unit_offset(output, byte);
            let len = utf16_len(patterns[pid]);
            Some(
                TextRange::new(start, start + len - 1)
                    .with_confidence(source.confidence)
                    .with_label(corrected_label(&source.slice(base))),
            )
        })
        .collect()
}

// =============================================================================
// Corrected view
// =============================================================================

/// Reconstructed text plus the located spans of what changed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectedText {
    pub text: String,
    pub located: Vec<TextRange>,
    pub applied: Vec<usize>,
    pub skipped: Vec<usize>,
}

impl CorrectedText {
    /// Annotate the corrected text, marking located replacements
    pub fn annotations(&self, highlight_enabled: bool) -> Annotations<'_> {
        annotate(&self.text, &self.located, highlight_enabled)
    }

    pub fn segments(&self, highlight_enabled: bool) -> Vec<Segment> {
        collect_segments(self.annotations(highlight_enabled))
    }
}

/// Reconstruct `text` and locate the replacements in the result
pub fn annotate_corrected(text: &str, ranges: &[TextRange]) -> CorrectedText {
    let rebuilt = splice_descending(text, ranges);
    let located = locate_all(text, &rebuilt.text, ranges);

    CorrectedText {
        text: rebuilt.text,
        located,
        applied: rebuilt.applied,
        skipped: rebuilt.skipped,
    }
}

// =============================================================================
// Tests
// =============================================================================
