//! UnitMap: UTF-16 Offsets over a Rust String
//!
//! Range offsets come from JavaScript, so they count UTF-16 code units. A
//! character outside the Basic Multilingual Plane (emoji, most CJK
//! extensions) is two units wide. Rust strings index by byte, so every text
//! that ranges point into gets one `UnitMap` translating between the two.
//!
//! A unit offset that lands on the second half of a surrogate pair resolves
//! to the character containing it. Rust cannot hold half a character, so
//! spans touching either half cover the whole character.

use std::ops::Range;

/// UTF-16 length of `text`
pub fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Per-character checkpoints: (utf16_offset, byte_offset)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitMap {
    checkpoints: Vec<(usize, usize)>,
    units: usize,
    bytes: usize,
}

impl UnitMap {
    pub fn new(text: &str) -> Self {
        let mut checkpoints = Vec::with_capacity(text.len());
        let mut unit = 0;

        for (byte, ch) in text.char_indices() {
            checkpoints.push((unit, byte));
            unit += ch.len_utf16();
        }

        UnitMap {
            checkpoints,
            units: unit,
            bytes: text.len(),
        }
    }

    /// Length of the text in UTF-16 code units
    pub fn len_units(&self) -> usize {
        self.units
    }

    /// Number of characters
    pub fn char_count(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    /// Index of the character containing code unit `unit`
    pub fn char_at(&self, unit: usize) -> Option<usize> {
        if unit >= self.units {
            return None;
        }
        Some(self.checkpoints.partition_point(|&(u, _)| u <= unit) - 1)
    }

    fn byte_end_of(&self, char_index: usize) -> usize {
        self.checkpoints
            .get(char_index + 1)
            .map(|&(_, b)| b)
            .unwrap_or(self.bytes)
    }

    /// Byte range of the characters covering units `start..=end`.
    ///
    /// `end` is clamped to the last unit. `None` when `start` is past the
    /// text or `end < start`.
    pub fn byte_span(&self, start: usize, end: usize) -> Option<Range<usize>> {
        if end < start {
            return None;
        }
        let first = self.char_at(start)?;
        let last = self.char_at(end.min(self.units.saturating_sub(1)))?;
        Some(self.checkpoints[first].1..self.byte_end_of(last))
    }

    /// UTF-16 offset of byte offset `byte` (a char boundary)
    pub fn unit_at_byte(&self, byte: usize) -> usize {
        match self.checkpoints.binary_search_by_key(&byte, |&(_, b)| b) {
            Ok(i) => self.checkpoints[i].0,
            Err(_) => self.units,
        }
    }
}
