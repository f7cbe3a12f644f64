//! ChangeDetector: Skip Re-Rendering Unchanged Inputs
//!
//! A render is a pure function of (text, ranges, toggle). Hashing that triple
//! lets RenderCortex hand back its cached result when nothing moved, which is
//! the common case on keystroke-adjacent re-renders.

use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use wasm_bindgen::prelude::*;

use crate::range::TextRange;

// =============================================================================
// Types
// =============================================================================

/// Result of change detection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeResult {
    /// True if the input differs from the last check
    pub has_changed: bool,
    pub content_hash: u64,
    pub previous_hash: Option<u64>,
}

/// Everything a render depends on
#[derive(Debug, Clone, Copy)]
pub struct RenderKey<'a> {
    pub text: &'a str,
    pub ranges: &'a [TextRange],
    pub highlight_enabled: bool,
}

impl Hash for RenderKey<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
        self.highlight_enabled.hash(state);
        self.ranges.len().hash(state);
        for r in self.ranges {
            r.start.hash(state);
            r.end.hash(state);
            r.confidence.to_bits().hash(state);
            r.label.hash(state);
            r.replacement.hash(state);
        }
    }
}

// =============================================================================
// ChangeDetector
// =============================================================================

/// Content-addressable change detector
#[wasm_bindgen]
pub struct ChangeDetector {
    last_hash: Option<u64>,
    check_count: u64,
    skip_count: u64,
}

impl Default for ChangeDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl ChangeDetector {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            last_hash: None,
            check_count: 0,
            skip_count: 0,
        }
    }

    /// Get skip rate as percentage
    #[wasm_bindgen(js_name = getSkipRate)]
    pub fn skip_rate(&self) -> f64 {
        if self.check_count == 0 {
            return 0.0;
        }
        (self.skip_count as f64 / self.check_count as f64) * 100.0
    }

    #[wasm_bindgen(js_name = getCheckCount)]
    pub fn check_count(&self) -> u64 {
        self.check_count
    }

    #[wasm_bindgen(js_name = getSkipCount)]
    pub fn skip_count(&self) -> u64 {
        self.skip_count
    }

    /// Reset the detector state
    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.last_hash = None;
        self.check_count = 0;
        self.skip_count = 0;
    }
}

impl ChangeDetector {
    /// Check a key against the previous one and remember it
    pub fn check<K: Hash + ?Sized>(&mut self, key: &K) -> ChangeResult {
        self.check_count += 1;

        let current_hash = Self::compute_hash(key);
        let previous_hash = self.last_hash;

        let has_changed = match previous_hash {
            None => true,
            Some(prev) => prev != current_hash,
        };

        if !has_changed {
            self.skip_count += 1;
        }

        self.last_hash = Some(current_hash);

        ChangeResult {
            has_changed,
            content_hash: current_hash,
            previous_hash,
        }
    }

    pub fn has_changed<K: Hash + ?Sized>(&mut self, key: &K) -> bool {
        self.check(key).has_changed
    }

    fn compute_hash<K: Hash + ?Sized>(key: &K) -> u64 {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        hasher.finish()
    }

    pub fn last_hash(&self) -> Option<u64> {
        self.last_hash
    }
}

// =============================================================================
// Tests
// =============================================================================
