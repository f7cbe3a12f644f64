//! Configuration for RenderCortex
//!
//! Every field has a serde default, so the JS side can pass `{}`, a partial
//! object, or nothing at all.

use serde::{Deserialize, Serialize};

use crate::reconstruct::OverlapPolicy;

/// Default threshold above which an overall confidence counts as reliable
pub const DEFAULT_RELIABILITY_THRESHOLD: f64 = 70.0;

fn default_true() -> bool { true }

fn default_threshold() -> f64 { DEFAULT_RELIABILITY_THRESHOLD }

/// Render configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// The Show/Hide Differences toggle. Default: true
    #[serde(default = "default_true")]
    pub highlight_enabled: bool,
    /// Ship per-character records in addition to segments. Default: false
    #[serde(default)]
    pub include_annotations: bool,
    /// Reject overlapping replacement ranges instead of skipping them. Default: false
    #[serde(default)]
    pub strict_overlaps: bool,
    /// Overall confidence must exceed this to count as reliable. Default: 70
    #[serde(default = "default_threshold")]
    pub reliability_threshold: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            highlight_enabled: true,
            include_annotations: false,
            strict_overlaps: false,
            reliability_threshold: DEFAULT_RELIABILITY_THRESHOLD,
        }
    }
}

impl RenderConfig {
    pub fn overlap_policy(&self) -> OverlapPolicy {
        if self.strict_overlaps {
            OverlapPolicy::Reject
        } else {
            OverlapPolicy::SkipOverlapping
        }
    }
}
