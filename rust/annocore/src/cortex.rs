//! RenderCortex: One-Call Rendering for Scan Views
//!
//! Single render() call for everything a scan panel draws:
//! - Highlight runs + tooltips over the base text (Annotator)
//! - Corrected text with changed spans marked (TextReconstructor)
//! - Header figures (CorrectionSummary, ReliabilityBand)
//!
//! Designed for WASM with a single cross-boundary call per render. Unchanged
//! inputs are answered from cache.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::adapters::{ranges_from_value, to_ranges, DetectedIssue, DetectedSection, RangeInput, RangeSource, TextCorrection};
use crate::annotate::{annotate, collect_segments, AnnotationRecord, Segment};
use crate::change::{ChangeDetector, RenderKey};
use crate::config::RenderConfig;
use crate::error::{validate_replacements, RangeError};
use crate::range::TextRange;
use crate::reconstruct::{annotate_corrected, reconstruct_detailed, OverlapPolicy};
use crate::report::{CorrectionSummary, ReliabilityBand, TextScanResult};

// =============================================================================
// Types
// =============================================================================

/// Timing statistics for each render phase
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RenderTimings {
    pub total_us: u64,
    pub annotate_us: u64,
    pub reconstruct_us: u64,
}

/// Aggregate statistics
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RenderStats {
    pub timings: RenderTimings,
    /// Input hash as hex string (u64 would overflow JS Number.MAX_SAFE_INTEGER)
    pub content_hash: String,
    pub was_skipped: bool,
    /// Base text length in UTF-16 code units
    pub text_len: usize,
    pub range_count: usize,
    /// Ranges ignored as malformed or outside the text
    pub dropped_ranges: usize,
    pub flagged_count: usize,
    pub applied_replacements: usize,
    pub skipped_replacements: usize,
}

/// Unified render result
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RenderResult {
    /// Highlight runs over the base text
    pub segments: Vec<Segment>,
    /// Per-character records (only with `include_annotations`)
    pub annotations: Option<Vec<AnnotationRecord>>,
    /// Text with every applicable replacement spliced in
    pub corrected: String,
    /// Highlight runs over the corrected text
    pub corrected_segments: Vec<Segment>,
    /// Where each replacement was found in `corrected`
    pub located: Vec<TextRange>,
    pub summary: Option<CorrectionSummary>,
    pub reliability: Option<ReliabilityBand>,
    pub stats: RenderStats,
}

// =============================================================================
// Logging
// =============================================================================

#[cfg(target_arch = "wasm32")]
fn log_warn(message: &str) {
    web_sys::console::warn_1(&message.into());
}

#[cfg(not(target_arch = "wasm32"))]
fn log_warn(_message: &str) {}

#[cfg(target_arch = "wasm32")]
fn log_error(message: &str) {
    web_sys::console::error_1(&message.into());
}

#[cfg(not(target_arch = "wasm32"))]
fn log_error(_message: &str) {}

/// Read a JS array of range-like entries.
///
/// Never fails: malformed entries become unplaced ranges, and a value that
/// is not an array at all renders with no ranges.
fn ranges_from_js<T: RangeSource + DeserializeOwned>(value: JsValue, what: &str) -> Vec<TextRange> {
    if value.is_null() || value.is_undefined() {
        return Vec::new();
    }
    match serde_wasm_bindgen::from_value::<serde_json::Value>(value) {
        Ok(value) => ranges_from_value::<T>(&value),
        Err(e) => {
            log_warn(&format!("[RenderCortex] Ignoring unreadable {}: {}", what, e));
            Vec::new()
        }
    }
}

// =============================================================================
// RenderCortex
// =============================================================================

/// Unified text renderer
#[wasm_bindgen]
pub struct RenderCortex {
    config: RenderConfig,
    change_detector: ChangeDetector,
    last_result: Option<RenderResult>,
}

impl Default for RenderCortex {
    fn default() -> Self {
        Self::with_config(RenderConfig::default())
    }
}

#[wasm_bindgen]
impl RenderCortex {
    /// Create a RenderCortex with optional configuration
    ///
    /// # Arguments
    /// * `config` - Optional JS object, see `RenderConfig`
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<RenderCortex, JsValue> {
        let config: RenderConfig = if config.is_null() || config.is_undefined() {
            RenderConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?
        };
        Ok(Self::with_config(config))
    }

    /// The Show/Hide Differences toggle
    #[wasm_bindgen(js_name = setHighlightEnabled)]
    pub fn set_highlight_enabled(&mut self, enabled: bool) {
        self.config.highlight_enabled = enabled;
    }

    #[wasm_bindgen(js_name = isHighlightEnabled)]
    pub fn is_highlight_enabled(&self) -> bool {
        self.config.highlight_enabled
    }

    /// Get skip rate from change detector
    #[wasm_bindgen(js_name = skipRate)]
    pub fn skip_rate(&self) -> f64 {
        self.change_detector.skip_rate()
    }

    /// Reset change detector and cached result
    #[wasm_bindgen(js_name = reset)]
    pub fn js_reset(&mut self) {
        self.reset();
    }

    /// Render generic ranges: [{ start, end, confidence?, label?, replacement? }]
    #[wasm_bindgen(js_name = render)]
    pub fn js_render(&mut self, text: &str, ranges: JsValue) -> Result<JsValue, JsValue> {
        let ranges = ranges_from_js::<RangeInput>(ranges, "ranges");
        self.render_to_js(text, &ranges, None)
    }

    /// Render extracted-text corrections: [{ original, corrected, position, confidence }]
    #[wasm_bindgen(js_name = renderCorrections)]
    pub fn js_render_corrections(&mut self, text: &str, corrections: JsValue) -> Result<JsValue, JsValue> {
        let ranges = ranges_from_js::<TextCorrection>(corrections, "corrections");
        self.render_to_js(text, &ranges, None)
    }

    /// Render misinformation issues: [{ text, position, confidence, suggestion }]
    #[wasm_bindgen(js_name = renderIssues)]
    pub fn js_render_issues(
        &mut self,
        text: &str,
        issues: JsValue,
        overall_confidence: f64,
    ) -> Result<JsValue, JsValue> {
        let ranges = ranges_from_js::<DetectedIssue>(issues, "issues");
        self.render_to_js(text, &ranges, Some(overall_confidence))
    }

    /// Render AI-generated sections: [{ start, end, confidence }]
    #[wasm_bindgen(js_name = renderSections)]
    pub fn js_render_sections(&mut self, text: &str, sections: JsValue) -> Result<JsValue, JsValue> {
        let ranges = ranges_from_js::<DetectedSection>(sections, "sections");
        self.render_to_js(text, &ranges, None)
    }

    /// Get renderer status
    #[wasm_bindgen(js_name = getStatus)]
    pub fn get_status(&self) -> JsValue {
        let status = serde_json::json!({
            "has_cached_result": self.last_result.is_some(),
            "check_count": self.change_detector.check_count(),
            "skip_rate": self.change_detector.skip_rate(),
            "config": {
                "highlight_enabled": self.config.highlight_enabled,
                "include_annotations": self.config.include_annotations,
                "strict_overlaps": self.config.strict_overlaps,
                "reliability_threshold": self.config.reliability_threshold,
            }
        });

        JsValue::from_str(&status.to_string())
    }
}

impl RenderCortex {
    pub fn with_config(config: RenderConfig) -> Self {
        Self {
            config,
            change_detector: ChangeDetector::new(),
            last_result: None,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    fn render_to_js(
        &mut self,
        text: &str,
        ranges: &[TextRange],
        overall_confidence: Option<f64>,
    ) -> Result<JsValue, JsValue> {
        let result = match overall_confidence {
            Some(c) => self.render_with_confidence(text, ranges, c),
            None => self.render(text, ranges),
        }
        .map_err(|e| {
            log_error(&format!("[RenderCortex] Render rejected: {}", e));
            JsValue::from_str(&e.to_string())
        })?;

        serde_wasm_bindgen::to_value(&result)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Render `text` under `ranges`.
    ///
    /// Only fails with `strict_overlaps` set and overlapping replacements.
    pub fn render(&mut self, text: &str, ranges: &[TextRange]) -> Result<RenderResult, RangeError> {
        let overall_start = instant::Instant::now();
        let highlight_enabled = self.config.highlight_enabled;

        let change = self.change_detector.check(&RenderKey {
            text,
            ranges,
            highlight_enabled,
        });
        let content_hash = format!("{:x}", change.content_hash);

        if !change.has_changed {
            if let Some(ref cached) = self.last_result {
                let mut result = cached.clone();
                result.reliability = None;
                result.stats.was_skipped = true;
                result.stats.timings.total_us = overall_start.elapsed().as_micros() as u64;
                return Ok(result);
            }
        }

        if self.config.strict_overlaps {
            if let Err(e) = validate_replacements(ranges) {
                self.last_result = None;
                return Err(e);
            }
        }

        let mut result = RenderResult::default();
        result.stats.content_hash = content_hash;

        // Phase 1: base text highlighting
        let annotate_start = instant::Instant::now();
        let annotations = annotate(text, ranges, highlight_enabled);
        let index = annotations.range_index();
        result.stats.text_len = index.text_len();
        result.stats.range_count = ranges.len();
        result.stats.dropped_ranges = index.skipped();
        result.stats.flagged_count = if highlight_enabled { index.flagged_count() } else { 0 };
        if self.config.include_annotations {
            result.annotations = Some(annotations.clone().map(|a| a.to_record()).collect());
        }
        result.segments = collect_segments(annotations);
        result.stats.timings.annotate_us = annotate_start.elapsed().as_micros() as u64;

        if result.stats.dropped_ranges > 0 {
            log_warn(&format!(
                "[RenderCortex] Ignored {} range(s) outside a {}-unit text",
                result.stats.dropped_ranges, result.stats.text_len
            ));
        }

        // Phase 2: corrected text
        let reconstruct_start = instant::Instant::now();
        let corrected = annotate_corrected(text, ranges);
        result.corrected_segments = corrected.segments(highlight_enabled);
        result.stats.applied_replacements = corrected.applied.len();
        result.stats.skipped_replacements = corrected.skipped.len();
        result.corrected = corrected.text;
        result.located = corrected.located;
        result.stats.timings.reconstruct_us = reconstruct_start.elapsed().as_micros() as u64;

        // Phase 3: header figures
        result.summary = Some(CorrectionSummary::from_ranges(ranges));

        result.stats.timings.total_us = overall_start.elapsed().as_micros() as u64;
        result.stats.was_skipped = false;

        self.last_result = Some(result.clone());

        Ok(result)
    }

    /// Render and grade an overall confidence against the configured threshold
    pub fn render_with_confidence(
        &mut self,
        text: &str,
        ranges: &[TextRange],
        overall_confidence: f64,
    ) -> Result<RenderResult, RangeError> {
        let mut result = self.render(text, ranges)?;
        result.reliability = Some(ReliabilityBand::from_confidence(
            overall_confidence,
            self.config.reliability_threshold,
        ));
        Ok(result)
    }

    pub fn render_corrections(&mut self, text: &str, corrections: &[TextCorrection]) -> Result<RenderResult, RangeError> {
        self.render(text, &to_ranges(corrections))
    }

    pub fn render_issues(
        &mut self,
        text: &str,
        issues: &[DetectedIssue],
        overall_confidence: f64,
    ) -> Result<RenderResult, RangeError> {
        self.render_with_confidence(text, &to_ranges(issues), overall_confidence)
    }

    pub fn render_sections(&mut self, text: &str, sections: &[DetectedSection]) -> Result<RenderResult, RangeError> {
        self.render(text, &to_ranges(sections))
    }

    /// Reset change detector and cached result
    pub fn reset(&mut self) {
        self.change_detector.reset();
        self.last_result = None;
    }

    pub fn last_result(&self) -> Option<&RenderResult> {
        self.last_result.as_ref()
    }
}

// =============================================================================
// Free functions (JS bindings)
// =============================================================================

/// Apply replacements without the rest of the render
#[wasm_bindgen(js_name = reconstructText)]
pub fn js_reconstruct_text(text: &str, ranges: JsValue, strict: bool) -> Result<String, JsValue> {
    let ranges = ranges_from_js::<RangeInput>(ranges, "ranges");
    let policy = if strict { OverlapPolicy::Reject } else { OverlapPolicy::SkipOverlapping };

    reconstruct_detailed(text, &ranges, policy)
        .map(|r| r.text)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Normalize a raw `/scan/text` response
#[wasm_bindgen(js_name = normalizeTextScan)]
pub fn js_normalize_text_scan(data: JsValue) -> Result<JsValue, JsValue> {
    let value: serde_json::Value = if data.is_null() || data.is_undefined() {
        serde_json::Value::Null
    } else {
        serde_wasm_bindgen::from_value(data)
            .map_err(|e| JsValue::from_str(&format!("Invalid scan payload: {}", e)))?
    };

    let result = TextScanResult::normalize(&value);
    serde_wasm_bindgen::to_value(&result)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

// =============================================================================
// Tests
// =============================================================================
