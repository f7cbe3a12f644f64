//! Scan result normalization and summaries
//!
//! The backend payload is trusted as little as the ranges inside it: every
//! field is default-filled, numbers may arrive as strings, and malformed list
//! entries are skipped rather than failing the whole result.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::adapters::{DetectedIssue, DetectedSection};
use crate::range::TextRange;

// =============================================================================
// Summaries
// =============================================================================

/// Whether a result still needs human review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewStatus {
    Review,
    Clean,
}

/// Header figures shown above a corrected text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionSummary {
    pub total: usize,
    /// Rounded mean confidence. 100 when nothing was flagged or the mean is
    /// 0 or not a number (service sent no confidences)
    pub accuracy_rate: u32,
    pub status: ReviewStatus,
}

impl CorrectionSummary {
    pub fn from_ranges(ranges: &[TextRange]) -> Self {
        let total = ranges.len();
        if total == 0 {
            return CorrectionSummary {
                total,
                accuracy_rate: 100,
                status: ReviewStatus::Clean,
            };
        }

        let mean = ranges.iter().map(|r| r.confidence).sum::<f64>() / total as f64;
        let mean = if mean.is_finite() && mean != 0.0 { mean } else { 100.0 };
        CorrectionSummary {
            total,
            accuracy_rate: mean.round().clamp(0.0, u32::MAX as f64) as u32,
            status: ReviewStatus::Review,
        }
    }
}

/// Bucket for an overall reliability score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReliabilityBand {
    Reliable,
    Suspect,
}

impl ReliabilityBand {
    /// `Reliable` only strictly above `threshold`
    pub fn from_confidence(confidence: f64, threshold: f64) -> Self {
        if confidence > threshold {
            ReliabilityBand::Reliable
        } else {
            ReliabilityBand::Suspect
        }
    }
}

// =============================================================================
// Text scan result
// =============================================================================

/// Misinformation block of a text scan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Misinformation {
    pub overall_confidence: f64,
    pub detected_issues: Vec<DetectedIssue>,
}

/// Normalized response of the text scan endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextScanResult {
    pub score: f64,
    pub ai_generated: f64,
    pub detected_sections: Vec<DetectedSection>,
    pub misinformation: Option<Misinformation>,
}

/// Lenient numeric read: numbers, numeric strings, otherwise 0
fn number(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()).unwrap_or(0.0),
        Some(Value::Bool(b)) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Deserialize every well-formed element of an array, skipping the rest
fn lenient_list<T: for<'de> Deserialize<'de>>(value: Option<&Value>) -> Vec<T> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| serde_json::from_value(item.clone()).ok())
            .collect(),
        _ => Vec::new(),
    }
}

impl TextScanResult {
    /// Build a result from whatever the backend sent
    pub fn normalize(data: &Value) -> Self {
        let misinformation = match data.get("misinformation") {
            Some(m) if is_truthy(m) => Some(Misinformation {
                overall_confidence: number(m.get("overallConfidence")),
                detected_issues: lenient_list(m.get("detectedIssues")),
            }),
            _ => None,
        };

        TextScanResult {
            score: number(data.get("score")),
            ai_generated: number(data.get("aiGenerated")),
            detected_sections: lenient_list(data.get("detectedSections")),
            misinformation,
        }
    }

    pub fn reliability(&self, threshold: f64) -> Option<ReliabilityBand> {
        self.misinformation
            .as_ref()
            .map(|m| ReliabilityBand::from_confidence(m.overall_confidence, threshold))
    }
}
