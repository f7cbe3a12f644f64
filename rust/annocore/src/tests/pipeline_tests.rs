//! Tests for the full pipeline: service payload → ranges → render
//!
//! Mirrors what the scan views do with a backend response.

use serde_json::json;

use crate::adapters::{to_ranges, TextCorrection};
use crate::annotate::annotate;
use crate::cortex::RenderCortex;
use crate::reconstruct::{annotate_corrected, reconstruct};
use crate::report::{ReliabilityBand, TextScanResult};

#[test]
fn test_text_scan_payload_to_render() {
    let text = "Generated intro. The Eiffel Tower is in Rome.";
    let payload = json!({
        "score": 71,
        "aiGenerated": "64",
        "detectedSections": [{"start": 0, "end": 15, "confidence": 83}],
        "misinformation": {
            "overallConfidence": 35,
            "detectedIssues": [{
                "text": "Rome",
                "position": {"start": 40, "end": 43},
                "confidence": 97,
                "suggestion": "Paris"
            }]
        }
    });
    let scan = TextScanResult::normalize(&payload);
    assert_eq!(scan.ai_generated, 64.0);

    let mut cortex = RenderCortex::default();
    let sections = cortex.render_sections(text, &scan.detected_sections).unwrap();
    assert_eq!(sections.segments[0].text, "Generated intro.");
    assert_eq!(sections.corrected, text);

    let misinfo = scan.misinformation.as_ref().unwrap();
    let issues = cortex
        .render_issues(text, &misinfo.detected_issues, misinfo.overall_confidence)
        .unwrap();
    assert_eq!(issues.corrected, "Generated intro. The Eiffel Tower is in Paris.");
    assert_eq!(issues.reliability, Some(ReliabilityBand::Suspect));
}

#[test]
fn test_corrections_from_json() {
    let corrections: Vec<TextCorrection> = serde_json::from_value(json!([
        {"original": "recieve", "corrected": "receive", "position": {"start": 2, "end": 8}, "confidence": 99},
        {"original": "teh", "corrected": "the", "position": {"start": 10, "end": 12}, "confidence": 94}
    ]))
    .unwrap();
    let ranges = to_ranges(&corrections);
    let text = "I recieve teh parcel";

    assert_eq!(reconstruct(text, &ranges), "I receive the parcel");

    let flagged: String = annotate(text, &ranges, true)
        .filter(|a| a.is_flagged)
        .map(|a| a.ch)
        .collect();
    assert_eq!(flagged, "recieveteh");
}

#[test]
fn test_reannotation_marks_each_replacement() {
    let text = "colour and flavour";
    let ranges = vec![
        crate::range::TextRange::new(0, 5).with_replacement("color"),
        crate::range::TextRange::new(11, 17).with_replacement("flavor"),
    ];
    let corrected = annotate_corrected(text, &ranges);
    assert_eq!(corrected.text, "color and flavor");

    let marked: Vec<String> = corrected
        .segments(true)
        .into_iter()
        .filter(|s| s.is_flagged)
        .map(|s| s.text)
        .collect();
    assert_eq!(marked, vec!["color".to_string(), "flavor".to_string()]);
}
