//! Contract tests for the annotation and reconstruction properties
//!
//! Each property is checked over a small fixed corpus of texts and range
//! sets, including malformed and overlapping ranges.

use crate::annotate::{annotate, segments};
use crate::range::{first_covering, TextRange};
use crate::reconstruct::reconstruct;

fn texts() -> Vec<&'static str> {
    vec!["", "a", "hello world", "naïve café ☕", "😀 bad word 🎉", "0123456789", "The quick brown fox jumps"]
}

fn range_sets() -> Vec<Vec<TextRange>> {
    vec![
        vec![],
        vec![TextRange::new(0, 0)],
        vec![TextRange::new(0, 4).with_label("Incorrect")],
        vec![TextRange::new(2, 5), TextRange::new(2, 8)],
        vec![TextRange::new(3, 400), TextRange::new(100, 120)],
        vec![TextRange::new(6, 2), TextRange::new(1, 3), TextRange::new(9, 9)],
    ]
}

// ============================================================================
// Annotation Contract Tests
// ============================================================================

#[test]
fn test_one_descriptor_per_char_in_order() {
    for text in texts() {
        for ranges in range_sets() {
            let out: Vec<_> = annotate(text, &ranges, true).collect();
            assert_eq!(out.len(), text.chars().count(), "text {:?}", text);

            // Offsets advance by each character's UTF-16 width
            let mut unit = 0;
            for (a, ch) in out.iter().zip(text.chars()) {
                assert_eq!(a.ch, ch);
                assert_eq!(a.index, unit);
                unit += ch.len_utf16();
            }
            assert_eq!(unit, text.encode_utf16().count());
        }
    }
}

#[test]
fn test_no_ranges_no_flags() {
    for text in texts() {
        assert!(annotate(text, &[], true).all(|a| !a.is_flagged));
    }
}

#[test]
fn test_toggle_suppresses_everything() {
    for text in texts() {
        for ranges in range_sets() {
            assert!(annotate(text, &ranges, false).all(|a| !a.is_flagged));
        }
    }
}

#[test]
fn test_range_start_exactly_once_per_range() {
    let text = "0123456789";
    let ranges = vec![TextRange::new(0, 3), TextRange::new(2, 8), TextRange::new(7, 40)];
    let out: Vec<_> = annotate(text, &ranges, true).collect();

    for r in &ranges {
        let anchored: Vec<usize> = out
            .iter()
            .filter(|a| a.is_range_start && a.anchor() == Some(r))
            .map(|a| a.index)
            .collect();
        assert_eq!(anchored, vec![r.start]);
    }
}

#[test]
fn test_hello_world_example() {
    let ranges = vec![TextRange::new(0, 4).with_confidence(90.0)];
    let out: Vec<_> = annotate("hello world", &ranges, true).collect();

    let flagged: Vec<usize> = out.iter().filter(|a| a.is_flagged).map(|a| a.index).collect();
    assert_eq!(flagged, vec![0, 1, 2, 3, 4]);
    let starts: Vec<usize> = out.iter().filter(|a| a.is_range_start).map(|a| a.index).collect();
    assert_eq!(starts, vec![0]);
}

#[test]
fn test_overlap_first_match_tie_break() {
    let ranges = vec![TextRange::new(2, 5), TextRange::new(2, 8)];
    let out: Vec<_> = annotate("abcdefghij", &ranges, true).collect();

    for i in 2..=5 {
        assert!(std::ptr::eq(first_covering(&ranges, i).unwrap(), &ranges[0]));
        assert_eq!(out[i].owning_id, Some(0));
    }
    for i in 6..=8 {
        assert!(std::ptr::eq(first_covering(&ranges, i).unwrap(), &ranges[1]));
        assert_eq!(out[i].owning_id, Some(1));
    }
}

#[test]
fn test_clamping_stops_at_last_char() {
    let ranges = vec![TextRange::new(7, 1_000)];
    let out: Vec<_> = annotate("0123456789", &ranges, true).collect();

    assert_eq!(out.len(), 10);
    assert!(out[7..].iter().all(|a| a.is_flagged));
    assert!(out[..7].iter().all(|a| !a.is_flagged));
}

#[test]
fn test_segments_rebuild_text() {
    for text in texts() {
        for ranges in range_sets() {
            for on in [true, false] {
                let joined: String = segments(text, &ranges, on).into_iter().map(|s| s.text).collect();
                assert_eq!(joined, text);
            }
        }
    }
}

// ============================================================================
// Reconstruction Contract Tests
// ============================================================================

#[test]
fn test_reconstruct_identity_without_replacements() {
    for text in texts() {
        for ranges in range_sets() {
            // None of the fixture ranges carry replacements
            assert_eq!(reconstruct(text, &ranges), text);
        }
    }
}

#[test]
fn test_reconstruct_literal_example() {
    let ranges = vec![
        TextRange::new(1, 1).with_replacement("xx"),
        TextRange::new(3, 3).with_replacement("y"),
    ];
    assert_eq!(reconstruct("ABCDE", &ranges), "AxxCyE");
}

#[test]
fn test_reconstruct_never_panics_on_garbage() {
    let ranges = vec![
        TextRange::new(9, 2).with_replacement("a"),
        TextRange::new(50, 60).with_replacement("b"),
        TextRange::new(0, 500).with_replacement("c"),
        TextRange::new(0, 500).with_replacement("d"),
    ];
    for text in texts() {
        let out = reconstruct(text, &ranges);
        if !text.is_empty() {
            assert_eq!(out, "c");
        } else {
            assert_eq!(out, "");
        }
    }
}
