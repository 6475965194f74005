//! Nested/overlapping classification for display.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::types::Segment;

/// How a segment relates to the others in its list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    /// Neither nested nor overlapping.
    #[default]
    Normal,
    /// Fully contained in another segment.
    Nested,
    /// Partially intersects another segment without containment.
    Overlapping,
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentKind::Normal => write!(f, "normal"),
            SegmentKind::Nested => write!(f, "nested"),
            SegmentKind::Overlapping => write!(f, "overlapping"),
        }
    }
}

/// Classify every segment, returning one kind per input in input order.
///
/// Nesting wins over overlap. Nested segments are excluded when looking for
/// overlap partners. Quadratic in the number of segments.
pub fn classify(segments: &[Segment]) -> Vec<SegmentKind> {
    let nested: Vec<bool> = segments
        .iter()
        .enumerate()
        .map(|(i, seg)| {
            segments
                .iter()
                .enumerate()
                .any(|(j, other)| i != j && other.contains(seg))
        })
        .collect();

    segments
        .iter()
        .enumerate()
        .map(|(i, seg)| {
            if nested[i] {
                return SegmentKind::Nested;
            }
            let overlaps = segments.iter().enumerate().any(|(j, other)| {
                i != j
                    && !nested[j]
                    && seg.intersects(other)
                    && !other.contains(seg)
                    && !seg.contains(other)
            });
            if overlaps {
                SegmentKind::Overlapping
            } else {
                SegmentKind::Normal
            }
        })
        .collect()
}
