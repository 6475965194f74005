//! Segment model.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::ValidationError;
use super::labels::{normalize_label, DEFAULT_LABEL};

/// Format a segment was loaded from or is destined for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentSource {
    /// Edit decision list (`.edl`).
    #[default]
    Edl,
    /// Chapter XML (`-chapters.xml`).
    Xml,
}

impl fmt::Display for SegmentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentSource::Edl => write!(f, "edl"),
            SegmentSource::Xml => write!(f, "xml"),
        }
    }
}

/// A labeled time interval within a video.
///
/// Bounds are validated on construction and on every reassignment, so a
/// `Segment` always satisfies `0 <= start <= end`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawSegment")]
pub struct Segment {
    start: f64,
    end: f64,
    label: String,
    #[serde(skip_serializing)]
    normalized_label: String,
    source: SegmentSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    action_code: Option<i32>,
}

impl Segment {
    /// Create a segment, rejecting `end < start`, negative and non-finite bounds.
    ///
    /// Zero-duration segments are allowed.
    pub fn new(
        start: f64,
        end: f64,
        label: impl Into<String>,
        source: SegmentSource,
    ) -> Result<Self, ValidationError> {
        validate_bounds(start, end)?;
        let label = label.into();
        Ok(Self {
            start,
            end,
            normalized_label: normalize_label(&label),
            label,
            source,
            action_code: None,
        })
    }

    /// Create a segment with the default label.
    pub fn unlabeled(start: f64, end: f64, source: SegmentSource) -> Result<Self, ValidationError> {
        Self::new(start, end, DEFAULT_LABEL, source)
    }

    /// Attach an EDL action code.
    pub fn with_action(mut self, code: i32) -> Self {
        self.action_code = Some(code);
        self
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    /// Display label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Matching key for the label; never shown to the user.
    pub fn normalized_label(&self) -> &str {
        &self.normalized_label
    }

    pub fn source(&self) -> SegmentSource {
        self.source
    }

    pub fn action_code(&self) -> Option<i32> {
        self.action_code
    }

    /// Length of the segment in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Whether `time` falls within the segment, bounds inclusive.
    pub fn contains_time(&self, time: f64) -> bool {
        self.start <= time && time <= self.end
    }

    /// Whether `other` lies entirely within this segment.
    pub fn contains(&self, other: &Segment) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Open-interval intersection test.
    pub fn intersects(&self, other: &Segment) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Replace both bounds. On error the segment is left unchanged.
    pub fn set_bounds(&mut self, start: f64, end: f64) -> Result<(), ValidationError> {
        validate_bounds(start, end)?;
        self.start = start;
        self.end = end;
        Ok(())
    }

    /// Replace the label, keeping the normalized projection in sync.
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
        self.normalized_label = normalize_label(&self.label);
    }

    pub fn set_source(&mut self, source: SegmentSource) {
        self.source = source;
    }
}

impl PartialEq for Segment {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start
            && self.end == other.end
            && self.label == other.label
            && self.source == other.source
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{:.2}-{:.2}]", self.label, self.start, self.end)
    }
}

/// Sort segments by start time (stable, so ties keep their order).
pub fn sort_segments(segments: &mut [Segment]) {
    segments.sort_by(|a, b| a.start.total_cmp(&b.start));
}

fn validate_bounds(start: f64, end: f64) -> Result<(), ValidationError> {
    if !start.is_finite() || !end.is_finite() {
        return Err(ValidationError::NotFinite { start, end });
    }
    if start < 0.0 {
        return Err(ValidationError::NegativeStart(start));
    }
    if end < start {
        return Err(ValidationError::EndBeforeStart { start, end });
    }
    Ok(())
}

#[derive(Deserialize)]
struct RawSegment {
    start: f64,
    end: f64,
    #[serde(default = "default_label")]
    label: String,
    #[serde(default)]
    source: SegmentSource,
    #[serde(default)]
    action_code: Option<i32>,
}

fn default_label() -> String {
    DEFAULT_LABEL.to_string()
}

impl TryFrom<RawSegment> for Segment {
    type Error = ValidationError;

    fn try_from(raw: RawSegment) -> Result<Self, Self::Error> {
        let segment = Segment::new(raw.start, raw.end, raw.label, raw.source)?;
        Ok(match raw.action_code {
            Some(code) => segment.with_action(code),
            None => segment,
        })
    }
}
