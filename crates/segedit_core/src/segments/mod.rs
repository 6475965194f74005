//! Segment model.
//!
//! A segment is a labeled time range within a video (intro, recap,
//! commercial, ...). This module holds the entity itself, the timecode codec
//! used by the chapter format and by user input, the action code table used
//! by EDL files, and the nested/overlapping classifier used for display.

mod classify;
mod error;
mod labels;
mod timecode;
mod types;

pub use classify::{classify, SegmentKind};
pub use error::{FormatError, SegmentError, SegmentResult, ValidationError};
pub use labels::{
    normalize_label, parse_predefined_labels, ActionMapping, DEFAULT_ACTION, DEFAULT_LABEL,
    DEFAULT_PREDEFINED_LABELS,
};
pub use timecode::{seconds_to_timecode, timecode_to_seconds};
pub use types::{sort_segments, Segment, SegmentSource};
