//! EDL (edit decision list) reader and writer.
//!
//! # Format Overview
//!
//! One segment per line, whitespace separated:
//! ```text
//! # comment
//! 12.500  45.000  4
//! 90.0    120.0
//! ```
//!
//! - start seconds (float)
//! - end seconds (float)
//! - optional action code (integer, defaults to 4)
//!
//! A bad line is skipped and reported; it never aborts the file.

use tracing::{debug, info};

use super::ensure_parent_dir;
use super::types::ParsedSegments;
use crate::segments::{
    ActionMapping, FormatError, Segment, SegmentError, SegmentResult, SegmentSource,
    DEFAULT_ACTION, DEFAULT_LABEL,
};
use crate::vfs::{read_first, strip_extension, ResilientWriter, Vfs, Written};

/// Path of the EDL file belonging to a video.
pub fn edl_path(video_path: &str) -> String {
    format!("{}.edl", strip_extension(video_path))
}

/// Parse EDL content.
pub fn parse_edl(content: &str, mapping: &ActionMapping) -> ParsedSegments {
    let mut parsed = ParsedSegments::new();

    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match parse_edl_line(line, mapping) {
            Ok(segment) => {
                debug!(
                    "Parsed EDL line {}: {} -> {} | action={:?} | label='{}'",
                    idx + 1,
                    segment.start(),
                    segment.end(),
                    segment.action_code(),
                    segment.label()
                );
                parsed.segments.push(segment);
            }
            Err(e) => parsed.skip(idx + 1, line, e),
        }
    }

    parsed
}

fn parse_edl_line(line: &str, mapping: &ActionMapping) -> SegmentResult<Segment> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 2 {
        return Err(FormatError::MissingFields {
            expected: 2,
            found: fields.len(),
        }
        .into());
    }

    let start = parse_seconds("start", fields[0])?;
    let end = parse_seconds("end", fields[1])?;
    let action = match fields.get(2) {
        Some(field) => field
            .parse::<i32>()
            .map_err(|_| FormatError::invalid_number("action", *field))?,
        None => DEFAULT_ACTION,
    };

    let label = mapping.label_for(action).unwrap_or(DEFAULT_LABEL);
    let segment = Segment::new(start, end, label, SegmentSource::Edl)?;
    Ok(segment.with_action(action))
}

fn parse_seconds(field: &'static str, value: &str) -> Result<f64, SegmentError> {
    value
        .parse::<f64>()
        .map_err(|_| FormatError::invalid_number(field, value).into())
}

/// Read the EDL next to `video_path`.
///
/// A missing or unreadable file yields an empty result.
pub fn read_edl(vfs: &dyn Vfs, video_path: &str, mapping: &ActionMapping) -> ParsedSegments {
    let path = edl_path(video_path);
    let Some(file) = read_first(vfs, &[path.as_str()]) else {
        debug!("No EDL file found at {}", path);
        return ParsedSegments::new();
    };

    let mut parsed = parse_edl(&file.content, mapping);
    info!(
        "Parsed {} segment(s) from {} ({} skipped)",
        parsed.len(),
        file.path,
        parsed.issues.len()
    );
    parsed.path = Some(file.path);
    parsed
}

/// Action code to write for a segment.
///
/// Reverse lookup of the label first, then the stored code, then the default.
pub fn resolve_action(segment: &Segment, mapping: &ActionMapping) -> i32 {
    mapping
        .code_for(segment.normalized_label())
        .or(segment.action_code())
        .unwrap_or(DEFAULT_ACTION)
}

/// Serialize segments as tab separated EDL lines.
pub fn serialize_edl(segments: &[Segment], mapping: &ActionMapping) -> String {
    let mut output = String::new();
    for segment in segments {
        output.push_str(&format!(
            "{:.3}\t{:.3}\t{}\n",
            segment.start(),
            segment.end(),
            resolve_action(segment, mapping)
        ));
    }
    output
}

/// Write segments to the EDL next to `video_path`.
pub fn write_edl(
    writer: &ResilientWriter<'_>,
    video_path: &str,
    segments: &[Segment],
    mapping: &ActionMapping,
) -> SegmentResult<Written> {
    let path = edl_path(video_path);
    if writer.vfs().exists(&path) {
        debug!("Overwriting existing EDL {}", path);
    }
    info!("Saving {} segment(s) to {}", segments.len(), path);

    let content = serialize_edl(segments, mapping);
    ensure_parent_dir(writer.vfs(), &path);
    writer
        .write(&path, content.as_bytes())
        .map_err(|e| SegmentError::write_failed(&path, e))
}
