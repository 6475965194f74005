//! Choosing which segment file(s) to read and write for a video.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::chapters::{chapter_write_paths, existing_chapter_file, read_chapters, write_chapters};
use super::edl::{edl_path, read_edl, write_edl};
use super::types::ParsedSegments;
use crate::segments::{sort_segments, ActionMapping, Segment, SegmentSource};
use crate::vfs::{ResilientWriter, Vfs, Written};

/// Which file format(s) a save produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveFormat {
    /// Keep whatever format the video already uses.
    #[default]
    #[serde(alias = "Auto Detect")]
    Auto,
    #[serde(alias = "EDL Only")]
    Edl,
    #[serde(alias = "Chapter XML Only")]
    Xml,
    #[serde(alias = "Both Formats")]
    Both,
}

impl SaveFormat {
    /// Human readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Auto => "Auto Detect",
            Self::Edl => "EDL Only",
            Self::Xml => "Chapter XML Only",
            Self::Both => "Both Formats",
        }
    }

    fn writes_edl(&self) -> bool {
        matches!(self, Self::Edl | Self::Both)
    }

    fn writes_xml(&self) -> bool {
        matches!(self, Self::Xml | Self::Both)
    }
}

impl fmt::Display for SaveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Edl => write!(f, "edl"),
            Self::Xml => write!(f, "xml"),
            Self::Both => write!(f, "both"),
        }
    }
}

/// Unknown save format name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown save format '{0}' (expected auto, edl, xml or both)")]
pub struct ParseSaveFormatError(pub String);

impl FromStr for SaveFormat {
    type Err = ParseSaveFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" | "auto detect" => Ok(Self::Auto),
            "edl" | "edl only" => Ok(Self::Edl),
            "xml" | "chapter xml only" => Ok(Self::Xml),
            "both" | "both formats" => Ok(Self::Both),
            _ => Err(ParseSaveFormatError(s.to_string())),
        }
    }
}

/// Load a video's segments, preferring chapter XML over EDL.
///
/// The returned segments are sorted by start time.
pub fn load_segments(vfs: &dyn Vfs, video_path: &str, mapping: &ActionMapping) -> ParsedSegments {
    let mut parsed = read_chapters(vfs, video_path);
    if parsed.is_empty() {
        debug!("No chapter segments for {}, trying EDL", video_path);
        let edl = read_edl(vfs, video_path, mapping);
        // Keep chapter diagnostics when the EDL is missing too.
        if edl.path.is_some() || !edl.issues.is_empty() {
            parsed = edl;
        }
    }
    sort_segments(&mut parsed.segments);
    parsed
}

/// Outcome of one format's write.
pub type SaveOutcome = Result<Written, String>;

/// What a call to [`save_segments`] did.
#[derive(Debug, Clone, Default)]
pub struct SaveReport {
    /// EDL write, when attempted.
    pub edl: Option<SaveOutcome>,
    /// Chapter XML write, when attempted.
    pub xml: Option<SaveOutcome>,
    /// Files removed because the segment list was empty.
    pub deleted: Vec<String>,
    /// True when the save was a deletion of an empty list.
    pub cleared: bool,
}

impl SaveReport {
    /// At least one requested write landed, or the list was cleared.
    pub fn any_succeeded(&self) -> bool {
        self.cleared || self.edl_ok() || self.xml_ok()
    }

    fn edl_ok(&self) -> bool {
        matches!(self.edl, Some(Ok(_)))
    }

    fn xml_ok(&self) -> bool {
        matches!(self.xml, Some(Ok(_)))
    }

    /// Paths that were written.
    pub fn written_paths(&self) -> Vec<&str> {
        [&self.edl, &self.xml]
            .into_iter()
            .filter_map(|o| match o {
                Some(Ok(w)) => Some(w.path.as_str()),
                _ => None,
            })
            .collect()
    }

    /// One line message for the user.
    pub fn summary(&self) -> String {
        if self.cleared {
            return if self.deleted.is_empty() {
                "No segments to save".to_string()
            } else {
                format!("Removed {} segment file(s)", self.deleted.len())
            };
        }
        match (&self.edl, &self.xml) {
            (Some(_), Some(_)) => match (self.edl_ok(), self.xml_ok()) {
                (true, true) => "Segments saved to both formats".to_string(),
                (true, false) => "Segments saved to EDL (XML failed)".to_string(),
                (false, true) => "Segments saved to XML (EDL failed)".to_string(),
                (false, false) => "Failed to save segments".to_string(),
            },
            (Some(Ok(_)), None) => "Segments saved to EDL".to_string(),
            (None, Some(Ok(_))) => "Segments saved to XML".to_string(),
            _ => "Failed to save segments".to_string(),
        }
    }
}

/// Resolve `Auto` to a concrete format for this video.
fn resolve_format(vfs: &dyn Vfs, video_path: &str, segments: &[Segment], format: SaveFormat) -> SaveFormat {
    if format != SaveFormat::Auto {
        return format;
    }
    if let Some(existing) = existing_chapter_file(vfs, video_path) {
        debug!("Auto save: chapter file {} exists, writing XML", existing);
        return SaveFormat::Xml;
    }
    match segments.first().map(Segment::source) {
        Some(SegmentSource::Xml) => SaveFormat::Xml,
        _ => SaveFormat::Edl,
    }
}

/// Write `segments` for `video_path` in the requested format(s).
///
/// An empty list removes the video's segment files instead. Each format is
/// written independently; one failing does not stop the other.
pub fn save_segments(
    writer: &ResilientWriter<'_>,
    video_path: &str,
    segments: &[Segment],
    format: SaveFormat,
    mapping: &ActionMapping,
) -> SaveReport {
    let mut report = SaveReport::default();

    if segments.is_empty() {
        report.cleared = true;
        report.deleted = delete_segment_files(writer.vfs(), video_path, format);
        info!("Segment list empty, removed {:?}", report.deleted);
        return report;
    }

    let format = resolve_format(writer.vfs(), video_path, segments, format);
    info!("Saving {} segment(s) for {} as {}", segments.len(), video_path, format);

    if format.writes_edl() {
        report.edl = Some(write_edl(writer, video_path, segments, mapping).map_err(|e| e.to_string()));
    }
    if format.writes_xml() {
        report.xml = Some(write_chapters(writer, video_path, segments).map_err(|e| e.to_string()));
    }

    if !report.any_succeeded() {
        warn!("{}: {}", report.summary(), video_path);
    }
    report
}

fn delete_segment_files(vfs: &dyn Vfs, video_path: &str, format: SaveFormat) -> Vec<String> {
    let mut targets = Vec::new();
    if matches!(format, SaveFormat::Auto | SaveFormat::Both | SaveFormat::Xml) {
        targets.extend(chapter_write_paths(video_path));
    }
    if matches!(format, SaveFormat::Auto | SaveFormat::Both | SaveFormat::Edl) {
        targets.push(edl_path(video_path));
    }

    let mut deleted = Vec::new();
    for path in targets {
        if !vfs.exists(&path) {
            continue;
        }
        match vfs.delete(&path) {
            Ok(()) => {
                debug!("Deleted {}", path);
                deleted.push(path);
            }
            Err(e) => warn!("Could not delete {}: {}", path, e),
        }
    }
    deleted
}
