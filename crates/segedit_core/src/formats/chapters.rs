//! Chapter XML reader and writer.
//!
//! Handles the Matroska chapter XML layout:
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <Chapters>
//!   <EditionEntry>
//!     <ChapterAtom>
//!       <ChapterTimeStart>00:00:00.000</ChapterTimeStart>
//!       <ChapterTimeEnd>00:01:30.000</ChapterTimeEnd>
//!       <ChapterDisplay>
//!         <ChapterString>Intro</ChapterString>
//!       </ChapterDisplay>
//!     </ChapterAtom>
//!   </EditionEntry>
//! </Chapters>
//! ```
//!
//! Both bounds are required per atom; atoms without them are skipped.

use tracing::{debug, info, warn};

use super::ensure_parent_dir;
use super::types::ParsedSegments;
use crate::segments::{
    seconds_to_timecode, timecode_to_seconds, Segment, SegmentError, SegmentResult,
    SegmentSource, DEFAULT_LABEL,
};
use crate::vfs::{join_path, parent_dir, read_first, strip_extension, ResilientWriter, Vfs, Written};

/// Suffixes probed when reading, in order.
const READ_SUFFIXES: [&str; 4] = ["-chapters.xml", "_chapters.xml", "-chapter.xml", "_chapter.xml"];

/// Suffixes considered when choosing where to write; the first is the default.
const WRITE_SUFFIXES: [&str; 2] = ["-chapters.xml", "_chapters.xml"];

/// Directory-wide chapter file name.
const SHARED_CHAPTERS_FILE: &str = "chapters.xml";

/// Paths probed for a video's chapter file, in order.
pub fn chapter_candidates(video_path: &str) -> Vec<String> {
    let base = strip_extension(video_path);
    let mut candidates: Vec<String> = READ_SUFFIXES
        .iter()
        .map(|suffix| format!("{}{}", base, suffix))
        .collect();
    if let Some(dir) = parent_dir(video_path) {
        candidates.push(join_path(dir, SHARED_CHAPTERS_FILE));
    }
    candidates
}

/// Chapter files the writer may target, in order of preference.
pub fn chapter_write_paths(video_path: &str) -> Vec<String> {
    let base = strip_extension(video_path);
    WRITE_SUFFIXES
        .iter()
        .map(|suffix| format!("{}{}", base, suffix))
        .collect()
}

/// The existing per-video chapter file the writer would overwrite, if any.
pub fn existing_chapter_file(vfs: &dyn Vfs, video_path: &str) -> Option<String> {
    chapter_write_paths(video_path)
        .into_iter()
        .find(|path| vfs.exists(path))
}

/// Output path: the existing `-chapters.xml`/`_chapters.xml`, else `-chapters.xml`.
pub fn chapters_output_path(vfs: &dyn Vfs, video_path: &str) -> String {
    existing_chapter_file(vfs, video_path)
        .unwrap_or_else(|| format!("{}{}", strip_extension(video_path), WRITE_SUFFIXES[0]))
}

/// Parse chapter XML.
///
/// Never fails: a document that is not well-formed XML yields no segments
/// and a single issue at position 0.
pub fn parse_chapters_xml(xml: &str) -> ParsedSegments {
    let mut parsed = ParsedSegments::new();
    let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);

    let doc = match roxmltree::Document::parse(xml) {
        Ok(doc) => doc,
        Err(e) => {
            parsed.skip(0, "<document>", format!("XML parse error: {}", e));
            return parsed;
        }
    };

    let atoms = doc
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "ChapterAtom");

    for (idx, atom) in atoms.enumerate() {
        match parse_chapter_atom(&atom) {
            Ok(segment) => {
                debug!(
                    "Parsed chapter atom {}: {} -> {} | label='{}'",
                    idx + 1,
                    segment.start(),
                    segment.end(),
                    segment.label()
                );
                parsed.segments.push(segment);
            }
            Err(reason) => parsed.skip(idx + 1, "ChapterAtom", reason),
        }
    }

    parsed
}

/// Parse a single ChapterAtom element.
fn parse_chapter_atom(atom: &roxmltree::Node) -> Result<Segment, String> {
    let start = child_text(atom, "ChapterTimeStart").ok_or("missing ChapterTimeStart")?;
    let end = child_text(atom, "ChapterTimeEnd").ok_or("missing ChapterTimeEnd")?;

    let start = timecode_to_seconds(start).map_err(|e| e.to_string())?;
    let end = timecode_to_seconds(end).map_err(|e| e.to_string())?;

    let label = atom
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "ChapterDisplay")
        .find_map(|display| child_text(&display, "ChapterString"))
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or(DEFAULT_LABEL);

    Segment::new(start, end, label, SegmentSource::Xml).map_err(|e| e.to_string())
}

/// Non-empty text of the first child element named `name`.
fn child_text<'a>(node: &roxmltree::Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
        .and_then(|n| n.text())
        .filter(|t| !t.trim().is_empty())
}

/// Read the first chapter file found next to `video_path`.
///
/// A missing or unreadable file yields an empty result.
pub fn read_chapters(vfs: &dyn Vfs, video_path: &str) -> ParsedSegments {
    let candidates = chapter_candidates(video_path);
    debug!("Probing chapter XML paths: {:?}", candidates);

    let Some(file) = read_first(vfs, candidates.as_slice()) else {
        debug!("No chapter XML file found for {}", video_path);
        return ParsedSegments::new();
    };

    let mut parsed = parse_chapters_xml(&file.content);
    if parsed.is_empty() {
        warn!("No usable chapters in {}", file.path);
    } else {
        info!(
            "Parsed {} segment(s) from {} ({} skipped)",
            parsed.len(),
            file.path,
            parsed.issues.len()
        );
    }
    parsed.path = Some(file.path);
    parsed
}

/// Serialize segments to chapter XML with two-space indentation.
pub fn serialize_chapters_xml(segments: &[Segment]) -> String {
    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<Chapters>\n");
    xml.push_str("  <EditionEntry>\n");

    for segment in segments {
        xml.push_str("    <ChapterAtom>\n");
        xml.push_str(&format!(
            "      <ChapterTimeStart>{}</ChapterTimeStart>\n",
            seconds_to_timecode(segment.start())
        ));
        xml.push_str(&format!(
            "      <ChapterTimeEnd>{}</ChapterTimeEnd>\n",
            seconds_to_timecode(segment.end())
        ));
        xml.push_str("      <ChapterDisplay>\n");
        xml.push_str(&format!(
            "        <ChapterString>{}</ChapterString>\n",
            escape_xml(segment.label())
        ));
        xml.push_str("      </ChapterDisplay>\n");
        xml.push_str("    </ChapterAtom>\n");
    }

    xml.push_str("  </EditionEntry>\n");
    xml.push_str("</Chapters>\n");

    xml
}

/// Write segments to the chapter file for `video_path`.
pub fn write_chapters(
    writer: &ResilientWriter<'_>,
    video_path: &str,
    segments: &[Segment],
) -> SegmentResult<Written> {
    let path = chapters_output_path(writer.vfs(), video_path);
    info!("Saving {} segment(s) to {}", segments.len(), path);

    let xml = serialize_chapters_xml(segments);
    ensure_parent_dir(writer.vfs(), &path);
    writer
        .write(&path, xml.as_bytes())
        .map_err(|e| SegmentError::write_failed(&path, e))
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
