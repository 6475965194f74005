//! Segment file formats.
//!
//! - `edl` - line based edit decision lists (`<video>.edl`)
//! - `chapters` - Matroska chapter XML (`<video>-chapters.xml` and friends)
//! - `save` - format selection when loading and saving a video's segments
//!
//! Readers never fail: unreadable files give an empty result and bad entries
//! are skipped with a [`ParseIssue`]. Writers go through a
//! [`ResilientWriter`](crate::vfs::ResilientWriter).

pub mod chapters;
pub mod edl;
mod save;
mod types;

pub use chapters::{
    chapter_candidates, chapters_output_path, parse_chapters_xml, read_chapters,
    serialize_chapters_xml, write_chapters,
};
pub use edl::{edl_path, parse_edl, read_edl, resolve_action, serialize_edl, write_edl};
pub use save::{
    load_segments, save_segments, ParseSaveFormatError, SaveFormat, SaveOutcome, SaveReport,
};
pub use types::{ParseIssue, ParsedSegments};

use tracing::warn;

use crate::vfs::{parent_dir, Vfs};

/// Create the parent directory of `path` if it is missing.
///
/// Failure is only logged; the write that follows reports the real error.
pub(crate) fn ensure_parent_dir(vfs: &dyn Vfs, path: &str) {
    let Some(dir) = parent_dir(path) else {
        return;
    };
    if let Err(e) = vfs.mkdirs(dir) {
        warn!("Could not create directory {}: {}", dir, e);
    }
}
