//! Editing session for one video's segments.
//!
//! Holds the segment list between load and save, plus the start/end marks
//! a user sets while seeking. The UI layer drives it with playback times it
//! reads from its player; nothing here touches the player or the filesystem.

use tracing::{debug, info};

use crate::segments::{
    classify, Segment, SegmentKind, SegmentSource, ValidationError, DEFAULT_LABEL,
};

/// Invalid editing operation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error("no segment at index {index} ({len} segment(s))")]
    NoSuchSegment { index: usize, len: usize },

    #[error("end time must be after start time ({start:.3} -> {end:.3})")]
    InvalidRange { start: f64, end: f64 },

    #[error("mark both start and end times first")]
    MarksIncomplete,

    #[error("cannot mark start at {start:.3}, at or after the marked end {end:.3}")]
    StartAfterEnd { start: f64, end: f64 },

    #[error("cannot mark end at {end:.3}, at or before the marked start {start:.3}")]
    EndBeforeStart { start: f64, end: f64 },

    #[error("no playback time available")]
    NoPlaybackTime,

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Segments of one video being edited.
#[derive(Debug, Clone)]
pub struct EditSession {
    video_path: String,
    segments: Vec<Segment>,
    saved: Vec<Segment>,
    modified: bool,
    pending_start: Option<f64>,
    pending_end: Option<f64>,
    selected: Option<usize>,
}

impl EditSession {
    /// Start editing `segments`, which are sorted by start time.
    pub fn new(video_path: impl Into<String>, mut segments: Vec<Segment>) -> Self {
        crate::segments::sort_segments(&mut segments);
        Self {
            video_path: video_path.into(),
            saved: segments.clone(),
            segments,
            modified: false,
            pending_start: None,
            pending_end: None,
            selected: None,
        }
    }

    pub fn video_path(&self) -> &str {
        &self.video_path
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn into_segments(self) -> Vec<Segment> {
        self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether the list differs from what was loaded or last saved.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn pending_start(&self) -> Option<f64> {
        self.pending_start
    }

    pub fn pending_end(&self) -> Option<f64> {
        self.pending_end
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn get(&self, index: usize) -> SessionResult<&Segment> {
        self.segments.get(index).ok_or(SessionError::NoSuchSegment {
            index,
            len: self.segments.len(),
        })
    }

    /// Select a segment for the list view.
    pub fn select(&mut self, index: Option<usize>) -> SessionResult<()> {
        if let Some(i) = index {
            self.get(i)?;
        }
        self.selected = index;
        Ok(())
    }

    /// Source given to new segments: that of the first segment, else EDL.
    pub fn new_segment_source(&self) -> SegmentSource {
        self.segments
            .first()
            .map(Segment::source)
            .unwrap_or_default()
    }

    /// Nested/overlapping state of each segment, in list order.
    pub fn kinds(&self) -> Vec<SegmentKind> {
        classify(&self.segments)
    }

    /// Indices of segments covering `time`.
    pub fn active_at(&self, time: f64) -> Vec<usize> {
        self.segments
            .iter()
            .enumerate()
            .filter(|(_, s)| s.contains_time(time))
            .map(|(i, _)| i)
            .collect()
    }

    /// Add a segment. Returns its index in the sorted list.
    pub fn add(&mut self, start: f64, end: f64, label: &str) -> SessionResult<usize> {
        if end <= start {
            return Err(SessionError::InvalidRange { start, end });
        }
        let segment = Segment::new(start, end, label_or_default(label), self.new_segment_source())?;
        info!("Added segment {}", segment);
        Ok(self.insert(segment))
    }

    /// Add a segment of `duration` seconds starting at the playback `time`.
    pub fn add_at(&mut self, time: f64, duration: f64, label: &str) -> SessionResult<usize> {
        if time <= 0.0 {
            return Err(SessionError::NoPlaybackTime);
        }
        self.add(time, time + duration, label)
    }

    /// Add a segment spanning the current marks, then clear them.
    pub fn add_with_marks(&mut self, label: &str) -> SessionResult<usize> {
        let (start, end) = self.marks()?;
        let index = self.add(start, end, label)?;
        self.clear_marks();
        Ok(index)
    }

    /// Replace a segment's bounds and label. Returns its new index.
    pub fn edit(&mut self, index: usize, start: f64, end: f64, label: &str) -> SessionResult<usize> {
        self.get(index)?;
        if end <= start {
            return Err(SessionError::InvalidRange { start, end });
        }
        let mut segment = self.segments.remove(index);
        if let Err(e) = segment.set_bounds(start, end) {
            self.segments.insert(index, segment);
            return Err(e.into());
        }
        segment.set_label(label_or_default(label));
        info!("Edited segment {}", segment);
        Ok(self.insert(segment))
    }

    /// Move a segment to the current marks, keeping its label, then clear them.
    pub fn apply_marks(&mut self, index: usize) -> SessionResult<usize> {
        let (start, end) = self.marks()?;
        let label = self.get(index)?.label().to_string();
        let new_index = self.edit(index, start, end, &label)?;
        self.clear_marks();
        Ok(new_index)
    }

    /// Delete a segment.
    pub fn remove(&mut self, index: usize) -> SessionResult<Segment> {
        self.get(index)?;
        let segment = self.segments.remove(index);
        self.selected = match self.selected {
            Some(s) if s == index => None,
            Some(s) if s > index => Some(s - 1),
            other => other,
        };
        self.modified = true;
        info!("Deleted segment {}", segment);
        Ok(segment)
    }

    /// Delete every segment.
    pub fn clear(&mut self) {
        if !self.segments.is_empty() {
            self.segments.clear();
            self.modified = true;
        }
        self.selected = None;
    }

    /// Mark the start at `time`, or clear the mark if one is set.
    ///
    /// Returns the new mark.
    pub fn toggle_start_mark(&mut self, time: f64) -> SessionResult<Option<f64>> {
        if self.pending_start.take().is_some() {
            debug!("Start mark cleared");
            return Ok(None);
        }
        self.set_start_mark(time)?;
        Ok(self.pending_start)
    }

    /// Mark the end at `time`, or clear the mark if one is set.
    ///
    /// Returns the new mark.
    pub fn toggle_end_mark(&mut self, time: f64) -> SessionResult<Option<f64>> {
        if self.pending_end.take().is_some() {
            debug!("End mark cleared");
            return Ok(None);
        }
        self.set_end_mark(time)?;
        Ok(self.pending_end)
    }

    /// Mark the start where segment `index` ends.
    pub fn start_at_end_of(&mut self, index: usize) -> SessionResult<f64> {
        let time = self.get(index)?.end();
        self.set_start_mark(time)?;
        Ok(time)
    }

    /// Mark the end where segment `index` starts.
    pub fn end_at_start_of(&mut self, index: usize) -> SessionResult<f64> {
        let time = self.get(index)?.start();
        self.set_end_mark(time)?;
        Ok(time)
    }

    pub fn clear_marks(&mut self) {
        self.pending_start = None;
        self.pending_end = None;
    }

    /// The list was written; it becomes the new baseline.
    pub fn mark_saved(&mut self) {
        self.saved = self.segments.clone();
        self.modified = false;
    }

    /// Drop edits since load or the last save.
    pub fn discard_changes(&mut self) {
        self.segments = self.saved.clone();
        self.modified = false;
        self.selected = None;
        self.clear_marks();
    }

    fn set_start_mark(&mut self, time: f64) -> SessionResult<()> {
        if let Some(end) = self.pending_end {
            if time >= end {
                return Err(SessionError::StartAfterEnd { start: time, end });
            }
        }
        debug!("Start marked at {:.2}", time);
        self.pending_start = Some(time);
        Ok(())
    }

    fn set_end_mark(&mut self, time: f64) -> SessionResult<()> {
        if let Some(start) = self.pending_start {
            if time <= start {
                return Err(SessionError::EndBeforeStart { start, end: time });
            }
        }
        debug!("End marked at {:.2}", time);
        self.pending_end = Some(time);
        Ok(())
    }

    fn marks(&self) -> SessionResult<(f64, f64)> {
        match (self.pending_start, self.pending_end) {
            (Some(start), Some(end)) => Ok((start, end)),
            _ => Err(SessionError::MarksIncomplete),
        }
    }

    /// Insert keeping the list sorted; equal starts keep insertion order.
    fn insert(&mut self, segment: Segment) -> usize {
        let index = self
            .segments
            .partition_point(|s| s.start().total_cmp(&segment.start()).is_le());
        self.segments.insert(index, segment);
        self.selected = None;
        self.modified = true;
        index
    }
}

fn label_or_default(label: &str) -> &str {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        DEFAULT_LABEL
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(start: f64, end: f64, label: &str, source: SegmentSource) -> Segment {
        Segment::new(start, end, label, source).unwrap()
    }

    fn session() -> EditSession {
        EditSession::new(
            "/tv/ep.mkv",
            vec![
                seg(300.0, 330.0, "Commercial", SegmentSource::Xml),
                seg(0.0, 90.0, "Intro", SegmentSource::Xml),
            ],
        )
    }

    #[test]
    fn new_sorts_and_starts_clean() {
        let s = session();
        assert_eq!(s.segments()[0].label(), "Intro");
        assert!(!s.is_modified());
        assert_eq!(s.new_segment_source(), SegmentSource::Xml);
        assert_eq!(EditSession::new("x.mkv", vec![]).new_segment_source(), SegmentSource::Edl);
    }

    #[test]
    fn add_inserts_sorted() {
        let mut s = session();
        let index = s.add(100.0, 120.0, " Recap ").unwrap();
        assert_eq!(index, 1);
        assert_eq!(s.segments()[1].label(), "Recap");
        assert_eq!(s.segments()[1].source(), SegmentSource::Xml);
        assert!(s.is_modified());

        assert_eq!(s.add(5.0, 6.0, "").map(|i| s.segments()[i].label().to_string()), Ok(DEFAULT_LABEL.to_string()));
    }

    #[test]
    fn add_rejects_empty_range() {
        let mut s = session();
        assert_eq!(
            s.add(10.0, 10.0, "x"),
            Err(SessionError::InvalidRange { start: 10.0, end: 10.0 })
        );
        assert!(matches!(s.add(-5.0, 1.0, "x"), Err(SessionError::Validation(_))));
        assert!(!s.is_modified());
    }

    #[test]
    fn add_at_uses_playback_time() {
        let mut s = session();
        let i = s.add_at(600.0, 30.0, "Outro").unwrap();
        assert_eq!(s.segments()[i].end(), 630.0);
        assert_eq!(s.add_at(0.0, 30.0, "Outro"), Err(SessionError::NoPlaybackTime));
    }

    #[test]
    fn marks_toggle_and_validate() {
        let mut s = session();
        assert_eq!(s.toggle_end_mark(50.0), Ok(Some(50.0)));
        assert_eq!(
            s.toggle_start_mark(60.0),
            Err(SessionError::StartAfterEnd { start: 60.0, end: 50.0 })
        );
        assert_eq!(s.toggle_start_mark(40.0), Ok(Some(40.0)));
        // second press clears
        assert_eq!(s.toggle_start_mark(45.0), Ok(None));
        assert_eq!(s.pending_start(), None);
        assert_eq!(s.pending_end(), Some(50.0));
    }

    #[test]
    fn add_with_marks_consumes_them() {
        let mut s = session();
        assert_eq!(s.add_with_marks("Recap"), Err(SessionError::MarksIncomplete));

        s.toggle_start_mark(95.0).unwrap();
        s.toggle_end_mark(125.0).unwrap();
        let i = s.add_with_marks("Recap").unwrap();
        assert_eq!(s.segments()[i].start(), 95.0);
        assert_eq!(s.pending_start(), None);
        assert_eq!(s.pending_end(), None);
    }

    #[test]
    fn marks_from_neighbouring_segments() {
        let mut s = session();
        assert_eq!(s.start_at_end_of(0), Ok(90.0));
        assert_eq!(s.end_at_start_of(1), Ok(300.0));
        assert_eq!(
            s.end_at_start_of(0),
            Err(SessionError::EndBeforeStart { start: 90.0, end: 0.0 })
        );
        let i = s.add_with_marks("Episode").unwrap();
        assert_eq!(s.segments()[i].duration(), 210.0);
        assert!(matches!(s.start_at_end_of(9), Err(SessionError::NoSuchSegment { index: 9, .. })));
    }

    #[test]
    fn edit_resorts_and_keeps_list_on_error() {
        let mut s = session();
        let i = s.edit(0, 400.0, 420.0, "Credits").unwrap();
        assert_eq!(i, 1);
        assert_eq!(s.segments()[1].label(), "Credits");
        assert_eq!(s.segments()[1].normalized_label(), "credits");

        let before = s.segments().to_vec();
        assert!(s.edit(0, 20.0, 10.0, "x").is_err());
        assert!(s.edit(0, -1.0, 10.0, "x").is_err());
        assert_eq!(s.segments(), before.as_slice());
    }

    #[test]
    fn apply_marks_keeps_label() {
        let mut s = session();
        s.toggle_start_mark(5.0).unwrap();
        s.toggle_end_mark(80.0).unwrap();
        let i = s.apply_marks(0).unwrap();
        assert_eq!(s.segments()[i].label(), "Intro");
        assert_eq!(s.segments()[i].start(), 5.0);
        assert_eq!(s.pending_start(), None);
    }

    #[test]
    fn remove_adjusts_selection() {
        let mut s = session();
        s.select(Some(1)).unwrap();
        s.remove(0).unwrap();
        assert_eq!(s.selected(), Some(0));
        s.remove(0).unwrap();
        assert_eq!(s.selected(), None);
        assert!(s.is_empty());
        assert!(s.remove(0).is_err());
        assert!(s.select(Some(3)).is_err());
    }

    #[test]
    fn active_at_and_kinds() {
        let mut s = session();
        s.add(60.0, 80.0, "Recap").unwrap();
        assert_eq!(s.active_at(70.0), vec![0, 1]);
        assert_eq!(s.active_at(200.0), Vec::<usize>::new());
        assert_eq!(
            s.kinds(),
            vec![SegmentKind::Normal, SegmentKind::Nested, SegmentKind::Normal]
        );
    }

    #[test]
    fn save_and_discard() {
        let mut s = session();
        s.clear();
        assert!(s.is_modified());
        s.discard_changes();
        assert_eq!(s.len(), 2);
        assert!(!s.is_modified());

        s.remove(0).unwrap();
        s.mark_saved();
        assert!(!s.is_modified());
        s.discard_changes();
        assert_eq!(s.len(), 1);
    }
}
