//! Shared parse result types.

use std::fmt;

use crate::segments::Segment;

/// A line or chapter atom that was skipped while parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseIssue {
    /// 1-based line number for EDL files, 1-based atom index for chapter XML.
    /// Zero when the whole document was rejected.
    pub position: usize,
    /// Offending text (the raw line, or a short description of the atom).
    pub content: String,
    /// Why it was skipped.
    pub reason: String,
}

impl fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} '{}': {}", self.position, self.content, self.reason)
    }
}

/// Segments recovered from a file, plus everything that had to be skipped.
#[derive(Debug, Clone, Default)]
pub struct ParsedSegments {
    /// Segments in file order.
    pub segments: Vec<Segment>,
    /// Diagnostics for skipped entries.
    pub issues: Vec<ParseIssue>,
    /// File the segments were read from, if any.
    pub path: Option<String>,
}

impl ParsedSegments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub(crate) fn skip(&mut self, position: usize, content: impl Into<String>, reason: impl ToString) {
        let issue = ParseIssue {
            position,
            content: content.into(),
            reason: reason.to_string(),
        };
        tracing::warn!("Skipped entry {}", issue);
        self.issues.push(issue);
    }
}
