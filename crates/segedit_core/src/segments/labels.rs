//! Label normalization and the action code table.
//!
//! EDL files carry a small integer action per line. The table maps those
//! codes to human labels and back; it comes from configuration and is passed
//! into the parsers and writers explicitly.

use std::fmt;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// Label used when nothing better is known.
pub const DEFAULT_LABEL: &str = "segment";

/// Action code written when neither the label nor the segment provide one.
pub const DEFAULT_ACTION: i32 = 4;

/// Labels offered by the editor when the configuration lists none.
pub const DEFAULT_PREDEFINED_LABELS: &[&str] = &[
    "Intro",
    "Recap",
    "Credits",
    "Commercial",
    "Ad",
    "Sponsor",
    "Outro",
];

/// Project a display label onto its matching key (NFC, trimmed, lower-case).
pub fn normalize_label(label: &str) -> String {
    label.nfc().collect::<String>().trim().to_lowercase()
}

/// Parse a comma separated list of labels, dropping empty entries.
///
/// Falls back to [`DEFAULT_PREDEFINED_LABELS`] when nothing remains.
pub fn parse_predefined_labels(raw: &str) -> Vec<String> {
    let labels: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect();

    if labels.is_empty() {
        DEFAULT_PREDEFINED_LABELS
            .iter()
            .map(|l| l.to_string())
            .collect()
    } else {
        labels
    }
}

/// Ordered table of `(action code, label)` pairs.
///
/// Lookups honour the last matching entry so that a later entry overrides an
/// earlier one, both by code and by label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionMapping {
    entries: Vec<(i32, String)>,
}

impl ActionMapping {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mapping from explicit pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (i32, S)>,
        S: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(code, label)| (code, label.into()))
                .collect(),
        }
    }

    /// Parse the `"4:Commercial, 1:Intro"` form.
    ///
    /// Entries without a colon or with a non-integer code are ignored.
    pub fn parse(raw: &str) -> Self {
        let entries = raw
            .split(',')
            .map(str::trim)
            .filter_map(|entry| {
                let (code, label) = entry.split_once(':')?;
                let code = code.trim().parse().ok()?;
                Some((code, label.trim().to_string()))
            })
            .collect();

        Self { entries }
    }

    /// Label configured for an action code.
    pub fn label_for(&self, code: i32) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(c, _)| *c == code)
            .map(|(_, label)| label.as_str())
    }

    /// Action code configured for a label, matched on the normalized form.
    pub fn code_for(&self, label: &str) -> Option<i32> {
        let key = normalize_label(label);
        self.entries
            .iter()
            .rev()
            .find(|(_, l)| normalize_label(l) == key)
            .map(|(code, _)| *code)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, &str)> {
        self.entries.iter().map(|(c, l)| (*c, l.as_str()))
    }
}

impl fmt::Display for ActionMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self
            .entries
            .iter()
            .map(|(code, label)| format!("{}:{}", code, label))
            .collect();
        write!(f, "{}", joined.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_and_lowercases() {
        assert_eq!(normalize_label("  Intro "), "intro");
        assert_eq!(normalize_label("COMMERCIAL"), "commercial");
        assert_eq!(normalize_label(""), "");
    }

    #[test]
    fn normalize_composes_unicode() {
        // "e" + combining acute vs precomposed "é"
        let decomposed = "Re\u{0301}sume\u{0301}";
        let composed = "R\u{00e9}sum\u{00e9}";
        assert_eq!(normalize_label(decomposed), normalize_label(composed));
    }

    #[test]
    fn parse_mapping_skips_bad_entries() {
        let mapping = ActionMapping::parse("4:Commercial, 1: Intro ,junk,x:Bad,3:");
        assert_eq!(mapping.label_for(4), Some("Commercial"));
        assert_eq!(mapping.label_for(1), Some("Intro"));
        assert_eq!(mapping.label_for(3), Some(""));
        assert_eq!(mapping.iter().count(), 3);
    }

    #[test]
    fn reverse_lookup_uses_normalized_label() {
        let mapping = ActionMapping::from_pairs([(4, "Commercial"), (1, "Intro")]);
        assert_eq!(mapping.code_for("intro"), Some(1));
        assert_eq!(mapping.code_for("  INTRO"), Some(1));
        assert_eq!(mapping.code_for("Recap"), None);
    }

    #[test]
    fn later_entries_win() {
        let mapping = ActionMapping::parse("1:Intro,1:Opening,2:Intro");
        assert_eq!(mapping.label_for(1), Some("Opening"));
        assert_eq!(mapping.code_for("Intro"), Some(2));
    }

    #[test]
    fn mapping_display_roundtrips() {
        let mapping = ActionMapping::from_pairs([(0, "Cut"), (3, "Commercial")]);
        assert_eq!(mapping.to_string(), "0:Cut,3:Commercial");
        assert_eq!(ActionMapping::parse(&mapping.to_string()), mapping);
    }

    #[test]
    fn predefined_labels_fall_back_to_defaults() {
        assert_eq!(parse_predefined_labels("A, B,,"), vec!["A", "B"]);
        assert_eq!(parse_predefined_labels(" , ").len(), DEFAULT_PREDEFINED_LABELS.len());
    }
}
