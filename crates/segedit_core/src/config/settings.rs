//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Each section can be updated independently for atomic section-level updates.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::formats::SaveFormat;
use crate::logging::LogLevel;
use crate::segments::{parse_predefined_labels, ActionMapping, DEFAULT_PREDEFINED_LABELS};
use crate::vfs::WriteOptions;

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Segment labelling.
    #[serde(default)]
    pub segments: SegmentSettings,

    /// Output format and file handling.
    #[serde(default)]
    pub output: OutputSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Settings {
    /// Parsed EDL action code table.
    pub fn action_mapping(&self) -> ActionMapping {
        ActionMapping::parse(&self.segments.action_mapping)
    }

    /// Labels offered when adding a segment.
    pub fn predefined_labels(&self) -> Vec<String> {
        parse_predefined_labels(&self.segments.predefined_labels)
    }

    /// Options for the resilient writer.
    pub fn write_options(&self) -> WriteOptions {
        WriteOptions {
            settle_delay: Duration::from_millis(self.output.nfs_settle_ms),
            set_permissions: self.output.set_file_permissions,
        }
    }

    /// Effective log level; `verbose` forces at least debug.
    pub fn log_level(&self) -> LogLevel {
        if self.logging.verbose {
            self.logging.level.min(LogLevel::Debug)
        } else {
            self.logging.level
        }
    }
}

/// Labels and EDL action codes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentSettings {
    /// EDL action code to label table, as `code:label` pairs.
    #[serde(default = "default_action_mapping")]
    pub action_mapping: String,

    /// Labels offered when adding a segment, comma separated.
    #[serde(default = "default_predefined_labels")]
    pub predefined_labels: String,
}

fn default_action_mapping() -> String {
    "4:Commercial,1:Intro".to_string()
}

fn default_predefined_labels() -> String {
    DEFAULT_PREDEFINED_LABELS.join(",")
}

impl Default for SegmentSettings {
    fn default() -> Self {
        Self {
            action_mapping: default_action_mapping(),
            predefined_labels: default_predefined_labels(),
        }
    }
}

/// Where and how segment files are written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Format(s) written on save.
    #[serde(default)]
    pub save_format: SaveFormat,

    /// Make written local files world writable (0666).
    #[serde(default)]
    pub set_file_permissions: bool,

    /// Pause after deleting an NFS file before rewriting it, in milliseconds.
    #[serde(default = "default_nfs_settle_ms")]
    pub nfs_settle_ms: u64,
}

fn default_nfs_settle_ms() -> u64 {
    100
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            save_format: SaveFormat::default(),
            set_file_permissions: false,
            nfs_settle_ms: default_nfs_settle_ms(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log per-line and per-attempt detail.
    #[serde(default)]
    pub verbose: bool,

    /// Minimum level when `RUST_LOG` is not set.
    #[serde(default)]
    pub level: LogLevel,
}

/// Names of config sections for targeted updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigSection {
    Segments,
    Output,
    Logging,
}

impl ConfigSection {
    pub const ALL: [ConfigSection; 3] = [Self::Segments, Self::Output, Self::Logging];

    /// Get the TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Segments => "segments",
            ConfigSection::Output => "output",
            ConfigSection::Logging => "logging",
        }
    }

    /// Comment written above the table.
    pub fn description(&self) -> &'static str {
        match self {
            ConfigSection::Segments => "Segment labels and EDL action codes",
            ConfigSection::Output => "Segment file output",
            ConfigSection::Logging => "Logging configuration",
        }
    }
}
