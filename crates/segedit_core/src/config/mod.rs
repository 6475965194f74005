//! Configuration management for the segment editor.
//!
//! This module provides:
//! - TOML-based configuration with logical sections
//! - Atomic file writes (write to temp, then rename)
//! - Section-level updates (only changed section is modified)
//! - Defaults for every missing key
//!
//! # Example
//!
//! ```no_run
//! use segedit_core::config::{ConfigManager, ConfigSection};
//! use segedit_core::formats::SaveFormat;
//!
//! let mut config = ConfigManager::new("segedit.toml");
//! config.load_or_create().unwrap();
//!
//! let mapping = config.settings().action_mapping();
//! println!("Action 4 is {:?}", mapping.label_for(4));
//!
//! config.settings_mut().output.save_format = SaveFormat::Both;
//! config.update_section(ConfigSection::Output).unwrap();
//! ```

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{ConfigSection, LoggingSettings, OutputSettings, SegmentSettings, Settings};
