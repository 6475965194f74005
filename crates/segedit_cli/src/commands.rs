//! Subcommand implementations.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::{debug, warn};

use segedit_core::config::{ConfigManager, Settings};
use segedit_core::formats::{load_segments, read_chapters, read_edl, save_segments, ParsedSegments, SaveFormat};
use segedit_core::segments::{
    classify, seconds_to_timecode, sort_segments, timecode_to_seconds, SegmentKind, SegmentSource,
};
use segedit_core::vfs::{classify_path, LocalFs, ResilientWriter};

/// Which file `save` reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadFrom {
    Any,
    Edl,
    Xml,
}

#[derive(Serialize)]
struct SegmentRow<'a> {
    start: f64,
    end: f64,
    label: &'a str,
    source: SegmentSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    action_code: Option<i32>,
    kind: SegmentKind,
}

/// The binary only has `std::fs`, so URLs to network shares are refused.
fn ensure_local(video: &str) -> Result<()> {
    if classify_path(video).is_network() {
        bail!(
            "{} is a network URL; segedit can only read and write local paths (mount the share first)",
            video
        );
    }
    Ok(())
}

fn load(settings: &Settings, video: &str, from: LoadFrom) -> ParsedSegments {
    let vfs = LocalFs::new();
    let mapping = settings.action_mapping();
    let mut parsed = match from {
        LoadFrom::Any => load_segments(&vfs, video, &mapping),
        LoadFrom::Edl => read_edl(&vfs, video, &mapping),
        LoadFrom::Xml => read_chapters(&vfs, video),
    };
    sort_segments(&mut parsed.segments);
    for issue in &parsed.issues {
        warn!("Skipped {}", issue);
    }
    parsed
}

pub fn show(settings: &Settings, video: &str, json: bool) -> Result<()> {
    ensure_local(video)?;
    let parsed = load(settings, video, LoadFrom::Any);
    let kinds = classify(&parsed.segments);

    if json {
        let rows: Vec<SegmentRow> = parsed
            .segments
            .iter()
            .zip(&kinds)
            .map(|(s, kind)| SegmentRow {
                start: s.start(),
                end: s.end(),
                label: s.label(),
                source: s.source(),
                action_code: s.action_code(),
                kind: *kind,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    match &parsed.path {
        Some(path) => println!("{} segment(s) from {}", parsed.len(), path),
        None => {
            println!("No segments found for {}", video);
            return Ok(());
        }
    }

    for (i, (segment, kind)) in parsed.segments.iter().zip(&kinds).enumerate() {
        let tag = match kind {
            SegmentKind::Normal => String::new(),
            other => format!("  [{}]", other),
        };
        println!(
            "{:>3}. {} -> {}  {}{}",
            i + 1,
            seconds_to_timecode(segment.start()),
            seconds_to_timecode(segment.end()),
            segment.label(),
            tag
        );
    }
    Ok(())
}

pub fn save(settings: &Settings, video: &str, format: Option<SaveFormat>, from: LoadFrom) -> Result<()> {
    ensure_local(video)?;
    let parsed = load(settings, video, from);
    if parsed.is_empty() {
        // An empty list would delete the files, which is not what a rewrite means.
        bail!("No segments found for {}", video);
    }

    let format = format.unwrap_or(settings.output.save_format);
    debug!("Saving {} segment(s) as {}", parsed.len(), format);

    let vfs = LocalFs::new();
    let writer = ResilientWriter::new(&vfs, settings.write_options());
    let report = save_segments(
        &writer,
        video,
        &parsed.segments,
        format,
        &settings.action_mapping(),
    );

    for path in report.written_paths() {
        println!("Wrote {}", path);
    }
    for failure in [&report.edl, &report.xml].into_iter().flatten() {
        if let Err(e) = failure {
            eprintln!("error: {}", e);
        }
    }

    if !report.any_succeeded() {
        bail!("{}", report.summary());
    }
    println!("{}", report.summary());
    Ok(())
}

pub fn timecode(value: &str) -> Result<()> {
    if value.contains(':') {
        let seconds = timecode_to_seconds(value)?;
        println!("{:.3}", seconds);
    } else {
        let seconds: f64 = value
            .trim()
            .parse()
            .with_context(|| format!("'{}' is neither seconds nor a timecode", value))?;
        if seconds < 0.0 || !seconds.is_finite() {
            bail!("seconds must be a non-negative number, got {}", value);
        }
        println!("{}", seconds_to_timecode(seconds));
    }
    Ok(())
}

pub fn config_init(config: &mut ConfigManager) -> Result<()> {
    config
        .load_or_create()
        .with_context(|| format!("Failed to initialize {}", config.path().display()))?;
    println!("Config written to {}", config.path().display());
    Ok(())
}

pub fn config_show(config: &mut ConfigManager) -> Result<()> {
    let from_file = config.load_if_present()?;
    if !from_file {
        eprintln!("{} not found, showing defaults", config.path().display());
    }
    print!("{}", toml::to_string_pretty(config.settings())?);
    Ok(())
}
