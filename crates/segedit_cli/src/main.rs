//! segedit - inspect and convert a video's segment files
//!
//! Subcommands:
//! - `segedit show <video>` - list segments with nesting/overlap tags
//! - `segedit save <video>` - rewrite segments in the configured format(s)
//! - `segedit timecode <value>` - convert between seconds and HH:MM:SS.mmm
//! - `segedit config init|show` - create or print the config file

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use segedit_core::config::ConfigManager;
use segedit_core::formats::SaveFormat;
use segedit_core::logging::{init_tracing, init_tracing_with_file};

mod commands;

#[derive(Parser)]
#[command(name = "segedit")]
#[command(about = "Segment editor for EDL and chapter XML files")]
#[command(version)]
struct Cli {
    /// Config file
    #[arg(short, long, global = true, default_value = ConfigManager::DEFAULT_FILE_NAME)]
    config: PathBuf,

    /// More log output (repeat for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Also write a daily log file into this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the segments stored next to a video
    Show {
        /// Local video file path
        video: String,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Load a video's segments and write them back out
    Save {
        /// Local video file path
        video: String,

        /// Output format (auto, edl, xml, both); defaults to the config value
        #[arg(short, long)]
        format: Option<SaveFormat>,

        /// Read only the EDL file
        #[arg(long, conflicts_with = "from_xml")]
        from_edl: bool,

        /// Read only the chapter XML file
        #[arg(long)]
        from_xml: bool,
    },

    /// Convert seconds to a timecode, or a timecode to seconds
    Timecode {
        /// `HH:MM:SS.mmm`, `MM:SS` or seconds
        value: String,
    },

    /// Manage the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Create the config file with defaults, or fill in missing keys
    Init,
    /// Print the effective settings
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ConfigManager::new(&cli.config);
    if !matches!(cli.command, Commands::Config { .. }) {
        config.load_if_present()?;
    }

    let mut level = config.settings().log_level();
    for _ in 0..cli.verbose {
        level = level.more_verbose();
    }
    let _log_guard = match &cli.log_dir {
        Some(dir) => Some(init_tracing_with_file(level, dir)),
        None => {
            init_tracing(level);
            None
        }
    };

    match cli.command {
        Commands::Show { video, json } => commands::show(config.settings(), &video, json),
        Commands::Save {
            video,
            format,
            from_edl,
            from_xml,
        } => {
            let source = if from_edl {
                commands::LoadFrom::Edl
            } else if from_xml {
                commands::LoadFrom::Xml
            } else {
                commands::LoadFrom::Any
            };
            commands::save(config.settings(), &video, format, source)
        }
        Commands::Timecode { value } => commands::timecode(&value),
        Commands::Config { action } => match action {
            ConfigAction::Init => commands::config_init(&mut config),
            ConfigAction::Show => commands::config_show(&mut config),
        },
    }
}
