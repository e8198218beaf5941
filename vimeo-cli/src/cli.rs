use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use vimeo_hls::ManifestKind;

#[derive(Parser, Debug)]
#[command(
    name = "vimeo-dl",
    author,
    version,
    about = "Turn Vimeo stream manifests into offline HLS playlists",
    long_about = None
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the configuration file
    #[arg(short, long, global = true, env = "VIMEO_DL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds, 0 disables it (overrides the config file)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate HLS playlists from a JSON manifest URL
    Generate {
        /// URL of the JSON manifest (playlist.json / master.json)
        #[arg(short, long)]
        url: String,

        /// Directory receiving the playlists and init segments
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Comment written into every playlist
        #[arg(long)]
        comment: Option<String>,

        /// Output format of the run summary
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },

    /// Resolve a video id or page URL to its manifest URL
    Resolve {
        /// Numeric video id or vimeo.com URL
        #[arg(short, long)]
        id: String,

        /// Manifest kind to look up (defaults to the config file value)
        #[arg(short, long)]
        kind: Option<ManifestKind>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },

    /// Resolve a video's JSON manifest and generate its playlists
    Download {
        /// Numeric video id or vimeo.com URL
        #[arg(short, long)]
        id: String,

        /// Directory receiving the playlists and init segments
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Comment written into every playlist
        #[arg(long)]
        comment: Option<String>,

        /// Output format of the run summary
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },

    /// Show or reset the configuration file
    Config {
        /// Print the effective configuration
        #[arg(long)]
        show: bool,

        /// Overwrite the configuration file with defaults
        #[arg(long, conflicts_with = "show")]
        reset: bool,
    },

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Commands {
    /// Output format requested by commands that print a result.
    pub fn output_format(&self) -> Option<OutputFormat> {
        match self {
            Commands::Generate { format, .. }
            | Commands::Resolve { format, .. }
            | Commands::Download { format, .. } => Some(*format),
            _ => None,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human readable
    Pretty,
    /// Pretty printed JSON
    Json,
    /// Single line JSON
    JsonCompact,
}

impl OutputFormat {
    pub fn is_json(&self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::JsonCompact)
    }
}
