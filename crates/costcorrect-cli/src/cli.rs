//! CLI definition using clap

use clap::{Parser, Subcommand};
use costcorrect_types::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "costcorrect")]
#[command(version)]
#[command(about = "Brick Bill of Quantities for South African masonry walls")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vision backend to use (gemini)
    #[arg(long, global = true)]
    pub backend: Option<String>,

    /// Model name override
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Subscription tier (free, pro). Uses config value if not specified.
    #[arg(long, global = true)]
    pub tier: Option<String>,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute a BOQ from known wall lengths
    Calculate {
        /// Linear metres of 230 mm (double skin) walls
        #[arg(long = "walls-230", allow_negative_numbers = true)]
        walls_230: f64,

        /// Linear metres of 110 mm (single skin) walls
        #[arg(long = "walls-110", allow_negative_numbers = true, default_value = "0")]
        walls_110: f64,

        /// Wall height in metres. Uses the configured default if not specified.
        #[arg(long, allow_negative_numbers = true)]
        height: Option<f64>,

        /// Number of floors (Pro tier for more than one)
        #[arg(long, default_value = "1")]
        floors: u32,

        /// Include cost estimates (Pro tier)
        #[arg(long)]
        prices: bool,

        /// Drawing scale, informational only
        #[arg(long, default_value = "unknown")]
        scale: String,

        /// Name shown as the BOQ filename
        #[arg(long, default_value = "manual")]
        name: String,

        /// TOML file replacing the configured constants
        #[arg(long)]
        constants: Option<PathBuf>,
    },

    /// Compute a BOQ from a saved vision result
    FromJson {
        /// Path to the measurement JSON
        measurement: PathBuf,

        /// Wall height in metres. Uses the configured default if not specified.
        #[arg(long, allow_negative_numbers = true)]
        height: Option<f64>,

        /// Number of floors (Pro tier for more than one)
        #[arg(long, default_value = "1")]
        floors: u32,

        /// Include cost estimates (Pro tier)
        #[arg(long)]
        prices: bool,
    },

    /// Measure a floor plan with the vision model and compute its BOQ
    Analyze {
        /// Path to plan file (pdf, png, jpg, jpeg)
        plan: PathBuf,

        /// Number of floors (Pro tier for more than one)
        #[arg(long, default_value = "1")]
        floors: u32,

        /// Include cost estimates (Pro tier)
        #[arg(long)]
        prices: bool,

        /// Skip cache lookup (overrides config)
        #[arg(long)]
        no_cache: bool,

        /// Wall height in metres. Uses the configured default if not specified.
        #[arg(long, allow_negative_numbers = true)]
        height: Option<f64>,
    },

    /// Export a JSON BOQ to Excel
    Export {
        /// Path to BOQ JSON file (as printed by --format json)
        results: PathBuf,

        /// Output Excel file path
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set backend
        #[arg(long)]
        set_backend: Option<String>,

        /// Set model
        #[arg(long)]
        set_model: Option<String>,

        /// Enable/disable cache
        #[arg(long)]
        set_cache: Option<bool>,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Set subscription tier (free, pro)
        #[arg(long)]
        set_tier: Option<String>,

        /// Set constants TOML file
        #[arg(long)]
        set_constants: Option<PathBuf>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },

    /// Manage cache
    Cache {
        /// Clear all cache
        #[arg(long)]
        clear: bool,

        /// Show cache statistics
        #[arg(long)]
        stats: bool,
    },

    /// Show the effective brick constants
    Constants,
}
