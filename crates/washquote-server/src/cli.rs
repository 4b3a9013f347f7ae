//! CLI definition using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use washquote_types::OutputFormat;

#[derive(Parser)]
#[command(name = "washquote")]
#[command(author = "yuuji")]
#[command(version)]
#[command(about = "Exterior cleaning quotes from property photos using AI image analysis")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vision model override (e.g., gpt-4o, gpt-4o-mini)
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve {
        /// Listen address (e.g., 0.0.0.0:3000). Uses config value if not specified.
        #[arg(long, short = 'b')]
        bind: Option<String>,
    },

    /// Estimate a quote from local photos
    Estimate {
        /// Image files to analyze
        #[arg(required = true)]
        images: Vec<PathBuf>,

        /// Service type (house, windows, roof, driveway, gutters)
        #[arg(long, short = 's', default_value = "house")]
        service: String,
    },

    /// Price a job from known measurements, without AI analysis
    Quote {
        /// Cleanable area in square feet
        #[arg(long, short = 'a')]
        area: f64,

        /// Job complexity from 1 to 5
        #[arg(long, short = 'c', default_value_t = 2.5)]
        complexity: f64,

        /// Service type (house, windows, roof, driveway, gutters)
        #[arg(long, short = 's', default_value = "house")]
        service: String,
    },

    /// Show current configuration
    Config,
}
