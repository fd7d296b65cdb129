use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sea-temps")]
#[command(about = "Collect sea-water temperatures and plot per-station time series")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Hide progress output")]
    pub quiet: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(long, global = true, help = "Settings file [default: ./sea-temps.toml if present]")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Store CSV path (overrides settings)")]
    pub store: Option<PathBuf>,

    #[arg(long, global = true, help = "Fail on unreadable store rows instead of skipping them")]
    pub strict: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch today's snapshot and append it to the store
    Ingest {
        #[arg(long, help = "Read the snapshot from a saved HTML page instead of fetching")]
        source_file: Option<PathBuf>,

        #[arg(long, help = "Observation date (YYYY-MM-DD) [default: today]")]
        date: Option<NaiveDate>,

        #[arg(long, help = "Source page URL (overrides settings)")]
        url: Option<String>,

        #[arg(long, help = "Parse and report without writing to the store")]
        dry_run: bool,
    },

    /// Render per-station charts from the store
    Plot {
        #[command(flatten)]
        target: PlotTarget,

        #[arg(short, long, help = "Chart output directory (overrides settings)")]
        output_dir: Option<PathBuf>,
    },

    /// List stations with observation counts and merged labels
    Stations,

    /// Print one station's series
    Show {
        #[arg(short, long)]
        station: String,

        #[arg(long, help = "Emit JSON instead of a table")]
        json: bool,

        #[arg(long, default_value = "0", help = "Show only the last N points (0 = all)")]
        limit: usize,
    },
}

#[derive(Args)]
#[group(multiple = false)]
pub struct PlotTarget {
    #[arg(long, help = "Plot every station")]
    pub all: bool,

    #[arg(short, long, help = "Name of one station to plot (e.g. 'Dubrovnik')")]
    pub station: Option<String>,
}
