//! Command-line parsing for the cafe data aligner.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the alignment/session code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "cafe", version, about = "Cafe activity stream aligner")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load all four streams, then write every joined dataset and both
    /// model-search scripts.
    Build(BuildArgs),
    /// Load only the point-of-sale stream and write the per-visit dataset.
    Visits(BuildArgs),
    /// Write the R model-search scripts without loading any data.
    Scripts(ScriptArgs),
}

/// Common options for data-loading commands.
#[derive(Debug, Parser, Clone)]
pub struct BuildArgs {
    /// Directory containing the input csv files.
    #[arg(long, default_value = ".")]
    pub data_dir: PathBuf,

    /// Weather csv path (default: <data-dir>/weatherData.csv).
    #[arg(long)]
    pub weather: Option<PathBuf>,

    /// Gates csv path (default: <data-dir>/gatesData.csv).
    #[arg(long)]
    pub gates: Option<PathBuf>,

    /// Views csv path (default: <data-dir>/viewsData.csv).
    #[arg(long)]
    pub views: Option<PathBuf>,

    /// Point-of-sale csv path (default: <data-dir>/PointOfSaleSimulation.csv).
    #[arg(long)]
    pub pos: Option<PathBuf>,

    /// Directory where the output files are written.
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Also write the load summary as JSON to this path.
    #[arg(long)]
    pub summary_json: Option<PathBuf>,
}

/// Options for script generation.
#[derive(Debug, Parser, Clone)]
pub struct ScriptArgs {
    /// Directory where the generated scripts are written.
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,
}
