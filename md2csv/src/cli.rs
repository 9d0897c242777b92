//! Command-line interface definitions for md2csv

use clap::Parser;
use std::path::PathBuf;

/// CLI structure for the md2csv application
#[derive(Parser, Debug)]
#[command(name = "md2csv")]
#[command(version)]
#[command(about = "Convert numbered markdown documents to CSV", long_about = None)]
pub struct Cli {
    /// Markdown documents to convert: local file paths or http(s) URLs
    #[arg(value_name = "INPUT")]
    pub inputs: Vec<String>,

    /// Directory for the CSV files (defaults to the current directory)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
