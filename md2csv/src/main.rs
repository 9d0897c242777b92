//! md2csv - numbered markdown sections to CSV
//!
//! A CLI tool that converts RFC-style markdown documents into CSV, one row per
//! numbered section, with each section categorized by its parent section.

#![deny(unsafe_code)]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::all))]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::pedantic))]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(missing_docs))]
// Allow some pedantic lints that are too strict for this project
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

mod cli;
mod convert_config;
mod extractor;
mod pipeline;
mod sink;
mod source;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use cli::Cli;
use convert_config::ConvertConfig;
use pipeline::ConvertOptions;
use source::Input;

/// Main entry point for the md2csv CLI application
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}

/// Run the CLI application
fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    if cli.inputs.is_empty() {
        anyhow::bail!(
            "no input documents given\n\n{}",
            Cli::command().render_usage()
        );
    }

    let config = match &cli.config {
        Some(path) => ConvertConfig::load(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => ConvertConfig::default(),
    };

    let options = ConvertOptions {
        output_dir: config.output_dir(cli.output_dir.as_deref()),
        skip_list: config.skip_list(),
        progress: !cli.quiet,
    };

    for arg in &cli.inputs {
        handle_input(arg, &options)?;
    }

    Ok(())
}

/// Initialize logging from `RUST_LOG`, raised to info level when verbose
fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if verbose {
        builder.filter_level(log::LevelFilter::Info);
    }
    builder.init();
}

/// Convert a single command-line input
fn handle_input(arg: &str, options: &ConvertOptions) -> Result<()> {
    let input = Input::parse(arg);

    if options.progress {
        println!("Processing: {}", input);
    }

    let summary = pipeline::convert_input(&input, options)
        .with_context(|| format!("Failed to convert {}", input))?;

    log::info!(
        "Converted {} into {} ({} rows)",
        input,
        summary.output.display(),
        summary.rows
    );

    if options.progress {
        println!("Done with {}", input);
    }

    Ok(())
}
