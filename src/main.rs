//! dict-cracker - Multi-threaded SHA-256 Dictionary Attack
//!
//! Entry point for the CLI application.

use anyhow::{Context, Result};
use clap::Parser;
use dict_cracker::config::{CliArgs, CrackConfig};
use dict_cracker::crack::CrackCoordinator;
use dict_cracker::progress::{print_header, print_summary, ProgressReporter};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    // Parse CLI arguments
    let args = CliArgs::parse();

    // Setup logging
    setup_logging(args.verbose)?;

    // Validate and create config
    let config = CrackConfig::from_args(args).context("Invalid configuration")?;

    // Load inputs before any thread starts
    let coordinator =
        CrackCoordinator::new(config.clone()).context("Failed to load search inputs")?;

    if config.show_progress {
        print_header(
            &config.dictionary_path.display().to_string(),
            coordinator.dictionary_bytes(),
            coordinator.total_words(),
            config.producer_count,
            config.consumer_count,
            &config.output_path.display().to_string(),
        );
    }

    // Setup signal handler for graceful shutdown
    let controller = coordinator.controller();
    ctrlc::set_handler(move || {
        eprintln!("\nInterrupt received, shutting down...");
        controller.interrupt();
    })
    .context("Failed to set signal handler")?;

    // Create progress reporter
    let progress = if config.show_progress {
        Some(ProgressReporter::new())
    } else {
        None
    };

    if let Some(ref p) = progress {
        p.set_status("Starting workers...");
    }

    // Run the search
    let result = coordinator
        .run_with_progress(|snapshot| {
            if let Some(ref p) = progress {
                p.update(snapshot);
            }
        })
        .context("Search failed")?;

    // Finish progress
    if let Some(ref p) = progress {
        if !result.completed {
            p.finish("Search interrupted");
        } else if result.is_found() {
            p.finish("Match found");
        } else {
            p.finish("Dictionary exhausted");
        }
    }

    if config.show_progress {
        print_summary(&result);
    }

    match (result.password(), &result.output_path) {
        (Some(password), Some(path)) => {
            println!(
                "Password found: {} (written to {})",
                password,
                path.display()
            );
        }
        _ if !result.completed => {
            info!("Search was interrupted before completion");
            println!("Search interrupted; no password match found");
        }
        _ => println!("No password match found"),
    }

    Ok(())
}

fn setup_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("dict_cracker=debug,warn")
    } else {
        EnvFilter::new("dict_cracker=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}
