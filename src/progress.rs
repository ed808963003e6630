//! Progress reporting for the search
//!
//! Provides a live spinner using indicatif and the start/end banners.

use crate::crack::{CrackProgress, CrackResult};
use console::style;
use humansize::{format_size, BINARY};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress reporter that displays search status
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();

        let spinner = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
        bar.set_style(spinner);

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Update the progress display
    pub fn update(&self, progress: &CrackProgress) {
        let msg = format!(
            "Words: {}/{} ({:.0}/s) | Hashes: {} ({:.0}/s) | Queue: {}/{} | Producers done: {}/{}",
            format_number(progress.words_processed),
            format_number(progress.total_words),
            progress.words_per_second(),
            format_number(progress.variants_hashed),
            progress.hashes_per_second(),
            progress.queue_len,
            progress.queue_capacity,
            progress.producers_finished,
            progress.total_producers,
        );

        self.bar.set_message(msg);
    }

    /// Set a status message
    pub fn set_status(&self, status: &str) {
        self.bar.set_message(status.to_string());
    }

    /// Finish the progress display with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a number with thousands separators
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let bytes: Vec<_> = s.bytes().rev().collect();

    let chunks: Vec<String> = bytes
        .chunks(3)
        .map(|chunk| chunk.iter().rev().map(|&b| b as char).collect::<String>())
        .collect();

    chunks.into_iter().rev().collect::<Vec<_>>().join(",")
}

/// Print a summary of the run
pub fn print_summary(result: &CrackResult) {
    let duration_secs = result.duration.as_secs_f64();
    let rate = if duration_secs > 0.0 {
        result.variants_hashed as f64 / duration_secs
    } else {
        0.0
    };

    let title = if !result.completed {
        style("Search Interrupted").yellow().bold()
    } else if result.is_found() {
        style("Search Complete").green().bold()
    } else {
        style("Search Exhausted").yellow().bold()
    };

    println!();
    println!("{}", title);
    println!("{}", style("─".repeat(50)).dim());
    println!(
        "  {} {} of {}",
        style("Words:").bold(),
        format_number(result.words_processed),
        format_number(result.total_words)
    );
    println!(
        "  {} {}",
        style("Hashes:").bold(),
        format_number(result.variants_hashed)
    );
    println!(
        "  {} {:.1}s ({:.0} hashes/sec)",
        style("Duration:").bold(),
        duration_secs,
        rate
    );
    if result.producer_waits > 0 || result.consumer_waits > 0 {
        println!(
            "  {} producers {} / consumers {}",
            style("Queue waits:").bold(),
            format_number(result.producer_waits),
            format_number(result.consumer_waits)
        );
    }
    if let Some(path) = &result.output_path {
        println!("  {} {}", style("Output:").bold(), path.display());
    }
    println!();
}

/// Print a header at the start of the run
pub fn print_header(
    dictionary: &str,
    dictionary_bytes: u64,
    words: usize,
    producers: usize,
    consumers: usize,
    output: &str,
) {
    println!();
    println!(
        "{} {}",
        style("dict-cracker").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("{}", style("─".repeat(50)).dim());
    println!(
        "  {} {} ({}, {} words)",
        style("Dictionary:").bold(),
        dictionary,
        format_size(dictionary_bytes, BINARY),
        format_number(words as u64)
    );
    println!("  {} {}", style("Producers:").bold(), producers);
    println!("  {} {}", style("Consumers:").bold(), consumers);
    println!("  {} {}", style("Output:").bold(), output);
    println!();
}
