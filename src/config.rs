//! Configuration types for dict-cracker
//!
//! This module defines:
//! - CLI argument parsing using clap derive macros
//! - Runtime configuration with validation

use crate::crack::producer::DEFAULT_BATCH_SIZE;
use crate::crack::queue::DEFAULT_QUEUE_SIZE;
use crate::error::ConfigError;
use clap::Parser;
use std::path::{Path, PathBuf};

/// Maximum reasonable thread count per pool
const MAX_WORKERS: usize = 512;

/// Minimum queue size
const MIN_QUEUE_SIZE: usize = 1;

/// Minimum batch size
const MIN_BATCH_SIZE: usize = 1;

/// Multi-threaded dictionary attack against a SHA-256 digest
#[derive(Parser, Debug, Clone)]
#[command(
    name = "dict-cracker",
    version,
    about = "Multi-threaded dictionary attack against a SHA-256 digest",
    long_about = "Streams words from a dictionary through a bounded queue to a pool of consumers.\n\n\
                  Each word is expanded into 88 candidates (i->!, l->1, o->0 substitutions, each\n\
                  with and without a trailing digit) and hashed with SHA-256. The first candidate\n\
                  matching the target digest is written to the output file.",
    after_help = "EXAMPLES:\n    \
        dict-cracker words.txt target.txt found.txt 2 8\n    \
        dict-cracker words.txt target.txt found.txt 4 4 --queue-size 50000 -q"
)]
pub struct CliArgs {
    /// Dictionary file (whitespace-delimited words)
    #[arg(value_name = "DICTIONARY")]
    pub dictionary: PathBuf,

    /// File holding the 64-character hex SHA-256 target
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// File to write the matching password to
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Number of producer threads
    #[arg(value_name = "PRODUCERS")]
    pub producers: usize,

    /// Number of consumer threads
    #[arg(value_name = "CONSUMERS")]
    pub consumers: usize,

    /// Shared queue capacity in words (controls memory usage)
    #[arg(long, default_value_t = DEFAULT_QUEUE_SIZE, value_name = "NUM")]
    pub queue_size: usize,

    /// Words each producer collects before pushing to the queue
    #[arg(short = 'b', long, default_value_t = DEFAULT_BATCH_SIZE, value_name = "NUM")]
    pub batch_size: usize,

    /// Quiet mode - suppress progress output
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose output (debug logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct CrackConfig {
    /// Dictionary file
    pub dictionary_path: PathBuf,

    /// Target digest file
    pub target_path: PathBuf,

    /// Result file
    pub output_path: PathBuf,

    /// Number of producer threads
    pub producer_count: usize,

    /// Number of consumer threads
    pub consumer_count: usize,

    /// Shared queue capacity
    pub queue_size: usize,

    /// Producer batch size
    pub batch_size: usize,

    /// Show progress indicator
    pub show_progress: bool,

    /// Verbose logging
    pub verbose: bool,
}

impl CrackConfig {
    /// Configuration with default queue and batch sizes, not yet validated
    pub fn new(
        dictionary_path: impl Into<PathBuf>,
        target_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        producer_count: usize,
        consumer_count: usize,
    ) -> Self {
        Self {
            dictionary_path: dictionary_path.into(),
            target_path: target_path.into(),
            output_path: output_path.into(),
            producer_count,
            consumer_count,
            queue_size: DEFAULT_QUEUE_SIZE,
            batch_size: DEFAULT_BATCH_SIZE,
            show_progress: false,
            verbose: false,
        }
    }

    /// Create and validate configuration from CLI arguments
    pub fn from_args(args: CliArgs) -> Result<Self, ConfigError> {
        let config = Self {
            dictionary_path: args.dictionary,
            target_path: args.target,
            output_path: args.output,
            producer_count: args.producers,
            consumer_count: args.consumers,
            queue_size: args.queue_size,
            batch_size: args.batch_size,
            show_progress: !args.quiet,
            verbose: args.verbose,
        };

        config.validate()?;
        Ok(config)
    }

    /// Check counts, sizes and paths
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_count("producer", self.producer_count)?;
        validate_count("consumer", self.consumer_count)?;

        if self.queue_size < MIN_QUEUE_SIZE {
            return Err(ConfigError::InvalidQueueSize {
                size: self.queue_size,
                min: MIN_QUEUE_SIZE,
            });
        }

        // A batch larger than the queue could never be inserted
        if self.batch_size < MIN_BATCH_SIZE || self.batch_size > self.queue_size {
            return Err(ConfigError::InvalidBatchSize {
                size: self.batch_size,
                min: MIN_BATCH_SIZE,
                max: self.queue_size,
            });
        }

        validate_input_file(&self.dictionary_path)?;
        validate_input_file(&self.target_path)?;

        if self.output_path.is_dir() {
            return Err(ConfigError::InvalidOutputPath {
                path: self.output_path.clone(),
                reason: "Path is a directory".to_string(),
            });
        }

        if let Some(parent) = self.output_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                return Err(ConfigError::InvalidOutputPath {
                    path: self.output_path.clone(),
                    reason: format!("Parent directory '{}' does not exist", parent.display()),
                });
            }
        }

        Ok(())
    }

    /// Total worker threads
    pub fn thread_count(&self) -> usize {
        self.producer_count + self.consumer_count
    }
}

fn validate_count(role: &'static str, count: usize) -> Result<(), ConfigError> {
    if count == 0 || count > MAX_WORKERS {
        return Err(ConfigError::InvalidWorkerCount {
            role,
            count,
            max: MAX_WORKERS,
        });
    }
    Ok(())
}

fn validate_input_file(path: &Path) -> Result<(), ConfigError> {
    if !path.exists() {
        return Err(ConfigError::InvalidInputPath {
            path: path.to_path_buf(),
            reason: "ensure file exists and entered correctly".to_string(),
        });
    }

    if !path.is_file() {
        return Err(ConfigError::InvalidInputPath {
            path: path.to_path_buf(),
            reason: "not a regular file".to_string(),
        });
    }

    Ok(())
}
