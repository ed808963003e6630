//! Error types for dict-cracker
//!
//! This module defines the error hierarchy for a cracking run:
//! - Configuration and CLI errors
//! - Input errors (dictionary and target files)
//! - Bounded queue misuse
//! - Worker thread errors
//! - Result sink errors
//!
//! Every variant is terminal for the run. Nothing in the core retries.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for the dict-cracker application
#[derive(Error, Debug)]
pub enum CrackerError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Dictionary or target file errors
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// Worker/concurrency errors
    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),

    /// Result sink errors
    #[error("Output error: {0}")]
    Sink(#[from] SinkError),
}

/// Configuration and CLI errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid producer or consumer count
    #[error("Invalid {role} count {count}: must be between 1 and {max}")]
    InvalidWorkerCount {
        role: &'static str,
        count: usize,
        max: usize,
    },

    /// Invalid queue size
    #[error("Invalid queue size {size}: must be at least {min}")]
    InvalidQueueSize { size: usize, min: usize },

    /// Invalid batch size
    #[error("Invalid batch size {size}: must be between {min} and {max}")]
    InvalidBatchSize { size: usize, min: usize, max: usize },

    /// Input file missing or not a regular file
    #[error("'{path}' is an invalid file: {reason}")]
    InvalidInputPath { path: PathBuf, reason: String },

    /// Output path error
    #[error("Invalid output path '{path}': {reason}")]
    InvalidOutputPath { path: PathBuf, reason: String },
}

/// Dictionary and target parsing errors
#[derive(Error, Debug)]
pub enum InputError {
    /// Failed to read an input file
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Word exceeds the fixed word length
    #[error("Word '{prefix}...' is {len} bytes long, maximum is {max}")]
    WordTooLong { prefix: String, len: usize, max: usize },

    /// Word is empty or contains whitespace
    #[error("Invalid word '{word}': must be non-empty and contain no whitespace")]
    InvalidWord { word: String },

    /// A dictionary token failed validation
    #[error("Dictionary token {index}: {source}")]
    InvalidToken {
        index: usize,
        #[source]
        source: Box<InputError>,
    },

    /// Target file holds no hash value
    #[error("Failed to read hash value from '{path}'")]
    MissingTarget { path: PathBuf },

    /// Target value is not a 64-character hex string
    #[error("Invalid target digest '{value}': {reason}")]
    InvalidDigest { value: String, reason: String },
}

/// Bounded queue errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    /// A batch that can never fit would block its producer forever
    #[error("Batch of {len} words exceeds queue capacity {capacity}")]
    BatchTooLarge { len: usize, capacity: usize },
}

/// Worker thread errors
#[derive(Error, Debug)]
pub enum WorkerError {
    /// Worker panicked
    #[error("{role} {id} panicked: {message}")]
    Panicked {
        role: &'static str,
        id: usize,
        message: String,
    },

    /// Worker thread could not be spawned
    #[error("Failed to spawn {role} {id}: {reason}")]
    SpawnFailed {
        role: &'static str,
        id: usize,
        reason: String,
    },

    /// Producer hit a queue error
    #[error("Producer {id} queue error: {source}")]
    Queue { id: usize, source: QueueError },
}

/// Result sink errors
#[derive(Error, Debug)]
pub enum SinkError {
    /// Failed to create or write the temporary file
    #[error("Failed to write result to '{path}': {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to move the temporary file into place
    #[error("Failed to persist result to '{path}': {source}")]
    PersistFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for CrackerError
pub type Result<T> = std::result::Result<T, CrackerError>;

/// Result type alias for InputError
pub type InputResult<T> = std::result::Result<T, InputError>;
