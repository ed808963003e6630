//! dict-cracker - Multi-threaded SHA-256 Dictionary Attack
//!
//! Recovers a password from its SHA-256 digest by trying every word of a
//! dictionary together with a fixed set of leetspeak mutations.
//!
//! # Features
//!
//! - **Producer/Consumer Pipeline**: N producers feed a bounded circular
//!   queue, M consumers expand and hash words in parallel.
//!
//! - **Backpressure**: Producers block while the queue is full, so the number
//!   of words in flight never exceeds the queue capacity. The dictionary
//!   itself is loaded and validated in full before the run starts.
//!
//! - **Any Encoding**: Words are raw bytes; a wordlist with Latin-1 or other
//!   non-UTF-8 entries loads and hashes as-is.
//!
//! - **Cooperative Shutdown**: The first match (or exhaustion of the
//!   dictionary, or Ctrl-C) stops every thread without abandoning a blocked
//!   waiter.
//!
//! # Candidate Set
//!
//! Each word yields 88 candidates: the 8 combinations of the substitutions
//! `i->!`, `l->1`, `o->0`, then each of those followed by a digit 0-9.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐
//! │ dictionary   │     │ target file  │
//! └──────┬───────┘     └──────┬───────┘
//!        │ load + validate    │ decode hex
//!        ▼                    ▼
//! ┌─────────────────────────────────────────────┐
//! │              CrackCoordinator               │
//! │  producers ──► BoundedQueue ──► consumers   │
//! │         TerminationController               │
//! └──────────────────────┬──────────────────────┘
//!                        │ first match
//!                        ▼
//!                ┌──────────────┐
//!                │  FileSink    │
//!                │ (atomic)     │
//!                └──────────────┘
//! ```
//!
//! # Example
//!
//! ```bash
//! # 2 producers, 8 consumers
//! dict-cracker words.txt target.txt found.txt 2 8
//! ```

pub mod config;
pub mod crack;
pub mod dictionary;
pub mod error;
pub mod hash;
pub mod progress;

pub use config::{CliArgs, CrackConfig};
pub use crack::{CrackCoordinator, CrackProgress, CrackResult, TerminationController};
pub use dictionary::{Dictionary, Word};
pub use error::{CrackerError, Result};
pub use hash::{sha256, Digest};
