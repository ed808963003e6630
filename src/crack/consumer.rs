//! Consumer threads
//!
//! Each consumer:
//! - Pulls one word at a time from the bounded queue
//! - Expands it into its fixed candidate set
//! - Hashes every candidate in order and compares it with the target
//! - Reports the first hit to the termination controller and exits
//!
//! Expansion and hashing happen outside the queue lock.

use crate::crack::expand::expand;
use crate::crack::matcher::Matcher;
use crate::crack::queue::{BoundedQueue, Dequeued};
use crate::crack::termination::TerminationController;
use crate::error::WorkerError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, trace};

/// Statistics collected by a consumer
#[derive(Debug, Default)]
pub struct WorkerStats {
    /// Dictionary words processed
    pub words_processed: AtomicU64,

    /// Candidates hashed
    pub variants_hashed: AtomicU64,
}

impl WorkerStats {
    fn record_word(&self) {
        self.words_processed.fetch_add(1, Ordering::Relaxed);
    }

    fn record_variants(&self, count: u64) {
        self.variants_hashed.fetch_add(count, Ordering::Relaxed);
    }
}

/// What a consumer did before exiting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsumerOutcome {
    /// Words taken from the queue
    pub words_processed: u64,

    /// Candidates hashed
    pub variants_hashed: u64,

    /// This consumer's report was the one kept
    pub won: bool,
}

/// Interrupts the run if the consumer unwinds, so producers blocked on a full
/// queue are not left waiting for a consumer that is gone
struct PanicGuard<'a> {
    controller: &'a TerminationController,
}

impl Drop for PanicGuard<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.controller.interrupt();
        }
    }
}

/// A consumer thread draining the bounded queue
pub struct Consumer {
    /// Consumer ID
    id: usize,

    /// Thread handle
    handle: Option<JoinHandle<ConsumerOutcome>>,

    /// Consumer statistics
    stats: Arc<WorkerStats>,
}

impl Consumer {
    /// Spawn a new consumer thread
    pub fn spawn(
        id: usize,
        queue: Arc<BoundedQueue>,
        controller: TerminationController,
        matcher: Matcher,
    ) -> Result<Self, WorkerError> {
        let stats = Arc::new(WorkerStats::default());
        let stats_clone = Arc::clone(&stats);

        let handle = thread::Builder::new()
            .name(format!("consumer-{}", id))
            .spawn(move || run_consumer(id, &queue, &controller, &matcher, &stats_clone))
            .map_err(|e| WorkerError::SpawnFailed {
                role: "consumer",
                id,
                reason: e.to_string(),
            })?;

        Ok(Self {
            id,
            handle: Some(handle),
            stats,
        })
    }

    /// Get consumer ID
    pub fn id(&self) -> usize {
        self.id
    }

    /// Get consumer statistics
    pub fn stats(&self) -> &WorkerStats {
        &self.stats
    }

    /// Check if the thread has exited
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Wait for the consumer to finish
    pub fn join(mut self) -> Result<ConsumerOutcome, WorkerError> {
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| WorkerError::Panicked {
                role: "consumer",
                id: self.id,
                message: "Consumer thread panicked".into(),
            }),
            None => Ok(ConsumerOutcome::default()),
        }
    }
}

/// Consumer body; runs on the calling thread
pub fn run_consumer(
    id: usize,
    queue: &BoundedQueue,
    controller: &TerminationController,
    matcher: &Matcher,
    stats: &WorkerStats,
) -> ConsumerOutcome {
    let _guard = PanicGuard { controller };
    let mut outcome = ConsumerOutcome::default();

    debug!(consumer = id, "Consumer starting");

    loop {
        // Fetching
        let word = match queue.dequeue_one() {
            Dequeued::Word(word) => word,
            Dequeued::EndOfWork => break,
        };

        // Processing
        let variants = expand(word.as_bytes());
        let hit = matcher.find(&variants);
        let hashed = hit.map_or(variants.len(), |(index, _)| index + 1) as u64;

        stats.record_word();
        stats.record_variants(hashed);
        outcome.words_processed += 1;
        outcome.variants_hashed += hashed;

        // Reporting
        if let Some((_, candidate)) = hit {
            outcome.won = controller.report_match(candidate);
            trace!(consumer = id, won = outcome.won, "Reported match");
            break;
        }
    }

    debug!(
        consumer = id,
        words = outcome.words_processed,
        won = outcome.won,
        "Consumer finished"
    );

    outcome
}
