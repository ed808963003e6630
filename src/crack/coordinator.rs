//! Crack coordinator - orchestrates the producer/consumer run
//!
//! The coordinator is responsible for:
//! - Loading and validating the dictionary and target before any thread starts
//! - Creating the shared queue and termination controller
//! - Spawning producers and consumers and joining them
//! - Progress reporting
//! - Persisting the winning candidate

use crate::config::CrackConfig;
use crate::crack::consumer::{Consumer, ConsumerOutcome};
use crate::crack::matcher::Matcher;
use crate::crack::producer::{Producer, ProducerOutcome};
use crate::crack::queue::BoundedQueue;
use crate::crack::sink::{FileSink, ResultSink};
use crate::crack::termination::TerminationController;
use crate::dictionary::Dictionary;
use crate::error::{Result, WorkerError};
use crate::hash::Digest;
use chrono::{DateTime, Utc};
use std::borrow::Cow;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// How often the coordinator polls workers and refreshes progress
const CHECK_INTERVAL: Duration = Duration::from_millis(100);

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct CrackResult {
    /// Winning candidate bytes, if any
    pub found: Option<Vec<u8>>,

    /// Where the winner was written
    pub output_path: Option<PathBuf>,

    /// Words in the dictionary
    pub total_words: u64,

    /// Words pushed into the queue
    pub words_enqueued: u64,

    /// Words processed by consumers
    pub words_processed: u64,

    /// Candidates hashed
    pub variants_hashed: u64,

    /// Times a producer waited on a full queue
    pub producer_waits: u64,

    /// Times a consumer waited on an empty queue
    pub consumer_waits: u64,

    /// Time taken for the run
    pub duration: Duration,

    /// Whether the run finished on its own (vs was interrupted)
    pub completed: bool,
}

impl CrackResult {
    /// Check if a match was found
    pub fn is_found(&self) -> bool {
        self.found.is_some()
    }

    /// Winning candidate for display; invalid UTF-8 is replaced
    pub fn password(&self) -> Option<Cow<'_, str>> {
        self.found.as_deref().map(String::from_utf8_lossy)
    }
}

/// Coordinates the producer/consumer search
pub struct CrackCoordinator {
    /// Configuration
    config: Arc<CrackConfig>,

    /// Validated dictionary shared by producers
    dictionary: Arc<Dictionary>,

    /// Target matcher shared by consumers
    matcher: Matcher,

    /// Shared word queue
    queue: Arc<BoundedQueue>,

    /// Shutdown controller sharing the queue lock
    controller: TerminationController,

    /// Destination for the winner
    sink: Box<dyn ResultSink + Send>,

    /// Path reported for the written result
    output_path: PathBuf,

    /// Producer threads
    producers: Vec<Producer>,

    /// Consumer threads
    consumers: Vec<Consumer>,
}

impl CrackCoordinator {
    /// Load inputs and create a coordinator
    ///
    /// Dictionary and target errors surface here, before any thread starts.
    pub fn new(config: CrackConfig) -> Result<Self> {
        let dictionary = Dictionary::load(&config.dictionary_path)?;
        let target = Digest::load(&config.target_path)?;

        info!(
            words = dictionary.len(),
            target = %target,
            "Inputs loaded"
        );

        Ok(Self::with_parts(config, dictionary, target))
    }

    /// Create a coordinator from already loaded inputs
    pub fn with_parts(config: CrackConfig, dictionary: Dictionary, target: Digest) -> Self {
        let queue = Arc::new(BoundedQueue::new(config.queue_size, config.producer_count));
        let controller = TerminationController::new(Arc::clone(&queue));
        let output_path = config.output_path.clone();

        Self {
            sink: Box::new(FileSink::new(&output_path)),
            output_path,
            config: Arc::new(config),
            dictionary: Arc::new(dictionary),
            matcher: Matcher::new(target),
            queue,
            controller,
            producers: Vec::new(),
            consumers: Vec::new(),
        }
    }

    /// Replace the result sink
    pub fn with_sink(mut self, sink: impl ResultSink + Send + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Get a handle to the termination controller (for signal handlers)
    pub fn controller(&self) -> TerminationController {
        self.controller.clone()
    }

    /// Words in the loaded dictionary
    pub fn total_words(&self) -> usize {
        self.dictionary.len()
    }

    /// Size of the dictionary file in bytes
    pub fn dictionary_bytes(&self) -> u64 {
        self.dictionary.source_bytes()
    }

    /// Run the search
    pub fn run(self) -> Result<CrackResult> {
        self.run_with_progress(|_| {})
    }

    /// Run the search, calling `on_progress` periodically until workers finish
    pub fn run_with_progress<F>(mut self, mut on_progress: F) -> Result<CrackResult>
    where
        F: FnMut(&CrackProgress),
    {
        let start_time = Instant::now();
        let start_datetime: DateTime<Utc> = Utc::now();

        info!(
            producers = self.config.producer_count,
            consumers = self.config.consumer_count,
            queue_size = self.config.queue_size,
            batch_size = self.config.batch_size,
            "Starting dictionary search"
        );
        debug!(start_time = %start_datetime.to_rfc3339(), "Run started");

        let cores = num_cpus::get();
        if self.config.thread_count() > cores * 2 {
            warn!(
                threads = self.config.thread_count(),
                cores = cores,
                "Thread count is well above available cores"
            );
        }

        if let Err(e) = self.spawn_workers() {
            // Unblock whatever did start before reporting the failure
            self.controller.interrupt();
            let _ = self.join_workers();
            return Err(e.into());
        }

        self.wait_for_completion(start_time, &mut on_progress);
        on_progress(&self.progress(start_time));

        let (producer_outcomes, consumer_outcomes) = self.join_workers()?;

        let state = self.controller.snapshot();
        let found = state.found().map(<[u8]>::to_vec);

        let output_path = match &found {
            Some(candidate) => {
                self.sink.write(candidate)?;
                Some(self.output_path.clone())
            }
            None => None,
        };

        let duration = start_time.elapsed();
        let stats = self.queue.stats();

        let result = CrackResult {
            found,
            output_path,
            total_words: self.dictionary.len() as u64,
            words_enqueued: producer_outcomes
                .iter()
                .map(|o| o.words_enqueued as u64)
                .sum(),
            words_processed: consumer_outcomes.iter().map(|o| o.words_processed).sum(),
            variants_hashed: consumer_outcomes.iter().map(|o| o.variants_hashed).sum(),
            producer_waits: stats.backpressure_count(),
            consumer_waits: stats.starvation_count(),
            duration,
            completed: !state.interrupted(),
        };

        info!(
            found = result.is_found(),
            words = result.words_processed,
            variants = result.variants_hashed,
            duration_ms = duration.as_millis() as u64,
            "Search finished"
        );

        Ok(result)
    }

    /// Spawn producer and consumer threads
    fn spawn_workers(&mut self) -> std::result::Result<(), WorkerError> {
        for id in 0..self.config.producer_count {
            let producer = Producer::spawn(
                id,
                Arc::clone(&self.dictionary),
                Arc::clone(&self.queue),
                self.controller.clone(),
                self.config.batch_size,
            )?;
            self.producers.push(producer);
        }

        for id in 0..self.config.consumer_count {
            let consumer = Consumer::spawn(
                id,
                Arc::clone(&self.queue),
                self.controller.clone(),
                self.matcher,
            )?;
            self.consumers.push(consumer);
        }

        info!(
            producers = self.producers.len(),
            consumers = self.consumers.len(),
            "Workers spawned"
        );
        Ok(())
    }

    /// Poll until every worker thread has exited
    fn wait_for_completion<F>(&self, start_time: Instant, on_progress: &mut F)
    where
        F: FnMut(&CrackProgress),
    {
        loop {
            let all_done = self.producers.iter().all(Producer::is_finished)
                && self.consumers.iter().all(Consumer::is_finished);
            if all_done {
                return;
            }

            on_progress(&self.progress(start_time));
            thread::sleep(CHECK_INTERVAL);
        }
    }

    /// Join all worker threads and collect their outcomes
    ///
    /// Every thread is joined even if one failed; the first failure is
    /// returned.
    fn join_workers(&mut self) -> Result<(Vec<ProducerOutcome>, Vec<ConsumerOutcome>)> {
        let mut first_error: Option<WorkerError> = None;
        let mut producer_outcomes = Vec::with_capacity(self.producers.len());
        let mut consumer_outcomes = Vec::with_capacity(self.consumers.len());

        for producer in std::mem::take(&mut self.producers) {
            match producer.join() {
                Ok(outcome) => producer_outcomes.push(outcome),
                Err(e) => {
                    warn!(error = %e, "Producer failed");
                    first_error.get_or_insert(e);
                }
            }
        }

        for consumer in std::mem::take(&mut self.consumers) {
            match consumer.join() {
                Ok(outcome) => consumer_outcomes.push(outcome),
                Err(e) => {
                    warn!(error = %e, "Consumer failed");
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e.into()),
            None => Ok((producer_outcomes, consumer_outcomes)),
        }
    }

    /// Snapshot of run progress
    fn progress(&self, start_time: Instant) -> CrackProgress {
        let (words, variants) = self.consumers.iter().fold((0, 0), |(w, v), c| {
            (
                w + c.stats().words_processed.load(Ordering::Relaxed),
                v + c.stats().variants_hashed.load(Ordering::Relaxed),
            )
        });
        let state = self.controller.snapshot();

        CrackProgress {
            words_processed: words,
            variants_hashed: variants,
            total_words: self.dictionary.len() as u64,
            queue_len: self.queue.len(),
            queue_capacity: self.queue.capacity(),
            producers_finished: state.producers_finished(),
            total_producers: state.total_producers(),
            elapsed: start_time.elapsed(),
        }
    }
}

/// Progress information for display
#[derive(Debug, Clone)]
pub struct CrackProgress {
    /// Words processed by consumers
    pub words_processed: u64,

    /// Candidates hashed
    pub variants_hashed: u64,

    /// Words in the dictionary
    pub total_words: u64,

    /// Current queue depth
    pub queue_len: usize,

    /// Queue capacity
    pub queue_capacity: usize,

    /// Producers that have finished
    pub producers_finished: usize,

    /// Total producers
    pub total_producers: usize,

    /// Elapsed time
    pub elapsed: Duration,
}

impl CrackProgress {
    /// Calculate words per second rate
    pub fn words_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.words_processed as f64 / secs
        } else {
            0.0
        }
    }

    /// Calculate hashes per second rate
    pub fn hashes_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.variants_hashed as f64 / secs
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::Word;
    use crate::error::{CrackerError, SinkError};
    use crate::hash::sha256;
    use parking_lot::Mutex;

    /// Records every write, for checking the sink is used at most once
    #[derive(Clone, Default)]
    struct MemorySink {
        writes: Arc<Mutex<Vec<Vec<u8>>>>,
    }

    impl ResultSink for MemorySink {
        fn write(&self, candidate: &[u8]) -> std::result::Result<(), SinkError> {
            self.writes.lock().push(candidate.to_vec());
            Ok(())
        }
    }

    struct FailingSink;

    impl ResultSink for FailingSink {
        fn write(&self, _candidate: &[u8]) -> std::result::Result<(), SinkError> {
            Err(SinkError::WriteFailed {
                path: PathBuf::from("/nowhere"),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            })
        }
    }

    fn dictionary(names: &[&str]) -> Dictionary {
        Dictionary::from_words(names.iter().map(|n| Word::new(*n).unwrap()).collect())
    }

    fn config(producers: usize, consumers: usize) -> CrackConfig {
        let mut config = CrackConfig::new("dict", "target", "out", producers, consumers);
        config.queue_size = 8;
        config.batch_size = 2;
        config
    }

    #[test]
    fn test_run_finds_match_and_writes_once() {
        let sink = MemorySink::default();
        let coordinator = CrackCoordinator::with_parts(
            config(2, 3),
            dictionary(&["alpha", "beta", "hello", "world", "gamma"]),
            sha256(b"w0rld"),
        )
        .with_sink(sink.clone());

        let result = coordinator.run().unwrap();

        assert_eq!(result.found.as_deref(), Some(&b"w0rld"[..]));
        assert_eq!(result.password().as_deref(), Some("w0rld"));
        assert_eq!(result.output_path, Some(PathBuf::from("out")));
        assert!(result.completed);
        assert_eq!(*sink.writes.lock(), vec![b"w0rld".to_vec()]);
    }

    #[test]
    fn test_run_with_non_utf8_words() {
        let sink = MemorySink::default();
        let dictionary = Dictionary::parse(b"caf\xE9 na\xEFve world").unwrap();
        let coordinator = CrackCoordinator::with_parts(config(1, 2), dictionary, sha256(b"na\xEFv3"))
            .with_sink(sink.clone());

        let result = coordinator.run().unwrap();

        // No candidate of the target's stem exists, so the run exhausts
        assert!(!result.is_found());
        assert_eq!(result.words_processed, 3);
        assert!(sink.writes.lock().is_empty());
    }

    #[test]
    fn test_run_finds_non_utf8_winner() {
        let sink = MemorySink::default();
        let dictionary = Dictionary::parse(b"world caf\xE9").unwrap();
        let coordinator = CrackCoordinator::with_parts(config(1, 1), dictionary, sha256(b"caf\xE97"))
            .with_sink(sink.clone());

        let result = coordinator.run().unwrap();

        assert_eq!(result.found.as_deref(), Some(&b"caf\xE97"[..]));
        assert_eq!(result.password().as_deref(), Some("caf\u{FFFD}7"));
        assert_eq!(*sink.writes.lock(), vec![b"caf\xE97".to_vec()]);
    }

    #[test]
    fn test_run_without_match_skips_sink() {
        let sink = MemorySink::default();
        let coordinator =
            CrackCoordinator::with_parts(config(1, 2), dictionary(&["abc"]), sha256(b"zzz"))
                .with_sink(sink.clone());

        let result = coordinator.run().unwrap();

        assert!(!result.is_found());
        assert!(result.output_path.is_none());
        assert_eq!(result.words_processed, 1);
        assert_eq!(result.variants_hashed, 88);
        assert!(sink.writes.lock().is_empty());
    }

    #[test]
    fn test_sink_failure_is_fatal() {
        let coordinator =
            CrackCoordinator::with_parts(config(1, 1), dictionary(&["abc"]), sha256(b"abc"))
                .with_sink(FailingSink);

        let err = coordinator.run().unwrap_err();
        assert!(matches!(err, CrackerError::Sink(_)));
    }

    #[test]
    fn test_interrupt_before_run() {
        let coordinator = CrackCoordinator::with_parts(
            config(2, 2),
            dictionary(&["one", "two", "three"]),
            sha256(b"nothing"),
        );
        coordinator.controller().interrupt();

        let result = coordinator.run().unwrap();
        assert!(!result.completed);
        assert!(!result.is_found());
        assert_eq!(result.words_processed, 0);
    }

    #[test]
    fn test_progress_reported() {
        let mut last = None;
        let coordinator = CrackCoordinator::with_parts(
            config(1, 1),
            dictionary(&["a", "b", "c"]),
            sha256(b"nothing"),
        );

        coordinator
            .run_with_progress(|p| last = Some(p.clone()))
            .unwrap();

        let last = last.expect("progress callback never ran");
        assert_eq!(last.words_processed, 3);
        assert_eq!(last.total_words, 3);
        assert_eq!(last.producers_finished, 1);
        assert_eq!(last.queue_len, 0);
    }

    #[test]
    fn test_progress_rates() {
        let progress = CrackProgress {
            words_processed: 1000,
            variants_hashed: 88_000,
            total_words: 5000,
            queue_len: 10,
            queue_capacity: 100,
            producers_finished: 1,
            total_producers: 2,
            elapsed: Duration::from_secs(10),
        };

        assert!((progress.words_per_second() - 100.0).abs() < 0.1);
        assert!((progress.hashes_per_second() - 8800.0).abs() < 0.1);
    }
}
