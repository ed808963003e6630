//! Producer threads
//!
//! Each producer:
//! - Pulls tokens from the shared dictionary into a local batch
//! - Pushes full (or final partial) batches into the bounded queue
//! - Reports completion to the termination controller exactly once
//!
//! State machine:
//!
//! ```text
//! Reading --batch full / end of input--> Flushing --enqueued--> Reading
//!    |                                      |
//!    +--cancelled--> Done <--terminated-----+ (or end of input)
//! ```

use crate::crack::queue::{BoundedQueue, EnqueueOutcome};
use crate::crack::termination::TerminationController;
use crate::dictionary::{Dictionary, Word};
use crate::error::WorkerError;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, trace};

/// Default number of words per local batch
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// What a producer did before exiting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProducerOutcome {
    /// Words pushed into the queue
    pub words_enqueued: usize,

    /// Batches pushed into the queue
    pub batches: usize,

    /// Stopped because the run was cancelled, not because input ran out
    pub stopped_early: bool,
}

/// Producer state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Reading,
    Flushing { end_of_input: bool },
    Done,
}

/// Why the reading phase stopped
enum ReadStop {
    BatchFull,
    EndOfInput,
    Cancelled,
}

/// Reports completion on drop, so a failing or panicking producer cannot
/// leave consumers waiting for input that never comes
struct DoneGuard<'a> {
    controller: &'a TerminationController,
}

impl Drop for DoneGuard<'_> {
    fn drop(&mut self) {
        self.controller.report_producer_done();
    }
}

/// A producer thread feeding the bounded queue
pub struct Producer {
    /// Producer ID
    id: usize,

    /// Thread handle
    handle: Option<JoinHandle<Result<ProducerOutcome, WorkerError>>>,
}

impl Producer {
    /// Spawn a new producer thread
    pub fn spawn(
        id: usize,
        dictionary: Arc<Dictionary>,
        queue: Arc<BoundedQueue>,
        controller: TerminationController,
        batch_size: usize,
    ) -> Result<Self, WorkerError> {
        let handle = thread::Builder::new()
            .name(format!("producer-{}", id))
            .spawn(move || run_producer(id, &dictionary, &queue, &controller, batch_size))
            .map_err(|e| WorkerError::SpawnFailed {
                role: "producer",
                id,
                reason: e.to_string(),
            })?;

        Ok(Self {
            id,
            handle: Some(handle),
        })
    }

    /// Get producer ID
    pub fn id(&self) -> usize {
        self.id
    }

    /// Check if the thread has exited
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Wait for the producer to finish
    pub fn join(mut self) -> Result<ProducerOutcome, WorkerError> {
        match self.handle.take() {
            Some(handle) => handle.join().unwrap_or_else(|_| {
                Err(WorkerError::Panicked {
                    role: "producer",
                    id: self.id,
                    message: "Producer thread panicked".into(),
                })
            }),
            None => Ok(ProducerOutcome::default()),
        }
    }
}

/// Producer body; runs on the calling thread
pub fn run_producer(
    id: usize,
    dictionary: &Dictionary,
    queue: &BoundedQueue,
    controller: &TerminationController,
    batch_size: usize,
) -> Result<ProducerOutcome, WorkerError> {
    let _done = DoneGuard { controller };
    let mut batch: Vec<Word> = Vec::with_capacity(batch_size);
    let mut outcome = ProducerOutcome::default();
    let mut state = State::Reading;

    debug!(producer = id, "Producer starting");

    while state != State::Done {
        state = match state {
            State::Reading => match read_batch(dictionary, controller, &mut batch, batch_size) {
                ReadStop::BatchFull => State::Flushing { end_of_input: false },
                ReadStop::EndOfInput if batch.is_empty() => State::Done,
                ReadStop::EndOfInput => State::Flushing { end_of_input: true },
                ReadStop::Cancelled => {
                    outcome.stopped_early = true;
                    State::Done
                }
            },
            State::Flushing { end_of_input } => match queue.enqueue_batch(&mut batch) {
                Ok(EnqueueOutcome::Enqueued(count)) => {
                    trace!(producer = id, words = count, "Batch enqueued");
                    outcome.words_enqueued += count;
                    outcome.batches += 1;
                    if end_of_input {
                        State::Done
                    } else {
                        State::Reading
                    }
                }
                Ok(EnqueueOutcome::Terminated) => {
                    outcome.stopped_early = true;
                    State::Done
                }
                Err(source) => return Err(WorkerError::Queue { id, source }),
            },
            State::Done => State::Done,
        };
    }

    debug!(
        producer = id,
        words = outcome.words_enqueued,
        stopped_early = outcome.stopped_early,
        "Producer finished"
    );

    Ok(outcome)
}

/// Fill `batch` from the dictionary until full, exhausted or cancelled
fn read_batch(
    dictionary: &Dictionary,
    controller: &TerminationController,
    batch: &mut Vec<Word>,
    batch_size: usize,
) -> ReadStop {
    while batch.len() < batch_size {
        if controller.is_cancelled() {
            return ReadStop::Cancelled;
        }

        match dictionary.next_token() {
            Some(word) => batch.push(word),
            None => return ReadStop::EndOfInput,
        }
    }

    ReadStop::BatchFull
}
