//! Bounded word queue with backpressure
//!
//! A fixed-capacity circular buffer shared by every producer and consumer.
//! Producers block in [`BoundedQueue::enqueue_batch`] while the batch does not
//! fit; consumers block in [`BoundedQueue::dequeue_one`] while the buffer is
//! empty. The same mutex also guards the [`TerminationState`], so a blocking
//! decision never sees the slots and the termination flags out of step.
//!
//! Wake-up protocol:
//!
//! ```text
//! enqueue_batch        -> notify_all(not_empty)
//! dequeue_one          -> notify_one(not_full)
//! producer done (last) -> notify_all(not_empty)
//! match / interrupt    -> notify_all(not_empty) + notify_all(not_full)
//! ```

use crate::crack::termination::TerminationState;
use crate::dictionary::Word;
use crate::error::QueueError;
use parking_lot::{Condvar, Mutex, MutexGuard};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Default queue capacity in words
pub const DEFAULT_QUEUE_SIZE: usize = 10_000;

/// Statistics for the word queue
#[derive(Debug, Default)]
pub struct QueueStats {
    /// Total words enqueued
    pub enqueued: AtomicU64,

    /// Total words dequeued
    pub dequeued: AtomicU64,

    /// Number of times a producer had to wait for space
    pub producer_waits: AtomicU64,

    /// Number of times a consumer had to wait for a word
    pub consumer_waits: AtomicU64,
}

impl QueueStats {
    /// Get number of dequeued words
    pub fn throughput(&self) -> u64 {
        self.dequeued.load(Ordering::Relaxed)
    }

    /// Get number of producer backpressure waits
    pub fn backpressure_count(&self) -> u64 {
        self.producer_waits.load(Ordering::Relaxed)
    }

    /// Get number of consumer starvation waits
    pub fn starvation_count(&self) -> u64 {
        self.consumer_waits.load(Ordering::Relaxed)
    }
}

/// Result of a batch insert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    /// All words were inserted
    Enqueued(usize),

    /// The run was cancelled while waiting; nothing was inserted
    Terminated,
}

/// Result of a single remove
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dequeued {
    /// A word to process
    Word(Word),

    /// No more words will be handed out
    EndOfWork,
}

/// Everything guarded by the queue mutex
#[derive(Debug)]
pub(crate) struct SharedState {
    /// Circular slot storage; `None` marks a consumed slot
    slots: Vec<Option<Word>>,

    /// Index of the oldest unread word
    start: usize,

    /// Index of the next free slot
    end: usize,

    /// Number of unread words
    count: usize,

    /// Shutdown bookkeeping
    pub(crate) termination: TerminationState,
}

impl SharedState {
    fn new(capacity: usize, total_producers: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            start: 0,
            end: 0,
            count: 0,
            termination: TerminationState::new(total_producers),
        }
    }

    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn push(&mut self, word: Word) {
        debug_assert!(self.count < self.capacity());
        debug_assert!(self.slots[self.end].is_none());

        self.slots[self.end] = Some(word);
        self.end = (self.end + 1) % self.capacity();
        self.count += 1;
    }

    fn pop(&mut self) -> Option<Word> {
        if self.count == 0 {
            return None;
        }

        let word = self.slots[self.start].take();
        self.start = (self.start + 1) % self.capacity();
        self.count -= 1;
        word
    }
}

/// Fixed-capacity blocking queue of dictionary words
#[derive(Debug)]
pub struct BoundedQueue {
    /// Slots, indices and termination flags
    state: Mutex<SharedState>,

    /// Signalled when words arrive or the run ends
    not_empty: Condvar,

    /// Signalled when space frees up or the run is cancelled
    not_full: Condvar,

    /// Lock-free mirror of "cancelled", for polling between tokens
    cancelled: AtomicBool,

    /// Queue capacity
    capacity: usize,

    /// Queue statistics
    stats: QueueStats,
}

impl BoundedQueue {
    /// Create a queue for a run with `total_producers` producers
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize, total_producers: usize) -> Self {
        assert!(capacity > 0, "queue capacity must be non-zero");

        Self {
            state: Mutex::new(SharedState::new(capacity, total_producers)),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            cancelled: AtomicBool::new(false),
            capacity,
            stats: QueueStats::default(),
        }
    }

    /// Insert a whole batch, blocking while it does not fit
    ///
    /// On success the batch is drained. If the run is cancelled while waiting
    /// the batch is left untouched and `Terminated` is returned.
    pub fn enqueue_batch(&self, batch: &mut Vec<Word>) -> Result<EnqueueOutcome, QueueError> {
        let len = batch.len();
        if len > self.capacity {
            return Err(QueueError::BatchTooLarge {
                len,
                capacity: self.capacity,
            });
        }

        let mut state = self.state.lock();

        if len > 0 && state.count + len > self.capacity && !state.termination.is_cancelled() {
            self.stats.producer_waits.fetch_add(1, Ordering::Relaxed);
            while state.count + len > self.capacity && !state.termination.is_cancelled() {
                self.not_full.wait(&mut state);
            }
        }

        if state.termination.is_cancelled() {
            return Ok(EnqueueOutcome::Terminated);
        }

        for word in batch.drain(..) {
            state.push(word);
        }
        debug_assert!(state.count <= self.capacity);

        self.stats.enqueued.fetch_add(len as u64, Ordering::Relaxed);
        drop(state);

        if len > 0 {
            self.not_empty.notify_all();
        }

        Ok(EnqueueOutcome::Enqueued(len))
    }

    /// Remove one word, blocking while the queue is empty and the run is live
    pub fn dequeue_one(&self) -> Dequeued {
        let mut state = self.state.lock();

        if Self::must_wait_for_word(&state) {
            self.stats.consumer_waits.fetch_add(1, Ordering::Relaxed);
            while Self::must_wait_for_word(&state) {
                self.not_empty.wait(&mut state);
            }
        }

        if state.termination.is_cancelled() {
            return Dequeued::EndOfWork;
        }

        // Empty here implies every producer has finished.
        let Some(word) = state.pop() else {
            return Dequeued::EndOfWork;
        };

        self.stats.dequeued.fetch_add(1, Ordering::Relaxed);
        drop(state);

        self.not_full.notify_one();
        Dequeued::Word(word)
    }

    fn must_wait_for_word(state: &SharedState) -> bool {
        state.count == 0 && !state.termination.exhausted() && !state.termination.is_cancelled()
    }

    /// Number of unread words
    pub fn len(&self) -> usize {
        self.state.lock().count
    }

    /// Check if the queue holds no unread words
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Queue capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Queue statistics
    pub fn stats(&self) -> &QueueStats {
        &self.stats
    }

    /// Cheap, lock-free check for match or interrupt
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, SharedState> {
        self.state.lock()
    }

    /// Must be called with the state lock held, right after setting a cancel flag
    pub(crate) fn mark_cancelled(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub(crate) fn wake_consumers(&self) {
        self.not_empty.notify_all();
    }

    pub(crate) fn wake_all(&self) {
        self.not_empty.notify_all();
        self.not_full.notify_all();
    }
}
