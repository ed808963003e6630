//! Cooperative shutdown for producers and consumers
//!
//! A run ends in one of three ways: every producer ran out of input, a
//! consumer found the answer, or the user interrupted the run. All three are
//! recorded in [`TerminationState`], which lives behind the queue mutex, and
//! every transition broadcasts to the waiters it may unblock.

use crate::crack::queue::BoundedQueue;
use std::sync::Arc;
use tracing::{debug, info};

/// Shutdown bookkeeping shared by every worker
///
/// All flags are monotonic for the life of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminationState {
    producers_finished: usize,
    total_producers: usize,
    exhausted: bool,
    found: Option<Vec<u8>>,
    interrupted: bool,
}

impl TerminationState {
    pub(crate) fn new(total_producers: usize) -> Self {
        Self {
            producers_finished: 0,
            total_producers,
            exhausted: total_producers == 0,
            found: None,
            interrupted: false,
        }
    }

    /// Producers that have reported completion
    pub fn producers_finished(&self) -> usize {
        self.producers_finished
    }

    /// Producers started for the run
    pub fn total_producers(&self) -> usize {
        self.total_producers
    }

    /// Every producer has finished
    pub fn exhausted(&self) -> bool {
        self.exhausted
    }

    /// The winning candidate, once found
    pub fn found(&self) -> Option<&[u8]> {
        self.found.as_deref()
    }

    /// The run was interrupted
    pub fn interrupted(&self) -> bool {
        self.interrupted
    }

    /// Match found or interrupted: blocked workers must stop
    pub fn is_cancelled(&self) -> bool {
        self.found.is_some() || self.interrupted
    }
}

/// Handle for reporting shutdown events (clone for each worker)
#[derive(Debug, Clone)]
pub struct TerminationController {
    queue: Arc<BoundedQueue>,
}

impl TerminationController {
    /// Create a controller sharing the queue's lock
    pub fn new(queue: Arc<BoundedQueue>) -> Self {
        Self { queue }
    }

    /// Record that one producer finished
    ///
    /// The last producer to finish marks the input exhausted and wakes every
    /// blocked consumer. Returns true for that last call.
    pub fn report_producer_done(&self) -> bool {
        let mut state = self.queue.lock();
        let termination = &mut state.termination;

        termination.producers_finished += 1;
        debug_assert!(termination.producers_finished <= termination.total_producers);

        let now_exhausted =
            !termination.exhausted && termination.producers_finished >= termination.total_producers;
        if now_exhausted {
            termination.exhausted = true;
        }

        let finished = termination.producers_finished;
        drop(state);

        if now_exhausted {
            debug!(producers = finished, "All producers finished");
            self.queue.wake_consumers();
        }

        now_exhausted
    }

    /// Record a winning candidate
    ///
    /// Only the first call is kept; later calls return false and change
    /// nothing. Wakes every blocked producer and consumer.
    pub fn report_match(&self, candidate: impl Into<Vec<u8>>) -> bool {
        let mut state = self.queue.lock();
        if state.termination.found.is_some() {
            return false;
        }

        let candidate = candidate.into();
        info!(candidate = %String::from_utf8_lossy(&candidate), "Match found");
        state.termination.found = Some(candidate);
        self.queue.mark_cancelled();
        drop(state);

        self.queue.wake_all();
        true
    }

    /// Cancel the run without a winner
    pub fn interrupt(&self) {
        let mut state = self.queue.lock();
        if state.termination.interrupted {
            return;
        }

        state.termination.interrupted = true;
        self.queue.mark_cancelled();
        drop(state);

        self.queue.wake_all();
    }

    /// Lock-free check for match or interrupt
    pub fn is_cancelled(&self) -> bool {
        self.queue.is_cancelled()
    }

    /// Winning candidate, if any
    pub fn winning_word(&self) -> Option<Vec<u8>> {
        self.queue.lock().termination.found.clone()
    }

    /// Consistent copy of the current state
    pub fn snapshot(&self) -> TerminationState {
        self.queue.lock().termination.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crack::queue::Dequeued;
    use crate::dictionary::Word;
    use std::thread;
    use std::time::{Duration, Instant};

    fn controller(capacity: usize, producers: usize) -> (Arc<BoundedQueue>, TerminationController) {
        let queue = Arc::new(BoundedQueue::new(capacity, producers));
        let controller = TerminationController::new(Arc::clone(&queue));
        (queue, controller)
    }

    fn wait_until_finished<T>(handles: &[thread::JoinHandle<T>], timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if handles.iter().all(|h| h.is_finished()) {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        false
    }

    #[test]
    fn test_last_producer_sets_exhausted() {
        let (_queue, controller) = controller(4, 3);

        assert!(!controller.report_producer_done());
        assert!(!controller.report_producer_done());
        assert!(!controller.snapshot().exhausted());
        assert!(controller.report_producer_done());

        let state = controller.snapshot();
        assert!(state.exhausted());
        assert_eq!(state.producers_finished(), 3);
        assert_eq!(state.total_producers(), 3);
    }

    #[test]
    fn test_zero_producers_starts_exhausted() {
        let (queue, _controller) = controller(4, 0);
        assert_eq!(queue.dequeue_one(), Dequeued::EndOfWork);
    }

    #[test]
    fn test_first_match_wins() {
        let (_queue, controller) = controller(4, 1);

        assert!(controller.report_match("first"));
        assert!(!controller.report_match("second"));

        assert_eq!(controller.winning_word().as_deref(), Some(&b"first"[..]));
        assert!(controller.is_cancelled());
    }

    #[test]
    fn test_racing_reporters_keep_one_word() {
        let (_queue, controller) = controller(4, 1);
        let barrier = Arc::new(std::sync::Barrier::new(16));

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let controller = controller.clone();
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    let word = format!("word{i}");
                    barrier.wait();
                    controller.report_match(word.clone()).then_some(word)
                })
            })
            .collect();

        let winners: Vec<String> = handles
            .into_iter()
            .filter_map(|h| h.join().unwrap())
            .collect();

        assert_eq!(winners.len(), 1);
        assert_eq!(controller.winning_word(), Some(winners[0].clone().into_bytes()));
    }

    #[test]
    fn test_exhaustion_wakes_all_blocked_consumers() {
        let (queue, controller) = controller(4, 2);

        let consumers: Vec<_> = (0..6)
            .map(|_| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || queue.dequeue_one())
            })
            .collect();

        thread::sleep(Duration::from_millis(50));
        assert!(consumers.iter().all(|h| !h.is_finished()));

        controller.report_producer_done();
        thread::sleep(Duration::from_millis(20));
        assert!(consumers.iter().all(|h| !h.is_finished()));

        controller.report_producer_done();
        assert!(wait_until_finished(&consumers, Duration::from_secs(5)));
        for consumer in consumers {
            assert_eq!(consumer.join().unwrap(), Dequeued::EndOfWork);
        }
    }

    #[test]
    fn test_match_wakes_consumers_and_producers() {
        let (queue, controller) = controller(1, 1);
        queue.enqueue_batch(&mut vec![Word::new("pending").unwrap()]).unwrap();

        let producers: Vec<_> = (0..3)
            .map(|i| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || {
                    let mut batch = vec![Word::new(format!("p{i}")).unwrap()];
                    queue.enqueue_batch(&mut batch).is_ok()
                })
            })
            .collect();

        let (empty_queue, empty_controller) = self::controller(4, 1);
        let consumers: Vec<_> = (0..3)
            .map(|_| {
                let queue = Arc::clone(&empty_queue);
                thread::spawn(move || queue.dequeue_one())
            })
            .collect();

        thread::sleep(Duration::from_millis(50));
        assert!(producers.iter().all(|h| !h.is_finished()));
        assert!(consumers.iter().all(|h| !h.is_finished()));

        controller.report_match("x");
        empty_controller.report_match("y");

        assert!(wait_until_finished(&producers, Duration::from_secs(5)));
        assert!(wait_until_finished(&consumers, Duration::from_secs(5)));
        for consumer in consumers {
            assert_eq!(consumer.join().unwrap(), Dequeued::EndOfWork);
        }
    }

    #[test]
    fn test_interrupt_cancels_without_winner() {
        let (queue, controller) = controller(4, 1);

        let consumer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || queue.dequeue_one())
        };

        thread::sleep(Duration::from_millis(20));
        controller.interrupt();

        assert!(wait_until_finished(std::slice::from_ref(&consumer), Duration::from_secs(5)));
        assert_eq!(consumer.join().unwrap(), Dequeued::EndOfWork);

        let state = controller.snapshot();
        assert!(state.interrupted());
        assert!(state.found().is_none());
        assert!(controller.is_cancelled());
    }
}
