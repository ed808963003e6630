//! Producer/consumer dictionary search
//!
//! Producers share one cursor over the dictionary and push batches of words
//! into a bounded queue. Consumers take words one at a time, expand each into
//! its candidate set and hash every candidate against the target.
//!
//! # Architecture
//!
//! ```text
//!                     ┌─────────────────────────┐
//!                     │       Dictionary        │
//!                     │  (shared token cursor)  │
//!                     └───────────┬─────────────┘
//!       ┌─────────────────────────┼─────────────────────────┐
//! ┌─────▼──────┐            ┌─────▼──────┐            ┌─────▼──────┐
//! │ Producer 1 │            │ Producer 2 │            │ Producer N │
//! │  batching  │            │  batching  │            │  batching  │
//! └─────┬──────┘            └─────┬──────┘            └─────┬──────┘
//!       └─────────────────────────┼─────────────────────────┘
//!                     ┌───────────▼─────────────┐
//!                     │      BoundedQueue       │
//!                     │ + TerminationState      │
//!                     │   (one mutex)           │
//!                     └───────────┬─────────────┘
//!       ┌─────────────────────────┼─────────────────────────┐
//! ┌─────▼──────┐            ┌─────▼──────┐            ┌─────▼──────┐
//! │ Consumer 1 │            │ Consumer 2 │            │ Consumer M │
//! │ expand+sha │            │ expand+sha │            │ expand+sha │
//! └────────────┘            └────────────┘            └────────────┘
//! ```

pub mod consumer;
pub mod coordinator;
pub mod expand;
pub mod matcher;
pub mod producer;
pub mod queue;
pub mod sink;
pub mod termination;

pub use consumer::{Consumer, ConsumerOutcome, WorkerStats};
pub use coordinator::{CrackCoordinator, CrackProgress, CrackResult};
pub use expand::{expand, VARIANT_COUNT};
pub use matcher::Matcher;
pub use producer::{Producer, ProducerOutcome, DEFAULT_BATCH_SIZE};
pub use queue::{BoundedQueue, Dequeued, EnqueueOutcome, QueueStats, DEFAULT_QUEUE_SIZE};
pub use sink::{FileSink, ResultSink};
pub use termination::{TerminationController, TerminationState};
