//! Double-buffered mailbox between producer threads and one consumer.
//!
//! Producers append to the "filling" buffer under a short lock. The consumer
//! swaps that buffer for an empty one under the same lock and then iterates
//! what it got without holding anything. Producers therefore never wait on
//! consumer work, and the consumer never sees a buffer that is still being
//! filled.
//!
//! # Invariants
//!
//! - Every enqueued event is returned by exactly one `drain_all` (or removed
//!   by `clear`).
//! - Within one drain, events come back in enqueue order; successive drains
//!   continue that order.

use parking_lot::Mutex;

use crate::QueuedEvent;

const INITIAL_CAPACITY: usize = 64;

/// Thread-safe FIFO mailbox drained by a single consumer.
#[derive(Debug)]
pub struct EventQueue<T = QueuedEvent> {
    filling: Mutex<Vec<T>>,
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EventQueue<T> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self { filling: Mutex::new(Vec::with_capacity(INITIAL_CAPACITY)) }
    }

    /// Append an event. Callable from any thread.
    pub fn enqueue(&self, event: T) {
        self.filling.lock().push(event);
    }

    /// Take every event queued so far, oldest first.
    pub fn drain_all(&self) -> Vec<T> {
        let mut empty = Vec::with_capacity(INITIAL_CAPACITY);
        std::mem::swap(&mut *self.filling.lock(), &mut empty);
        empty
    }

    /// Discard everything queued so far.
    pub fn clear(&self) {
        drop(self.drain_all());
    }

    /// Number of events waiting.
    pub fn len(&self) -> usize {
        self.filling.lock().len()
    }

    /// True if nothing is waiting.
    pub fn is_empty(&self) -> bool {
        self.filling.lock().is_empty()
    }
}
