//! Monotonically increasing task-id dispenser.

use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe, lock-free id dispenser starting at 0. Ids are never
/// recycled, even across `return_id`/`cancel_task`/timeout — the counter
/// only moves forward.
#[derive(Debug, Default)]
pub struct IdGenerator {
    next: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        IdGenerator {
            next: AtomicU64::new(0),
        }
    }

    /// Returns a fresh, previously-unissued id.
    pub fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::SeqCst)
    }
}
