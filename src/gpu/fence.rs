//! GPU-side fence: a monotonically increasing `u64` the calling thread can
//! block on, distinct from the CPU-side [`crate::threading::Barrier`].
//!
//! Grounded on spec section 4.9/5: "a monotonically increasing `u64`
//! watched by `wait(value)`, which blocks the calling thread. No timeout."
//! Stands in for `ash`'s timeline semaphore wait since this crate never
//! issues the actual `vkWaitSemaphores` call (backend bring-up is out of
//! scope).

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Condvar, Mutex};

pub struct Fence {
    completed: AtomicU64,
    condvar: Condvar,
    lock: Mutex<()>,
}

impl Fence {
    pub fn new() -> Fence {
        Fence {
            completed: AtomicU64::new(0),
            condvar: Condvar::new(),
            lock: Mutex::new(()),
        }
    }

    pub fn completed_value(&self) -> u64 {
        self.completed.load(Ordering::Acquire)
    }

    /// Called by the submission path once the GPU has actually signalled
    /// `value`. Monotonic: signalling a lower value than already completed
    /// is a no-op.
    pub fn signal(&self, value: u64) {
        let mut prev = self.completed.load(Ordering::Acquire);
        while value > prev {
            match self
                .completed
                .compare_exchange_weak(prev, value, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => {
                    let _guard = self.lock.lock();
                    self.condvar.notify_all();
                    break;
                }
                Err(actual) => prev = actual,
            }
        }
    }

    /// Blocks the calling thread until `completed_value() >= value`. No
    /// timeout: the engine assumes the GPU always makes forward progress.
    pub fn wait(&self, value: u64) {
        if self.completed_value() >= value {
            return;
        }
        let mut guard = self.lock.lock();
        while self.completed_value() < value {
            self.condvar.wait(&mut guard);
        }
    }
}

impl Default for Fence {
    fn default() -> Self {
        Fence::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn wait_returns_immediately_if_already_completed() {
        let fence = Fence::new();
        fence.signal(5);
        fence.wait(3);
    }

    #[test]
    fn wait_blocks_until_signalled() {
        let fence = Arc::new(Fence::new());
        let f = fence.clone();
        let handle = std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(20));
            f.signal(1);
        });
        fence.wait(1);
        handle.join().unwrap();
        assert_eq!(fence.completed_value(), 1);
    }

    #[test]
    fn signal_is_monotonic() {
        let fence = Fence::new();
        fence.signal(10);
        fence.signal(3);
        assert_eq!(fence.completed_value(), 10);
    }
}
