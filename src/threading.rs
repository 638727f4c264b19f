//! Fixed thread pool with condvar-dispatched job slots, plus a countdown
//! barrier for joining a batch of tasks.
//!
//! Grounded on spec section 5 and `original_source/.../BBThreadScheduler.hpp`:
//! a small fixed pool (half the logical CPUs), each thread parked on its own
//! condition variable between tasks, never suspending mid-job. A task handle
//! is `{thread_index, generation}`; waiting compares the stored generation to
//! the thread's current one so a handle can't accidentally observe a later
//! job that reused the same slot.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use parking_lot::{Condvar, Mutex};

type Job = Box<dyn FnOnce() + Send + 'static>;

struct Slot {
    condvar: Condvar,
    state: Mutex<SlotState>,
}

struct SlotState {
    job: Option<Job>,
    generation: u64,
    completed_generation: u64,
    shutdown: bool,
}

/// Identifies one dispatched task. Comparing the stored generation against
/// the thread's current generation tells a waiter whether the job it is
/// waiting for has actually finished, or whether the slot moved on.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TaskHandle {
    thread_index: u32,
    generation: u64,
}

pub struct ThreadPool {
    slots: Vec<Arc<Slot>>,
    next_slot: AtomicU64,
    _threads: Vec<JoinHandle<()>>,
}

impl ThreadPool {
    /// Spawns `logical_cpus / 2` threads (minimum 1), each idling on its own
    /// condition variable until a job is installed in its slot.
    pub fn new() -> Arc<ThreadPool> {
        let count = (num_cpus::get() / 2).max(1);
        Self::with_thread_count(count)
    }

    pub fn with_thread_count(count: usize) -> Arc<ThreadPool> {
        let mut slots = Vec::with_capacity(count);
        let mut threads = Vec::with_capacity(count);

        for i in 0..count {
            let slot = Arc::new(Slot {
                condvar: Condvar::new(),
                state: Mutex::new(SlotState {
                    job: None,
                    generation: 0,
                    completed_generation: 0,
                    shutdown: false,
                }),
            });
            slots.push(slot.clone());

            let handle = std::thread::Builder::new()
                .name(format!("forge-worker-{i}"))
                .spawn(move || worker_loop(slot))
                .expect("failed to spawn engine worker thread");
            threads.push(handle);
        }

        Arc::new(ThreadPool {
            slots,
            next_slot: AtomicU64::new(0),
            _threads: threads,
        })
    }

    /// Finds the first idle thread (no job currently installed) and assigns
    /// it the given closure, bumping the slot's generation and waking its
    /// condvar. Pool sizes are small enough that a linear scan beats a
    /// lock-free queue.
    pub fn start_task(&self, name: &str, f: impl FnOnce() + Send + 'static) -> TaskHandle {
        let start = self.next_slot.fetch_add(1, Ordering::Relaxed) as usize % self.slots.len();
        for offset in 0..self.slots.len() {
            let idx = (start + offset) % self.slots.len();
            let slot = &self.slots[idx];
            let mut state = slot.state.lock();
            if state.job.is_none() {
                state.generation += 1;
                let generation = state.generation;
                state.job = Some(Box::new(f));
                slot.condvar.notify_one();
                log::trace!("dispatched task '{name}' to worker {idx} gen {generation}");
                return TaskHandle {
                    thread_index: idx as u32,
                    generation,
                };
            }
        }
        // All threads busy: block on the least-recently-used slot until it
        // frees up, then install there. This keeps start_task non-blocking
        // in the common case while still guaranteeing forward progress.
        let idx = start;
        let slot = &self.slots[idx];
        let mut state = slot.state.lock();
        while state.job.is_some() {
            slot.condvar.wait(&mut state);
        }
        state.generation += 1;
        let generation = state.generation;
        state.job = Some(Box::new(f));
        slot.condvar.notify_one();
        TaskHandle {
            thread_index: idx as u32,
            generation,
        }
    }

    /// Blocks until the job identified by `handle` has completed.
    pub fn wait(&self, handle: TaskHandle) {
        let slot = &self.slots[handle.thread_index as usize];
        let mut state = slot.state.lock();
        while state.completed_generation < handle.generation {
            slot.condvar.wait(&mut state);
        }
    }

    pub fn thread_count(&self) -> usize {
        self.slots.len()
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        for slot in &self.slots {
            slot.state.lock().shutdown = true;
            slot.condvar.notify_all();
        }
    }
}

fn worker_loop(slot: Arc<Slot>) {
    loop {
        let job = {
            let mut state = slot.state.lock();
            loop {
                if state.shutdown {
                    return;
                }
                if let Some(job) = state.job.take() {
                    break job;
                }
                slot.condvar.wait(&mut state);
            }
        };
        job();
        let mut state = slot.state.lock();
        state.completed_generation = state.generation;
        slot.condvar.notify_all();
    }
}

/// Semaphore-backed count-down barrier used to join a batch of dispatched
/// tasks, per section 5's "callers must use the supplied barrier primitive".
pub struct Barrier {
    state: Mutex<usize>,
    condvar: Condvar,
}

impl Barrier {
    pub fn new(count: usize) -> Barrier {
        Barrier {
            state: Mutex::new(count),
            condvar: Condvar::new(),
        }
    }

    /// Decrements the count; if it reaches zero wakes all other waiters.
    pub fn arrive(&self) {
        let mut remaining = self.state.lock();
        if *remaining > 0 {
            *remaining -= 1;
        }
        if *remaining == 0 {
            self.condvar.notify_all();
        }
    }

    /// Decrements the count and blocks until it reaches zero.
    pub fn arrive_and_wait(&self) {
        let mut remaining = self.state.lock();
        if *remaining > 0 {
            *remaining -= 1;
        }
        while *remaining > 0 {
            self.condvar.wait(&mut remaining);
        }
    }
}
