//! Fixed-size worker pool draining an MPSC task queue.
//!
//! Submission is fire-and-forget; a handle-returning variant is layered on
//! top via a single-shot result slot. Panicking tasks are caught and logged;
//! a bad task never takes a worker down with it.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::{Condvar, Mutex};

use crate::config::constants::TASK_QUEUE_CAPACITY;
use crate::transport::MpscRing;

type Task = Box<dyn FnOnce() + Send + 'static>;

/// Pool of worker threads consuming from a shared bounded task queue.
///
/// Shutdown semantics: the stop flag is observed between tasks, so tasks in
/// flight complete and tasks still queued when the pool shuts down are
/// abandoned.
pub struct WorkerPool {
    queue: Arc<MpscRing<Task>>,
    stop: Arc<AtomicBool>,
    rejected: Arc<AtomicU64>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `num_threads` workers with the default queue capacity.
    pub fn new(num_threads: usize) -> Self {
        Self::with_capacity(num_threads, TASK_QUEUE_CAPACITY)
    }

    /// Spawn `num_threads` workers draining a queue of `queue_capacity` tasks.
    pub fn with_capacity(num_threads: usize, queue_capacity: usize) -> Self {
        assert!(num_threads > 0, "worker pool needs at least one thread");

        let queue = Arc::new(MpscRing::new(queue_capacity));
        let stop = Arc::new(AtomicBool::new(false));

        let workers = (0..num_threads)
            .map(|worker_id| {
                let queue = Arc::clone(&queue);
                let stop = Arc::clone(&stop);
                thread::Builder::new()
                    .name(format!("fen-worker-{}", worker_id))
                    .spawn(move || worker_loop(worker_id, queue, stop))
                    .expect("failed to spawn worker thread")
            })
            .collect();

        Self {
            queue,
            stop,
            rejected: Arc::new(AtomicU64::new(0)),
            workers,
        }
    }

    /// Enqueue a fire-and-forget task. Returns `false` (and counts the
    /// rejection) when the queue is full.
    pub fn submit<F>(&self, task: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        if self.queue.try_push(Box::new(task)).is_ok() {
            true
        } else {
            self.rejected.fetch_add(1, Ordering::Relaxed);
            false
        }
    }

    /// Enqueue a task and get a handle to its result.
    ///
    /// Returns `None` when the queue is full. If the task panics the handle
    /// resolves to `None` and the panic is still logged by the worker.
    pub fn submit_with_handle<F, R>(&self, task: F) -> Option<TaskHandle<R>>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let slot = Arc::new(ResultSlot::new());
        let writer = Arc::clone(&slot);

        let accepted = self.submit(move || {
            match panic::catch_unwind(AssertUnwindSafe(task)) {
                Ok(value) => writer.complete(Some(value)),
                Err(payload) => {
                    writer.complete(None);
                    // Re-raise so the worker's catch logs it like any other
                    // panicking task.
                    panic::resume_unwind(payload);
                }
            }
        });

        accepted.then(|| TaskHandle { slot })
    }

    pub fn num_threads(&self) -> usize {
        self.workers.len()
    }

    pub fn is_running(&self) -> bool {
        !self.stop.load(Ordering::Acquire)
    }

    /// Number of submissions rejected due to a full queue.
    pub fn rejected_count(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }

    /// Stop the workers and join them. Idempotent; queued-but-unstarted tasks
    /// are dropped.
    pub fn shutdown(&mut self) {
        if self.stop.swap(true, Ordering::AcqRel) {
            return;
        }
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(worker_id: usize, queue: Arc<MpscRing<Task>>, stop: Arc<AtomicBool>) {
    while !stop.load(Ordering::Acquire) {
        match queue.pop() {
            Some(task) => {
                if panic::catch_unwind(AssertUnwindSafe(task)).is_err() {
                    tracing::error!(worker_id, "task panicked; worker continues");
                }
            }
            None => thread::yield_now(),
        }
    }
}

enum SlotState<R> {
    Pending,
    Done(Option<R>),
}

struct ResultSlot<R> {
    state: Mutex<SlotState<R>>,
    ready: Condvar,
}

impl<R> ResultSlot<R> {
    fn new() -> Self {
        Self {
            state: Mutex::new(SlotState::Pending),
            ready: Condvar::new(),
        }
    }

    fn complete(&self, value: Option<R>) {
        *self.state.lock() = SlotState::Done(value);
        self.ready.notify_all();
    }
}

/// Handle to a task submitted with [`WorkerPool::submit_with_handle`].
pub struct TaskHandle<R> {
    slot: Arc<ResultSlot<R>>,
}

impl<R> TaskHandle<R> {
    /// Block until the task finishes. Returns `None` if the task panicked.
    pub fn wait(self) -> Option<R> {
        let mut state = self.slot.state.lock();
        loop {
            match std::mem::replace(&mut *state, SlotState::Pending) {
                SlotState::Done(value) => return value,
                SlotState::Pending => self.slot.ready.wait(&mut state),
            }
        }
    }

    /// Whether the task has finished (successfully or by panic).
    pub fn is_done(&self) -> bool {
        matches!(*self.slot.state.lock(), SlotState::Done(_))
    }
}
