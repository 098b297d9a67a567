//! Fixed-size worker pool with a quiescence barrier.
//!
//! `WorkQueue` runs tasks on a bounded set of OS threads fed from a FIFO
//! queue. A pending counter tracks tasks that are queued or running;
//! [`WorkQueue::finish`] blocks until it reaches zero, which is the
//! barrier the ingesters and the query processor wait on before output
//! is written. `execute` raises the counter before it returns, so a task
//! that enqueues follow-up work keeps the pool visibly busy until that
//! work is done too.

use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

type Task = Box<dyn FnOnce() + Send + 'static>;

#[derive(Default)]
struct QueueState {
    tasks: VecDeque<Task>,
    /// Tasks queued or running. `execute` increments; a worker
    /// decrements exactly once per task, panicking tasks included.
    pending: usize,
    draining: bool,
}

struct Shared {
    state: Mutex<QueueState>,
    task_ready: Condvar,
    quiescent: Condvar,
}

impl Shared {
    fn state(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Bounded pool of worker threads draining a FIFO task queue.
pub struct WorkQueue {
    shared: Arc<Shared>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl WorkQueue {
    /// Spawn a pool with `workers` threads, clamped to at least one.
    pub fn new(workers: usize) -> Self {
        let shared = Arc::new(Shared {
            state: Mutex::new(QueueState::default()),
            task_ready: Condvar::new(),
            quiescent: Condvar::new(),
        });
        let handles = (0..workers.max(1))
            .map(|_| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || worker_loop(&shared))
            })
            .collect();
        Self {
            shared,
            workers: Mutex::new(handles),
        }
    }

    /// Enqueue a task. Safe from any thread, worker threads included.
    /// Tasks handed to a draining pool are discarded.
    pub fn execute<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut state = self.shared.state();
        if state.draining {
            eprintln!("warning: task submitted to a shut-down work queue; discarded");
            return;
        }
        state.pending += 1;
        state.tasks.push_back(Box::new(task));
        self.shared.task_ready.notify_one();
    }

    /// Block until every queued and running task has completed. The
    /// pool stays usable afterwards.
    pub fn finish(&self) {
        let mut state = self.shared.state();
        while state.pending > 0 {
            state = self
                .shared
                .quiescent
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Stop accepting tasks, let queued and running work drain, then
    /// join the workers. Safe to call more than once.
    pub fn shutdown(&self) {
        {
            let mut state = self.shared.state();
            state.draining = true;
            self.shared.task_ready.notify_all();
        }
        let handles: Vec<JoinHandle<()>> = {
            let mut workers = self.workers.lock().unwrap_or_else(PoisonError::into_inner);
            workers.drain(..).collect()
        };
        for handle in handles {
            let _ = handle.join();
        }
    }

    /// Wait for quiescence, then stop the pool.
    pub fn join(&self) {
        self.finish();
        self.shutdown();
    }

    /// Tasks queued or running right now.
    pub fn pending(&self) -> usize {
        self.shared.state().pending
    }
}

impl Drop for WorkQueue {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(shared: &Shared) {
    loop {
        let task = {
            let mut state = shared.state();
            loop {
                if let Some(task) = state.tasks.pop_front() {
                    break task;
                }
                // Drain-to-completion: only stop once the queue is empty.
                if state.draining {
                    return;
                }
                state = shared
                    .task_ready
                    .wait(state)
                    .unwrap_or_else(PoisonError::into_inner);
            }
        };
        if panic::catch_unwind(AssertUnwindSafe(task)).is_err() {
            eprintln!("warning: worker task panicked; the pool keeps running");
        }
        let mut state = shared.state();
        state.pending -= 1;
        if state.pending == 0 {
            shared.quiescent.notify_all();
        }
    }
}
