//! Single-worker execution with a depth-1 latest-wins queue.
//!
//! At most one job runs at a time and at most one waits. A submit while a
//! job is queued replaces the queued job; a submit while the worker is
//! busy queues behind it. Intermediate states are skipped by construction,
//! never computed and thrown away.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::{Condvar, Mutex};
use tracing::debug;

struct SlotState<T> {
    pending: Option<T>,
    closed: bool,
}

/// The depth-1 queue. `submit` overwrites any still-pending job.
pub struct JobSlot<T> {
    state: Mutex<SlotState<T>>,
    ready: Condvar,
    busy: AtomicBool,
}

impl<T> JobSlot<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SlotState { pending: None, closed: false }),
            ready: Condvar::new(),
            busy: AtomicBool::new(false),
        }
    }

    /// Queue `job`, replacing any pending one. Returns true when a
    /// pending job was displaced.
    pub fn submit(&self, job: T) -> bool {
        let mut state = self.state.lock();
        if state.closed {
            return false;
        }
        let displaced = state.pending.replace(job).is_some();
        self.ready.notify_one();
        displaced
    }

    /// Block until a job is pending or the slot closes. `None` means
    /// closed and drained. The busy flag is raised under the slot lock,
    /// before the job is handed out, so a dequeued job is never
    /// invisible to [`JobSlot::is_busy`].
    pub fn take(&self) -> Option<T> {
        let mut state = self.state.lock();
        loop {
            if let Some(job) = state.pending.take() {
                self.busy.store(true, Ordering::SeqCst);
                return Some(job);
            }
            if state.closed {
                return None;
            }
            self.ready.wait(&mut state);
        }
    }

    /// Mark the job handed out by the last `take` as finished.
    pub fn finish(&self) {
        self.busy.store(false, Ordering::SeqCst);
    }

    /// Whether a taken job is still running.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    pub fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        self.ready.notify_all();
    }
}

impl<T> Default for JobSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Dedicated worker thread looping over a [`JobSlot`].
pub struct Worker<T> {
    slot: Arc<JobSlot<T>>,
    handle: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Worker<T> {
    pub fn spawn<F>(name: &str, run: F) -> std::io::Result<Self>
    where
        F: Fn(T) + Send + 'static,
    {
        let slot = Arc::new(JobSlot::new());
        let thread_slot = Arc::clone(&slot);
        let handle = thread::Builder::new().name(name.to_string()).spawn(move || {
            while let Some(job) = thread_slot.take() {
                run(job);
                thread_slot.finish();
            }
            debug!("worker thread exiting");
        })?;
        Ok(Self { slot, handle: Some(handle) })
    }

    /// Queue a job; latest wins. Returns true when it displaced a
    /// still-pending one.
    pub fn submit(&self, job: T) -> bool {
        self.slot.submit(job)
    }

    /// Whether a job is running right now. A queued-but-unstarted job
    /// does not count.
    pub fn is_busy(&self) -> bool {
        self.slot.is_busy()
    }

    pub fn slot(&self) -> Arc<JobSlot<T>> {
        Arc::clone(&self.slot)
    }
}

impl<T> Drop for Worker<T> {
    fn drop(&mut self) {
        self.slot.close();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    #[test]
    fn slot_keeps_only_the_latest_job() {
        let slot = JobSlot::new();
        assert!(!slot.submit(1));
        assert!(slot.submit(2));
        assert_eq!(slot.take(), Some(2));
        slot.close();
        assert_eq!(slot.take(), None);
    }

    #[test]
    fn submit_after_close_is_dropped() {
        let slot = JobSlot::new();
        slot.close();
        assert!(!slot.submit(7));
        assert_eq!(slot.take(), None);
    }

    #[test]
    fn take_raises_the_busy_flag_before_handing_out_the_job() {
        let slot = JobSlot::new();
        assert!(!slot.is_busy());
        slot.submit(4);
        assert!(!slot.is_busy());
        assert_eq!(slot.take(), Some(4));
        assert!(slot.is_busy());
        slot.finish();
        assert!(!slot.is_busy());
    }

    #[test]
    fn worker_skips_displaced_jobs() {
        // Gate the first job so later submissions land while it runs.
        let (gate_tx, gate_rx) = unbounded::<()>();
        let (done_tx, done_rx) = unbounded::<u32>();
        let worker = Worker::spawn("test-worker", move |job: u32| {
            gate_rx.recv().ok();
            done_tx.send(job).ok();
        })
        .unwrap();

        worker.submit(1);
        while !worker.is_busy() {
            std::thread::yield_now();
        }
        worker.submit(2);
        worker.submit(3);

        gate_tx.send(()).unwrap();
        assert_eq!(done_rx.recv().unwrap(), 1);
        gate_tx.send(()).unwrap();
        assert_eq!(done_rx.recv().unwrap(), 3);
    }
}
