//! Trailing-edge debounce for paint and control events.
//!
//! Every trigger restarts the window; the callback fires once per quiet
//! period, after the last trigger's window elapses.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

struct DebounceState {
    deadline: Option<Instant>,
    shutdown: bool,
}

struct Inner {
    window: Duration,
    state: Mutex<DebounceState>,
    wake: Condvar,
}

pub struct Debouncer {
    inner: Arc<Inner>,
    handle: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn spawn<F>(name: &str, window: Duration, on_fire: F) -> std::io::Result<Self>
    where
        F: Fn() + Send + 'static,
    {
        let inner = Arc::new(Inner {
            window,
            state: Mutex::new(DebounceState { deadline: None, shutdown: false }),
            wake: Condvar::new(),
        });
        let thread_inner = Arc::clone(&inner);
        let handle = thread::Builder::new().name(name.to_string()).spawn(move || {
            let mut state = thread_inner.state.lock();
            loop {
                if state.shutdown {
                    break;
                }
                match state.deadline {
                    None => {
                        thread_inner.wake.wait(&mut state);
                    }
                    Some(deadline) => {
                        if Instant::now() >= deadline {
                            state.deadline = None;
                            drop(state);
                            on_fire();
                            state = thread_inner.state.lock();
                        } else {
                            // A trigger during the wait moves the deadline;
                            // the next loop iteration re-reads it.
                            let _ = thread_inner.wake.wait_until(&mut state, deadline);
                        }
                    }
                }
            }
        })?;
        Ok(Self { inner, handle: Some(handle) })
    }

    /// Restart the debounce window.
    pub fn trigger(&self) {
        let mut state = self.inner.state.lock();
        state.deadline = Some(Instant::now() + self.inner.window);
        self.inner.wake.notify_one();
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        {
            let mut state = self.inner.state.lock();
            state.shutdown = true;
            self.inner.wake.notify_one();
        }
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
    fn rapid_triggers_coalesce_to_one_fire() {
        let (tx, rx) = unbounded::<()>();
        let debouncer = Debouncer::spawn("test-debounce", Duration::from_millis(30), move || {
            tx.send(()).ok();
        })
        .unwrap();

        for _ in 0..5 {
            debouncer.trigger();
            thread::sleep(Duration::from_millis(2));
        }
        rx.recv_timeout(Duration::from_secs(2)).unwrap();
        thread::sleep(Duration::from_millis(60));
        assert!(rx.try_recv().is_err(), "coalesced burst fired more than once");
    }

    #[test]
    fn separate_bursts_fire_separately() {
        let (tx, rx) = unbounded::<()>();
        let debouncer = Debouncer::spawn("test-debounce", Duration::from_millis(10), move || {
            tx.send(()).ok();
        })
        .unwrap();

        debouncer.trigger();
        rx.recv_timeout(Duration::from_secs(2)).unwrap();
        debouncer.trigger();
        rx.recv_timeout(Duration::from_secs(2)).unwrap();
    }
}
