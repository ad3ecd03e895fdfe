//! Once-per-interval tick source for the rest clock.
//!
//! The ticker only sends messages. The thread that owns the session drains
//! the channel and handles each message to completion before taking the
//! next, so ticks never overlap each other or user commands sent on the same
//! channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Granularity of the stop check inside the sleep loop
const STOP_POLL: Duration = Duration::from_millis(50);

pub struct Ticker {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Send `make()` on `tx` every `interval` until stopped or the receiver
    /// hangs up.
    pub fn spawn<T, F>(interval: Duration, tx: Sender<T>, make: F) -> Self
    where
        T: Send + 'static,
        F: Fn() -> T + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = stop.clone();

        let handle = thread::spawn(move || {
            let mut next = Instant::now() + interval;
            loop {
                // Sleep in short slices so stop() returns promptly
                while Instant::now() < next {
                    if stop_flag.load(Ordering::Acquire) {
                        return;
                    }
                    thread::sleep(STOP_POLL.min(next.saturating_duration_since(Instant::now())));
                }
                if stop_flag.load(Ordering::Acquire) || tx.send(make()).is_err() {
                    return;
                }
                next += interval;
            }
        });

        tracing::debug!("Ticker started ({:?})", interval);
        Self {
            stop,
            handle: Some(handle),
        }
    }

    /// Stop ticking and wait for the thread to exit.
    ///
    /// No message is sent after this returns.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("Ticker thread panicked");
            }
            tracing::debug!("Ticker stopped");
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}
