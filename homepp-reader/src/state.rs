use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use serde::Serialize;

/// Counters describing how the read loop is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReaderStats {
    pub frames_decoded: u64,
    pub frames_rejected: u64,
    pub io_errors: u64,
    pub last_reading_at: Option<jiff::Timestamp>,
    pub uptime_seconds: u64,
}

/// Shared state for tracking the health of the reading source.
///
/// Updated from the blocking serial thread as well as async tasks. The lock
/// is never held across an await.
pub struct ReaderState {
    inner: Arc<Mutex<Inner>>,
}

struct Inner {
    frames_decoded: u64,
    frames_rejected: u64,
    io_errors: u64,
    last_reading_at: Option<jiff::Timestamp>,
    startup_time: Instant,
}

impl ReaderState {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                frames_decoded: 0,
                frames_rejected: 0,
                io_errors: 0,
                last_reading_at: None,
                startup_time: Instant::now(),
            })),
        }
    }

    // A poisoned lock still holds valid counters.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a frame that produced a reading.
    pub fn record_decoded(&self) {
        let mut inner = self.lock();
        inner.frames_decoded += 1;
        inner.last_reading_at = Some(jiff::Timestamp::now());
    }

    /// Record a line that was dropped as undecodable.
    pub fn record_rejected(&self) {
        self.lock().frames_rejected += 1;
    }

    /// Record a failure to open or read the port.
    pub fn record_io_error(&self) {
        self.lock().io_errors += 1;
    }

    pub fn snapshot(&self) -> ReaderStats {
        let inner = self.lock();
        ReaderStats {
            frames_decoded: inner.frames_decoded,
            frames_rejected: inner.frames_rejected,
            io_errors: inner.io_errors,
            last_reading_at: inner.last_reading_at,
            uptime_seconds: inner.startup_time.elapsed().as_secs(),
        }
    }
}

impl Default for ReaderState {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ReaderState {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
