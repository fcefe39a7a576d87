#![allow(clippy::cast_precision_loss)]

use parking_lot::Mutex;
use std::time::{Duration, Instant};

/// Live counters for a running purge.
///
/// Written only by the purge task, read by status queries at any time.
#[derive(Default)]
pub struct Progress {
    inner: Mutex<Counters>,
}

#[derive(Default)]
struct Counters {
    deleted: usize,
    total: usize,
    started: Option<Instant>,
}

impl Progress {
    /// Starts the clock once the work list is known.
    pub fn begin(&self, total: usize) {
        let mut inner = self.inner.lock();
        inner.deleted = 0;
        inner.total = total;
        inner.started = Some(Instant::now());
    }

    /// Counts one processed message and returns the new count. Never passes `total`.
    pub fn advance(&self) -> usize {
        let mut inner = self.inner.lock();
        inner.deleted = (inner.deleted + 1).min(inner.total);
        inner.deleted
    }

    #[must_use]
    pub fn snapshot(&self) -> ProgressSnapshot {
        let inner = self.inner.lock();
        ProgressSnapshot {
            deleted: inner.deleted,
            total: inner.total,
            elapsed: inner.started.map(|s| s.elapsed()).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSnapshot {
    pub deleted: usize,
    pub total: usize,
    pub elapsed: Duration,
}

impl ProgressSnapshot {
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.deleted)
    }

    /// Completion in `0.0..=100.0`; an empty job reads as 0.
    #[must_use]
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.deleted as f64 / self.total as f64 * 100.0).clamp(0.0, 100.0)
    }

    /// Seconds per processed message so far, None before the first one.
    #[must_use]
    pub fn average_per_item(&self) -> Option<f64> {
        (self.deleted > 0).then(|| self.elapsed.as_secs_f64() / self.deleted as f64)
    }

    #[must_use]
    pub fn eta_seconds(&self) -> f64 {
        self.average_per_item()
            .map_or(0.0, |avg| avg * self.remaining() as f64)
    }
}
