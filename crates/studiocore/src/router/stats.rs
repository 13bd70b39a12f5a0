use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of the router's dispatch counters.
///
/// `handled` counts every event a route was found for, including those whose
/// handler then failed; `errored` counts the failures among them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RouterStats {
    pub total: u64,
    pub handled: u64,
    pub unhandled: u64,
    pub errored: u64,
}

impl RouterStats {
    /// Handled events whose handler returned `Ok`
    pub fn succeeded(&self) -> u64 {
        self.handled.saturating_sub(self.errored)
    }
}

impl fmt::Display for RouterStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "total={} handled={} unhandled={} errored={}",
            self.total, self.handled, self.unhandled, self.errored
        )
    }
}

/// Live counters. Never reset for the lifetime of the router.
#[derive(Debug, Default)]
pub(crate) struct StatsCounters {
    total: AtomicU64,
    handled: AtomicU64,
    unhandled: AtomicU64,
    errored: AtomicU64,
}

impl StatsCounters {
    pub(crate) fn record_attempt(&self) {
        self.total.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_handled(&self) {
        self.handled.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_unhandled(&self) {
        self.unhandled.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_error(&self) {
        self.errored.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> RouterStats {
        RouterStats {
            total: self.total.load(Ordering::Relaxed),
            handled: self.handled.load(Ordering::Relaxed),
            unhandled: self.unhandled.load(Ordering::Relaxed),
            errored: self.errored.load(Ordering::Relaxed),
        }
    }
}
