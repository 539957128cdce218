use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters shared by every task of a run
#[derive(Debug, Default)]
pub struct RunStats {
    files_scanned: AtomicUsize,
    files_retained: AtomicUsize,
    files_resolved: AtomicUsize,
    entries_inserted: AtomicUsize,
    failures: AtomicUsize,
}

/// Point-in-time copy of [`RunStats`]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub files_scanned: usize,
    pub files_retained: usize,
    pub files_resolved: usize,
    pub entries_inserted: usize,
    pub failures: usize,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_scanned(&self, count: usize) {
        self.files_scanned.store(count, Ordering::Relaxed);
    }

    pub fn set_retained(&self, count: usize) {
        self.files_retained.store(count, Ordering::Relaxed);
    }

    pub fn increment_resolved(&self) {
        self.files_resolved.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_entries(&self, count: usize) {
        self.entries_inserted.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.add_failures(1);
    }

    pub fn add_failures(&self, count: usize) {
        self.failures.fetch_add(count, Ordering::Relaxed);
    }

    pub fn failures(&self) -> usize {
        self.failures.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            files_scanned: self.files_scanned.load(Ordering::Relaxed),
            files_retained: self.files_retained.load(Ordering::Relaxed),
            files_resolved: self.files_resolved.load(Ordering::Relaxed),
            entries_inserted: self.entries_inserted.load(Ordering::Relaxed),
            failures: self.failures(),
        }
    }
}
