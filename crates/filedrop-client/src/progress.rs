//! Per-file and batch-level upload progress aggregation.

use std::sync::Arc;
use std::sync::Mutex;

/// Percent progress callback for a single file.
pub type ProgressFn = Arc<dyn Fn(u8) + Send + Sync>;

/// Percent progress callback keyed by file index within a batch.
pub type FileProgressFn = Arc<dyn Fn(usize, u8) + Send + Sync>;

/// Progress after one observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub file_percent: u8,
    pub overall_percent: u8,
}

/// Aggregates per-file byte progress into one overall batch percentage.
///
/// Overall progress is `round(((completed + current/100) / N) * 100)` where
/// `completed` counts fully transferred files. Both the per-file and the
/// overall value are monotonically non-decreasing within one batch: events
/// arriving out of order below the last reported value are clamped.
///
/// Owned by the orchestrator for the lifetime of one batch and discarded
/// afterwards.
pub struct BatchProgress {
    inner: Mutex<Inner>,
}

struct Inner {
    per_file: Vec<u8>,
    completed: Vec<bool>,
    overall_floor: u8,
}

impl BatchProgress {
    pub fn new(file_count: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                per_file: vec![0; file_count],
                completed: vec![false; file_count],
                overall_floor: 0,
            }),
        }
    }

    /// Record byte progress for one file and return the clamped snapshot.
    pub fn observe(&self, index: usize, percent: u8) -> ProgressSnapshot {
        let mut inner = self.inner.lock().expect("progress lock poisoned");
        let clamped = percent.min(100).max(inner.per_file[index]);
        inner.per_file[index] = clamped;
        Self::snapshot(&mut inner, index)
    }

    /// Mark a file as fully transferred.
    pub fn complete(&self, index: usize) -> ProgressSnapshot {
        let mut inner = self.inner.lock().expect("progress lock poisoned");
        inner.per_file[index] = 100;
        inner.completed[index] = true;
        Self::snapshot(&mut inner, index)
    }

    fn snapshot(inner: &mut Inner, index: usize) -> ProgressSnapshot {
        let file_count = inner.per_file.len();
        if file_count == 0 {
            return ProgressSnapshot {
                file_percent: 0,
                overall_percent: 0,
            };
        }

        let completed_count = inner.completed.iter().filter(|c| **c).count();
        let current = if inner.completed[index] {
            0.0
        } else {
            inner.per_file[index] as f64 / 100.0
        };

        let overall =
            (((completed_count as f64 + current) / file_count as f64) * 100.0).round() as u8;
        let overall = overall.clamp(inner.overall_floor, 100);
        inner.overall_floor = overall;

        ProgressSnapshot {
            file_percent: inner.per_file[index],
            overall_percent: overall,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overall_combines_completed_files_and_current_file() {
        let progress = BatchProgress::new(2);

        let snapshot = progress.complete(0);
        assert_eq!(snapshot.overall_percent, 50);

        // File 1 complete, file 2 at 40%: round(((1 + 0.4) / 2) * 100) = 70.
        let snapshot = progress.observe(1, 40);
        assert_eq!(snapshot.file_percent, 40);
        assert_eq!(snapshot.overall_percent, 70);
    }

    #[test]
    fn stale_events_do_not_regress() {
        let progress = BatchProgress::new(2);
        progress.complete(0);
        progress.observe(1, 40);

        // A late event below the last reported value is clamped.
        let snapshot = progress.observe(1, 25);
        assert_eq!(snapshot.file_percent, 40);
        assert_eq!(snapshot.overall_percent, 70);
    }

    #[test]
    fn overall_is_monotonic_across_files() {
        let progress = BatchProgress::new(3);
        let mut last = 0;
        for (index, percent) in [(0, 50), (0, 100), (1, 10), (1, 90), (2, 5)] {
            let snapshot = progress.observe(index, percent);
            assert!(snapshot.overall_percent >= last);
            last = snapshot.overall_percent;
        }
    }

    #[test]
    fn single_file_batch_reaches_100_on_complete() {
        let progress = BatchProgress::new(1);
        progress.observe(0, 99);
        let snapshot = progress.complete(0);
        assert_eq!(snapshot.overall_percent, 100);
    }

    #[test]
    fn percent_above_100_is_clamped() {
        let progress = BatchProgress::new(1);
        let snapshot = progress.observe(0, 250);
        assert_eq!(snapshot.file_percent, 100);
    }
}
