//! Background comparison runner.
//!
//! Runs the walk-and-compare sequence on a worker thread and reports back
//! over a channel: one status event first, then exactly one terminal event.
//! The two snapshots are taken concurrently since neither walk touches any
//! shared state beyond the cancellation flag.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use thiserror::Error;

use crate::diff::{self, ComparisonReport};
use crate::snapshot::{self, Snapshot, SnapshotError};

#[derive(Debug)]
pub enum RunEvent {
    /// Emitted once, before the walks start.
    Status(String),
    Done(ComparisonReport),
    Failed(SnapshotError),
    /// The run was cancelled. A normal terminal outcome, not a failure.
    Cancelled,
}

#[derive(Debug, Error)]
#[error("a comparison is already running")]
pub struct RunnerBusy;

/// Hands out at most one in-flight comparison at a time; starting a second
/// run before the first finishes is rejected with [`RunnerBusy`].
pub struct CompareRunner {
    active: Arc<AtomicBool>,
}

/// Receiving side of one comparison run.
pub struct RunHandle {
    cancel: Arc<AtomicBool>,
    events: Receiver<RunEvent>,
}

impl RunHandle {
    /// Blocks until the next event, or `None` once the run is over.
    pub fn recv(&self) -> Option<RunEvent> {
        self.events.recv().ok()
    }

    /// Requests cancellation. The walks notice between entries, so the
    /// terminal event may still be `Done` if the run already finished.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }
}

impl CompareRunner {
    pub fn new() -> Self {
        CompareRunner {
            active: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn start(&self, old_root: PathBuf, new_root: PathBuf) -> Result<RunHandle, RunnerBusy> {
        if self
            .active
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(RunnerBusy);
        }

        let (sender, events) = mpsc::channel();
        let cancel = Arc::new(AtomicBool::new(false));
        let worker_cancel = Arc::clone(&cancel);
        let active = Arc::clone(&self.active);

        thread::spawn(move || {
            // the receiver may already be gone, nothing useful to do then
            let _ = sender.send(RunEvent::Status("Comparing directories...".to_string()));

            let outcome = compare_paths_with_cancel(&old_root, &new_root, &worker_cancel);

            // release the slot before the terminal event so a caller that
            // observed the event can immediately start the next run
            active.store(false, Ordering::SeqCst);

            let event = match outcome {
                Ok(report) => RunEvent::Done(report),
                Err(SnapshotError::Cancelled) => RunEvent::Cancelled,
                Err(e) => RunEvent::Failed(e),
            };
            let _ = sender.send(event);
        });

        Ok(RunHandle { cancel, events })
    }
}

impl Default for CompareRunner {
    fn default() -> Self {
        Self::new()
    }
}

/// Blocking one-shot comparison of two directory trees. Walks both trees
/// concurrently, then diffs the snapshots and stamps run metadata onto the
/// report.
pub fn compare_paths(old_root: &Path, new_root: &Path) -> Result<ComparisonReport, SnapshotError> {
    compare_paths_with_cancel(old_root, new_root, &AtomicBool::new(false))
}

fn compare_paths_with_cancel(
    old_root: &Path,
    new_root: &Path,
    cancel: &AtomicBool,
) -> Result<ComparisonReport, SnapshotError> {
    let started = Instant::now();

    let (old, new) = take_snapshots(old_root, new_root, cancel);

    // a cancelled walk wins over whatever the other walk returned
    if matches!(old, Err(SnapshotError::Cancelled)) || matches!(new, Err(SnapshotError::Cancelled))
    {
        return Err(SnapshotError::Cancelled);
    }

    let old = old?;
    let new = new?;

    let mut report = diff::compare(&old, &new);
    report.duration_ms = Some(started.elapsed().as_millis());
    report.timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .map(|d| d.as_secs() as i64);
    report.peak_memory_bytes = memory_stats::memory_stats().map(|usage| usage.physical_mem);

    Ok(report)
}

// the walks are read-only and independent, so one runs on a scoped thread
// while the caller's thread takes the other
fn take_snapshots(
    old_root: &Path,
    new_root: &Path,
    cancel: &AtomicBool,
) -> (
    Result<Snapshot, SnapshotError>,
    Result<Snapshot, SnapshotError>,
) {
    thread::scope(|scope| {
        let old_walk = scope.spawn(|| snapshot::snapshot_with_cancel(old_root, cancel));
        let new = snapshot::snapshot_with_cancel(new_root, cancel);
        let old = old_walk.join().unwrap_or_else(|_| {
            Err(SnapshotError::Io {
                path: old_root.to_path_buf(),
                source: std::io::Error::other("snapshot worker panicked"),
            })
        });

        (old, new)
    })
}
