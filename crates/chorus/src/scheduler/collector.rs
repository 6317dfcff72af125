//! Batch collection: deciding when a batch is full enough to execute.

use std::time::Duration;

use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::Receiver;
use tokio::sync::Notify;
use tokio::time::{timeout, Instant};

use crate::communication::Task;

/// Collects the next batch from the intake queue.
///
/// Computes a deadline of `now + max_wait` and repeatedly pulls the next task
/// with a timeout equal to the remaining window. Collection stops when the
/// batch reaches `max_batch_size`, when a pull times out, or when `shutdown`
/// fires (so a drain request is observed without waiting out the window).
///
/// Tasks land in arrival order; no reordering or priority is applied. An
/// empty window yields an empty vec — the caller decides how to idle.
pub(crate) async fn collect_batch(
    intake: &mut Receiver<Task>,
    max_batch_size: usize,
    max_wait: Duration,
    shutdown: &Notify,
) -> Vec<Task> {
    let deadline = Instant::now() + max_wait;
    let mut batch = Vec::with_capacity(max_batch_size);

    while batch.len() < max_batch_size {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }

        tokio::select! {
            _ = shutdown.notified() => break,
            pulled = timeout(remaining, intake.recv()) => match pulled {
                Ok(Some(task)) => batch.push(task),
                // Intake closed: whatever is in hand is the final batch of
                // this phase.
                Ok(None) => break,
                Err(_) => break,
            },
        }
    }

    batch
}

/// Drains already-buffered tasks without waiting, up to `max_batch_size`.
///
/// Used while draining: the intake is closed, so everything still reachable
/// is already in the queue.
pub(crate) fn drain_ready(intake: &mut Receiver<Task>, max_batch_size: usize) -> Vec<Task> {
    let mut batch = Vec::new();
    while batch.len() < max_batch_size {
        match intake.try_recv() {
            Ok(task) => batch.push(task),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
        }
    }
    batch
}
