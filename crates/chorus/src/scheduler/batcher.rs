use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::sync::oneshot;
use tokio::sync::Notify;
use tracing::debug;

use crate::communication::{Pill, Task};
use crate::config::SchedulerConfig;
use crate::error::{Error, Result};
use crate::request::SynthesisRequest;
use crate::scheduler::collector::{collect_batch, drain_ready};
use crate::scheduler::core_trait::{SpeechBatcher, SpeechEngine};
use crate::scheduler::executor::BatchExecutor;
use crate::scheduler::worker::{SchedulerState, StateCell, WorkerHandle};
use crate::stream::SpeechHandle;

/// Idle backoff between empty collection cycles, so the loop never busy-spins
/// on a quiet queue.
const IDLE_BACKOFF: Duration = Duration::from_millis(10);

/// The micro-batching scheduler: one engine, many concurrent callers.
///
/// `Scheduler` owns a single [`SpeechEngine`] and a long-lived control loop
/// that alternates batch collection and batch execution. Callers submit
/// through [`SpeechBatcher::submit`] and receive a [`SpeechHandle`] for their
/// private result channel; submission never waits for synthesis.
///
/// A scheduler is an explicitly constructed value, not ambient state —
/// multiple independent schedulers (each with their own engine) can coexist
/// in one process, which is how the tests run.
///
/// Dropping the scheduler triggers the same graceful drain as
/// [`shutdown`](Scheduler::shutdown), fire-and-forget.
pub struct Scheduler {
    intake: mpsc::Sender<Task>,
    worker: WorkerHandle,
}

impl Scheduler {
    /// Validates `config`, takes ownership of `engine`, and spawns the
    /// control loop (`Stopped -> Running`).
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start<E: SpeechEngine>(engine: E, config: SchedulerConfig) -> Result<Self> {
        config.validate()?;

        let (intake, intake_rx) = mpsc::channel(config.intake_capacity());
        let pill = Pill::new();

        let worker = WorkerHandle::new(move |state, notifier| {
            tokio::spawn(async move {
                let moved_pill = pill;
                let executor = BatchExecutor::new(engine, config.executor_threads);
                scheduler_loop(state, notifier, intake_rx, executor, config).await;
                drop(moved_pill);
            })
        });

        Ok(Self { intake, worker })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SchedulerState {
        self.worker.state()
    }

    /// Approximate number of tasks waiting in the intake queue.
    ///
    /// A health-check hint, racy by nature.
    pub fn queued_hint(&self) -> usize {
        self.intake.max_capacity() - self.intake.capacity()
    }

    /// Graceful shutdown: `Running -> Draining -> Stopped`.
    ///
    /// Closes intake to new submissions, lets queued and in-flight tasks run
    /// to completion, and resolves once the loop has exited. Safe to call
    /// more than once.
    pub async fn shutdown(&self) {
        self.worker.begin_drain();
        if let Some(join) = self.worker.take_join() {
            let _ = join.await;
        }
    }
}

#[async_trait]
impl SpeechBatcher for Scheduler {
    async fn submit(&self, request: SynthesisRequest) -> Result<SpeechHandle> {
        // Boundary validation: a malformed request never becomes a task, and
        // its scoped resource is released right here by drop.
        request.validate()?;

        if self.worker.state() != SchedulerState::Running {
            return Err(Error::SchedulerUnavailable);
        }

        let (input, scope) = request.into_parts();
        let (tx, rx) = oneshot::channel();
        let task = Task::new(input, tx);
        let id = task.id();

        // May suspend briefly on a full intake queue; a closed queue means
        // the drain won the race with the state check above.
        self.intake
            .send(task)
            .await
            .map_err(|_| Error::SchedulerUnavailable)?;

        debug!(task_id = %id, "task enqueued");
        Ok(SpeechHandle::new(id, rx, scope))
    }
}

/// The long-lived control loop: collect, execute, repeat.
///
/// In `Running`, alternates [`collect_batch`] and [`BatchExecutor::execute`].
/// On `Draining`, closes the intake so new sends fail, executes everything
/// still buffered, and exits (`-> Stopped`).
async fn scheduler_loop<E: SpeechEngine>(
    state: StateCell,
    notifier: Arc<Notify>,
    mut intake: mpsc::Receiver<Task>,
    executor: BatchExecutor<E>,
    config: SchedulerConfig,
) {
    debug!(
        max_batch_size = config.max_batch_size,
        max_wait_ms = config.max_wait.as_millis() as u64,
        "scheduler loop started"
    );

    loop {
        match state.get() {
            SchedulerState::Running => {
                let batch = collect_batch(
                    &mut intake,
                    config.max_batch_size,
                    config.max_wait,
                    &notifier,
                )
                .await;

                if batch.is_empty() {
                    if state.get() == SchedulerState::Running {
                        tokio::time::sleep(IDLE_BACKOFF).await;
                    }
                    continue;
                }

                executor.execute(batch).await;
            }
            SchedulerState::Draining => {
                intake.close();
                loop {
                    let batch = drain_ready(&mut intake, config.max_batch_size);
                    if batch.is_empty() {
                        break;
                    }
                    executor.execute(batch).await;
                }
                break;
            }
            SchedulerState::Stopped => break,
        }
    }

    state.set(SchedulerState::Stopped);
    debug!("scheduler loop stopped");
}
