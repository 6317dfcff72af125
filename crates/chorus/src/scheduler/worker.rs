//! Lifecycle management for the long-lived scheduler loop task.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;
use tokio::task::JoinHandle;

/// Lifecycle of a scheduler: `Stopped -> Running -> Draining -> Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// No loop is running; submissions fail.
    Stopped,
    /// The loop is collecting and executing batches.
    Running,
    /// Intake is closed; queued tasks still run to completion.
    Draining,
}

impl SchedulerState {
    fn as_u8(self) -> u8 {
        match self {
            SchedulerState::Stopped => 0,
            SchedulerState::Running => 1,
            SchedulerState::Draining => 2,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => SchedulerState::Running,
            2 => SchedulerState::Draining,
            _ => SchedulerState::Stopped,
        }
    }
}

/// Shared, atomically updated lifecycle state.
#[derive(Clone)]
pub(crate) struct StateCell(Arc<AtomicU8>);

impl StateCell {
    pub fn new(state: SchedulerState) -> Self {
        Self(Arc::new(AtomicU8::new(state.as_u8())))
    }

    pub fn get(&self) -> SchedulerState {
        SchedulerState::from_u8(self.0.load(Ordering::SeqCst))
    }

    pub fn set(&self, state: SchedulerState) {
        self.0.store(state.as_u8(), Ordering::SeqCst);
    }

    /// Single-winner state transition.
    pub fn transition(&self, from: SchedulerState, to: SchedulerState) -> bool {
        self.0
            .compare_exchange(from.as_u8(), to.as_u8(), Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }
}

/// A handle for managing the background scheduler loop task.
///
/// Spawns the loop, exposes its lifecycle state, wakes it for shutdown, and
/// guarantees teardown when dropped. One handle exists per engine; it is the
/// enforcement point for the process-wide at-most-one-loop invariant.
pub(crate) struct WorkerHandle {
    /// Shared lifecycle state, also read by the loop itself.
    state: StateCell,

    /// Handle to the spawned loop task; taken on shutdown.
    handle: Mutex<Option<JoinHandle<()>>>,

    /// Wakes the loop out of its idle wait so it can observe a state change.
    notifier: Arc<Notify>,
}

impl WorkerHandle {
    /// Spawns the loop task and returns its handle.
    ///
    /// The closure receives the shared state cell (already `Running`) and the
    /// shutdown notifier, and must spawn the loop.
    pub fn new<F>(task: F) -> Self
    where
        F: FnOnce(StateCell, Arc<Notify>) -> JoinHandle<()>,
    {
        let state = StateCell::new(SchedulerState::Running);
        let notifier = Arc::new(Notify::new());
        let handle = task(state.clone(), notifier.clone());

        Self {
            state,
            handle: Mutex::new(Some(handle)),
            notifier,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state.get()
    }

    /// Moves `Running -> Draining` and wakes the loop. Returns `false` if the
    /// scheduler was not running (a second shutdown is a no-op).
    pub fn begin_drain(&self) -> bool {
        let transitioned =
            self.state
                .transition(SchedulerState::Running, SchedulerState::Draining);
        if transitioned {
            self.notifier.notify_one();
        }
        transitioned
    }

    /// Takes the join handle for awaiting drain completion. `None` after the
    /// first take.
    pub fn take_join(&self) -> Option<JoinHandle<()>> {
        self.handle.lock().ok().and_then(|mut slot| slot.take())
    }
}

impl Drop for WorkerHandle {
    /// Fire-and-forget teardown: initiate the drain and detach a task that
    /// awaits the loop, so queued work still completes.
    fn drop(&mut self) {
        self.begin_drain();
        if let Some(handle) = self.take_join() {
            if let Ok(rt) = tokio::runtime::Handle::try_current() {
                rt.spawn(async move {
                    let _ = handle.await;
                });
            }
        }
    }
}
