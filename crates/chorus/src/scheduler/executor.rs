//! Batch execution: running collected tasks against the engine.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::Semaphore;
use tokio::task;
use tracing::{debug, warn};

use crate::audio::AudioChunk;
use crate::communication::{Task, TaskResult};
use crate::error::EngineFault;
use crate::request::SynthesisInput;
use crate::scheduler::core_trait::SpeechEngine;

/// Runs every task in a collected batch, one at a time, in arrival order.
///
/// The engine lives behind a mutex that nothing else holds; combined with the
/// loop awaiting each invocation before starting the next, no two engine
/// invocations ever overlap. Each invocation runs on the blocking pool so the
/// control loop stays responsive while synthesis is in flight.
pub(crate) struct BatchExecutor<E: SpeechEngine> {
    engine: Arc<Mutex<E>>,

    /// Bounds blocking-pool threads used for engine work.
    permits: Arc<Semaphore>,
}

impl<E: SpeechEngine> BatchExecutor<E> {
    pub fn new(engine: E, executor_threads: usize) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            permits: Arc::new(Semaphore::new(executor_threads)),
        }
    }

    /// Executes one batch to completion.
    ///
    /// A fault while processing task *k* is delivered only on task *k*'s
    /// result channel; tasks *k+1..n* still run, and the loop never observes
    /// the fault. Exactly one terminal message is sent per task.
    pub async fn execute(&self, batch: Vec<Task>) {
        debug!(batch_size = batch.len(), "executing batch");

        for task in batch {
            let (id, input, sender) = task.into_parts();
            let result = self.invoke(input).await;

            if let Err(fault) = &result {
                warn!(task_id = %id, %fault, "task failed");
            }
            if sender.send(result).is_err() {
                // Caller hung up before delivery; the engine work is simply
                // discarded (transport abort, not an engine failure).
                debug!(task_id = %id, "caller disconnected before terminal message");
            }
        }
    }

    /// One engine invocation on the blocking pool.
    ///
    /// A panic inside the engine surfaces as a `JoinError` and is converted
    /// to a fault for the owning task alone.
    async fn invoke(&self, input: SynthesisInput) -> TaskResult {
        let engine = self.engine.clone();
        let permit = self.permits.clone().acquire_owned().await.ok();

        let joined = task::spawn_blocking(move || {
            let _permit = permit;
            let mut engine = engine.lock().unwrap_or_else(PoisonError::into_inner);
            run_one(&mut *engine, &input)
        })
        .await;

        match joined {
            Ok(result) => result,
            Err(join_error) => {
                warn!(%join_error, "engine worker panicked");
                Err(EngineFault::new("engine worker panicked"))
            }
        }
    }
}

/// Drives one invocation's chunk sequence to completion.
///
/// The sequence is finite and non-restartable; the first fault wins and any
/// partial output is discarded.
fn run_one<E: SpeechEngine>(engine: &mut E, input: &SynthesisInput) -> TaskResult {
    let mut chunks: Vec<AudioChunk> = Vec::new();
    for produced in engine.synthesize(input)? {
        chunks.push(produced?);
    }
    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    use crate::testing::MockEngine;

    fn make_task(text: &str) -> (Task, oneshot::Receiver<TaskResult>) {
        let (tx, rx) = oneshot::channel();
        let task = Task::new(MockEngine::input(text), tx);
        (task, rx)
    }

    #[tokio::test]
    async fn sequential_success_delivery() {
        let engine = MockEngine::default();
        let executor = BatchExecutor::new(engine, 1);

        let (t1, rx1) = make_task("first");
        let (t2, rx2) = make_task("second");
        executor.execute(vec![t1, t2]).await;

        let first = rx1.await.unwrap().unwrap();
        let second = rx2.await.unwrap().unwrap();
        assert!(!first.is_empty());
        assert!(!second.is_empty());
    }

    #[tokio::test]
    async fn fault_is_isolated_to_its_task() {
        let engine = MockEngine::default();
        let executor = BatchExecutor::new(engine, 1);

        let (t1, rx1) = make_task("ok");
        let (t2, rx2) = make_task("!fault");
        let (t3, rx3) = make_task("also ok");
        executor.execute(vec![t1, t2, t3]).await;

        assert!(rx1.await.unwrap().is_ok());
        assert!(rx2.await.unwrap().is_err());
        assert!(rx3.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn mid_sequence_fault_discards_partial_output() {
        let engine = MockEngine::default();
        let executor = BatchExecutor::new(engine, 1);

        let (task, rx) = make_task("!midfault");
        executor.execute(vec![task]).await;

        let fault = rx.await.unwrap().expect_err("mid-sequence fault");
        assert!(fault.to_string().contains("mid-sequence"));
    }

    #[tokio::test]
    async fn engine_panic_becomes_a_fault_for_that_task_only() {
        let engine = MockEngine::default();
        let executor = BatchExecutor::new(engine, 1);

        let (t1, rx1) = make_task("!panic");
        let (t2, rx2) = make_task("survivor");
        executor.execute(vec![t1, t2]).await;

        let fault = rx1.await.unwrap().expect_err("panic converted to fault");
        assert!(fault.to_string().contains("panicked"));
        assert!(rx2.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn dropped_receiver_does_not_disturb_the_batch() {
        let engine = MockEngine::default();
        let executor = BatchExecutor::new(engine, 1);

        let (t1, rx1) = make_task("abandoned");
        drop(rx1);
        let (t2, rx2) = make_task("kept");
        executor.execute(vec![t1, t2]).await;

        assert!(rx2.await.unwrap().is_ok());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn engine_is_never_invoked_concurrently() {
        let engine = MockEngine::with_latency(std::time::Duration::from_millis(5));
        let observed_max = engine.max_concurrent();
        let executor = Arc::new(BatchExecutor::new(engine, 4));

        let mut receivers = Vec::new();
        let mut handles = Vec::new();
        for i in 0..4 {
            let (task, rx) = make_task(&format!("t{i}"));
            receivers.push(rx);
            let executor = executor.clone();
            handles.push(tokio::spawn(
                async move { executor.execute(vec![task]).await },
            ));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        for rx in receivers {
            assert!(rx.await.unwrap().is_ok());
        }

        assert_eq!(
            observed_max.load(std::sync::atomic::Ordering::SeqCst),
            1,
            "engine invocations overlapped"
        );
    }
}
