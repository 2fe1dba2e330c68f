//! Background build worker.
//!
//! One worker thread executes the entire pipeline; the control surface
//! reads transient progress text while it runs and takes the session
//! after it reaches `ReadyForExport`. Concurrent builds are not
//! supported: a new build request cancels and joins the previous
//! worker before spawning.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use parking_lot::Mutex;

use crate::adapter::ArtifactAdapter;
use crate::pipeline::{run_build, BuildPolicy};
use crate::session::Session;

/// Error raised by worker lifecycle calls.
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    /// The worker thread panicked; the session is lost.
    #[error("build worker panicked")]
    Panicked,
}

/// Cooperative cancellation flag.
///
/// Checked by the pipeline between records only; a cancelled adapter
/// finishes its current record first.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// A token in the not-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Single-slot progress channel: holds only the latest status line.
#[derive(Debug, Clone, Default)]
pub struct ProgressSlot {
    slot: Arc<Mutex<Option<String>>>,
}

impl ProgressSlot {
    /// An empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the slot content with the latest status line.
    pub fn publish(&self, text: impl Into<String>) {
        *self.slot.lock() = Some(text.into());
    }

    /// Read the latest status line without consuming it.
    pub fn latest(&self) -> Option<String> {
        self.slot.lock().clone()
    }
}

/// A spawned build running on its own thread.
pub struct BuildWorker {
    handle: JoinHandle<Session>,
    cancel: CancelToken,
    progress: ProgressSlot,
}

impl BuildWorker {
    /// Spawn the pipeline over the given adapters.
    pub fn spawn(adapters: Vec<Box<dyn ArtifactAdapter>>, policy: BuildPolicy) -> Self {
        let cancel = CancelToken::new();
        let progress = ProgressSlot::new();
        let worker_cancel = cancel.clone();
        let worker_progress = progress.clone();
        let handle = std::thread::spawn(move || {
            run_build(adapters, policy, &worker_cancel, &worker_progress)
        });
        Self { handle, cancel, progress }
    }

    /// Request cancellation; the worker still runs to `ReadyForExport`
    /// over whatever was collected.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Latest progress line.
    pub fn progress(&self) -> Option<String> {
        self.progress.latest()
    }

    /// Whether the pipeline has finished.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Block until the pipeline finishes and take the session.
    pub fn join(self) -> Result<Session, WorkerError> {
        self.handle.join().map_err(|_| WorkerError::Panicked)
    }
}

/// Owns at most one in-flight build and enforces supersession.
#[derive(Default)]
pub struct TimelineBuilder {
    policy: BuildPolicy,
    active: Option<BuildWorker>,
}

impl TimelineBuilder {
    /// A builder with the given policy.
    pub fn new(policy: BuildPolicy) -> Self {
        Self { policy, active: None }
    }

    /// Start a build, superseding any in-flight one.
    ///
    /// The previous worker is cancelled and joined first, so at most
    /// one build ever runs and the handoff is deterministic.
    pub fn start(&mut self, adapters: Vec<Box<dyn ArtifactAdapter>>) -> Result<(), WorkerError> {
        if let Some(previous) = self.active.take() {
            previous.cancel();
            previous.join()?;
        }
        self.active = Some(BuildWorker::spawn(adapters, self.policy.clone()));
        Ok(())
    }

    /// Request cancellation of the in-flight build, if any.
    pub fn cancel(&self) {
        if let Some(worker) = &self.active {
            worker.cancel();
        }
    }

    /// Latest progress line from the in-flight build.
    pub fn progress(&self) -> Option<String> {
        self.active.as_ref().and_then(|w| w.progress())
    }

    /// Join the in-flight build and take its session.
    pub fn finish(&mut self) -> Result<Option<Session>, WorkerError> {
        match self.active.take() {
            Some(worker) => worker.join().map(Some),
            None => Ok(None),
        }
    }
}
