//! Command list executor.
//!
//! A long-lived background thread that drains the submission queue in
//! batches and hands each batch to the backend's GPU queue in one call.
//! Progress is reported through a resettable executed-count that the frame
//! orchestrator polls (or blocks on) to learn when a known amount of work
//! has reached the GPU queue.

use crate::backend::SubmitBackend;
use crate::config::CoreConfig;
use crate::queue::{SubmissionQueue, submission_channel};
use anyhow::{Context as _, Result as AnyResult};
use crossbeam::channel::{Receiver, RecvTimeoutError};
use log::{debug, error};
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration;

/// How long the drain thread blocks on an empty queue before re-checking
/// the shutdown flag.
const DRAIN_WAIT: Duration = Duration::from_millis(1);

/// Executed-count shared between the drain thread and orchestrator threads.
///
/// A mutex/condvar pair rather than a bare atomic so that waiters can
/// block instead of spinning, while the reset/poll contract stays intact.
#[derive(Debug, Default)]
struct ExecutionProgress {
    count: Mutex<u64>,
    advanced: Condvar,
}

impl ExecutionProgress {
    fn reset(&self) {
        let mut count = self.count.lock().unwrap_or_else(PoisonError::into_inner);
        *count = 0;
    }

    fn get(&self) -> u64 {
        *self.count.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn add(&self, submitted: u64) {
        let mut count = self.count.lock().unwrap_or_else(PoisonError::into_inner);
        *count += submitted;
        self.advanced.notify_all();
    }

    fn wait_for(&self, target: u64, timeout: Duration) -> bool {
        let count = self.count.lock().unwrap_or_else(PoisonError::into_inner);
        let (count, wait) = self
            .advanced
            .wait_timeout_while(count, timeout, |current| *current < target)
            .unwrap_or_else(PoisonError::into_inner);
        !wait.timed_out() || *count >= target
    }
}

/// Batched submitter for one GPU execution queue.
///
/// Constructed explicitly (no global instance) and shared with producers
/// through cloned [`SubmissionQueue`] handles. Exactly one drain thread
/// exists per executor.
pub struct CommandListExecutor<B: SubmitBackend> {
    queue: SubmissionQueue<B::CommandList>,
    progress: Arc<ExecutionProgress>,
    shutdown: Arc<AtomicBool>,
    drain_thread: Option<JoinHandle<()>>,
}

impl<B: SubmitBackend> CommandListExecutor<B> {
    /// Construct the executor and start its drain thread.
    ///
    /// `config.max_batch_size` bounds how many command lists a single
    /// batched queue call may carry and must be greater than zero.
    ///
    /// # Errors
    /// Returns an error if the drain thread cannot be spawned.
    pub fn spawn(backend: B, config: &CoreConfig) -> AnyResult<Self> {
        assert!(config.max_batch_size > 0, "max_batch_size must be > 0");

        let (queue, receiver) = submission_channel();
        let progress = Arc::new(ExecutionProgress::default());
        let shutdown = Arc::new(AtomicBool::new(false));

        let max_batch_size = config.max_batch_size;
        let thread_progress = Arc::clone(&progress);
        let thread_shutdown = Arc::clone(&shutdown);
        let drain_thread = std::thread::Builder::new()
            .name("command-list-executor".into())
            .spawn(move || {
                drain_loop(
                    &backend,
                    &receiver,
                    &thread_progress,
                    &thread_shutdown,
                    max_batch_size,
                );
            })
            .context("failed to spawn command list executor thread")?;

        Ok(Self {
            queue,
            progress,
            shutdown,
            drain_thread: Some(drain_thread),
        })
    }

    /// A producer handle for pushing closed command lists.
    pub fn queue(&self) -> SubmissionQueue<B::CommandList> {
        self.queue.clone()
    }

    /// Zero the executed-count before orchestrating a unit of work.
    ///
    /// Usage: reset, push the N lists for this pass, then poll
    /// [`executed_count`](Self::executed_count) (or block on
    /// [`wait_for_executed`](Self::wait_for_executed)) until it reaches N.
    pub fn reset_executed_count(&self) {
        self.progress.reset();
    }

    /// Number of command lists submitted to the GPU queue since the last
    /// reset.
    pub fn executed_count(&self) -> u64 {
        self.progress.get()
    }

    /// Block until the executed-count reaches `target` or `timeout`
    /// elapses. Returns whether the target was reached.
    pub fn wait_for_executed(&self, target: u64, timeout: Duration) -> bool {
        self.progress.wait_for(target, timeout)
    }

    /// Stop the drain thread and wait for it to exit.
    ///
    /// Lists still queued are dropped unsubmitted. GPU work already
    /// submitted is neither cancelled nor awaited.
    pub fn terminate(mut self) {
        self.shutdown_and_join();
    }

    fn shutdown_and_join(&mut self) {
        self.shutdown.store(true, Ordering::Release);
        if let Some(handle) = self.drain_thread.take() {
            if handle.join().is_err() {
                error!(target: "command_core", "command list executor thread panicked");
            }
        }
    }
}

impl<B: SubmitBackend> Drop for CommandListExecutor<B> {
    fn drop(&mut self) {
        self.shutdown_and_join();
    }
}

/// Drain the queue until shutdown: block briefly for the first list, then
/// opportunistically take up to `max_batch_size` and submit them in one
/// backend call.
fn drain_loop<B: SubmitBackend>(
    backend: &B,
    receiver: &Receiver<B::CommandList>,
    progress: &ExecutionProgress,
    shutdown: &AtomicBool,
    max_batch_size: usize,
) {
    debug!(target: "command_core", "executor drain loop started (max batch {max_batch_size})");
    let mut batch = Vec::with_capacity(max_batch_size);

    while !shutdown.load(Ordering::Acquire) {
        match receiver.recv_timeout(DRAIN_WAIT) {
            Ok(first) => {
                batch.push(first);
                while batch.len() < max_batch_size {
                    match receiver.try_recv() {
                        Ok(list) => batch.push(list),
                        Err(_) => break,
                    }
                }

                let submitted = batch.len();
                let span = tracing::trace_span!("submit_batch", size = submitted);
                let _entered = span.enter();
                if let Err(err) = backend.submit_batch(batch.drain(..).collect()) {
                    // GPU queue errors are unrecoverable by engine policy.
                    error!(target: "command_core", "fatal submission failure: {err:?}");
                    process::abort();
                }
                progress.add(submitted as u64);
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    debug!(target: "command_core", "executor drain loop exited");
}
