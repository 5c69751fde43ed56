//! Submission backend abstraction.
//!
//! Defines the traits that allow the submission core to drive different
//! GPU implementations (WGPU, a software queue for tests, etc.) without
//! knowing anything about their command or pipeline types.

use anyhow::Result as AnyResult;

/// A sink that accepts batches of closed command lists.
///
/// Implementations wrap a single GPU execution queue. One `submit_batch`
/// call corresponds to one batched submission on that queue.
pub trait SubmitBackend: Send + Sync + 'static {
    /// Closed, replayable command sequence accepted by this backend.
    type CommandList: Send + 'static;

    /// Submit a batch of command lists in order.
    ///
    /// # Errors
    /// Returns an error if the GPU queue rejects the submission. The engine
    /// treats submission errors as unrecoverable; the executor escalates
    /// them to process termination.
    fn submit_batch(&self, lists: Vec<Self::CommandList>) -> AnyResult<()>;
}

/// A recyclable backing store that yields fresh command recordings.
///
/// One recorder corresponds to one ring slot: resetting it reclaims the
/// memory of the last recording made through it and opens a new one bound
/// to the given pipeline configuration.
pub trait CommandRecorder: Send {
    /// Pipeline configuration the fresh recording is bound to.
    type PipelineState;

    /// Recording handle produced by a reset.
    type CommandList;

    /// Recycle this slot's backing store and begin a fresh recording.
    ///
    /// # Errors
    /// Returns an error if the backend fails to reclaim the backing store
    /// or open a new recording.
    fn reset(&mut self, pipeline: &Self::PipelineState) -> AnyResult<Self::CommandList>;
}
