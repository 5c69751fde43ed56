//! Multi-producer submission queue.
//!
//! Producers record command lists in parallel and push them here without
//! blocking; the executor owns the single consuming end. Lock-free for
//! producers by construction (crossbeam channel).

use crossbeam::channel::{Receiver, Sender, unbounded};
use log::warn;

/// Producer-facing handle to the submission queue.
///
/// Cheap to clone; every producer thread keeps its own handle. Pushing
/// never blocks. Ordering follows the channel's arrival order: FIFO per
/// handle, no promise across distinct producers.
pub struct SubmissionQueue<L> {
    sender: Sender<L>,
}

impl<L> SubmissionQueue<L> {
    /// Enqueue a closed command list for submission. Fire-and-forget.
    ///
    /// If the executor has already terminated, the list is dropped.
    pub fn push(&self, list: L) {
        if self.sender.send(list).is_err() {
            warn!(target: "command_core", "push after executor terminated; command list dropped");
        }
    }
}

impl<L> Clone for SubmissionQueue<L> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

/// Create a linked producer handle and consumer end.
///
/// The receiver is only ever handed to the executor's drain thread.
pub(crate) fn submission_channel<L>() -> (SubmissionQueue<L>, Receiver<L>) {
    let (sender, receiver) = unbounded();
    (SubmissionQueue { sender }, receiver)
}
