//! Frame-indexed allocator ring.
//!
//! Gives a producer one backing store per queued frame so the CPU can
//! record frame `i + 1` while the GPU still executes frame `i`.

use crate::backend::CommandRecorder;
use anyhow::Result as AnyResult;

/// Round-robin ring of command recorders, one per queued frame.
///
/// The ring guarantees only *spacing*: a slot is reused every
/// `frame_count()` calls to [`reset_with_next`](Self::reset_with_next).
/// It is the caller's responsibility (enforced by frame pacing, not by
/// this type) that the GPU has finished consuming a slot's previous
/// recording by the time the slot comes around again.
pub struct FrameCommandRing<R: CommandRecorder> {
    slots: Vec<R>,
    index: usize,
}

impl<R: CommandRecorder> FrameCommandRing<R> {
    /// Build a ring from pre-constructed recorder slots.
    ///
    /// `slots.len()` is the queued-frame count and must be non-zero.
    pub fn new(slots: Vec<R>) -> Self {
        assert!(!slots.is_empty(), "allocator ring needs at least one slot");
        Self { slots, index: 0 }
    }

    /// Build a ring of `frame_count` slots from a fallible constructor.
    ///
    /// # Errors
    /// Returns the first slot-construction error.
    pub fn with_slots(
        frame_count: usize,
        mut make_slot: impl FnMut(usize) -> AnyResult<R>,
    ) -> AnyResult<Self> {
        let slots = (0..frame_count)
            .map(&mut make_slot)
            .collect::<AnyResult<Vec<R>>>()?;
        Ok(Self::new(slots))
    }

    /// Number of queued frames this ring spans.
    pub fn frame_count(&self) -> usize {
        self.slots.len()
    }

    /// Index of the slot most recently handed out.
    pub const fn current_index(&self) -> usize {
        self.index
    }

    /// Advance to the next slot, recycle its backing store, and return a
    /// fresh recording bound to `pipeline`.
    ///
    /// # Errors
    /// Returns an error if the slot's recorder fails to reset.
    pub fn reset_with_next(&mut self, pipeline: &R::PipelineState) -> AnyResult<R::CommandList> {
        self.index = (self.index + 1) % self.slots.len();
        self.slots[self.index].reset(pipeline)
    }
}
