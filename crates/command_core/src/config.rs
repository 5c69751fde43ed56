//! Core configuration.

/// Tunables for the submission core, passed explicitly to the components
/// that consume them.
#[derive(Debug, Clone, Copy)]
pub struct CoreConfig {
    /// Number of frames the CPU may record ahead of the GPU. Controls the
    /// allocator ring size. One less than the swap-chain depth.
    pub queued_frame_count: usize,
    /// Maximum number of command lists the executor submits in a single
    /// batched queue call.
    pub max_batch_size: usize,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            // Triple-buffered swap chain, so two frames in flight.
            queued_frame_count: 2,
            max_batch_size: 64,
        }
    }
}
