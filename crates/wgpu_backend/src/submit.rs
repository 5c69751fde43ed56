//! WGPU submission backend.

use crate::gpu_context::GpuContext;
use anyhow::{Result as AnyResult, anyhow};
use command_core::SubmitBackend;
use log::{debug, error};
use pollster::block_on;
use std::sync::Arc;
use wgpu::{CommandBuffer, Device, ErrorFilter, Queue};

/// Submits batches of finished command buffers to one `wgpu::Queue`,
/// with a validation error scope around each batched call so queue-level
/// failures surface as errors instead of passing silently.
pub struct WgpuSubmitBackend {
    device: Arc<Device>,
    queue: Arc<Queue>,
}

impl WgpuSubmitBackend {
    /// Bind the backend to a context's device and queue.
    pub fn new(context: &GpuContext) -> Self {
        Self {
            device: Arc::clone(context.device()),
            queue: Arc::clone(context.queue()),
        }
    }
}

impl SubmitBackend for WgpuSubmitBackend {
    type CommandList = CommandBuffer;

    fn submit_batch(&self, lists: Vec<CommandBuffer>) -> AnyResult<()> {
        debug!(target: "wgpu_backend", "submitting batch of {}", lists.len());
        self.device.push_error_scope(ErrorFilter::Validation);
        self.queue.submit(lists);
        if let Some(err) = block_on(self.device.pop_error_scope()) {
            error!(target: "wgpu_backend", "WGPU error (scoped submit): {err:?}");
            return Err(anyhow!("wgpu scoped error on submit: {err:?}"));
        }
        Ok(())
    }
}
