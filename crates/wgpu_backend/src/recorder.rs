//! Encoder-backed command recording.
//!
//! WGPU command encoders are one-shot, so "resetting" a ring slot means
//! creating a fresh encoder under the slot's label. The slot still gives
//! the spacing guarantee the allocator ring is for: a label's encoder is
//! recycled once per ring revolution.

use crate::gpu_context::GpuContext;
use anyhow::Result as AnyResult;
use command_core::{Barrier, CommandRecorder};
use log::trace;
use std::sync::Arc;
use wgpu::{CommandBuffer, CommandEncoder, CommandEncoderDescriptor, Device, RenderPipeline};

/// Pipeline configuration a fresh recording is bound to.
#[derive(Clone, Default)]
pub struct RecorderPipeline {
    /// Debug label stamped on the encoder.
    pub label: Option<&'static str>,
    /// Pipeline the pass opens with, if any.
    pub render_pipeline: Option<Arc<RenderPipeline>>,
}

impl RecorderPipeline {
    /// A label-only configuration (no pipeline bound up front).
    pub const fn labeled(label: &'static str) -> Self {
        Self {
            label: Some(label),
            render_pipeline: None,
        }
    }
}

/// One allocator-ring slot: yields a fresh labeled encoder per reset.
pub struct EncoderRecorder {
    device: Arc<Device>,
}

impl EncoderRecorder {
    /// Create a recorder slot on the context's device.
    pub fn new(context: &GpuContext) -> Self {
        Self {
            device: Arc::clone(context.device()),
        }
    }
}

impl CommandRecorder for EncoderRecorder {
    type PipelineState = RecorderPipeline;
    type CommandList = RecordedList;

    fn reset(&mut self, pipeline: &RecorderPipeline) -> AnyResult<Self::CommandList> {
        let encoder = self.device.create_command_encoder(&CommandEncoderDescriptor {
            label: pipeline.label,
        });
        Ok(RecordedList {
            encoder,
            pipeline: pipeline.render_pipeline.clone(),
        })
    }
}

/// An open recording plus the pipeline its pass should bind.
pub struct RecordedList {
    /// The underlying encoder; pass code records into it directly.
    pub encoder: CommandEncoder,
    pipeline: Option<Arc<RenderPipeline>>,
}

impl RecordedList {
    /// Pipeline to bind when opening this recording's render pass.
    pub fn pipeline(&self) -> Option<&RenderPipeline> {
        self.pipeline.as_deref()
    }

    /// Note the tracker-issued transitions this recording depends on.
    ///
    /// WGPU inserts the actual hazards internally; the barriers are logged
    /// so pass code ported from explicit-barrier backends keeps its shape
    /// and the transition order stays auditable.
    pub fn attach_barriers(&mut self, barriers: &[Barrier]) {
        for barrier in barriers {
            trace!(
                target: "wgpu_backend",
                "{:?}{}: {:?} -> {:?}",
                barrier.resource,
                barrier
                    .subresource
                    .map(|index| format!("[{index}]"))
                    .unwrap_or_default(),
                barrier.before,
                barrier.after
            );
        }
    }

    /// Close the recording into a submittable command buffer.
    pub fn finish(self) -> CommandBuffer {
        self.encoder.finish()
    }
}
