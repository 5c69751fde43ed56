//! WGPU implementation of the submission core's backend traits.
//!
//! Provides headless device/queue initialization ([`GpuContext`]), a
//! batched queue submitter ([`WgpuSubmitBackend`]), and encoder-backed
//! ring recording ([`EncoderRecorder`]).

pub mod gpu_context;
pub mod recorder;
pub mod submit;

pub use gpu_context::GpuContext;
pub use recorder::{EncoderRecorder, RecordedList, RecorderPipeline};
pub use submit::WgpuSubmitBackend;
