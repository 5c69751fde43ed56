//! Headless GPU device and queue initialization.

use anyhow::{Error as AnyhowError, anyhow};
use log::{error, info};
use std::sync::Arc;
use wgpu::*;

/// Owned handles to a headless WGPU device and its execution queue.
///
/// The submission core runs against exactly one of these; pass code
/// borrows the device for resource and encoder creation.
pub struct GpuContext {
    device: Arc<Device>,
    queue: Arc<Queue>,
    adapter: Adapter,
    _instance: Instance,
}

impl GpuContext {
    /// Initialize GPU device and queue without a surface.
    ///
    /// # Errors
    /// Returns an error if no suitable adapter is found or device
    /// creation fails.
    pub async fn new() -> Result<Self, AnyhowError> {
        let instance = Instance::new(&InstanceDescriptor {
            backends: Backends::PRIMARY | Backends::GL,
            ..Default::default()
        });
        let adapter = instance
            .request_adapter(&RequestAdapterOptions {
                power_preference: PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .map_err(|err| anyhow!("Failed to find a suitable GPU adapter: {err}"))?;
        info!(target: "wgpu_backend", "adapter: {}", adapter.get_info().name);

        let device_descriptor = DeviceDescriptor {
            label: Some("submission-core-device"),
            required_features: Features::empty(),
            required_limits: Limits::default(),
            memory_hints: MemoryHints::default(),
            trace: Trace::default(),
        };
        let (device, queue) = adapter
            .request_device(&device_descriptor)
            .await
            .map_err(|err| anyhow!("Failed to create GPU device: {err}"))?;

        // Device-level errors outside a scope are unrecoverable by engine
        // policy.
        device.on_uncaptured_error(Box::new(|error| {
            error!(target: "wgpu_backend", "Uncaptured WGPU error: {error:?}");
            std::process::abort();
        }));

        Ok(Self {
            device: Arc::new(device),
            queue: Arc::new(queue),
            adapter,
            _instance: instance,
        })
    }

    /// Synchronous wrapper around [`new`](Self::new).
    ///
    /// # Errors
    /// See [`new`](Self::new).
    pub fn new_blocking() -> Result<Self, AnyhowError> {
        pollster::block_on(Self::new())
    }

    /// The logical device.
    pub fn device(&self) -> &Arc<Device> {
        &self.device
    }

    /// The execution queue the submission core feeds.
    pub fn queue(&self) -> &Arc<Queue> {
        &self.queue
    }

    /// The chosen adapter.
    pub const fn adapter(&self) -> &Adapter {
        &self.adapter
    }
}
