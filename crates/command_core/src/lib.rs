//! Command-submission and resource-synchronization core of a real-time
//! renderer.
//!
//! This crate collects GPU work recorded concurrently by many render-pass
//! producers, submits it to a single GPU execution queue in order and in
//! efficient batches, and tracks the logical usage state of every GPU
//! resource so the correct transition barriers can be attached wherever a
//! resource changes usage (render target to readable texture, and so on).
//!
//! The core is backend-agnostic: GPU specifics live behind the
//! [`SubmitBackend`] and [`CommandRecorder`] traits (see the `wgpu_backend`
//! crate for the WGPU implementation).
//!
//! Typical frame flow:
//! 1. Register resources with the [`StateTracker`] as they are created.
//! 2. Each producer grabs a fresh recording from its [`FrameCommandRing`],
//!    requests transitions from the tracker, attaches the returned
//!    [`Barrier`]s and its draw work, closes the list, and pushes it to
//!    the [`SubmissionQueue`].
//! 3. The [`CommandListExecutor`]'s drain thread batches and submits.
//! 4. The orchestrator resets the executed-count before spawning
//!    producers and waits for it to reach the pass's list count.

pub mod backend;
pub mod config;
pub mod executor;
pub mod queue;
pub mod ring;
pub mod state;

pub use backend::{CommandRecorder, SubmitBackend};
pub use config::CoreConfig;
pub use executor::CommandListExecutor;
pub use queue::SubmissionQueue;
pub use ring::FrameCommandRing;
pub use state::{Barrier, ResourceId, ResourceState, StateTracker};
