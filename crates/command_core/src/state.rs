//! Resource state tracking.
//!
//! Authoritative record of each GPU resource's current logical usage state,
//! and the sole source of correct transition barriers. Access is serialized
//! per entry (DashMap shard/entry locks), not behind one engine-wide lock,
//! so transitions on disjoint resources proceed without contention.

use dashmap::DashMap;
use log::trace;
use std::sync::atomic::{AtomicU64, Ordering};

/// Opaque handle identifying a tracked GPU resource.
///
/// Handles are minted by whichever registry owns resource creation; the
/// tracker never owns the resource itself, only its state annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceId(u64);

static NEXT_RESOURCE_ID: AtomicU64 = AtomicU64::new(1);

impl ResourceId {
    /// Mint a fresh, process-unique handle.
    pub fn next() -> Self {
        Self(NEXT_RESOURCE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Wrap an externally assigned identity.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw identity value.
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Logical usage mode a resource is currently validated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceState {
    /// Uninitialized or idle; the common starting state.
    Common,
    /// Bound as a color render target.
    RenderTarget,
    /// Readable from shaders.
    ShaderResource,
    /// Read-write from shaders.
    UnorderedAccess,
    /// Source of a copy operation.
    CopySource,
    /// Destination of a copy operation.
    CopyDest,
    /// Bound as a writable depth buffer.
    DepthWrite,
    /// Bound as a read-only depth buffer.
    DepthRead,
    /// Ready for presentation.
    Present,
}

/// Synchronization directive for one resource transition, to be attached
/// to a command list by the caller that requested it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Barrier {
    /// The transitioning resource.
    pub resource: ResourceId,
    /// `Some(index)` when the resource is tracked per subresource.
    pub subresource: Option<u32>,
    /// State before the transition.
    pub before: ResourceState,
    /// State after the transition.
    pub after: ResourceState,
}

/// Tracking mode chosen at registration and fixed for the entry's lifetime.
#[derive(Debug)]
enum TrackedState {
    Whole(ResourceState),
    PerSubresource(Vec<ResourceState>),
}

/// Thread-safe map from resource identity to current logical state.
///
/// An explicit service object: construct one per device and share it by
/// reference (or `Arc`) with every component that creates, transitions,
/// or destroys tracked resources.
///
/// Preconditions (double registration, unknown resource, same-state
/// transition, wrong tracking mode) are contract violations, not runtime
/// errors: they fail fast via `debug_assert!`/`panic!` rather than
/// returning `Result`.
#[derive(Debug, Default)]
pub struct StateTracker {
    states: DashMap<ResourceId, TrackedState>,
}

impl StateTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource with whole-resource tracking.
    ///
    /// The resource must not already be tracked.
    pub fn add(&self, resource: ResourceId, initial: ResourceState) {
        let previous = self.states.insert(resource, TrackedState::Whole(initial));
        debug_assert!(
            previous.is_none(),
            "resource {resource:?} registered twice"
        );
        trace!(target: "command_core", "track {resource:?} at {initial:?}");
    }

    /// Register a resource with independent per-subresource tracking.
    ///
    /// The resource must not already be tracked and `initial` must name at
    /// least one subresource. The mode is fixed for the entry's lifetime.
    pub fn add_subresources(&self, resource: ResourceId, initial: Vec<ResourceState>) {
        debug_assert!(
            !initial.is_empty(),
            "resource {resource:?} registered with zero subresources"
        );
        let previous = self
            .states
            .insert(resource, TrackedState::PerSubresource(initial));
        debug_assert!(
            previous.is_none(),
            "resource {resource:?} registered twice"
        );
    }

    /// Current state of a whole-resource-tracked entry.
    pub fn state_of(&self, resource: ResourceId) -> ResourceState {
        let entry = self
            .states
            .get(&resource)
            .unwrap_or_else(|| panic!("state query on untracked resource {resource:?}"));
        match *entry {
            TrackedState::Whole(state) => state,
            TrackedState::PerSubresource(_) => {
                panic!("resource {resource:?} is tracked per subresource")
            }
        }
    }

    /// Current state of one subresource of a per-subresource-tracked entry.
    pub fn subresource_state_of(&self, resource: ResourceId, index: u32) -> ResourceState {
        let entry = self
            .states
            .get(&resource)
            .unwrap_or_else(|| panic!("state query on untracked resource {resource:?}"));
        match *entry {
            TrackedState::Whole(_) => {
                panic!("resource {resource:?} is tracked whole-resource")
            }
            TrackedState::PerSubresource(ref states) => states[index as usize],
        }
    }

    /// Swap a whole-resource entry to `new_state` and return the barrier
    /// describing the transition.
    ///
    /// The read-swap pair happens under the entry lock, so concurrent
    /// transitions on the same resource serialize and no update is lost.
    /// `new_state` must differ from the current state.
    pub fn transition(&self, resource: ResourceId, new_state: ResourceState) -> Barrier {
        let mut entry = self
            .states
            .get_mut(&resource)
            .unwrap_or_else(|| panic!("transition on untracked resource {resource:?}"));
        match *entry {
            TrackedState::Whole(ref mut current) => {
                debug_assert_ne!(
                    *current, new_state,
                    "transition of {resource:?} to its current state"
                );
                let before = *current;
                *current = new_state;
                trace!(target: "command_core", "{resource:?}: {before:?} -> {new_state:?}");
                Barrier {
                    resource,
                    subresource: None,
                    before,
                    after: new_state,
                }
            }
            TrackedState::PerSubresource(_) => {
                panic!("whole-resource transition on per-subresource resource {resource:?}")
            }
        }
    }

    /// Per-subresource variant of [`transition`](Self::transition).
    pub fn transition_subresource(
        &self,
        resource: ResourceId,
        index: u32,
        new_state: ResourceState,
    ) -> Barrier {
        let mut entry = self
            .states
            .get_mut(&resource)
            .unwrap_or_else(|| panic!("transition on untracked resource {resource:?}"));
        match *entry {
            TrackedState::Whole(_) => {
                panic!("subresource transition on whole-resource-tracked {resource:?}")
            }
            TrackedState::PerSubresource(ref mut states) => {
                let current = &mut states[index as usize];
                debug_assert_ne!(
                    *current, new_state,
                    "transition of {resource:?}[{index}] to its current state"
                );
                let before = *current;
                *current = new_state;
                Barrier {
                    resource,
                    subresource: Some(index),
                    before,
                    after: new_state,
                }
            }
        }
    }

    /// Unregister a destroyed resource. The resource must be tracked.
    pub fn remove(&self, resource: ResourceId) {
        let removed = self.states.remove(&resource);
        debug_assert!(removed.is_some(), "remove of untracked resource {resource:?}");
        trace!(target: "command_core", "untrack {resource:?}");
    }

    /// Number of tracked entries.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether no resources are tracked.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
