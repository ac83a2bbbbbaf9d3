/// Slice tracker - per-submission list of slices displaced by renames
///
/// One tracker per in-flight submission (command buffer). Slices displaced
/// while recording it are tracked here, and go back to their buffers' pools
/// when the submission layer resets the tracker after the GPU finished.

use std::sync::Arc;
use crate::engine_trace;
use crate::memory::{LogicalBuffer, PhysicalBufferSlice};

struct TrackedSlice {
    buffer: Arc<LogicalBuffer>,
    slice: PhysicalBufferSlice,
}

/// Deferred free-list of (buffer, slice) pairs
///
/// Dropping a tracker without resetting it keeps its slices out of their
/// pools for good; they are released with the physical buffers.
#[derive(Default)]
pub struct SliceTracker {
    entries: Vec<TrackedSlice>,
}

impl SliceTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Record a slice displaced from `buffer` by a rename
    pub fn track(&mut self, buffer: Arc<LogicalBuffer>, slice: PhysicalBufferSlice) {
        self.entries.push(TrackedSlice { buffer, slice });
    }

    /// Return every tracked slice to its buffer's pool, in tracking order
    ///
    /// Must only be called once the submission this tracker belongs to has
    /// completed on the GPU. Timing is not checked here.
    pub fn reset(&mut self) {
        let count = self.entries.len();
        for entry in self.entries.drain(..) {
            entry.buffer.free_slice(entry.slice);
        }
        if count > 0 {
            engine_trace!("galaxy3d::SliceTracker", "Released {} slices", count);
        }
    }

    /// Number of tracked slices
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no slice is tracked
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "slice_tracker_tests.rs"]
mod tests;
