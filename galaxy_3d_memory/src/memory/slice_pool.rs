/// Slice pool - growable free-list of equally-strided physical slices
///
/// Each replenishment allocates one physical buffer holding `growth` slices,
/// cuts it into slices of `slice_stride` bytes (each exposing only
/// `slice_length` bytes) and doubles `growth` for the next time. Allocation
/// cost is amortized O(1) and the number of physical buffers grows
/// logarithmically with the peak number of slices in use.
///
/// Every operation runs under a single mutex. Nothing here waits for the GPU.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use crate::error::Result;
use crate::memory::{PhysicalBuffer, PhysicalBufferSlice};
use crate::{engine_debug, engine_err};

struct PoolState {
    /// Unused slices, popped from the back
    free: Vec<PhysicalBufferSlice>,
    /// Slices cut at the next replenishment
    next_growth: u32,
    /// Physical buffers allocated by this pool
    replenish_count: u32,
}

/// Free-list of pre-cut slices owned by one logical buffer
pub struct SlicePool {
    slice_length: u64,
    slice_stride: u64,
    state: Mutex<PoolState>,
}

impl SlicePool {
    /// Create an empty pool
    ///
    /// `initial_growth` (at least 1) is the number of slices cut by the first
    /// replenishment.
    pub fn new(slice_length: u64, slice_stride: u64, initial_growth: u32) -> Self {
        debug_assert!(slice_length <= slice_stride);
        debug_assert!(initial_growth >= 1);
        Self {
            slice_length,
            slice_stride,
            state: Mutex::new(PoolState {
                free: Vec::new(),
                next_growth: initial_growth,
                replenish_count: 0,
            }),
        }
    }

    /// Take one unused slice, replenishing the pool first if it is empty
    ///
    /// `allocate` is called with the byte size of the physical buffer to
    /// create, at most once, while the pool lock is held.
    ///
    /// # Errors
    ///
    /// Propagates the error returned by `allocate`. The pool and its growth
    /// count are left untouched in that case.
    pub fn acquire<F>(&self, allocate: F) -> Result<PhysicalBufferSlice>
    where
        F: FnOnce(u64) -> Result<Arc<dyn PhysicalBuffer>>,
    {
        let mut state = self.lock();

        if state.free.is_empty() {
            let count = state.next_growth;
            let size = self.slice_stride.checked_mul(count as u64)
                .ok_or_else(|| engine_err!("galaxy3d::SlicePool",
                    "Pool growth overflows: {} slices of {} bytes", count, self.slice_stride))?;

            let buffer = allocate(size)?;

            state.free.reserve(count as usize);
            for index in 0..count as u64 {
                state.free.push(PhysicalBufferSlice::new(
                    Arc::clone(&buffer),
                    self.slice_stride * index,
                    self.slice_length,
                ));
            }

            state.next_growth = count.saturating_mul(2);
            state.replenish_count += 1;

            engine_debug!("galaxy3d::SlicePool",
                "Replenished with {} slices ({} bytes), next growth {}",
                count, size, state.next_growth);
        }

        // Non-empty at this point: either it already was, or we just cut `count >= 1` slices
        state.free.pop()
            .ok_or_else(|| engine_err!("galaxy3d::SlicePool", "Free pool empty after replenishment"))
    }

    /// Return a slice to the free list
    ///
    /// No check is made that the GPU is done with the slice, nor that it was
    /// cut by this pool. See [`LogicalBuffer::free_slice`](crate::memory::LogicalBuffer::free_slice).
    pub fn release(&self, slice: PhysicalBufferSlice) {
        debug_assert_eq!(slice.length(), self.slice_length);
        self.lock().free.push(slice);
    }

    /// Number of unused slices
    pub fn free_count(&self) -> usize {
        self.lock().free.len()
    }

    /// Slices the next replenishment will cut
    pub fn next_growth_count(&self) -> u32 {
        self.lock().next_growth
    }

    /// Physical buffers allocated by replenishments so far
    pub fn replenish_count(&self) -> u32 {
        self.lock().replenish_count
    }

    pub fn slice_length(&self) -> u64 { self.slice_length }

    pub fn slice_stride(&self) -> u64 { self.slice_stride }

    // The state stays consistent across a panic (pushes and pops are atomic
    // with respect to the lock), so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, PoolState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "slice_pool_tests.rs"]
mod tests;
