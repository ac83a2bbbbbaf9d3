/// Logical buffer - stable buffer handle backed by a rotating set of physical slices
///
/// Architecture:
/// - The application-facing layer holds an `Arc<LogicalBuffer>`
/// - `current_slice()` is what GPU commands recorded now should bind
/// - `rename()` swaps in a fresh slice (discard-write) and bumps `revision()`
/// - The displaced slice goes to a `SliceTracker` and returns to the pool
///   only once the submission that may still read it has completed
///
/// Buffer views and tracker entries share ownership of the logical buffer;
/// the logical buffer never references them back.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use crate::config::BufferConfig;
use crate::error::Result;
use crate::memory::{
    BufferDesc, MemoryProperties, PhysicalBuffer, PhysicalBufferSlice, PhysicalMemoryBackend,
    SlicePool, SliceTracker,
};
use crate::utils::align_up;
use crate::{engine_bail_warn, engine_debug, engine_trace};

// ===== LOGICAL BUFFER DESC =====

/// Creation parameters of a logical buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogicalBufferDesc {
    /// Logical size and usage (copied into every physical allocation)
    pub buffer: BufferDesc,
    /// Memory property class of every physical allocation
    pub memory: MemoryProperties,
    /// Slice pool tuning
    pub config: BufferConfig,
}

impl LogicalBufferDesc {
    /// Descriptor with the default pool configuration
    pub fn new(buffer: BufferDesc, memory: MemoryProperties) -> Self {
        Self { buffer, memory, config: BufferConfig::default() }
    }
}

// ===== LOGICAL BUFFER =====

/// Current slice and the revision it was installed at, swapped together
struct ActiveSlice {
    slice: PhysicalBufferSlice,
    revision: u64,
}

/// Logical GPU buffer with renaming support
pub struct LogicalBuffer {
    backend: Arc<dyn PhysicalMemoryBackend>,
    desc: BufferDesc,
    memory: MemoryProperties,
    config: BufferConfig,
    slice_length: u64,
    slice_stride: u64,
    active: RwLock<ActiveSlice>,
    pool: SlicePool,
}

impl LogicalBuffer {
    /// Create a logical buffer and its initial slice
    ///
    /// Allocates one physical buffer holding exactly one slice; the pool
    /// starts empty.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidResource` for a zero size, a zero initial slice count,
    ///   an alignment that is not a power of two, or a size whose aligned
    ///   stride does not fit in a `u64`
    /// - Any error of the initial physical allocation
    pub fn new(
        backend: Arc<dyn PhysicalMemoryBackend>,
        desc: LogicalBufferDesc,
    ) -> Result<Arc<Self>> {
        // ========== VALIDATION ==========
        if desc.buffer.size == 0 {
            engine_bail_warn!("galaxy3d::LogicalBuffer", "Buffer size must not be zero");
        }
        if desc.config.initial_slice_count == 0 {
            engine_bail_warn!("galaxy3d::LogicalBuffer", "Initial slice count must be at least 1");
        }
        if !desc.config.slice_alignment.is_power_of_two() {
            engine_bail_warn!("galaxy3d::LogicalBuffer",
                "Slice alignment {} is not a power of two", desc.config.slice_alignment);
        }

        let slice_length = desc.buffer.size;
        let Some(slice_stride) = align_up(slice_length, desc.config.slice_alignment) else {
            engine_bail_warn!("galaxy3d::LogicalBuffer",
                "Buffer size {} overflows slice alignment {}", slice_length, desc.config.slice_alignment);
        };

        // ========== INITIAL SLICE ==========
        let initial = allocate_physical(backend.as_ref(), &desc.buffer, desc.memory, slice_stride)?;

        Ok(Arc::new(Self {
            backend,
            desc: desc.buffer,
            memory: desc.memory,
            config: desc.config,
            slice_length,
            slice_stride,
            active: RwLock::new(ActiveSlice {
                slice: PhysicalBufferSlice::new(initial, 0, slice_length),
                revision: 0,
            }),
            pool: SlicePool::new(slice_length, slice_stride, desc.config.initial_slice_count),
        }))
    }

    // ===== ACCESSORS =====

    /// Creation parameters (size is the logical size)
    pub fn desc(&self) -> &BufferDesc { &self.desc }

    /// Memory property class of the physical allocations
    pub fn memory_properties(&self) -> MemoryProperties { self.memory }

    /// Pool configuration
    pub fn config(&self) -> &BufferConfig { &self.config }

    /// Logical size in bytes; every slice handed out has exactly this length
    pub fn slice_length(&self) -> u64 { self.slice_length }

    /// Distance between consecutive slices in a physical buffer
    pub fn slice_stride(&self) -> u64 { self.slice_stride }

    /// Slice that commands recorded from now on should bind
    ///
    /// The returned value stays usable after a rename (it keeps its physical
    /// buffer alive) but no longer describes the buffer's contents.
    pub fn current_slice(&self) -> PhysicalBufferSlice {
        self.read_active().slice.clone()
    }

    /// Number of renames performed so far
    pub fn revision(&self) -> u64 {
        self.read_active().revision
    }

    /// Current slice and revision, read together
    pub fn snapshot(&self) -> (PhysicalBufferSlice, u64) {
        let active = self.read_active();
        (active.slice.clone(), active.revision)
    }

    /// Host address of byte `offset` of the current slice
    pub fn map_ptr(&self, offset: u64) -> Option<*mut u8> {
        self.read_active().slice.map_ptr(offset)
    }

    /// Physical buffers allocated so far (initial one included)
    pub fn physical_buffer_count(&self) -> u32 {
        1 + self.pool.replenish_count()
    }

    /// Unused slices currently in the pool
    pub fn free_slice_count(&self) -> usize {
        self.pool.free_count()
    }

    /// Slices the next pool replenishment will cut
    pub fn next_growth_count(&self) -> u32 {
        self.pool.next_growth_count()
    }

    // ===== RENAMING =====

    /// Install `slice` as the current slice and return the previous one
    ///
    /// Increments the revision by exactly one. Never touches the pool: the
    /// replacement comes from [`alloc_slice`](Self::alloc_slice), called
    /// beforehand. The returned slice may still be read by in-flight GPU work
    /// and must go to a [`SliceTracker`], not straight back to the pool.
    ///
    /// Renames of one buffer are expected from a single producer at a time.
    pub fn rename(&self, slice: PhysicalBufferSlice) -> PhysicalBufferSlice {
        debug_assert_eq!(slice.length(), self.slice_length);

        let mut active = self.write_active();
        let previous = std::mem::replace(&mut active.slice, slice);
        active.revision += 1;

        engine_trace!("galaxy3d::LogicalBuffer",
            "Renamed to revision {} (offset {} -> {})",
            active.revision, previous.offset(), active.slice.offset());

        previous
    }

    /// Take an unused slice from the pool, growing it if needed
    ///
    /// This is the only place physical memory is allocated after construction.
    ///
    /// # Errors
    ///
    /// Any error of the physical allocation made to replenish the pool.
    pub fn alloc_slice(&self) -> Result<PhysicalBufferSlice> {
        self.pool.acquire(|size| {
            allocate_physical(self.backend.as_ref(), &self.desc, self.memory, size)
        })
    }

    /// Return a slice to the pool for reuse
    ///
    /// The caller guarantees that `slice` came from this buffer (via
    /// [`alloc_slice`](Self::alloc_slice) or [`rename`](Self::rename)) and that
    /// no pending GPU operation can still access it. Neither is checked:
    /// breaking either lets the range be handed out while still in use.
    pub fn free_slice(&self, slice: PhysicalBufferSlice) {
        self.pool.release(slice);
    }

    /// Discard the buffer contents: rename to a fresh slice and track the old one
    ///
    /// Returns the new revision.
    ///
    /// # Errors
    ///
    /// Any error of [`alloc_slice`](Self::alloc_slice); the buffer is left unchanged.
    pub fn discard(self: &Arc<Self>, tracker: &mut SliceTracker) -> Result<u64> {
        let slice = self.alloc_slice()?;
        let previous = self.rename(slice);
        tracker.track(Arc::clone(self), previous);
        Ok(self.revision())
    }

    // Lock only guards a pair of plain values; a panic cannot leave it half-written.
    fn read_active(&self) -> RwLockReadGuard<'_, ActiveSlice> {
        self.active.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_active(&self) -> RwLockWriteGuard<'_, ActiveSlice> {
        self.active.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Allocate one physical buffer of `size` bytes with the logical buffer's parameters
fn allocate_physical(
    backend: &dyn PhysicalMemoryBackend,
    desc: &BufferDesc,
    memory: MemoryProperties,
    size: u64,
) -> Result<Arc<dyn PhysicalBuffer>> {
    let physical_desc = BufferDesc { size, usage: desc.usage };
    // Backends log their own failures at ERROR
    let buffer = backend.allocate(&physical_desc, memory).map_err(|e| {
        engine_debug!("galaxy3d::LogicalBuffer",
            "Physical allocation of {} bytes ({:?}) failed: {}", size, memory, e);
        e
    })?;
    engine_debug!("galaxy3d::LogicalBuffer", "Allocated physical buffer of {} bytes", size);
    Ok(buffer)
}

#[cfg(test)]
#[path = "logical_buffer_tests.rs"]
mod tests;
