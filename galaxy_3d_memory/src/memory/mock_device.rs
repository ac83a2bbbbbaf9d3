/// Mock device for unit tests (no GPU required)
///
/// Provides a physical memory backend, a view backend and a fake submission
/// queue whose fences are signalled by hand, so that the deferred
/// reclamation protocol can be exercised without real GPU timing.

use std::any::Any;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};
use crate::memory::{
    BufferDesc, BufferViewDesc, MemoryProperties, NativeBufferView, PhysicalBuffer,
    PhysicalBufferSlice, PhysicalMemoryBackend, SliceTracker, ViewBackend,
};

// ============================================================================
// Mock Physical Buffer
// ============================================================================

pub struct MockPhysicalBuffer {
    pub id: u32,
    pub size: u64,
    /// Host storage for host-visible buffers (atomics give interior mutability)
    storage: Option<Box<[AtomicU8]>>,
}

impl MockPhysicalBuffer {
    pub fn new(id: u32, size: u64, host_visible: bool) -> Self {
        let storage = host_visible
            .then(|| (0..size).map(|_| AtomicU8::new(0)).collect());
        Self { id, size, storage }
    }
}

impl PhysicalBuffer for MockPhysicalBuffer {
    fn size(&self) -> u64 {
        self.size
    }

    fn mapped_ptr(&self) -> Option<*mut u8> {
        self.storage.as_ref().map(|s| s.as_ptr() as *mut u8)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// Mock Memory Backend
// ============================================================================

/// Records every allocation request; can be switched to failing
pub struct MockMemoryBackend {
    allocations: Mutex<Vec<(BufferDesc, MemoryProperties)>>,
    next_id: AtomicU32,
    fail: AtomicBool,
}

impl MockMemoryBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            allocations: Mutex::new(Vec::new()),
            next_id: AtomicU32::new(0),
            fail: AtomicBool::new(false),
        })
    }

    /// Make every following allocation fail with `Error::OutOfMemory`
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn allocation_count(&self) -> usize {
        self.allocations.lock().unwrap().len()
    }

    pub fn allocations(&self) -> Vec<(BufferDesc, MemoryProperties)> {
        self.allocations.lock().unwrap().clone()
    }
}

impl PhysicalMemoryBackend for MockMemoryBackend {
    fn allocate(
        &self,
        desc: &BufferDesc,
        memory: MemoryProperties,
    ) -> Result<Arc<dyn PhysicalBuffer>> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::OutOfMemory);
        }
        self.allocations.lock().unwrap().push((*desc, memory));
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(MockPhysicalBuffer::new(id, desc.size, memory.is_host_visible())))
    }
}

// ============================================================================
// Mock View Backend
// ============================================================================

pub struct MockNativeView {
    pub id: u32,
    pub offset: u64,
    pub length: u64,
}

impl NativeBufferView for MockNativeView {
    fn offset(&self) -> u64 {
        self.offset
    }

    fn length(&self) -> u64 {
        self.length
    }
}

/// Records the slice each view was built for; can be switched to failing
pub struct MockViewBackend {
    built: Mutex<Vec<PhysicalBufferSlice>>,
    fail: AtomicBool,
}

impl MockViewBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            built: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        })
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn build_count(&self) -> usize {
        self.built.lock().unwrap().len()
    }

    /// Slice the most recent view was built against
    pub fn last_slice(&self) -> Option<PhysicalBufferSlice> {
        self.built.lock().unwrap().last().cloned()
    }
}

impl ViewBackend for MockViewBackend {
    fn create_view(
        &self,
        slice: &PhysicalBufferSlice,
        desc: &BufferViewDesc,
    ) -> Result<Arc<dyn NativeBufferView>> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::ViewCreationFailed(format!("{:?} rejected", desc.format)));
        }
        let mut built = self.built.lock().unwrap();
        built.push(slice.clone());
        Ok(Arc::new(MockNativeView {
            id: built.len() as u32 - 1,
            offset: slice.offset() + desc.offset,
            length: desc.length,
        }))
    }
}

// ============================================================================
// Mock Submission Queue
// ============================================================================

/// Completion signal of one submission, set by the test
#[derive(Default)]
pub struct MockFence {
    signaled: AtomicBool,
}

impl MockFence {
    pub fn signal(&self) {
        self.signaled.store(true, Ordering::SeqCst);
    }

    pub fn is_signaled(&self) -> bool {
        self.signaled.load(Ordering::SeqCst)
    }
}

/// In-order queue of submissions, each owning the tracker recorded with it
#[derive(Default)]
pub struct MockQueue {
    in_flight: VecDeque<(Arc<MockFence>, SliceTracker)>,
}

impl MockQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Submit the work recorded with `tracker`; returns its fence
    pub fn submit(&mut self, tracker: SliceTracker) -> Arc<MockFence> {
        let fence = Arc::new(MockFence::default());
        self.in_flight.push_back((Arc::clone(&fence), tracker));
        fence
    }

    /// Reset the trackers of completed submissions, oldest first
    ///
    /// Stops at the first unsignalled fence. Returns the number retired.
    pub fn retire_completed(&mut self) -> usize {
        let mut retired = 0;
        while let Some((fence, _)) = self.in_flight.front() {
            if !fence.is_signaled() {
                break;
            }
            if let Some((_, mut tracker)) = self.in_flight.pop_front() {
                tracker.reset();
                retired += 1;
            }
        }
        retired
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }
}
