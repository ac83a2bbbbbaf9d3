use super::*;
use crate::memory::mock_device::{MockMemoryBackend, MockQueue};
use crate::memory::{BufferDesc, BufferUsage, LogicalBufferDesc, MemoryProperties};

// ============================================================================
// Helpers
// ============================================================================

fn create_buffer(size: u64) -> Arc<LogicalBuffer> {
    LogicalBuffer::new(MockMemoryBackend::new(), LogicalBufferDesc::new(
        BufferDesc { size, usage: BufferUsage::VERTEX },
        MemoryProperties::HOST_VISIBLE,
    )).unwrap()
}

// ============================================================================
// Basic tests
// ============================================================================

#[test]
fn test_new_tracker_is_empty() {
    let tracker = SliceTracker::new();
    assert!(tracker.is_empty());
    assert_eq!(tracker.len(), 0);
    assert!(SliceTracker::default().is_empty());
}

#[test]
fn test_track_does_not_free() {
    let buffer = create_buffer(100);
    let mut tracker = SliceTracker::new();

    let displaced = buffer.rename(buffer.alloc_slice().unwrap());
    tracker.track(Arc::clone(&buffer), displaced);

    assert_eq!(tracker.len(), 1);
    assert_eq!(buffer.free_slice_count(), 0);
}

#[test]
fn test_reset_returns_slices_and_clears() {
    let buffer = create_buffer(100);
    let mut tracker = SliceTracker::new();

    for _ in 0..3 {
        let displaced = buffer.rename(buffer.alloc_slice().unwrap());
        tracker.track(Arc::clone(&buffer), displaced);
    }
    let free_before = buffer.free_slice_count();

    tracker.reset();

    assert!(tracker.is_empty());
    assert_eq!(buffer.free_slice_count(), free_before + 3);

    // A second reset has nothing left to return
    tracker.reset();
    assert_eq!(buffer.free_slice_count(), free_before + 3);
}

#[test]
fn test_reset_returns_to_owning_buffers() {
    let a = create_buffer(100);
    let b = create_buffer(300);
    let mut tracker = SliceTracker::new();

    let da = a.rename(a.alloc_slice().unwrap());
    let db = b.rename(b.alloc_slice().unwrap());
    tracker.track(Arc::clone(&a), da.clone());
    tracker.track(Arc::clone(&b), db.clone());

    tracker.reset();

    assert_eq!(a.free_slice_count(), 1);
    assert_eq!(b.free_slice_count(), 1);
    assert!(a.alloc_slice().unwrap().is_same_range(&da));
    assert!(b.alloc_slice().unwrap().is_same_range(&db));
}

#[test]
fn test_tracker_keeps_buffer_alive() {
    let buffer = create_buffer(64);
    let mut tracker = SliceTracker::new();
    let displaced = buffer.rename(buffer.alloc_slice().unwrap());
    tracker.track(Arc::clone(&buffer), displaced);

    let weak = Arc::downgrade(&buffer);
    drop(buffer);
    assert!(weak.upgrade().is_some());

    tracker.reset();
    assert!(weak.upgrade().is_none());
}

// ============================================================================
// Submission round-trip tests
// ============================================================================

#[test]
fn test_slice_reused_only_after_its_submission_completes() {
    let buffer = create_buffer(100);
    let mut queue = MockQueue::new();

    // Frame 0: rename away from S
    let s = buffer.alloc_slice().unwrap();
    buffer.rename(s.clone());
    let mut tracker = SliceTracker::new();
    buffer.discard(&mut tracker).unwrap();
    let fence0 = queue.submit(tracker);

    // Frame 1: more renames while frame 0 is in flight never hand out S
    let mut tracker = SliceTracker::new();
    for _ in 0..4 {
        buffer.discard(&mut tracker).unwrap();
        assert!(!buffer.current_slice().overlaps(&s));
    }
    let fence1 = queue.submit(tracker);

    // Frame 1 completing first does not release frame 0's slices
    fence1.signal();
    assert_eq!(queue.retire_completed(), 0);

    fence0.signal();
    assert_eq!(queue.retire_completed(), 2);
    assert_eq!(queue.in_flight_count(), 0);

    // S is back in the pool
    let mut seen = false;
    while buffer.free_slice_count() > 0 {
        if buffer.alloc_slice().unwrap().is_same_range(&s) {
            seen = true;
        }
    }
    assert!(seen);
}

#[test]
fn test_steady_state_stops_allocating() {
    let backend = MockMemoryBackend::new();
    let buffer = LogicalBuffer::new(backend.clone(), LogicalBufferDesc::new(
        BufferDesc { size: 64, usage: BufferUsage::UNIFORM },
        MemoryProperties::HOST_VISIBLE,
    )).unwrap();
    let mut queue = MockQueue::new();
    let mut fences = std::collections::VecDeque::new();

    // Two frames in flight, three discards per frame
    for _ in 0..50 {
        let mut tracker = SliceTracker::new();
        for _ in 0..3 {
            buffer.discard(&mut tracker).unwrap();
        }
        fences.push_back(queue.submit(tracker));
        if fences.len() > 2 {
            fences.pop_front().unwrap().signal();
            queue.retire_completed();
        }
    }

    // At most 3 frames x 3 slices + the current one are ever reserved
    assert_eq!(buffer.revision(), 150);
    assert!(backend.allocation_count() <= 5);
}
