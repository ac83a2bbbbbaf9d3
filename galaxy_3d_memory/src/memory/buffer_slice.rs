/// Physical buffer slice - a byte range inside one physical buffer

use std::fmt;
use std::sync::Arc;
use crate::memory::PhysicalBuffer;

/// Descriptor of `[offset, offset + length)` inside a physical buffer
///
/// Cheap to clone. Holding a slice keeps its physical buffer alive but does
/// not own the byte range: ownership of ranges is the slice pool's business.
#[derive(Clone)]
pub struct PhysicalBufferSlice {
    buffer: Arc<dyn PhysicalBuffer>,
    offset: u64,
    length: u64,
}

impl PhysicalBufferSlice {
    /// Create a slice of `buffer`
    ///
    /// The range must lie inside the physical buffer.
    pub fn new(buffer: Arc<dyn PhysicalBuffer>, offset: u64, length: u64) -> Self {
        debug_assert!(
            offset + length <= buffer.size(),
            "slice [{}, {}) exceeds physical buffer size {}",
            offset, offset + length, buffer.size()
        );
        Self { buffer, offset, length }
    }

    /// Physical buffer this slice points into
    pub fn buffer(&self) -> &Arc<dyn PhysicalBuffer> { &self.buffer }

    /// Offset of the slice in its physical buffer (bytes)
    pub fn offset(&self) -> u64 { self.offset }

    /// Length of the slice (bytes)
    pub fn length(&self) -> u64 { self.length }

    /// One past the last byte of the slice in its physical buffer
    pub fn end(&self) -> u64 { self.offset + self.length }

    /// Sub-range of this slice, relative to its start
    ///
    /// Returns None if the range does not fit inside the slice.
    pub fn sub_slice(&self, offset: u64, length: u64) -> Option<Self> {
        if offset.checked_add(length)? > self.length {
            return None;
        }
        Some(Self {
            buffer: Arc::clone(&self.buffer),
            offset: self.offset + offset,
            length,
        })
    }

    /// Host address of byte `offset` of this slice
    ///
    /// Returns None for device-local memory or when `offset` is past the end.
    pub fn map_ptr(&self, offset: u64) -> Option<*mut u8> {
        if offset > self.length {
            return None;
        }
        self.buffer
            .mapped_ptr()
            .map(|base| base.wrapping_add((self.offset + offset) as usize))
    }

    /// Whether both slices describe the exact same range of the same physical buffer
    pub fn is_same_range(&self, other: &PhysicalBufferSlice) -> bool {
        self.same_buffer(other) && self.offset == other.offset && self.length == other.length
    }

    /// Whether both slices share at least one byte
    pub fn overlaps(&self, other: &PhysicalBufferSlice) -> bool {
        self.same_buffer(other) && self.offset < other.end() && other.offset < self.end()
    }

    fn same_buffer(&self, other: &PhysicalBufferSlice) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.buffer), Arc::as_ptr(&other.buffer))
    }
}

impl fmt::Debug for PhysicalBufferSlice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhysicalBufferSlice")
            .field("buffer", &Arc::as_ptr(&self.buffer).cast::<()>())
            .field("offset", &self.offset)
            .field("length", &self.length)
            .finish()
    }
}

#[cfg(test)]
#[path = "buffer_slice_tests.rs"]
mod tests;
