/// Physical buffer trait and the memory backend that creates physical buffers

use std::any::Any;
use std::sync::Arc;
use bitflags::bitflags;
use crate::error::Result;

bitflags! {
    /// How the physical buffers backing a logical buffer may be used
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BufferUsage: u32 {
        const TRANSFER_SRC = 0x0001;
        const TRANSFER_DST = 0x0002;
        const UNIFORM_TEXEL = 0x0004;
        const STORAGE_TEXEL = 0x0008;
        const UNIFORM = 0x0010;
        const STORAGE = 0x0020;
        const INDEX = 0x0040;
        const VERTEX = 0x0080;
        const INDIRECT = 0x0100;
    }
}

impl BufferUsage {
    /// Whether texel buffer views can be created on this buffer
    pub fn supports_texel_views(&self) -> bool {
        self.intersects(BufferUsage::UNIFORM_TEXEL | BufferUsage::STORAGE_TEXEL)
    }
}

bitflags! {
    /// Memory property class requested for physical allocations
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MemoryProperties: u32 {
        const DEVICE_LOCAL = 0x01;
        const HOST_VISIBLE = 0x02;
        const HOST_COHERENT = 0x04;
        const HOST_CACHED = 0x08;
    }
}

impl MemoryProperties {
    /// Whether physical buffers of this class are persistently mapped
    pub fn is_host_visible(&self) -> bool {
        self.contains(MemoryProperties::HOST_VISIBLE)
    }
}

/// Descriptor for creating a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferDesc {
    /// Size in bytes
    pub size: u64,
    /// Buffer usage
    pub usage: BufferUsage,
}

/// Native memory-backed buffer object
///
/// Implemented by backend-specific types (e.g., VulkanPhysicalBuffer).
/// Destroyed, with its memory, when the last slice referencing it is dropped.
pub trait PhysicalBuffer: Send + Sync {
    /// Size of the whole allocation in bytes
    fn size(&self) -> u64;

    /// Raw pointer to persistently mapped memory
    ///
    /// Returns None if the buffer is not CPU-accessible (device-local only).
    /// The pointer remains valid for the lifetime of the buffer.
    fn mapped_ptr(&self) -> Option<*mut u8>;

    /// Concrete type access, used by backends to recover their native handle
    fn as_any(&self) -> &dyn Any;
}

/// Physical memory backend
///
/// Allocates raw physical buffers on behalf of logical buffers. Shared by
/// every logical buffer created against the same device; passed explicitly at
/// construction.
pub trait PhysicalMemoryBackend: Send + Sync {
    /// Allocate a physical buffer of `desc.size` bytes with the given memory class
    ///
    /// # Errors
    ///
    /// `Error::OutOfMemory` or `Error::AllocationFailed` when the request
    /// cannot be satisfied. Never retried by the caller.
    fn allocate(
        &self,
        desc: &BufferDesc,
        memory: MemoryProperties,
    ) -> Result<Arc<dyn PhysicalBuffer>>;
}
