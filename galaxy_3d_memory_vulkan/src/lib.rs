/*!
# Galaxy 3D Memory - Vulkan Backend

Vulkan implementation of the Galaxy 3D buffer renaming layer.

This crate provides the physical memory and view backends that logical
buffers are created against, using the Ash library for Vulkan bindings and
gpu-allocator for memory management.

# Example

```no_run
use galaxy_3d_memory::galaxy3d::memory::{
    BufferDesc, BufferUsage, LogicalBuffer, LogicalBufferDesc, MemoryProperties,
};
use galaxy_3d_memory_vulkan::{GpuContext, VulkanMemoryBackend};
use std::sync::Arc;

let ctx = GpuContext::new_headless()?;
let backend = Arc::new(VulkanMemoryBackend::new(ctx));
let buffer = LogicalBuffer::new(backend, LogicalBufferDesc::new(
    BufferDesc { size: 256, usage: BufferUsage::UNIFORM },
    MemoryProperties::HOST_VISIBLE | MemoryProperties::HOST_COHERENT,
))?;
# Ok::<(), galaxy_3d_memory::galaxy3d::Error>(())
```
*/

mod vulkan_context;
mod vulkan_buffer;
mod vulkan_buffer_view;
mod vulkan_conversion;

pub use vulkan_context::GpuContext;
pub use vulkan_buffer::{VulkanMemoryBackend, VulkanPhysicalBuffer};
pub use vulkan_buffer_view::{VulkanBufferView, VulkanViewBackend};
pub use vulkan_conversion::{buffer_format_to_vk, buffer_usage_to_vk, memory_location};
