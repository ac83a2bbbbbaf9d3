/// Buffer view - Vulkan implementation of NativeBufferView and ViewBackend

use galaxy_3d_memory::galaxy3d::{
    Result,
    Error,
    memory::{BufferViewDesc, NativeBufferView, PhysicalBufferSlice, ViewBackend},
};
use galaxy_3d_memory::{engine_error, engine_trace};
use ash::vk;
use std::sync::Arc;

use crate::vulkan_buffer::VulkanPhysicalBuffer;
use crate::vulkan_context::GpuContext;
use crate::vulkan_conversion::buffer_format_to_vk;

/// VkBufferView over a range of a physical buffer
pub struct VulkanBufferView {
    ctx: Arc<GpuContext>,
    view: vk::BufferView,
    offset: u64,
    length: u64,
}

impl VulkanBufferView {
    /// Native view handle
    pub fn handle(&self) -> vk::BufferView {
        self.view
    }
}

impl NativeBufferView for VulkanBufferView {
    fn offset(&self) -> u64 {
        self.offset
    }

    fn length(&self) -> u64 {
        self.length
    }
}

impl Drop for VulkanBufferView {
    fn drop(&mut self) {
        unsafe {
            self.ctx.device.destroy_buffer_view(self.view, None);
        }
    }
}

/// Builds VkBufferViews over slices of Vulkan physical buffers
pub struct VulkanViewBackend {
    ctx: Arc<GpuContext>,
}

impl VulkanViewBackend {
    pub fn new(ctx: Arc<GpuContext>) -> Self {
        Self { ctx }
    }
}

impl ViewBackend for VulkanViewBackend {
    fn create_view(&self, slice: &PhysicalBufferSlice, desc: &BufferViewDesc) -> Result<Arc<dyn NativeBufferView>> {
        let buffer = slice.buffer().as_any().downcast_ref::<VulkanPhysicalBuffer>()
            .ok_or_else(|| {
                engine_error!("galaxy3d::vulkan", "Buffer view requested on a non-Vulkan physical buffer");
                Error::ViewCreationFailed("physical buffer is not a VulkanPhysicalBuffer".to_string())
            })?;

        let offset = slice.offset() + desc.offset;
        let create_info = vk::BufferViewCreateInfo::default()
            .buffer(buffer.handle())
            .format(buffer_format_to_vk(desc.format))
            .offset(offset)
            .range(desc.length);

        let view = unsafe { self.ctx.device.create_buffer_view(&create_info, None) }
            .map_err(|e| {
                engine_error!("galaxy3d::vulkan",
                    "Failed to create {:?} buffer view at offset {}: {:?}", desc.format, offset, e);
                Error::ViewCreationFailed(format!("vkCreateBufferView failed: {:?}", e))
            })?;

        engine_trace!("galaxy3d::vulkan", "Created {:?} buffer view at offset {}", desc.format, offset);

        Ok(Arc::new(VulkanBufferView {
            ctx: Arc::clone(&self.ctx),
            view,
            offset,
            length: desc.length,
        }))
    }
}
