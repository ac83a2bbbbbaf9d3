/// Physical buffer - Vulkan implementation of PhysicalBuffer and PhysicalMemoryBackend

use galaxy_3d_memory::galaxy3d::{
    Result,
    Error,
    memory::{BufferDesc, MemoryProperties, PhysicalBuffer, PhysicalMemoryBackend},
};
use galaxy_3d_memory::{engine_debug, engine_err, engine_error};
use ash::vk;
use gpu_allocator::vulkan::{Allocation, AllocationCreateDesc, AllocationScheme};
use std::any::Any;
use std::sync::Arc;

use crate::vulkan_context::GpuContext;
use crate::vulkan_conversion::{buffer_usage_to_vk, memory_location};

/// Vulkan buffer with its own memory allocation
pub struct VulkanPhysicalBuffer {
    /// Shared GPU context (device, allocator)
    ctx: Arc<GpuContext>,
    /// Vulkan buffer
    buffer: vk::Buffer,
    /// GPU memory allocation
    allocation: Option<Allocation>,
    /// Buffer size
    size: u64,
}

impl VulkanPhysicalBuffer {
    /// Native buffer handle
    pub fn handle(&self) -> vk::Buffer {
        self.buffer
    }
}

impl PhysicalBuffer for VulkanPhysicalBuffer {
    fn size(&self) -> u64 {
        self.size
    }

    fn mapped_ptr(&self) -> Option<*mut u8> {
        self.allocation
            .as_ref()
            .and_then(|allocation| allocation.mapped_ptr())
            .map(|ptr| ptr.as_ptr() as *mut u8)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for VulkanPhysicalBuffer {
    fn drop(&mut self) {
        unsafe {
            // Free GPU memory
            if let Some(allocation) = self.allocation.take() {
                if let Err(e) = self.ctx.allocator().free(allocation) {
                    engine_error!("galaxy3d::vulkan", "Failed to free buffer memory: {:?}", e);
                }
            }

            // Destroy buffer
            self.ctx.device.destroy_buffer(self.buffer, None);
        }
    }
}

/// Physical memory backend allocating one VkBuffer per request
pub struct VulkanMemoryBackend {
    ctx: Arc<GpuContext>,
}

impl VulkanMemoryBackend {
    pub fn new(ctx: Arc<GpuContext>) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &Arc<GpuContext> {
        &self.ctx
    }
}

impl PhysicalMemoryBackend for VulkanMemoryBackend {
    fn allocate(&self, desc: &BufferDesc, memory: MemoryProperties) -> Result<Arc<dyn PhysicalBuffer>> {
        unsafe {
            let device = &self.ctx.device;

            // Create buffer
            let buffer_create_info = vk::BufferCreateInfo::default()
                .size(desc.size)
                .usage(buffer_usage_to_vk(desc.usage))
                .sharing_mode(vk::SharingMode::EXCLUSIVE);

            let buffer = device.create_buffer(&buffer_create_info, None)
                .map_err(|e| engine_err!("galaxy3d::vulkan", "Failed to create buffer of size {} bytes: {:?}", desc.size, e))?;

            // Allocate memory
            let requirements = device.get_buffer_memory_requirements(buffer);

            let allocation = self.ctx.allocator().allocate(&AllocationCreateDesc {
                name: "physical buffer",
                requirements,
                location: memory_location(memory),
                linear: true,
                allocation_scheme: AllocationScheme::GpuAllocatorManaged,
            });
            let allocation = match allocation {
                Ok(allocation) => allocation,
                Err(e) => {
                    device.destroy_buffer(buffer, None);
                    let size_mb = requirements.size as f64 / (1024.0 * 1024.0);
                    engine_error!("galaxy3d::vulkan",
                        "Out of GPU memory for buffer (required: {:.2} MB): {:?}", size_mb, e);
                    return Err(Error::OutOfMemory);
                }
            };

            // Bind memory
            if let Err(e) = device.bind_buffer_memory(buffer, allocation.memory(), allocation.offset()) {
                self.ctx.allocator().free(allocation).ok();
                device.destroy_buffer(buffer, None);
                return Err(engine_err!("galaxy3d::vulkan", "Failed to bind buffer memory: {:?}", e));
            }

            engine_debug!("galaxy3d::vulkan", "Created VkBuffer of {} bytes ({:?})", desc.size, memory);

            Ok(Arc::new(VulkanPhysicalBuffer {
                ctx: Arc::clone(&self.ctx),
                buffer,
                allocation: Some(allocation),
                size: desc.size,
            }))
        }
    }
}
