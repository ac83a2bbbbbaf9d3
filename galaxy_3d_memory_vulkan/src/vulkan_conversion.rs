/// Conversions from galaxy3d memory types to Vulkan and gpu-allocator types

use ash::vk;
use galaxy_3d_memory::galaxy3d::memory::{BufferFormat, BufferUsage, MemoryProperties};
use gpu_allocator::MemoryLocation;

/// Vulkan usage flags for a physical buffer
pub fn buffer_usage_to_vk(usage: BufferUsage) -> vk::BufferUsageFlags {
    const MAPPING: [(BufferUsage, vk::BufferUsageFlags); 9] = [
        (BufferUsage::TRANSFER_SRC, vk::BufferUsageFlags::TRANSFER_SRC),
        (BufferUsage::TRANSFER_DST, vk::BufferUsageFlags::TRANSFER_DST),
        (BufferUsage::UNIFORM_TEXEL, vk::BufferUsageFlags::UNIFORM_TEXEL_BUFFER),
        (BufferUsage::STORAGE_TEXEL, vk::BufferUsageFlags::STORAGE_TEXEL_BUFFER),
        (BufferUsage::UNIFORM, vk::BufferUsageFlags::UNIFORM_BUFFER),
        (BufferUsage::STORAGE, vk::BufferUsageFlags::STORAGE_BUFFER),
        (BufferUsage::INDEX, vk::BufferUsageFlags::INDEX_BUFFER),
        (BufferUsage::VERTEX, vk::BufferUsageFlags::VERTEX_BUFFER),
        (BufferUsage::INDIRECT, vk::BufferUsageFlags::INDIRECT_BUFFER),
    ];

    MAPPING
        .iter()
        .filter(|(flag, _)| usage.contains(*flag))
        .fold(vk::BufferUsageFlags::empty(), |acc, (_, vk_flag)| acc | *vk_flag)
}

/// Allocator location for a memory class
///
/// Host-visible memory is always persistently mapped by gpu-allocator.
pub fn memory_location(memory: MemoryProperties) -> MemoryLocation {
    if !memory.is_host_visible() {
        MemoryLocation::GpuOnly
    } else if memory.contains(MemoryProperties::HOST_CACHED) {
        MemoryLocation::GpuToCpu
    } else {
        MemoryLocation::CpuToGpu
    }
}

/// Vulkan format of a texel buffer view
pub fn buffer_format_to_vk(format: BufferFormat) -> vk::Format {
    match format {
        BufferFormat::R32_SFLOAT => vk::Format::R32_SFLOAT,
        BufferFormat::R32G32_SFLOAT => vk::Format::R32G32_SFLOAT,
        BufferFormat::R32G32B32_SFLOAT => vk::Format::R32G32B32_SFLOAT,
        BufferFormat::R32G32B32A32_SFLOAT => vk::Format::R32G32B32A32_SFLOAT,
        BufferFormat::R32_SINT => vk::Format::R32_SINT,
        BufferFormat::R32G32_SINT => vk::Format::R32G32_SINT,
        BufferFormat::R32G32B32A32_SINT => vk::Format::R32G32B32A32_SINT,
        BufferFormat::R32_UINT => vk::Format::R32_UINT,
        BufferFormat::R32G32_UINT => vk::Format::R32G32_UINT,
        BufferFormat::R32G32B32A32_UINT => vk::Format::R32G32B32A32_UINT,
        BufferFormat::R16_UINT => vk::Format::R16_UINT,
        BufferFormat::R16G16B16A16_SFLOAT => vk::Format::R16G16B16A16_SFLOAT,
        BufferFormat::R8_UINT => vk::Format::R8_UINT,
        BufferFormat::R8G8B8A8_UNORM => vk::Format::R8G8B8A8_UNORM,
        BufferFormat::R8G8B8A8_UINT => vk::Format::R8G8B8A8_UINT,
    }
}

#[cfg(test)]
#[path = "vulkan_format_tests.rs"]
mod tests;
