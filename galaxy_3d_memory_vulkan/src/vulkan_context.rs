/// GpuContext - Shared Vulkan device state for physical buffers and views
///
/// Contains everything the memory backends need:
/// - Device for Vulkan API calls
/// - Allocator for memory management

use ash::vk;
use galaxy_3d_memory::galaxy3d::{Error, Result};
use galaxy_3d_memory::{engine_err, engine_error, engine_info};
use gpu_allocator::vulkan::{Allocator, AllocatorCreateDesc};
use std::mem::ManuallyDrop;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Shared GPU context for all Vulkan memory objects.
///
/// Shared (via `Arc`) by every physical buffer and view, so the device and
/// allocator outlive all of them.
pub struct GpuContext {
    /// Vulkan logical device
    pub device: ash::Device,

    /// GPU memory allocator (shared, requires mutex for thread safety)
    /// Wrapped in ManuallyDrop to ensure it's dropped BEFORE the device is destroyed
    allocator: ManuallyDrop<Mutex<Allocator>>,

    /// Physical device the logical device was created on
    pub physical_device: vk::PhysicalDevice,

    instance: ash::Instance,

    /// Loader, kept alive while the instance exists (headless contexts only)
    _entry: Option<ash::Entry>,

    /// Whether dropping the context destroys the device and instance
    owns_device: bool,
}

impl GpuContext {
    /// Wrap a device created by the caller
    ///
    /// The caller keeps ownership of the device and instance and must destroy
    /// them only after every buffer created through this context is gone.
    pub fn from_device(
        instance: ash::Instance,
        physical_device: vk::PhysicalDevice,
        device: ash::Device,
    ) -> Result<Arc<Self>> {
        let allocator = create_allocator(&instance, &device, physical_device)?;
        Ok(Arc::new(Self {
            device,
            allocator: ManuallyDrop::new(Mutex::new(allocator)),
            physical_device,
            instance,
            _entry: None,
            owns_device: false,
        }))
    }

    /// Create a device with no surface, on the first physical device found
    ///
    /// Used for offscreen work and GPU tests.
    pub fn new_headless() -> Result<Arc<Self>> {
        unsafe {
            let entry = ash::Entry::load()
                .map_err(|e| engine_err!("galaxy3d::vulkan", "Failed to load Vulkan library: {:?}", e))?;

            let app_info = vk::ApplicationInfo::default()
                .application_name(c"Galaxy3D Memory")
                .application_version(vk::make_api_version(0, 1, 0, 0))
                .engine_name(c"Galaxy3D")
                .engine_version(vk::make_api_version(0, 0, 1, 0))
                .api_version(vk::API_VERSION_1_2);

            let instance = entry
                .create_instance(&vk::InstanceCreateInfo::default().application_info(&app_info), None)
                .map_err(|e| engine_err!("galaxy3d::vulkan", "Failed to create Vulkan instance: {:?}", e))?;

            let physical_device = match instance.enumerate_physical_devices() {
                Ok(devices) if !devices.is_empty() => devices[0],
                Ok(_) => {
                    instance.destroy_instance(None);
                    return Err(engine_err!("galaxy3d::vulkan", "No Vulkan physical device available"));
                }
                Err(e) => {
                    instance.destroy_instance(None);
                    return Err(engine_err!("galaxy3d::vulkan", "Failed to enumerate physical devices: {:?}", e));
                }
            };

            // Any queue family will do: the memory layer never submits work
            let priorities = [1.0f32];
            let queue_info = [vk::DeviceQueueCreateInfo::default()
                .queue_family_index(0)
                .queue_priorities(&priorities)];
            let device = match instance.create_device(
                physical_device,
                &vk::DeviceCreateInfo::default().queue_create_infos(&queue_info),
                None,
            ) {
                Ok(device) => device,
                Err(e) => {
                    instance.destroy_instance(None);
                    return Err(engine_err!("galaxy3d::vulkan", "Failed to create logical device: {:?}", e));
                }
            };

            let allocator = match create_allocator(&instance, &device, physical_device) {
                Ok(allocator) => allocator,
                Err(e) => {
                    device.destroy_device(None);
                    instance.destroy_instance(None);
                    return Err(e);
                }
            };

            let properties = instance.get_physical_device_properties(physical_device);
            engine_info!("galaxy3d::vulkan", "Headless context on {:?}",
                properties.device_name_as_c_str().unwrap_or(c"<unknown>"));

            Ok(Arc::new(Self {
                device,
                allocator: ManuallyDrop::new(Mutex::new(allocator)),
                physical_device,
                instance,
                _entry: Some(entry),
                owns_device: true,
            }))
        }
    }

    /// Vulkan instance the device belongs to
    pub fn instance(&self) -> &ash::Instance {
        &self.instance
    }

    /// Lock the allocator
    pub(crate) fn allocator(&self) -> MutexGuard<'_, Allocator> {
        self.allocator.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for GpuContext {
    fn drop(&mut self) {
        unsafe {
            // Every allocation holds an Arc to the context, so none is left here
            ManuallyDrop::drop(&mut self.allocator);

            if self.owns_device {
                self.device.destroy_device(None);
                self.instance.destroy_instance(None);
            }
        }
    }
}

fn create_allocator(
    instance: &ash::Instance,
    device: &ash::Device,
    physical_device: vk::PhysicalDevice,
) -> Result<Allocator> {
    Allocator::new(&AllocatorCreateDesc {
        instance: instance.clone(),
        device: device.clone(),
        physical_device,
        debug_settings: Default::default(),
        buffer_device_address: false,
        allocation_sizes: Default::default(),
    })
    .map_err(|e| {
        engine_error!("galaxy3d::vulkan", "Failed to create GPU allocator: {:?}", e);
        Error::BackendError(format!("Failed to create allocator: {:?}", e))
    })
}
