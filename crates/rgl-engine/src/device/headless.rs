use anyhow::{Context, Result};

use super::init::{create_instance, request_device};
use super::{ComputeLimits, GpuInit};

/// Device and queue without a surface.
///
/// Used for offscreen work and by tests that need real GPU objects.
pub struct HeadlessGpu {
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl HeadlessGpu {
    pub async fn new(init: &GpuInit) -> Result<Self> {
        let instance = create_instance();
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: init.power_preference,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a GPU adapter")?;

        let (device, queue) = request_device(&adapter, init).await?;

        Ok(Self {
            adapter,
            device,
            queue,
        })
    }

    /// Blocking constructor with default settings; `None` when no adapter is
    /// available (headless CI, for example).
    pub fn try_new() -> Option<Self> {
        match pollster::block_on(Self::new(&GpuInit::default())) {
            Ok(gpu) => Some(gpu),
            Err(err) => {
                log::warn!("no headless GPU: {err:#}");
                None
            }
        }
    }

    pub fn adapter(&self) -> &wgpu::Adapter {
        &self.adapter
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn compute_limits(&self) -> ComputeLimits {
        ComputeLimits::from_limits(&self.device.limits())
    }
}

#[cfg(test)]
impl HeadlessGpu {
    /// Device for a GPU-backed test; prints a skip line naming the test when
    /// no adapter is available.
    pub(crate) fn for_test() -> Option<Self> {
        let gpu = Self::try_new();
        if gpu.is_none() {
            let thread = std::thread::current();
            eprintln!(
                "skipping {}: no GPU adapter",
                thread.name().unwrap_or("GPU test")
            );
        }
        gpu
    }
}
