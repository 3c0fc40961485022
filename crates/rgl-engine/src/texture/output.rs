use super::error::check_extent;
use super::{SampledTexture, TextureError};

/// Format compute shaders write: `texture_storage_2d<rgba8unorm, write>`.
pub const OUTPUT_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// RGBA8 image a compute shader writes through an image unit and a later
/// render pass samples.
pub struct OutputImage {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    width: u32,
    height: u32,
    unit: u32,
}

impl OutputImage {
    pub fn new(device: &wgpu::Device, width: u32, height: u32, unit: u32) -> Result<Self, TextureError> {
        check_extent(device, width, height)?;

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("rgl output image"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: OUTPUT_FORMAT,
            usage: wgpu::TextureUsages::STORAGE_BINDING | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        log::debug!("output image {width}x{height} on image unit {unit}");
        Ok(Self {
            texture,
            view,
            width,
            height,
            unit,
        })
    }

    /// Image unit the image is meant to be attached at.
    #[inline]
    pub fn unit(&self) -> u32 {
        self.unit
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }
}

impl SampledTexture for OutputImage {
    fn view(&self) -> &wgpu::TextureView {
        &self.view
    }
}

impl Drop for OutputImage {
    fn drop(&mut self) {
        log::trace!("output image {}x{}: released", self.width, self.height);
        self.texture.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::HeadlessGpu;

    static_assertions::assert_not_impl_any!(OutputImage: Clone, Copy);

    #[test]
    fn storage_and_sampled_usage() {
        let Some(gpu) = HeadlessGpu::for_test() else {
            return;
        };
        let image = OutputImage::new(gpu.device(), 64, 32, 0).unwrap();
        assert_eq!(image.size(), (64, 32));
        assert_eq!(image.unit(), 0);
        let usage = image.texture().usage();
        assert!(usage.contains(wgpu::TextureUsages::STORAGE_BINDING));
        assert!(usage.contains(wgpu::TextureUsages::TEXTURE_BINDING));
        assert_eq!(image.texture().format(), OUTPUT_FORMAT);
    }

    #[test]
    fn zero_size_rejected() {
        let Some(gpu) = HeadlessGpu::for_test() else {
            return;
        };
        assert!(OutputImage::new(gpu.device(), 0, 32, 0).is_err());
    }
}
