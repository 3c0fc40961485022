use super::error::check_extent;
use super::{SampledTexture, TextureError};

/// Immutable sampled RGBA8 texture (sRGB), uploaded once.
pub struct Texture2d {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    width: u32,
    height: u32,
}

impl Texture2d {
    /// Uploads tightly packed RGBA8 rows.
    pub fn from_rgba8(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<Self, TextureError> {
        check_extent(device, width, height)?;
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(TextureError::SizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("rgl texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        log::debug!("texture {width}x{height} uploaded");

        Ok(Self {
            texture,
            view,
            width,
            height,
        })
    }

    /// 1x1 opaque white, for shaders that always sample a texture.
    pub fn white(device: &wgpu::Device, queue: &wgpu::Queue) -> Result<Self, TextureError> {
        Self::from_rgba8(device, queue, 1, 1, &[255; 4])
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }
}

impl SampledTexture for Texture2d {
    fn view(&self) -> &wgpu::TextureView {
        &self.view
    }
}

impl Drop for Texture2d {
    fn drop(&mut self) {
        log::trace!("texture {}x{}: released", self.width, self.height);
        self.texture.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::HeadlessGpu;

    #[test]
    fn pixel_count_must_match() {
        let Some(gpu) = HeadlessGpu::for_test() else {
            return;
        };
        let err = Texture2d::from_rgba8(gpu.device(), gpu.queue(), 2, 2, &[0; 15]).err();
        assert_eq!(
            err,
            Some(TextureError::SizeMismatch {
                expected: 16,
                actual: 15
            })
        );
    }

    #[test]
    fn white_is_one_pixel() {
        let Some(gpu) = HeadlessGpu::for_test() else {
            return;
        };
        let tex = Texture2d::white(gpu.device(), gpu.queue()).unwrap();
        assert_eq!(tex.size(), (1, 1));
    }
}
