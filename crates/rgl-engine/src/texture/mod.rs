//! Textures shaders read and write: compute output images, sampled
//! textures and samplers.

mod error;
mod output;
mod sampler;
mod texture2d;

pub use error::TextureError;
pub use output::{OutputImage, OUTPUT_FORMAT};
pub use sampler::Sampler;
pub use texture2d::Texture2d;

/// A texture that can be bound at a texture unit.
pub trait SampledTexture {
    fn view(&self) -> &wgpu::TextureView;
}
