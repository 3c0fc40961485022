/// Owned sampler.
pub struct Sampler {
    sampler: wgpu::Sampler,
}

impl Sampler {
    /// Clamp-to-edge addressing with linear filtering.
    pub fn linear_clamp(device: &wgpu::Device) -> Self {
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("rgl linear clamp sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });
        Self { sampler }
    }

    pub fn raw(&self) -> &wgpu::Sampler {
        &self.sampler
    }
}
