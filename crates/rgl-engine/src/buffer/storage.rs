use bytemuck::Pod;

use super::{create_static, release, BufferError, BufferKind, GpuBuffer};
use crate::geometry::{Vertex, VertexLayout};

const LABEL: &str = "rgl storage buffer";

/// Read-only array of `T` that compute and fragment shaders address through a
/// storage binding point.
///
/// The binding point is only a preference carried by the buffer. Attaching it
/// to [`ResourceBindings`](crate::render::ResourceBindings) is what makes a
/// shader see it.
pub struct ShaderStorageBuffer<T: Pod> {
    buffer: wgpu::Buffer,
    data: Vec<T>,
    binding_point: u32,
}

impl<T: Pod> ShaderStorageBuffer<T> {
    pub fn new(device: &wgpu::Device, data: &[T], binding_point: u32) -> Result<Self, BufferError> {
        let limits = device.limits();
        let limit = limits
            .max_buffer_size
            .min(limits.max_storage_buffer_binding_size as u64);

        let buffer = create_static(
            device,
            BufferKind::Storage,
            LABEL,
            bytemuck::cast_slice(data),
            wgpu::BufferUsages::STORAGE,
            limit,
        )?;

        log::debug!(
            "{LABEL}: {} x {} bytes at binding point {binding_point}",
            data.len(),
            size_of::<T>()
        );

        Ok(Self {
            buffer,
            data: data.to_vec(),
            binding_point,
        })
    }

    #[inline]
    pub fn binding_point(&self) -> u32 {
        self.binding_point
    }

    /// Changes the preferred binding point. Already attached tables keep the
    /// old point until the buffer is attached again.
    pub fn rebind(&mut self, binding_point: u32) {
        log::trace!("{LABEL}: binding point {} -> {binding_point}", self.binding_point);
        self.binding_point = binding_point;
    }

    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl ShaderStorageBuffer<f32> {
    /// Flattens `vertices` through `layout` and uploads the float stream.
    ///
    /// Use [`VertexLayout::AlignedPadded`] when the shader declares the vertex
    /// as a struct of `vec3<f32>` fields.
    pub fn from_vertices(
        device: &wgpu::Device,
        vertices: &[Vertex],
        layout: VertexLayout,
        binding_point: u32,
    ) -> Result<Self, BufferError> {
        Self::new(device, &layout.flatten(vertices), binding_point)
    }
}

impl<T: Pod> GpuBuffer for ShaderStorageBuffer<T> {
    fn raw(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    fn kind(&self) -> BufferKind {
        BufferKind::Storage
    }

    fn label(&self) -> &str {
        LABEL
    }
}

impl<T: Pod> Drop for ShaderStorageBuffer<T> {
    fn drop(&mut self) {
        release(&self.buffer, LABEL);
    }
}
