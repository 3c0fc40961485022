use std::sync::Arc;

use super::{
    create_static, element_count, release, BufferError, BufferKind, GpuBuffer, IndexBuffer,
};
use crate::geometry::{Vertex, VertexLayout};

const LABEL: &str = "rgl vertex buffer";

/// Vertex records flattened through a [`VertexLayout`] and uploaded once.
///
/// The flattened float stream is transient: only the source records stay on
/// the host. An index buffer, when present, is shared through `Arc` and lives
/// as long as its longest holder.
pub struct VertexBuffer {
    buffer: wgpu::Buffer,
    vertices: Vec<Vertex>,
    vertex_count: u32,
    layout: VertexLayout,
    attributes: Vec<wgpu::VertexAttribute>,
    index_buffer: Option<Arc<IndexBuffer>>,
}

impl VertexBuffer {
    pub fn new(
        device: &wgpu::Device,
        vertices: &[Vertex],
        layout: VertexLayout,
    ) -> Result<Self, BufferError> {
        Self::build(device, vertices, layout, None)
    }

    /// Uploads `indices` into a fresh [`IndexBuffer`] owned by this buffer.
    pub fn with_indices(
        device: &wgpu::Device,
        vertices: &[Vertex],
        indices: &[u32],
        layout: VertexLayout,
    ) -> Result<Self, BufferError> {
        let index_buffer = Arc::new(IndexBuffer::new(device, indices)?);
        Self::build(device, vertices, layout, Some(index_buffer))
    }

    pub fn with_index_buffer(
        device: &wgpu::Device,
        vertices: &[Vertex],
        index_buffer: Arc<IndexBuffer>,
        layout: VertexLayout,
    ) -> Result<Self, BufferError> {
        Self::build(device, vertices, layout, Some(index_buffer))
    }

    fn build(
        device: &wgpu::Device,
        vertices: &[Vertex],
        layout: VertexLayout,
        index_buffer: Option<Arc<IndexBuffer>>,
    ) -> Result<Self, BufferError> {
        let vertex_count = element_count(BufferKind::Vertex, vertices.len())?;
        let stream = layout.flatten(vertices);
        let buffer = create_static(
            device,
            BufferKind::Vertex,
            LABEL,
            bytemuck::cast_slice(&stream),
            wgpu::BufferUsages::VERTEX,
            device.limits().max_buffer_size,
        )?;

        log::debug!(
            "{LABEL}: {} vertices as {layout:?} (stride {} bytes, indexed: {})",
            vertices.len(),
            layout.stride_bytes(),
            index_buffer.is_some()
        );

        Ok(Self {
            buffer,
            vertices: vertices.to_vec(),
            vertex_count,
            layout,
            attributes: layout.attributes(),
            index_buffer,
        })
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[inline]
    pub fn index_buffer(&self) -> Option<&Arc<IndexBuffer>> {
        self.index_buffer.as_ref()
    }

    #[inline]
    pub fn layout(&self) -> VertexLayout {
        self.layout
    }

    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Attribute declaration for pipeline creation.
    pub fn buffer_layout(&self) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: self.layout.stride_bytes(),
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &self.attributes,
        }
    }
}

impl GpuBuffer for VertexBuffer {
    fn raw(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    fn kind(&self) -> BufferKind {
        BufferKind::Vertex
    }

    fn label(&self) -> &str {
        LABEL
    }
}

impl Drop for VertexBuffer {
    fn drop(&mut self) {
        release(&self.buffer, LABEL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::HeadlessGpu;
    use crate::geometry::{SCREEN_QUAD_INDICES, SCREEN_QUAD_STRIP};

    static_assertions::assert_not_impl_any!(VertexBuffer: Clone, Copy);

    #[test]
    fn empty_vertices_rejected() {
        let Some(gpu) = HeadlessGpu::for_test() else {
            return;
        };
        let err = VertexBuffer::new(gpu.device(), &[], VertexLayout::PackedRgb).err();
        assert_eq!(
            err,
            Some(BufferError::Empty {
                kind: BufferKind::Vertex
            })
        );
    }

    #[test]
    fn upload_size_follows_layout_stride() {
        let Some(gpu) = HeadlessGpu::for_test() else {
            return;
        };
        for layout in VertexLayout::ALL {
            let vb = VertexBuffer::new(gpu.device(), &SCREEN_QUAD_STRIP, layout).unwrap();
            assert_eq!(vb.size(), 4 * layout.stride_bytes());
            assert_eq!(vb.buffer_layout().array_stride, layout.stride_bytes());
            assert_eq!(vb.vertex_count(), 4);
            assert!(vb.index_buffer().is_none());
        }
    }

    #[test]
    fn index_buffer_shared_between_vertex_buffers() {
        let Some(gpu) = HeadlessGpu::for_test() else {
            return;
        };
        let device = gpu.device();
        let ib = Arc::new(IndexBuffer::new(device, &SCREEN_QUAD_INDICES).unwrap());

        let a = VertexBuffer::with_index_buffer(
            device,
            &SCREEN_QUAD_STRIP,
            Arc::clone(&ib),
            VertexLayout::PackedRgb,
        )
        .unwrap();
        let b = VertexBuffer::with_index_buffer(
            device,
            &SCREEN_QUAD_STRIP,
            Arc::clone(&ib),
            VertexLayout::PackedRgba,
        )
        .unwrap();
        assert_eq!(Arc::strong_count(&ib), 3);

        drop(a);
        drop(ib);
        let shared = b.index_buffer().unwrap();
        assert_eq!(Arc::strong_count(shared), 1);
        assert_eq!(shared.indices(), &SCREEN_QUAD_INDICES);
    }

    #[test]
    fn empty_indices_fail_before_vertex_upload() {
        let Some(gpu) = HeadlessGpu::for_test() else {
            return;
        };
        let err = VertexBuffer::with_indices(
            gpu.device(),
            &SCREEN_QUAD_STRIP,
            &[],
            VertexLayout::PackedRgb,
        )
        .err();
        assert_eq!(
            err,
            Some(BufferError::Empty {
                kind: BufferKind::Index
            })
        );
    }
}
