use std::sync::Arc;

use super::{IndexBuffer, VertexBuffer};
use crate::geometry::VertexLayout;

/// What a draw through a [`VertexArray`] covers.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DrawRange {
    /// `draw_indexed(0..count)`.
    Indexed(u32),
    /// `draw(0..count)`.
    Vertices(u32),
}

impl DrawRange {
    #[inline]
    pub fn count(self) -> u32 {
        match self {
            DrawRange::Indexed(n) | DrawRange::Vertices(n) => n,
        }
    }
}

/// Records which buffers and attribute layout a draw uses.
///
/// The attribute layout is captured once, from the vertex buffer's
/// [`VertexLayout`]; a render program built with the same layout can draw it.
/// Binding happens on a render pass context.
pub struct VertexArray {
    vertex_buffer: Arc<VertexBuffer>,
}

impl VertexArray {
    pub fn new(vertex_buffer: Arc<VertexBuffer>) -> Self {
        log::debug!(
            "vertex array over {} vertices ({:?})",
            vertex_buffer.vertex_count(),
            vertex_buffer.layout()
        );
        Self { vertex_buffer }
    }

    #[inline]
    pub fn vertex_buffer(&self) -> &Arc<VertexBuffer> {
        &self.vertex_buffer
    }

    #[inline]
    pub fn index_buffer(&self) -> Option<&Arc<IndexBuffer>> {
        self.vertex_buffer.index_buffer()
    }

    #[inline]
    pub fn layout(&self) -> VertexLayout {
        self.vertex_buffer.layout()
    }

    /// Vertex buffer layouts in slot order, for pipeline creation.
    pub fn buffer_layouts(&self) -> [wgpu::VertexBufferLayout<'_>; 1] {
        [self.vertex_buffer.buffer_layout()]
    }

    /// Index count when an index buffer is attached, vertex count otherwise.
    pub fn draw_range(&self) -> DrawRange {
        match self.index_buffer() {
            Some(ib) => DrawRange::Indexed(ib.count()),
            None => DrawRange::Vertices(self.vertex_buffer.vertex_count()),
        }
    }
}
