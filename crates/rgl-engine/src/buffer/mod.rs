//! Owned GPU buffers.
//!
//! Every wrapper here owns exactly one `wgpu::Buffer`, created and filled once
//! in its constructor. Wrappers are move-only; share them through `Arc` and the
//! GPU resource is released once, when the last holder drops.
//!
//! Binding never happens on the wrapper itself. Vertex arrays are bound on a
//! render pass context and storage buffers are attached to
//! [`ResourceBindings`](crate::render::ResourceBindings).

mod array;
mod error;
mod index;
mod storage;
mod vertex;

pub use array::{DrawRange, VertexArray};
pub use error::{BufferError, BufferKind};
pub use index::IndexBuffer;
pub use storage::ShaderStorageBuffer;
pub use vertex::VertexBuffer;

pub(crate) use error::{check_upload, element_count};

use wgpu::util::DeviceExt;

/// Common surface of the data-owning buffer wrappers.
pub trait GpuBuffer {
    /// Underlying wgpu buffer.
    fn raw(&self) -> &wgpu::Buffer;

    fn kind(&self) -> BufferKind;

    fn label(&self) -> &str;

    fn usage(&self) -> wgpu::BufferUsages {
        self.raw().usage()
    }

    /// Size of the GPU allocation in bytes.
    fn size(&self) -> u64 {
        self.raw().size()
    }
}

/// Creates a buffer initialized with `contents`.
///
/// Usages never include `COPY_DST`: these buffers are written exactly once.
pub(crate) fn create_static(
    device: &wgpu::Device,
    kind: BufferKind,
    label: &str,
    contents: &[u8],
    usage: wgpu::BufferUsages,
    limit: u64,
) -> Result<wgpu::Buffer, BufferError> {
    check_upload(kind, contents.len() as u64, limit)?;

    let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents,
        usage,
    });

    log::debug!("{label}: uploaded {} bytes", contents.len());
    Ok(buffer)
}

/// Releases the GPU allocation right away instead of waiting for wgpu's own
/// reference count to reach zero.
pub(crate) fn release(buffer: &wgpu::Buffer, label: &str) {
    log::trace!("{label}: released");
    buffer.destroy();
}
