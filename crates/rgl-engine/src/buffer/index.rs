use super::{create_static, element_count, release, BufferError, BufferKind, GpuBuffer};

const LABEL: &str = "rgl index buffer";

/// Immutable `u32` element indices, uploaded once.
///
/// Keeps a host copy so callers can read back what was uploaded without a
/// GPU round trip.
pub struct IndexBuffer {
    buffer: wgpu::Buffer,
    indices: Vec<u32>,
    count: u32,
}

impl IndexBuffer {
    pub fn new(device: &wgpu::Device, indices: &[u32]) -> Result<Self, BufferError> {
        let count = element_count(BufferKind::Index, indices.len())?;
        let buffer = create_static(
            device,
            BufferKind::Index,
            LABEL,
            bytemuck::cast_slice(indices),
            wgpu::BufferUsages::INDEX,
            device.limits().max_buffer_size,
        )?;

        Ok(Self {
            buffer,
            indices: indices.to_vec(),
            count,
        })
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn to_vec(&self) -> Vec<u32> {
        self.indices.clone()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Element count as used by draw calls.
    #[inline]
    pub fn count(&self) -> u32 {
        self.count
    }

    #[inline]
    pub const fn format(&self) -> wgpu::IndexFormat {
        wgpu::IndexFormat::Uint32
    }
}

impl GpuBuffer for IndexBuffer {
    fn raw(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    fn kind(&self) -> BufferKind {
        BufferKind::Index
    }

    fn label(&self) -> &str {
        LABEL
    }
}

impl Drop for IndexBuffer {
    fn drop(&mut self) {
        release(&self.buffer, LABEL);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::device::HeadlessGpu;

    static_assertions::assert_not_impl_any!(IndexBuffer: Clone, Copy);

    #[test]
    fn empty_indices_rejected() {
        let Some(gpu) = HeadlessGpu::for_test() else {
            return;
        };
        let err = IndexBuffer::new(gpu.device(), &[]).err();
        assert_eq!(
            err,
            Some(BufferError::Empty {
                kind: BufferKind::Index
            })
        );
    }

    #[test]
    fn host_copy_matches_upload() {
        let Some(gpu) = HeadlessGpu::for_test() else {
            return;
        };
        let ib = IndexBuffer::new(gpu.device(), &[0, 1, 2, 2, 1, 3]).unwrap();
        assert_eq!(ib.indices(), &[0, 1, 2, 2, 1, 3]);
        assert_eq!(ib.to_vec(), vec![0, 1, 2, 2, 1, 3]);
        assert_eq!(ib.count(), 6);
        assert_eq!(ib.size(), 24);
        assert_eq!(ib.format(), wgpu::IndexFormat::Uint32);
        assert!(!ib.usage().contains(wgpu::BufferUsages::COPY_DST));
    }

    #[test]
    fn shared_handle_outlives_first_holder() {
        let Some(gpu) = HeadlessGpu::for_test() else {
            return;
        };
        let ib = Arc::new(IndexBuffer::new(gpu.device(), &[0, 1, 2]).unwrap());
        let other = Arc::clone(&ib);
        assert_eq!(Arc::strong_count(&ib), 2);

        drop(ib);
        assert_eq!(Arc::strong_count(&other), 1);
        assert_eq!(other.indices(), &[0, 1, 2]);
    }
}
