use std::collections::BTreeMap;
use std::sync::Arc;

use bytemuck::Pod;

use crate::buffer::{GpuBuffer, ShaderStorageBuffer};
use crate::texture::{OutputImage, SampledTexture, Sampler};

/// Numbered binding points, each holding at most one resource.
///
/// Assigning to an occupied point replaces the occupant: a point only ever
/// observes the most recent resource.
#[derive(Debug)]
pub struct BindingTable<R> {
    slots: BTreeMap<u32, R>,
}

impl<R> BindingTable<R> {
    pub fn new() -> Self {
        Self {
            slots: BTreeMap::new(),
        }
    }

    /// Puts `resource` at `point`, returning what was there before.
    pub fn assign(&mut self, point: u32, resource: R) -> Option<R> {
        self.slots.insert(point, resource)
    }

    pub fn release(&mut self, point: u32) -> Option<R> {
        self.slots.remove(&point)
    }

    pub fn get(&self, point: u32) -> Option<&R> {
        self.slots.get(&point)
    }

    pub fn contains(&self, point: u32) -> bool {
        self.slots.contains_key(&point)
    }

    pub fn points(&self) -> impl Iterator<Item = u32> + '_ {
        self.slots.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<R> Default for BindingTable<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// Resources visible to programs, keyed by binding number.
///
/// Storage buffers, images, textures and samplers live in separate
/// namespaces: storage point 0 and image unit 0 are different slots. A
/// program resolves each `@binding(n)` in the namespace its type implies,
/// whatever its `@group`.
#[derive(Default)]
pub struct ResourceBindings {
    storage: BindingTable<Arc<dyn GpuBuffer>>,
    images: BindingTable<Arc<OutputImage>>,
    textures: BindingTable<Arc<dyn SampledTexture>>,
    samplers: BindingTable<Arc<Sampler>>,
}

impl ResourceBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a storage buffer at its own binding point.
    pub fn attach_storage<T: Pod>(&mut self, buffer: &Arc<ShaderStorageBuffer<T>>) {
        let point = buffer.binding_point();
        self.attach_storage_at(point, Arc::clone(buffer) as Arc<dyn GpuBuffer>);
    }

    pub fn attach_storage_at(&mut self, point: u32, buffer: Arc<dyn GpuBuffer>) {
        if self.storage.assign(point, buffer).is_some() {
            log::trace!("storage point {point}: previous buffer replaced");
        }
    }

    pub fn detach_storage(&mut self, point: u32) -> Option<Arc<dyn GpuBuffer>> {
        self.storage.release(point)
    }

    /// Attaches an output image at its image unit.
    pub fn attach_image(&mut self, image: &Arc<OutputImage>) {
        if self.images.assign(image.unit(), Arc::clone(image)).is_some() {
            log::trace!("image unit {}: previous image replaced", image.unit());
        }
    }

    pub fn detach_image(&mut self, unit: u32) -> Option<Arc<OutputImage>> {
        self.images.release(unit)
    }

    pub fn attach_texture(&mut self, unit: u32, texture: Arc<dyn SampledTexture>) {
        if self.textures.assign(unit, texture).is_some() {
            log::trace!("texture unit {unit}: previous texture replaced");
        }
    }

    pub fn attach_sampler(&mut self, point: u32, sampler: Arc<Sampler>) {
        self.samplers.assign(point, sampler);
    }

    pub fn storage(&self, point: u32) -> Option<&dyn GpuBuffer> {
        self.storage.get(point).map(|b| b.as_ref())
    }

    pub fn image(&self, unit: u32) -> Option<&OutputImage> {
        self.images.get(unit).map(|i| i.as_ref())
    }

    pub fn texture(&self, unit: u32) -> Option<&dyn SampledTexture> {
        self.textures.get(unit).map(|t| t.as_ref())
    }

    pub fn sampler(&self, point: u32) -> Option<&Sampler> {
        self.samplers.get(point).map(|s| s.as_ref())
    }
}
