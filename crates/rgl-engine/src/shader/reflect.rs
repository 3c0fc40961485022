//! Binding and uniform reflection over a validated naga module.
//!
//! Only globals an entry point actually touches are reported, so a program's
//! tables never ask for resources its stages ignore.

use naga::valid::ModuleInfo;
use naga::{AddressSpace, Binding, ImageClass, Module, StorageAccess, TypeInner};

use super::uniform::{UniformKind, UniformSlot};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BindingKind {
    /// Uniform block of `size` bytes.
    Uniform { size: u64 },
    /// Storage buffer; a runtime-sized array counts as one element toward
    /// `min_size`.
    StorageBuffer { read_only: bool, min_size: u64 },
    /// Storage texture (an image unit).
    StorageImage,
    /// Sampled texture (a texture unit).
    Texture,
    Sampler,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ReflectedBinding {
    pub group: u32,
    pub binding: u32,
    pub name: String,
    pub kind: BindingKind,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reflection {
    pub bindings: Vec<ReflectedBinding>,
    pub uniforms: Vec<(String, UniformSlot)>,
    /// Locations of `@location` inputs of a vertex entry point.
    pub vertex_inputs: Vec<u32>,
    /// `@workgroup_size` of a compute entry point, zeros otherwise.
    pub workgroup_size: [u32; 3],
}

impl Reflection {
    pub fn binding(&self, group: u32, binding: u32) -> Option<&ReflectedBinding> {
        self.bindings
            .iter()
            .find(|b| b.group == group && b.binding == binding)
    }

    pub fn uniform(&self, name: &str) -> Option<UniformSlot> {
        self.uniforms
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, slot)| *slot)
    }
}

/// Reflects entry point `entry_index` of `module`.
pub fn reflect(module: &Module, info: &ModuleInfo, entry_index: usize) -> Reflection {
    let usage = info.get_entry_point(entry_index);
    let entry = &module.entry_points[entry_index];
    let mut out = Reflection {
        workgroup_size: entry.workgroup_size,
        ..Default::default()
    };

    for (handle, var) in module.global_variables.iter() {
        let Some(res) = var.binding.as_ref() else {
            continue;
        };
        if usage[handle].is_empty() {
            continue;
        }

        let inner = &module.types[var.ty].inner;
        let kind = match var.space {
            AddressSpace::Uniform => BindingKind::Uniform {
                size: inner.size(module.to_ctx()) as u64,
            },
            AddressSpace::Storage { access } => BindingKind::StorageBuffer {
                read_only: !access.contains(StorageAccess::STORE),
                min_size: inner.size(module.to_ctx()) as u64,
            },
            AddressSpace::Handle => match inner {
                TypeInner::Image {
                    class: ImageClass::Storage { .. },
                    ..
                } => BindingKind::StorageImage,
                TypeInner::Image { .. } => BindingKind::Texture,
                TypeInner::Sampler { .. } => BindingKind::Sampler,
                _ => continue,
            },
            _ => continue,
        };

        let name = var.name.clone().unwrap_or_default();
        if matches!(kind, BindingKind::Uniform { .. }) {
            collect_uniforms(module, &name, inner, res.group, res.binding, &mut out.uniforms);
        }

        out.bindings.push(ReflectedBinding {
            group: res.group,
            binding: res.binding,
            name,
            kind,
        });
    }
    out.bindings.sort_by_key(|b| (b.group, b.binding));

    for arg in &entry.function.arguments {
        match &arg.binding {
            Some(Binding::Location { location, .. }) => out.vertex_inputs.push(*location),
            Some(Binding::BuiltIn(_)) => {}
            None => {
                if let TypeInner::Struct { members, .. } = &module.types[arg.ty].inner {
                    out.vertex_inputs
                        .extend(members.iter().filter_map(|m| match m.binding {
                            Some(Binding::Location { location, .. }) => Some(location),
                            _ => None,
                        }));
                }
            }
        }
    }
    if entry.stage != naga::ShaderStage::Vertex {
        out.vertex_inputs.clear();
    }
    out.vertex_inputs.sort_unstable();

    out
}

/// Struct blocks contribute one slot per member; a bare `var<uniform>` of a
/// settable type is addressed by the variable's own name.
fn collect_uniforms(
    module: &Module,
    var_name: &str,
    inner: &TypeInner,
    group: u32,
    binding: u32,
    out: &mut Vec<(String, UniformSlot)>,
) {
    match inner {
        TypeInner::Struct { members, .. } => {
            for member in members {
                let Some(name) = member.name.as_deref() else {
                    continue;
                };
                match UniformKind::from_naga(&module.types[member.ty].inner) {
                    Some(kind) => out.push((
                        name.to_owned(),
                        UniformSlot {
                            group,
                            binding,
                            offset: member.offset,
                            kind,
                        },
                    )),
                    None => log::debug!("uniform member '{var_name}.{name}' is not host-settable"),
                }
            }
        }
        other => {
            if let Some(kind) = UniformKind::from_naga(other) {
                out.push((
                    var_name.to_owned(),
                    UniformSlot {
                        group,
                        binding,
                        offset: 0,
                        kind,
                    },
                ));
            }
        }
    }
}
