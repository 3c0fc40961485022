use std::collections::BTreeMap;

use glam::{Mat4, Vec2, Vec3, Vec4};

use super::reflect::{BindingKind, ReflectedBinding, Reflection};
use super::uniform::{UniformSlot, UniformTable, UniformValue};
use super::{Shader, ShaderError, ShaderStage, UniformError};
use crate::device::{validated, ComputeLimits};
use crate::geometry::VertexLayout;
use crate::render::{DrawError, ResourceBindings, ResourceKind};
use crate::texture::SampledTexture;

/// Which pass a program can run in.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ProgramKind {
    Render,
    Compute,
}

/// Fixed-function state for a render program.
#[derive(Debug, Clone)]
pub struct RenderProgramDesc {
    pub label: String,
    /// Vertex buffer layout the vertex stage reads; `None` for shaders that
    /// generate their vertices.
    pub vertex_layout: Option<VertexLayout>,
    pub topology: wgpu::PrimitiveTopology,
    pub color_format: wgpu::TextureFormat,
    pub blend: Option<wgpu::BlendState>,
}

impl RenderProgramDesc {
    pub fn new(color_format: wgpu::TextureFormat) -> Self {
        Self {
            label: "rgl render program".to_string(),
            vertex_layout: Some(VertexLayout::default()),
            topology: wgpu::PrimitiveTopology::TriangleList,
            color_format,
            blend: Some(wgpu::BlendState::REPLACE),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_vertex_layout(mut self, layout: Option<VertexLayout>) -> Self {
        self.vertex_layout = layout;
        self
    }

    pub fn with_topology(mut self, topology: wgpu::PrimitiveTopology) -> Self {
        self.topology = topology;
        self
    }
}

enum Pipeline {
    Render {
        pipeline: wgpu::RenderPipeline,
        vertex_layout: Option<VertexLayout>,
    },
    Compute(wgpu::ComputePipeline),
}

/// Linked pipeline plus the binding and uniform tables reflected from its
/// stages.
///
/// Uniform lookups resolve through a name map built once at link time. Values
/// are staged on the host and uploaded by [`flush_uniforms`](Self::flush_uniforms),
/// which pass contexts call when the program is used.
pub struct ShaderProgram {
    label: String,
    pipeline: Pipeline,
    bindings: Vec<ReflectedBinding>,
    uniforms: UniformTable,
    uniform_buffers: BTreeMap<(u32, u32), wgpu::Buffer>,
    workgroup_size: [u32; 3],
}

impl ShaderProgram {
    /// Links a vertex and a fragment shader. Both stages are consumed and
    /// released once the pipeline exists.
    pub fn render(
        device: &wgpu::Device,
        vertex: Shader,
        fragment: Shader,
        desc: &RenderProgramDesc,
    ) -> Result<Self, ShaderError> {
        expect_stage(&vertex, ShaderStage::Vertex)?;
        expect_stage(&fragment, ShaderStage::Fragment)?;

        let reflections = [vertex.reflection(), fragment.reflection()];
        let bindings = merge_bindings(&reflections)?;
        let uniforms = build_uniform_table(&bindings, &reflections)?;
        check_vertex_inputs(&vertex.reflection().vertex_inputs, desc.vertex_layout)?;

        let attributes = desc
            .vertex_layout
            .map(VertexLayout::attributes)
            .unwrap_or_default();
        let buffers: Vec<wgpu::VertexBufferLayout<'_>> = desc
            .vertex_layout
            .map(|layout| wgpu::VertexBufferLayout {
                array_stride: layout.stride_bytes(),
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &attributes,
            })
            .into_iter()
            .collect();

        let pipeline = validated(device, || {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(&desc.label),
                layout: None,

                vertex: wgpu::VertexState {
                    module: vertex.module(),
                    entry_point: Some(vertex.entry_point()),
                    compilation_options: Default::default(),
                    buffers: &buffers,
                },

                fragment: Some(wgpu::FragmentState {
                    module: fragment.module(),
                    entry_point: Some(fragment.entry_point()),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: desc.color_format,
                        blend: desc.blend,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),

                primitive: wgpu::PrimitiveState {
                    topology: desc.topology,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },

                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            })
        })
        .map_err(|msg| link_failed(&desc.label, msg))?;

        log::debug!(
            "{}: linked {} + {}, releasing stages",
            desc.label,
            vertex.entry_point(),
            fragment.entry_point()
        );
        drop(vertex);
        drop(fragment);

        Ok(Self::assemble(
            device,
            desc.label.clone(),
            Pipeline::Render {
                pipeline,
                vertex_layout: desc.vertex_layout,
            },
            bindings,
            uniforms,
            [0; 3],
        ))
    }

    /// Links a single compute shader, consuming it.
    pub fn compute(device: &wgpu::Device, compute: Shader) -> Result<Self, ShaderError> {
        expect_stage(&compute, ShaderStage::Compute)?;

        let reflections = [compute.reflection()];
        let bindings = merge_bindings(&reflections)?;
        let uniforms = build_uniform_table(&bindings, &reflections)?;
        let workgroup_size = compute.reflection().workgroup_size;

        let label = format!("rgl compute program ({})", compute.entry_point());
        let limits = ComputeLimits::from_limits(&device.limits());
        if !limits.allows_workgroup_size(workgroup_size) {
            return Err(link_failed(
                &label,
                format!(
                    "@workgroup_size{workgroup_size:?} exceeds the device limits \
                     ({:?} per axis, {} invocations)",
                    limits.max_workgroup_size, limits.max_invocations
                ),
            ));
        }

        let pipeline = validated(device, || {
            device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some(&label),
                layout: None,
                module: compute.module(),
                entry_point: Some(compute.entry_point()),
                compilation_options: Default::default(),
                cache: None,
            })
        })
        .map_err(|msg| link_failed(&label, msg))?;

        log::debug!("{label}: linked, releasing stage");
        drop(compute);

        Ok(Self::assemble(
            device,
            label,
            Pipeline::Compute(pipeline),
            bindings,
            uniforms,
            workgroup_size,
        ))
    }

    fn assemble(
        device: &wgpu::Device,
        label: String,
        pipeline: Pipeline,
        bindings: Vec<ReflectedBinding>,
        uniforms: UniformTable,
        workgroup_size: [u32; 3],
    ) -> Self {
        let uniform_buffers = uniforms
            .blocks()
            .map(|((group, binding), size)| {
                let buffer = device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some(&format!("{label} uniforms @{group}:{binding}")),
                    size: size as u64,
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                });
                ((group, binding), buffer)
            })
            .collect();

        Self {
            label,
            pipeline,
            bindings,
            uniforms,
            uniform_buffers,
            workgroup_size,
        }
    }

    pub fn kind(&self) -> ProgramKind {
        match self.pipeline {
            Pipeline::Render { .. } => ProgramKind::Render,
            Pipeline::Compute(_) => ProgramKind::Compute,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Resources the program reads or writes, sorted by (group, binding).
    pub fn bindings(&self) -> &[ReflectedBinding] {
        &self.bindings
    }

    /// Vertex layout a render program was linked against.
    pub fn vertex_layout(&self) -> Option<VertexLayout> {
        match self.pipeline {
            Pipeline::Render { vertex_layout, .. } => vertex_layout,
            Pipeline::Compute(_) => None,
        }
    }

    /// `@workgroup_size` of a compute program; zeros for render programs.
    pub fn workgroup_size(&self) -> [u32; 3] {
        self.workgroup_size
    }

    pub fn uniform_slot(&self, name: &str) -> Option<UniformSlot> {
        self.uniforms.slot(name)
    }

    pub fn uniform_names(&self) -> impl Iterator<Item = &str> {
        self.uniforms.names()
    }

    // ── uniforms ──────────────────────────────────────────────────────────

    pub fn set_uniform(&mut self, name: &str, value: UniformValue) -> Result<(), UniformError> {
        self.uniforms.set(name, value)
    }

    pub fn uniform_int(&mut self, name: &str, value: i32) -> Result<(), UniformError> {
        self.set_uniform(name, UniformValue::Int(value))
    }

    pub fn uniform_uint(&mut self, name: &str, value: u32) -> Result<(), UniformError> {
        self.set_uniform(name, UniformValue::Uint(value))
    }

    pub fn uniform_float(&mut self, name: &str, value: f32) -> Result<(), UniformError> {
        self.set_uniform(name, UniformValue::Float(value))
    }

    pub fn uniform_vec2(&mut self, name: &str, value: Vec2) -> Result<(), UniformError> {
        self.set_uniform(name, UniformValue::Vec2(value))
    }

    pub fn uniform_vec3(&mut self, name: &str, value: Vec3) -> Result<(), UniformError> {
        self.set_uniform(name, UniformValue::Vec3(value))
    }

    pub fn uniform_vec4(&mut self, name: &str, value: Vec4) -> Result<(), UniformError> {
        self.set_uniform(name, UniformValue::Vec4(value))
    }

    pub fn uniform_mat4(&mut self, name: &str, value: &Mat4) -> Result<(), UniformError> {
        self.set_uniform(name, UniformValue::Mat4(*value))
    }

    /// Uploads every uniform block changed since the last flush.
    pub fn flush_uniforms(&mut self, queue: &wgpu::Queue) {
        let buffers = &self.uniform_buffers;
        self.uniforms.drain_dirty(|key, bytes| {
            if let Some(buffer) = buffers.get(&key) {
                queue.write_buffer(buffer, 0, bytes);
            }
        });
    }

    // ── pass plumbing ─────────────────────────────────────────────────────

    pub(crate) fn render_pipeline(&self) -> Option<&wgpu::RenderPipeline> {
        match &self.pipeline {
            Pipeline::Render { pipeline, .. } => Some(pipeline),
            Pipeline::Compute(_) => None,
        }
    }

    pub(crate) fn compute_pipeline(&self) -> Option<&wgpu::ComputePipeline> {
        match &self.pipeline {
            Pipeline::Compute(pipeline) => Some(pipeline),
            Pipeline::Render { .. } => None,
        }
    }

    fn bind_group_layout(&self, group: u32) -> wgpu::BindGroupLayout {
        match &self.pipeline {
            Pipeline::Render { pipeline, .. } => pipeline.get_bind_group_layout(group),
            Pipeline::Compute(pipeline) => pipeline.get_bind_group_layout(group),
        }
    }

    /// Bind groups `0..=max group`, resolved against `resources`.
    ///
    /// Groups the shaders skip get an empty bind group so every slot of the
    /// derived layout is filled.
    pub(crate) fn bind_groups(
        &self,
        device: &wgpu::Device,
        resources: &ResourceBindings,
    ) -> Result<Vec<wgpu::BindGroup>, DrawError> {
        let group_count = self.bindings.iter().map(|b| b.group + 1).max().unwrap_or(0);
        let mut groups = Vec::with_capacity(group_count as usize);

        for group in 0..group_count {
            let mut entries = Vec::new();
            for b in self.bindings.iter().filter(|b| b.group == group) {
                let missing = |kind| DrawError::MissingBinding {
                    kind,
                    point: b.binding,
                    name: b.name.clone(),
                };

                let resource = match b.kind {
                    BindingKind::Uniform { .. } => self
                        .uniform_buffers
                        .get(&(b.group, b.binding))
                        .ok_or_else(|| missing(ResourceKind::Uniform))?
                        .as_entire_binding(),
                    BindingKind::StorageBuffer { min_size, .. } => {
                        let buffer = resources
                            .storage(b.binding)
                            .ok_or_else(|| missing(ResourceKind::Storage))?;
                        if buffer.size() < min_size {
                            return Err(DrawError::BindingTooSmall {
                                point: b.binding,
                                name: b.name.clone(),
                                size: buffer.size(),
                                min: min_size,
                            });
                        }
                        buffer.raw().as_entire_binding()
                    }
                    BindingKind::StorageImage => wgpu::BindingResource::TextureView(
                        resources
                            .image(b.binding)
                            .ok_or_else(|| missing(ResourceKind::Image))?
                            .view(),
                    ),
                    BindingKind::Texture => wgpu::BindingResource::TextureView(
                        resources
                            .texture(b.binding)
                            .ok_or_else(|| missing(ResourceKind::Texture))?
                            .view(),
                    ),
                    BindingKind::Sampler => wgpu::BindingResource::Sampler(
                        resources
                            .sampler(b.binding)
                            .ok_or_else(|| missing(ResourceKind::Sampler))?
                            .raw(),
                    ),
                };

                entries.push(wgpu::BindGroupEntry {
                    binding: b.binding,
                    resource,
                });
            }

            let layout = self.bind_group_layout(group);
            let bind_group = validated(device, || {
                device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(&format!("{} group {group}", self.label)),
                    layout: &layout,
                    entries: &entries,
                })
            })
            .map_err(|msg| {
                log::error!("{}: {msg}", self.label);
                DrawError::InvalidBindGroup(msg)
            })?;
            groups.push(bind_group);
        }

        Ok(groups)
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        for buffer in self.uniform_buffers.values() {
            buffer.destroy();
        }
        log::trace!("{}: released", self.label);
    }
}

// ── link checks ───────────────────────────────────────────────────────────

fn link_failed(label: &str, msg: String) -> ShaderError {
    log::error!("{label}: {msg}");
    ShaderError::Link(msg)
}

fn expect_stage(shader: &Shader, expected: ShaderStage) -> Result<(), ShaderError> {
    if shader.stage() == expected {
        return Ok(());
    }
    let msg = format!("expected a {expected} shader, got a {} shader", shader.stage());
    log::error!("{msg}");
    Err(ShaderError::Link(msg))
}

/// Union of the stages' bindings. A (group, binding) pair seen by several
/// stages must have the same kind everywhere.
fn merge_bindings(stages: &[&Reflection]) -> Result<Vec<ReflectedBinding>, ShaderError> {
    let mut merged: BTreeMap<(u32, u32), ReflectedBinding> = BTreeMap::new();

    for b in stages.iter().flat_map(|r| r.bindings.iter()) {
        match merged.get(&(b.group, b.binding)) {
            Some(existing) if existing.kind != b.kind => {
                return Err(ShaderError::Link(format!(
                    "binding @group({}) @binding({}) is {:?} in one stage and {:?} in another",
                    b.group, b.binding, existing.kind, b.kind
                )));
            }
            Some(_) => {}
            None => {
                merged.insert((b.group, b.binding), b.clone());
            }
        }
    }

    Ok(merged.into_values().collect())
}

fn build_uniform_table(
    bindings: &[ReflectedBinding],
    stages: &[&Reflection],
) -> Result<UniformTable, ShaderError> {
    let mut table = UniformTable::new();
    for b in bindings {
        if let BindingKind::Uniform { size } = b.kind {
            let size = (size.max(16) as usize).next_multiple_of(16);
            table.add_block(b.group, b.binding, size);
        }
    }

    for (name, slot) in stages.iter().flat_map(|r| r.uniforms.iter()) {
        match table.slot(name) {
            Some(existing) if existing != *slot => {
                return Err(ShaderError::Link(format!(
                    "uniform '{name}' resolves to different locations across stages"
                )));
            }
            Some(_) => {}
            None => table.add_slot(name.clone(), *slot),
        }
    }

    Ok(table)
}

/// Every `@location` input of the vertex stage must be fed by the layout.
fn check_vertex_inputs(inputs: &[u32], layout: Option<VertexLayout>) -> Result<(), ShaderError> {
    let provided: Vec<u32> = layout
        .map(|l| l.attributes().iter().map(|a| a.shader_location).collect())
        .unwrap_or_default();

    match inputs.iter().find(|loc| !provided.contains(loc)) {
        None => Ok(()),
        Some(loc) => Err(ShaderError::Link(format!(
            "vertex input @location({loc}) is not provided by {}",
            layout.map_or("an empty vertex layout".to_string(), |l| format!("{l:?}"))
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::HeadlessGpu;
    use crate::shader::UniformKind;

    fn binding(group: u32, binding: u32, kind: BindingKind) -> ReflectedBinding {
        ReflectedBinding {
            group,
            binding,
            name: format!("b{group}_{binding}"),
            kind,
        }
    }

    fn slot(group: u32, offset: u32, kind: UniformKind) -> UniformSlot {
        UniformSlot {
            group,
            binding: 0,
            offset,
            kind,
        }
    }

    // ── link checks ───────────────────────────────────────────────────────

    #[test]
    fn merged_bindings_deduplicate() {
        let vs = Reflection {
            bindings: vec![binding(0, 0, BindingKind::Uniform { size: 64 })],
            ..Default::default()
        };
        let fs = Reflection {
            bindings: vec![
                binding(1, 0, BindingKind::Texture),
                binding(0, 0, BindingKind::Uniform { size: 64 }),
            ],
            ..Default::default()
        };
        let merged = merge_bindings(&[&vs, &fs]).unwrap();
        let keys: Vec<_> = merged.iter().map(|b| (b.group, b.binding)).collect();
        assert_eq!(keys, vec![(0, 0), (1, 0)]);
    }

    #[test]
    fn conflicting_binding_kinds_fail_link() {
        let vs = Reflection {
            bindings: vec![binding(0, 0, BindingKind::Texture)],
            ..Default::default()
        };
        let fs = Reflection {
            bindings: vec![binding(0, 0, BindingKind::Sampler)],
            ..Default::default()
        };
        assert!(matches!(
            merge_bindings(&[&vs, &fs]),
            Err(ShaderError::Link(_))
        ));
    }

    #[test]
    fn uniform_blocks_padded_to_sixteen() {
        let bindings = vec![
            binding(0, 0, BindingKind::Uniform { size: 4 }),
            binding(1, 0, BindingKind::Uniform { size: 68 }),
        ];
        let table = build_uniform_table(&bindings, &[]).unwrap();
        let sizes: Vec<_> = table.blocks().collect();
        assert_eq!(sizes, vec![((0, 0), 16), ((1, 0), 80)]);
    }

    #[test]
    fn uniform_conflict_across_stages_fails_link() {
        let bindings = vec![binding(0, 0, BindingKind::Uniform { size: 16 })];
        let vs = Reflection {
            uniforms: vec![("t".into(), slot(0, 0, UniformKind::Float))],
            ..Default::default()
        };
        let fs = Reflection {
            uniforms: vec![("t".into(), slot(0, 4, UniformKind::Float))],
            ..Default::default()
        };
        assert!(build_uniform_table(&bindings, &[&vs, &vs]).is_ok());
        assert!(build_uniform_table(&bindings, &[&vs, &fs]).is_err());
    }

    #[test]
    fn vertex_inputs_must_be_provided() {
        assert!(check_vertex_inputs(&[0, 3], Some(VertexLayout::PackedRgb)).is_ok());
        assert!(check_vertex_inputs(&[0, 5], Some(VertexLayout::AlignedPadded)).is_ok());
        assert!(check_vertex_inputs(&[], None).is_ok());
        assert!(check_vertex_inputs(&[0], None).is_err());
        assert!(check_vertex_inputs(&[6], Some(VertexLayout::PackedRgba)).is_err());
    }

    // ── device ────────────────────────────────────────────────────────────

    const BLIT: &str = r#"
struct Out {
    @builtin(position) clip: vec4<f32>,
    @location(0) uv: vec2<f32>,
}

struct Params {
    tint: vec4<f32>,
    gain: f32,
}

@group(0) @binding(0) var<uniform> params: Params;

@vertex
fn vs_main(@location(0) position: vec3<f32>, @location(3) uv: vec2<f32>) -> Out {
    var out: Out;
    out.clip = vec4<f32>(position, 1.0);
    out.uv = uv;
    return out;
}

@fragment
fn fs_main(in: Out) -> @location(0) vec4<f32> {
    return params.tint * params.gain * vec4<f32>(in.uv, 0.0, 1.0);
}
"#;

    #[test]
    fn render_program_links_and_resolves_uniforms() {
        let Some(gpu) = HeadlessGpu::for_test() else {
            return;
        };
        let device = gpu.device();
        let vs = Shader::from_source(device, BLIT, ShaderStage::Vertex).unwrap();
        let fs = Shader::from_source(device, BLIT, ShaderStage::Fragment).unwrap();
        let desc = RenderProgramDesc::new(wgpu::TextureFormat::Rgba8Unorm)
            .with_topology(wgpu::PrimitiveTopology::TriangleStrip);

        let mut program = ShaderProgram::render(device, vs, fs, &desc).unwrap();
        assert_eq!(program.kind(), ProgramKind::Render);
        assert_eq!(program.vertex_layout(), Some(VertexLayout::PackedRgb));
        assert_eq!(program.uniform_slot("gain").unwrap().offset, 16);

        program.uniform_float("gain", 0.5).unwrap();
        program.uniform_vec4("tint", Vec4::ONE).unwrap();
        assert!(matches!(
            program.uniform_float("missing", 1.0),
            Err(UniformError::Unknown(_))
        ));
        assert!(matches!(
            program.uniform_int("gain", 1),
            Err(UniformError::KindMismatch { .. })
        ));
        program.flush_uniforms(gpu.queue());
    }

    #[test]
    fn swapped_stages_fail_link() {
        let Some(gpu) = HeadlessGpu::for_test() else {
            return;
        };
        let device = gpu.device();
        let vs = Shader::from_source(device, BLIT, ShaderStage::Vertex).unwrap();
        let fs = Shader::from_source(device, BLIT, ShaderStage::Fragment).unwrap();
        let desc = RenderProgramDesc::new(wgpu::TextureFormat::Rgba8Unorm);

        let err = ShaderProgram::render(device, fs, vs, &desc).err().unwrap();
        assert!(matches!(err, ShaderError::Link(_)));
    }

    #[test]
    fn compute_program_reports_workgroup_size() {
        let Some(gpu) = HeadlessGpu::for_test() else {
            return;
        };
        let src = r#"
@group(0) @binding(0) var<storage, read_write> data: array<u32>;

@compute @workgroup_size(8, 4, 1)
fn main(@builtin(global_invocation_id) id: vec3<u32>) {
    data[id.x] = id.y;
}
"#;
        let cs = Shader::from_source(gpu.device(), src, ShaderStage::Compute).unwrap();
        let program = ShaderProgram::compute(gpu.device(), cs).unwrap();
        assert_eq!(program.kind(), ProgramKind::Compute);
        assert_eq!(program.workgroup_size(), [8, 4, 1]);
        assert_eq!(program.bindings().len(), 1);
        assert!(program.uniform_names().next().is_none());
    }

    #[test]
    fn stage_interface_mismatch_fails_link() {
        let Some(gpu) = HeadlessGpu::for_test() else {
            return;
        };
        let src = r#"
struct In {
    @builtin(position) clip: vec4<f32>,
    @location(0) uv: vec2<f32>,
}

@vertex
fn vs_main(@builtin(vertex_index) i: u32) -> @builtin(position) vec4<f32> {
    return vec4<f32>(f32(i), 0.0, 0.0, 1.0);
}

@fragment
fn fs_main(in: In) -> @location(0) vec4<f32> {
    return vec4<f32>(in.uv, 0.0, 1.0);
}
"#;
        let device = gpu.device();
        let vs = Shader::from_source(device, src, ShaderStage::Vertex).unwrap();
        let fs = Shader::from_source(device, src, ShaderStage::Fragment).unwrap();
        let desc = RenderProgramDesc::new(wgpu::TextureFormat::Rgba8Unorm).with_vertex_layout(None);

        let err = ShaderProgram::render(device, vs, fs, &desc).err().unwrap();
        assert!(matches!(err, ShaderError::Link(_)));
    }

    #[test]
    fn oversized_workgroup_fails_link() {
        let Some(gpu) = HeadlessGpu::for_test() else {
            return;
        };
        let src = r#"
@group(0) @binding(0) var<storage, read_write> data: array<u32>;

@compute @workgroup_size(32, 32, 1)
fn main(@builtin(local_invocation_index) i: u32) {
    data[i] = i;
}
"#;
        let limits = gpu.compute_limits();
        if limits.allows_workgroup_size([32, 32, 1]) {
            eprintln!("skipping oversized_workgroup_fails_link: device allows 1024 invocations");
            return;
        }
        let cs = Shader::from_source(gpu.device(), src, ShaderStage::Compute).unwrap();
        match ShaderProgram::compute(gpu.device(), cs) {
            Err(ShaderError::Link(msg)) => assert!(msg.contains("workgroup_size")),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("oversized workgroup linked"),
        }
    }
}
