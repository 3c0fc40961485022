use crate::buffer::{DrawRange, GpuBuffer, VertexArray};
use crate::device::ComputeLimits;
use crate::geometry::VertexLayout;
use crate::shader::{ProgramKind, ShaderProgram};

use super::{DrawError, ResourceBindings};

/// Binds `program`'s groups on a pass after flushing its uniforms.
///
/// Uniform uploads go through the queue, so a value set between two uses of
/// the same program in one submission is seen by both.
fn prepare(
    program: &mut ShaderProgram,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    bindings: &ResourceBindings,
) -> Result<Vec<wgpu::BindGroup>, DrawError> {
    program.flush_uniforms(queue);
    program.bind_groups(device, bindings)
}

/// Recording state of one render pass: current program and vertex array.
///
/// Nothing here is global: dropping the context ends the pass and forgets
/// every binding made on it.
pub struct RenderPassCtx<'p> {
    pass: wgpu::RenderPass<'p>,
    device: &'p wgpu::Device,
    queue: &'p wgpu::Queue,
    bindings: &'p ResourceBindings,
    program: Option<Option<VertexLayout>>,
    vertex_array: Option<(VertexLayout, DrawRange)>,
}

impl<'p> RenderPassCtx<'p> {
    pub fn new(
        pass: wgpu::RenderPass<'p>,
        device: &'p wgpu::Device,
        queue: &'p wgpu::Queue,
        bindings: &'p ResourceBindings,
    ) -> Self {
        Self {
            pass,
            device,
            queue,
            bindings,
            program: None,
            vertex_array: None,
        }
    }

    pub fn use_program(&mut self, program: &mut ShaderProgram) -> Result<(), DrawError> {
        if program.kind() != ProgramKind::Render {
            return Err(DrawError::WrongProgramKind {
                expected: ProgramKind::Render,
                found: program.kind(),
            });
        }
        let groups = prepare(program, self.device, self.queue, self.bindings)?;

        if let Some(pipeline) = program.render_pipeline() {
            self.pass.set_pipeline(pipeline);
        }
        for (index, group) in groups.iter().enumerate() {
            self.pass.set_bind_group(index as u32, group, &[]);
        }
        self.program = Some(program.vertex_layout());
        Ok(())
    }

    /// Sets the array's vertex buffer (and index buffer, if any) for the
    /// following draws. Binding the same array again is harmless.
    pub fn bind_vertex_array(&mut self, vertex_array: &VertexArray) {
        let vb = vertex_array.vertex_buffer();
        self.pass.set_vertex_buffer(0, vb.raw().slice(..));
        if let Some(ib) = vertex_array.index_buffer() {
            self.pass.set_index_buffer(ib.raw().slice(..), ib.format());
        }
        self.vertex_array = Some((vertex_array.layout(), vertex_array.draw_range()));
    }

    /// Forgets the bound vertex array; later draws fail with
    /// [`DrawError::NoVertexArray`].
    pub fn unbind_vertex_array(&mut self) {
        self.vertex_array = None;
    }

    /// Draws the whole bound vertex array with the current program.
    pub fn draw(&mut self) -> Result<(), DrawError> {
        let program_layout = self.program.ok_or(DrawError::NoProgram)?;
        let (layout, range) = self.vertex_array.ok_or(DrawError::NoVertexArray)?;
        if program_layout != Some(layout) {
            return Err(DrawError::LayoutMismatch {
                program: program_layout,
                array: layout,
            });
        }

        match range {
            DrawRange::Indexed(count) => self.pass.draw_indexed(0..count, 0, 0..1),
            DrawRange::Vertices(count) => self.pass.draw(0..count, 0..1),
        }
        Ok(())
    }

    /// Draws `count` vertices the vertex shader generates itself.
    pub fn draw_generated(&mut self, count: u32) -> Result<(), DrawError> {
        self.program.ok_or(DrawError::NoProgram)?;
        self.pass.draw(0..count, 0..1);
        Ok(())
    }
}

/// Recording state of one compute pass.
pub struct ComputePassCtx<'p> {
    pass: wgpu::ComputePass<'p>,
    device: &'p wgpu::Device,
    queue: &'p wgpu::Queue,
    bindings: &'p ResourceBindings,
    limits: ComputeLimits,
    has_program: bool,
}

impl<'p> ComputePassCtx<'p> {
    pub fn new(
        pass: wgpu::ComputePass<'p>,
        device: &'p wgpu::Device,
        queue: &'p wgpu::Queue,
        bindings: &'p ResourceBindings,
    ) -> Self {
        Self {
            pass,
            device,
            queue,
            bindings,
            limits: ComputeLimits::from_limits(&device.limits()),
            has_program: false,
        }
    }

    pub fn use_program(&mut self, program: &mut ShaderProgram) -> Result<(), DrawError> {
        if program.kind() != ProgramKind::Compute {
            return Err(DrawError::WrongProgramKind {
                expected: ProgramKind::Compute,
                found: program.kind(),
            });
        }
        let groups = prepare(program, self.device, self.queue, self.bindings)?;

        if let Some(pipeline) = program.compute_pipeline() {
            self.pass.set_pipeline(pipeline);
        }
        for (index, group) in groups.iter().enumerate() {
            self.pass.set_bind_group(index as u32, group, &[]);
        }
        self.has_program = true;
        Ok(())
    }

    /// Dispatches `x * y * z` workgroups of the current program.
    pub fn dispatch(&mut self, x: u32, y: u32, z: u32) -> Result<(), DrawError> {
        if !self.has_program {
            return Err(DrawError::NoProgram);
        }
        if !self.limits.allows_dispatch([x, y, z]) {
            return Err(DrawError::DispatchTooLarge {
                workgroups: [x, y, z],
                limit: self.limits.max_workgroups_per_dimension,
            });
        }
        self.pass.dispatch_workgroups(x, y, z);
        Ok(())
    }
}
