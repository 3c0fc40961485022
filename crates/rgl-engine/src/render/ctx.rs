use crate::shader::ShaderProgram;

use super::{ComputePassCtx, RenderPassCtx, ResourceBindings};

/// Device handles and surface facts for one frame.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    /// Drawable size in physical pixels.
    pub size: (u32, u32),
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        size: (u32, u32),
    ) -> Self {
        Self {
            device,
            queue,
            surface_format,
            size,
        }
    }
}

/// Frame encoder plus the color view render passes draw into.
///
/// Passes opened here run in recording order. A compute pass that ends
/// before a render pass begins has all its writes visible to that render
/// pass.
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
}

impl<'a> RenderTarget<'a> {
    #[inline]
    pub fn new(encoder: &'a mut wgpu::CommandEncoder, color_view: &'a wgpu::TextureView) -> Self {
        Self {
            encoder,
            color_view,
        }
    }

    pub fn compute_pass<'p>(
        &'p mut self,
        ctx: &'p RenderCtx<'_>,
        bindings: &'p ResourceBindings,
        label: &str,
    ) -> ComputePassCtx<'p> {
        let pass = self.encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some(label),
            timestamp_writes: None,
        });
        ComputePassCtx::new(pass, ctx.device, ctx.queue, bindings)
    }

    /// Opens a render pass on the color view; `load` decides whether the
    /// previous contents survive.
    pub fn render_pass<'p>(
        &'p mut self,
        ctx: &'p RenderCtx<'_>,
        bindings: &'p ResourceBindings,
        load: wgpu::LoadOp<wgpu::Color>,
        label: &str,
    ) -> RenderPassCtx<'p> {
        let pass = self.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: self.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
        RenderPassCtx::new(pass, ctx.device, ctx.queue, bindings)
    }

    /// Compute then draw in one call: dispatches `workgroups` of `compute`,
    /// ends the pass, then runs `draw` in a render pass that loads the
    /// current contents.
    pub fn compute_then_render<F>(
        &mut self,
        ctx: &RenderCtx<'_>,
        bindings: &ResourceBindings,
        compute: &mut ShaderProgram,
        workgroups: [u32; 3],
        draw: F,
    ) -> Result<(), super::DrawError>
    where
        F: FnOnce(&mut RenderPassCtx<'_>) -> Result<(), super::DrawError>,
    {
        {
            let mut cpass = self.compute_pass(ctx, bindings, "rgl compute");
            cpass.use_program(compute)?;
            let [x, y, z] = workgroups;
            cpass.dispatch(x, y, z)?;
        }
        let mut rpass = self.render_pass(ctx, bindings, wgpu::LoadOp::Load, "rgl draw");
        draw(&mut rpass)
    }
}
