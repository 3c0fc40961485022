use std::sync::Arc;

use anyhow::{Context, Result};
use glam::Vec2;
use rgl_engine::buffer::{ShaderStorageBuffer, VertexArray, VertexBuffer};
use rgl_engine::core::{App, AppControl, FrameCtx};
use rgl_engine::device::workgroups_for;
use rgl_engine::geometry::{SCREEN_QUAD_STRIP, VertexLayout};
use rgl_engine::render::{RenderCtx, RenderTarget, ResourceBindings};
use rgl_engine::shader::{RenderProgramDesc, Shader, ShaderProgram, ShaderStage};
use rgl_engine::texture::{OutputImage, Sampler, Texture2d};
use rgl_engine::time::FpsCounter;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowId;

use crate::config::DemoConfig;
use crate::scene::Scene;

const CLEAR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};

// Binding layout shared with compute.wgsl and fragment.wgsl.
const VERTICES_POINT: u32 = 0;
const INDICES_POINT: u32 = 1;
const OUTPUT_UNIT: u32 = 0;
const ALBEDO_UNIT: u32 = 1;
const SAMPLER_POINT: u32 = 2;

pub struct BasicApp {
    config: DemoConfig,
    scene: Scene,
    fps: FpsCounter,
    frames: u64,
    state: Option<GpuState>,
}

impl BasicApp {
    pub fn new(config: DemoConfig, scene: Scene) -> Self {
        let fps = FpsCounter::new(config.fps_interval);
        Self {
            config,
            scene,
            fps,
            frames: 0,
            state: None,
        }
    }
}

impl App for BasicApp {
    fn on_window_event(&mut self, _window_id: WindowId, event: &WindowEvent) -> AppControl {
        if let WindowEvent::KeyboardInput { event, .. } = event
            && event.state == ElementState::Pressed
            && event.logical_key == Key::Named(NamedKey::Escape)
        {
            log::info!("escape pressed, exiting");
            return AppControl::Exit;
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if self.state.is_none() {
            let built = GpuState::new(
                ctx.gpu.device(),
                ctx.gpu.queue(),
                ctx.gpu.surface_format(),
                &self.config,
                &self.scene,
            );
            match built {
                Ok(state) => self.state = Some(state),
                Err(err) => {
                    log::error!("failed to set up GPU resources: {err:#}");
                    return AppControl::Exit;
                }
            }
        }
        let Some(state) = self.state.as_mut() else {
            return AppControl::Exit;
        };

        if let Some(fps) = self.fps.record(ctx.time.dt) {
            log::info!("FPS: {fps:.1}");
            ctx.window.set_title(&format!("rgl basic | {fps:.0} fps"));
        }

        if let Err(err) = state.compute.uniform_float("t", ctx.time.elapsed) {
            log::error!("{err}");
            return AppControl::Exit;
        }

        let control = ctx.render(CLEAR, |rctx, target| state.draw(rctx, target));
        self.frames += 1;

        if let Some(max) = self.config.max_frames
            && self.frames >= max
        {
            log::info!("reached {max} frames, exiting");
            return AppControl::Exit;
        }
        control
    }

    fn on_exit(&mut self) {
        log::info!("rendered {} frames", self.frames);
        self.state = None;
    }
}

/// Everything created once the device exists.
struct GpuState {
    compute: ShaderProgram,
    screen: ShaderProgram,
    bindings: ResourceBindings,
    quad: VertexArray,
    workgroups: [u32; 3],
}

impl GpuState {
    fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        config: &DemoConfig,
        scene: &Scene,
    ) -> Result<Self> {
        let vertex = Shader::from_file(device, config.shader("vertex.wgsl"), ShaderStage::Vertex)?;
        let fragment =
            Shader::from_file(device, config.shader("fragment.wgsl"), ShaderStage::Fragment)?;
        let screen = ShaderProgram::render(
            device,
            vertex,
            fragment,
            &RenderProgramDesc::new(surface_format)
                .with_label("screen quad")
                .with_vertex_layout(Some(VertexLayout::PackedRgb))
                .with_topology(wgpu::PrimitiveTopology::TriangleStrip),
        )?;

        let compute_stage =
            Shader::from_file(device, config.shader("compute.wgsl"), ShaderStage::Compute)?;
        let mut compute = ShaderProgram::compute(device, compute_stage)?;

        let size = config.texture_size;
        let output = Arc::new(OutputImage::new(device, size, size, OUTPUT_UNIT)?);
        let albedo = Arc::new(load_albedo(device, queue, config, scene)?);
        let sampler = Arc::new(Sampler::linear_clamp(device));

        let vertices = Arc::new(ShaderStorageBuffer::from_vertices(
            device,
            &scene.vertices,
            VertexLayout::AlignedPadded,
            VERTICES_POINT,
        )?);
        let indices = Arc::new(ShaderStorageBuffer::new(
            device,
            scene.indices.as_slice(),
            INDICES_POINT,
        )?);

        let mut bindings = ResourceBindings::new();
        bindings.attach_storage(&vertices);
        bindings.attach_storage(&indices);
        bindings.attach_image(&output);
        bindings.attach_texture(OUTPUT_UNIT, output);
        bindings.attach_texture(ALBEDO_UNIT, albedo);
        bindings.attach_sampler(SAMPLER_POINT, sampler);

        let num_indices = u32::try_from(scene.indices.len()).context("index count overflows u32")?;
        compute.uniform_uint("num_indices", num_indices)?;
        compute.uniform_vec2("resolution", Vec2::splat(size as f32))?;

        let [gx, gy, _] = compute.workgroup_size();
        let workgroups = [workgroups_for(size, gx), workgroups_for(size, gy), 1];
        log::info!(
            "output {size}x{size}, workgroup {gx}x{gy}, dispatch {}x{}",
            workgroups[0],
            workgroups[1]
        );

        let quad = VertexArray::new(Arc::new(VertexBuffer::new(
            device,
            &SCREEN_QUAD_STRIP,
            VertexLayout::PackedRgb,
        )?));

        Ok(Self {
            compute,
            screen,
            bindings,
            quad,
            workgroups,
        })
    }

    fn draw(&mut self, rctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>) -> Result<()> {
        let Self {
            compute,
            screen,
            bindings,
            quad,
            workgroups,
        } = self;

        target.compute_then_render(rctx, bindings, compute, *workgroups, |pass| {
            pass.use_program(screen)?;
            pass.bind_vertex_array(quad);
            pass.draw()
        })?;
        Ok(())
    }
}

/// `--texture` first, then the model's base color, then plain white.
fn load_albedo(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    config: &DemoConfig,
    scene: &Scene,
) -> Result<Texture2d> {
    let image = match &config.texture {
        Some(path) => Some(
            image::open(path)
                .with_context(|| format!("failed to open texture {}", path.display()))?
                .to_rgba8(),
        ),
        None => scene.base_color.clone(),
    };

    let texture = match image {
        Some(image) => {
            log::info!("albedo {}x{}", image.width(), image.height());
            Texture2d::from_rgba8(device, queue, image.width(), image.height(), image.as_raw())?
        }
        None => Texture2d::white(device, queue)?,
    };
    Ok(texture)
}
