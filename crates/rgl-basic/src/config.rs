use std::path::PathBuf;

use clap::Parser;

const DEFAULT_SHADER_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/shaders");

/// Ray traces a mesh in a compute shader and shows the result on a screen quad.
#[derive(Parser, Debug)]
#[command(name = "rgl-basic", version)]
pub struct Args {
    /// glTF model to trace; a single colored triangle when omitted.
    #[arg(long)]
    pub model: Option<PathBuf>,

    /// Albedo texture (PNG or JPEG); overrides the model's base color texture.
    #[arg(long)]
    pub texture: Option<PathBuf>,

    /// Directory holding vertex.wgsl, fragment.wgsl and compute.wgsl.
    #[arg(long, default_value = DEFAULT_SHADER_DIR)]
    pub shader_dir: PathBuf,

    /// Side of the square output image in texels.
    #[arg(long, default_value_t = 1000)]
    pub texture_size: u32,

    /// Report average FPS every N frames.
    #[arg(long, default_value_t = 500)]
    pub fps_interval: u32,

    /// Exit after this many frames.
    #[arg(long)]
    pub max_frames: Option<u64>,

    /// Wait for vertical blank when presenting.
    #[arg(long)]
    pub vsync: bool,

    /// Log filter, env_logger syntax (e.g. "debug", "rgl_engine=trace").
    #[arg(long)]
    pub log: Option<String>,
}

/// Settings the demo app runs with.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub model: Option<PathBuf>,
    pub texture: Option<PathBuf>,
    pub shader_dir: PathBuf,
    pub texture_size: u32,
    pub fps_interval: u32,
    pub max_frames: Option<u64>,
    pub present_mode: wgpu::PresentMode,
}

impl From<Args> for DemoConfig {
    fn from(args: Args) -> Self {
        Self {
            model: args.model,
            texture: args.texture,
            shader_dir: args.shader_dir,
            texture_size: args.texture_size,
            fps_interval: args.fps_interval,
            max_frames: args.max_frames,
            present_mode: if args.vsync {
                wgpu::PresentMode::AutoVsync
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
        }
    }
}

impl DemoConfig {
    pub fn shader(&self, file: &str) -> PathBuf {
        self.shader_dir.join(file)
    }
}
