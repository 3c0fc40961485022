mod app;
mod config;
mod scene;

use anyhow::Result;
use clap::Parser;
use rgl_engine::device::GpuInit;
use rgl_engine::logging::{LoggingConfig, init_logging};
use rgl_engine::window::{Runtime, RuntimeConfig};
use winit::dpi::LogicalSize;

use crate::app::BasicApp;
use crate::config::{Args, DemoConfig};
use crate::scene::Scene;

const WINDOW_WIDTH: f64 = 800.0;
const WINDOW_HEIGHT: f64 = 600.0;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(match &args.log {
        Some(filter) => LoggingConfig::with_filter(filter.clone()),
        None => LoggingConfig::default(),
    });

    let config = DemoConfig::from(args);
    log::debug!("{config:?}");

    let scene = match &config.model {
        Some(path) => Scene::load_gltf(path)?,
        None => Scene::triangle(),
    };
    log::info!("scene: {} triangles", scene.triangle_count());

    let gpu_init = GpuInit {
        present_mode: config.present_mode,
        ..GpuInit::default()
    };
    let window = RuntimeConfig {
        title: "rgl basic".to_string(),
        initial_size: LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT),
    };

    Runtime::run(window, gpu_init, BasicApp::new(config, scene))
}
