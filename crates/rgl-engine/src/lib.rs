//! rgl engine crate.
//!
//! Owned GPU resources (buffers, textures, shader programs) over wgpu, the
//! pass contexts that bind them, and the window/device runtime that drives
//! an application frame by frame.

pub mod buffer;
pub mod core;
pub mod device;
pub mod geometry;
pub mod logging;
pub mod render;
pub mod shader;
pub mod texture;
pub mod time;
pub mod window;
