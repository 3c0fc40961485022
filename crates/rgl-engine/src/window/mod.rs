//! Window and event loop.
//!
//! Owns the `winit` event loop and the demo window, and wires the window to
//! its [`Gpu`](crate::device::Gpu).

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
