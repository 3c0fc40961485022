//! GPU device and surface management.
//!
//! [`Gpu`] owns the device, queue and window surface and hands out one
//! encoder per frame. [`HeadlessGpu`] is the same device setup without a
//! surface.

mod context;
mod headless;
mod init;
mod limits;
mod surface;
mod validation;

pub use context::Gpu;
pub use headless::HeadlessGpu;
pub use init::GpuInit;
pub use limits::{ComputeLimits, workgroups_for};
pub use surface::{GpuFrame, SurfaceErrorAction};
pub(crate) use validation::{shader_capabilities, validated};
