//! Pass recording and resource binding.
//!
//! Binding state lives in explicit objects threaded through calls:
//! [`ResourceBindings`] holds what shaders can see, and the pass contexts
//! hold the current program and vertex array while a pass records.

mod bindings;
mod ctx;
mod error;
mod pass;

pub use bindings::{BindingTable, ResourceBindings};
pub use ctx::{RenderCtx, RenderTarget};
pub use error::{DrawError, ResourceKind};
pub use pass::{ComputePassCtx, RenderPassCtx};
