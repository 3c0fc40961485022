//! Shader stages, program linking and uniforms.
//!
//! Shaders are WGSL, compiled in two halves: naga parses, validates and
//! reflects the module, then the device creates the shader module. Linking a
//! [`ShaderProgram`] builds the pipeline with a layout derived from the
//! shaders and a uniform name table derived from the reflection.

mod error;
mod program;
mod reflect;
mod stage;
mod uniform;

pub use error::{ShaderError, UniformError};
pub use program::{ProgramKind, RenderProgramDesc, ShaderProgram};
pub use reflect::{reflect, BindingKind, ReflectedBinding, Reflection};
pub use stage::{Shader, ShaderStage};
pub use uniform::{UniformKind, UniformSlot, UniformTable, UniformValue};
