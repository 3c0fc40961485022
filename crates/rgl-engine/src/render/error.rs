use std::fmt;

use thiserror::Error;

use crate::geometry::VertexLayout;
use crate::shader::ProgramKind;

/// Binding namespace a shader resource is looked up in.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ResourceKind {
    Uniform,
    Storage,
    Image,
    Texture,
    Sampler,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResourceKind::Uniform => "uniform block",
            ResourceKind::Storage => "storage buffer",
            ResourceKind::Image => "image",
            ResourceKind::Texture => "texture",
            ResourceKind::Sampler => "sampler",
        })
    }
}

#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum DrawError {
    #[error("no program in use")]
    NoProgram,

    #[error("no vertex array bound")]
    NoVertexArray,

    #[error("a {found:?} program cannot run in a {expected:?} pass")]
    WrongProgramKind {
        expected: ProgramKind,
        found: ProgramKind,
    },

    #[error("no {kind} attached at point {point} (shader variable '{name}')")]
    MissingBinding {
        kind: ResourceKind,
        point: u32,
        name: String,
    },

    #[error("storage buffer at point {point} (shader variable '{name}') holds {size} bytes, the shader needs at least {min}")]
    BindingTooSmall {
        point: u32,
        name: String,
        size: u64,
        min: u64,
    },

    #[error("invalid bind group: {0}")]
    InvalidBindGroup(String),

    #[error("program expects vertex layout {program:?} but the vertex array uses {array:?}")]
    LayoutMismatch {
        program: Option<VertexLayout>,
        array: VertexLayout,
    },

    #[error("dispatch of {workgroups:?} workgroups exceeds the limit of {limit} per dimension")]
    DispatchTooLarge { workgroups: [u32; 3], limit: u32 },
}
