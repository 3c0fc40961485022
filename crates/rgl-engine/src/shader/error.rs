use std::path::PathBuf;

use thiserror::Error;

use super::{ShaderStage, UniformKind};

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("failed to read shader source '{}'", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Parse or validation failure; `log` holds the rendered diagnostic.
    #[error("{stage} shader failed to compile:\n{log}")]
    Compile { stage: ShaderStage, log: String },

    #[error("{stage} shader declares no {stage} entry point")]
    NoEntryPoint { stage: ShaderStage },

    #[error("{stage} shader has no {stage} entry point named '{entry}'")]
    MissingEntryPoint { stage: ShaderStage, entry: String },

    #[error("program link failed: {0}")]
    Link(String),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum UniformError {
    #[error("uniform '{0}' is not used by any stage of this program")]
    Unknown(String),

    #[error("uniform '{name}' is declared as {expected:?} but was given {found:?}")]
    KindMismatch {
        name: String,
        expected: UniformKind,
        found: UniformKind,
    },
}
