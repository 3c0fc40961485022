use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};

use super::reflect::{reflect, Reflection};
use super::ShaderError;
use crate::device::{shader_capabilities, validated};

/// Pipeline stage a [`Shader`] is compiled for.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Compute,
}

impl ShaderStage {
    pub const fn name(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
            ShaderStage::Compute => "compute",
        }
    }

    fn naga(self) -> naga::ShaderStage {
        match self {
            ShaderStage::Vertex => naga::ShaderStage::Vertex,
            ShaderStage::Fragment => naga::ShaderStage::Fragment,
            ShaderStage::Compute => naga::ShaderStage::Compute,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of the device-independent half of compilation.
#[derive(Debug, Clone)]
pub(crate) struct FrontEnd {
    pub entry_point: String,
    pub reflection: Reflection,
}

/// Parses and validates WGSL against `caps`, then picks the entry point for
/// `stage`.
///
/// Without an explicit `entry`, the module must declare at least one entry
/// point of that stage; the first one is used.
pub(crate) fn front_end(
    source: &str,
    stage: ShaderStage,
    entry: Option<&str>,
    caps: naga::valid::Capabilities,
) -> Result<FrontEnd, ShaderError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| ShaderError::Compile {
        stage,
        log: e.emit_to_string(source),
    })?;

    let info = naga::valid::Validator::new(naga::valid::ValidationFlags::all(), caps)
        .validate(&module)
        .map_err(|e| ShaderError::Compile {
            stage,
            log: e.emit_to_string(source),
        })?;

    let mut candidates = module
        .entry_points
        .iter()
        .enumerate()
        .filter(|(_, ep)| ep.stage == stage.naga());

    let (index, ep) = match entry {
        Some(name) => candidates
            .find(|(_, ep)| ep.name == name)
            .ok_or_else(|| ShaderError::MissingEntryPoint {
                stage,
                entry: name.to_owned(),
            })?,
        None => candidates
            .next()
            .ok_or(ShaderError::NoEntryPoint { stage })?,
    };

    Ok(FrontEnd {
        entry_point: ep.name.clone(),
        reflection: reflect(&module, &info, index),
    })
}

/// One compiled shader stage.
///
/// A shader exists only in the compiled state: every constructor either
/// returns a module that parsed, validated and has its entry point, or a
/// [`ShaderError`]. Shaders are consumed by
/// [`ShaderProgram`](super::ShaderProgram) when linking.
pub struct Shader {
    module: wgpu::ShaderModule,
    stage: ShaderStage,
    entry_point: String,
    source: String,
    path: Option<PathBuf>,
    reflection: Reflection,
}

impl Shader {
    pub fn from_source(
        device: &wgpu::Device,
        source: impl Into<String>,
        stage: ShaderStage,
    ) -> Result<Self, ShaderError> {
        Self::compile(device, source.into(), stage, None, None)
    }

    /// Like [`from_source`](Self::from_source) with a named entry point, for
    /// modules that declare several of the same stage.
    pub fn from_source_entry(
        device: &wgpu::Device,
        source: impl Into<String>,
        stage: ShaderStage,
        entry: &str,
    ) -> Result<Self, ShaderError> {
        Self::compile(device, source.into(), stage, Some(entry), None)
    }

    pub fn from_file(
        device: &wgpu::Device,
        path: impl AsRef<Path>,
        stage: ShaderStage,
    ) -> Result<Self, ShaderError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| {
            log::error!("failed to read {stage} shader '{}': {source}", path.display());
            ShaderError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Self::compile(device, source, stage, None, Some(path.to_path_buf()))
    }

    fn compile(
        device: &wgpu::Device,
        source: String,
        stage: ShaderStage,
        entry: Option<&str>,
        path: Option<PathBuf>,
    ) -> Result<Self, ShaderError> {
        let origin = || {
            path.as_deref()
                .map_or(Cow::Borrowed("<inline>"), |p| p.to_string_lossy())
        };
        let caps = shader_capabilities(device.features());
        let front = front_end(&source, stage, entry, caps).inspect_err(|err| {
            log::error!("{}: {err}", origin());
        })?;

        let label = format!("rgl {stage} shader ({})", front.entry_point);
        let module = validated(device, || {
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(&label),
                source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(&source)),
            })
        })
        .map_err(|msg| {
            log::error!("{}: {msg}", origin());
            ShaderError::Compile { stage, log: msg }
        })?;
        log::debug!("compiled {label}");

        Ok(Self {
            module,
            stage,
            entry_point: front.entry_point,
            source,
            path,
            reflection: front.reflection,
        })
    }

    #[inline]
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    #[inline]
    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }

    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// File the source was read from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn reflection(&self) -> &Reflection {
        &self.reflection
    }

    pub(crate) fn module(&self) -> &wgpu::ShaderModule {
        &self.module
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::HeadlessGpu;
    use naga::valid::Capabilities;

    const TWO_COMPUTE: &str = r#"
@group(0) @binding(0) var<storage, read_write> data: array<u32>;

@compute @workgroup_size(1)
fn clear(@builtin(global_invocation_id) id: vec3<u32>) {
    data[id.x] = 0u;
}

@compute @workgroup_size(64)
fn fill(@builtin(global_invocation_id) id: vec3<u32>) {
    data[id.x] = id.x;
}
"#;

    // ── front end ─────────────────────────────────────────────────────────

    #[test]
    fn syntax_error_is_compile_error() {
        let err = front_end("fn broken( {", ShaderStage::Compute, None, Capabilities::all()).unwrap_err();
        match err {
            ShaderError::Compile { stage, log } => {
                assert_eq!(stage, ShaderStage::Compute);
                assert!(!log.is_empty());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn validation_error_is_compile_error() {
        let src = r#"
@compute @workgroup_size(1)
fn main() {
    let x: u32 = 1.5;
}
"#;
        let err = front_end(src, ShaderStage::Compute, None, Capabilities::all()).unwrap_err();
        assert!(matches!(err, ShaderError::Compile { .. }));
    }

    #[test]
    fn first_entry_point_of_stage_selected() {
        let front = front_end(TWO_COMPUTE, ShaderStage::Compute, None, Capabilities::all()).unwrap();
        assert_eq!(front.entry_point, "clear");
        assert_eq!(front.reflection.workgroup_size, [1, 1, 1]);
    }

    #[test]
    fn named_entry_point_selected() {
        let front = front_end(TWO_COMPUTE, ShaderStage::Compute, Some("fill"), Capabilities::all()).unwrap();
        assert_eq!(front.entry_point, "fill");
        assert_eq!(front.reflection.workgroup_size, [64, 1, 1]);
    }

    #[test]
    fn missing_entry_points() {
        let err = front_end(TWO_COMPUTE, ShaderStage::Vertex, None, Capabilities::all()).unwrap_err();
        assert!(matches!(
            err,
            ShaderError::NoEntryPoint {
                stage: ShaderStage::Vertex
            }
        ));

        let err = front_end(TWO_COMPUTE, ShaderStage::Compute, Some("main"), Capabilities::all()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "compute shader has no compute entry point named 'main'"
        );
    }

    #[test]
    fn capabilities_gate_validation() {
        let src = r#"
@group(0) @binding(0) var<storage, read_write> data: array<f64>;

@compute @workgroup_size(1)
fn main() {
    data[0] = 1.0lf;
}
"#;
        assert!(front_end(src, ShaderStage::Compute, None, Capabilities::all()).is_ok());

        let err = front_end(src, ShaderStage::Compute, None, Capabilities::empty()).unwrap_err();
        assert!(matches!(err, ShaderError::Compile { .. }));
    }

    // ── device ────────────────────────────────────────────────────────────

    #[test]
    fn missing_file_is_read_error() {
        let Some(gpu) = HeadlessGpu::for_test() else {
            return;
        };
        let err = Shader::from_file(gpu.device(), "does/not/exist.wgsl", ShaderStage::Compute)
            .err()
            .unwrap();
        assert!(matches!(err, ShaderError::Read { .. }));
    }

    #[test]
    fn compiled_shader_keeps_source() {
        let Some(gpu) = HeadlessGpu::for_test() else {
            return;
        };
        let shader =
            Shader::from_source_entry(gpu.device(), TWO_COMPUTE, ShaderStage::Compute, "fill")
                .unwrap();
        assert_eq!(shader.stage(), ShaderStage::Compute);
        assert_eq!(shader.entry_point(), "fill");
        assert_eq!(shader.source(), TWO_COMPUTE);
        assert!(shader.path().is_none());
        assert_eq!(shader.reflection().bindings.len(), 1);
    }
}
