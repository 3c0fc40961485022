use naga::valid::Capabilities;

/// Runs `create` inside a validation error scope.
///
/// wgpu reports invalid descriptors to the device's uncaptured-error handler,
/// which panics by default. Inside the scope the error comes back here
/// instead, rendered as a message.
pub(crate) fn validated<T>(
    device: &wgpu::Device,
    create: impl FnOnce() -> T,
) -> Result<T, String> {
    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = create();
    match pollster::block_on(scope.pop()) {
        None => Ok(value),
        Some(err) => Err(err.to_string()),
    }
}

/// Shader capabilities the device's enabled features grant.
pub(crate) fn shader_capabilities(features: wgpu::Features) -> Capabilities {
    use wgpu::Features as F;

    let mut caps = Capabilities::empty();
    caps.set(Capabilities::FLOAT64, features.contains(F::SHADER_F64));
    caps.set(Capabilities::SHADER_FLOAT16, features.contains(F::SHADER_F16));
    caps.set(Capabilities::SHADER_INT64, features.contains(F::SHADER_INT64));
    caps.set(
        Capabilities::PRIMITIVE_INDEX,
        features.contains(F::SHADER_PRIMITIVE_INDEX),
    );
    caps.set(Capabilities::MULTIVIEW, features.contains(F::MULTIVIEW));
    caps.set(
        Capabilities::STORAGE_TEXTURE_16BIT_NORM_FORMATS,
        features.contains(F::TEXTURE_FORMAT_16BIT_NORM),
    );
    caps.set(
        Capabilities::TEXTURE_AND_SAMPLER_BINDING_ARRAY,
        features.contains(F::TEXTURE_BINDING_ARRAY),
    );
    caps.set(
        Capabilities::BUFFER_BINDING_ARRAY,
        features.contains(F::BUFFER_BINDING_ARRAY),
    );
    caps.set(
        Capabilities::DUAL_SOURCE_BLENDING,
        features.contains(F::DUAL_SOURCE_BLENDING),
    );
    caps.set(
        Capabilities::SUBGROUP,
        features.intersects(F::SUBGROUP | F::SUBGROUP_VERTEX),
    );
    caps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_features_grant_nothing() {
        assert!(shader_capabilities(wgpu::Features::empty()).is_empty());
    }

    #[test]
    fn features_map_to_capabilities() {
        let caps = shader_capabilities(wgpu::Features::SHADER_F64 | wgpu::Features::SUBGROUP);
        assert!(caps.contains(Capabilities::FLOAT64));
        assert!(caps.contains(Capabilities::SUBGROUP));
        assert!(!caps.contains(Capabilities::SHADER_INT64));
    }
}
