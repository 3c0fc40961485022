use thiserror::Error;

#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum TextureError {
    #[error("texture has zero size ({width}x{height})")]
    ZeroSize { width: u32, height: u32 },

    #[error("{width}x{height} texture exceeds the device limit of {limit} per side")]
    TooLarge { width: u32, height: u32, limit: u32 },

    #[error("expected {expected} bytes of RGBA8 data, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
}

pub(crate) fn check_extent(device: &wgpu::Device, width: u32, height: u32) -> Result<(), TextureError> {
    check_extent_limit(width, height, device.limits().max_texture_dimension_2d)
}

fn check_extent_limit(width: u32, height: u32, limit: u32) -> Result<(), TextureError> {
    if width == 0 || height == 0 {
        return Err(TextureError::ZeroSize { width, height });
    }
    if width > limit || height > limit {
        return Err(TextureError::TooLarge {
            width,
            height,
            limit,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extent_checks() {
        assert_eq!(check_extent_limit(1000, 1000, 8192), Ok(()));
        assert_eq!(
            check_extent_limit(0, 10, 8192),
            Err(TextureError::ZeroSize {
                width: 0,
                height: 10
            })
        );
        assert!(matches!(
            check_extent_limit(10, 9000, 8192),
            Err(TextureError::TooLarge { .. })
        ));
    }
}
