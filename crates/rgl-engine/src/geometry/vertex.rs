use super::layout::Attribute;

/// Value written into every component the caller did not supply.
///
/// Applies to color (alpha included), normal, uv, tangent and bitangent.
pub const OMITTED_FILL: f32 = 1.0;

/// Host-side description of one mesh vertex.
///
/// This is a plain value: it is never uploaded as-is. A [`VertexLayout`]
/// decides which components reach the GPU and where they land.
///
/// Color is stored as RGBA; RGB layouts drop the alpha channel.
/// No validation happens here: out-of-range UVs and non-unit normals are kept
/// verbatim.
///
/// [`VertexLayout`]: super::VertexLayout
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub tangent: [f32; 3],
    pub bitangent: [f32; 3],
}

impl Vertex {
    /// Position only; every other attribute is filled with [`OMITTED_FILL`].
    pub const fn new(position: [f32; 3]) -> Self {
        Self {
            position,
            color: [OMITTED_FILL; 4],
            normal: [OMITTED_FILL; 3],
            uv: [OMITTED_FILL; 2],
            tangent: [OMITTED_FILL; 3],
            bitangent: [OMITTED_FILL; 3],
        }
    }

    pub const fn with_color(position: [f32; 3], color: [f32; 4]) -> Self {
        Self {
            color,
            ..Self::new(position)
        }
    }

    pub const fn with_normal(position: [f32; 3], color: [f32; 4], normal: [f32; 3]) -> Self {
        Self {
            normal,
            ..Self::with_color(position, color)
        }
    }

    pub const fn with_uv(
        position: [f32; 3],
        color: [f32; 4],
        normal: [f32; 3],
        uv: [f32; 2],
    ) -> Self {
        Self {
            uv,
            ..Self::with_normal(position, color, normal)
        }
    }

    /// Every attribute supplied explicitly.
    pub const fn full(
        position: [f32; 3],
        color: [f32; 4],
        normal: [f32; 3],
        uv: [f32; 2],
        tangent: [f32; 3],
        bitangent: [f32; 3],
    ) -> Self {
        Self {
            position,
            color,
            normal,
            uv,
            tangent,
            bitangent,
        }
    }

    /// Opaque RGBA from an RGB triple.
    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> [f32; 4] {
        [r, g, b, 1.0]
    }

    /// All components of one attribute, in declaration order.
    pub fn attribute(&self, attribute: Attribute) -> &[f32] {
        match attribute {
            Attribute::Position => &self.position,
            Attribute::Color => &self.color,
            Attribute::Normal => &self.normal,
            Attribute::Uv => &self.uv,
            Attribute::Tangent => &self.tangent,
            Attribute::Bitangent => &self.bitangent,
        }
    }
}

impl Default for Vertex {
    fn default() -> Self {
        Self::new([0.0; 3])
    }
}
