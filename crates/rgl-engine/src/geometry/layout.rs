//! Vertex memory layouts.
//!
//! A [`VertexLayout`] is the one place that says how [`Vertex`] records sit in
//! GPU memory. Flattening, the attribute declaration handed to pipelines and
//! the stride all walk the same field list, so they cannot disagree.
//!
//! The shader-side struct still has to match; `AlignedPadded` is checked
//! against the WGSL storage layout in the tests below.

use super::vertex::Vertex;

const F32_SIZE: u64 = std::mem::size_of::<f32>() as u64;

/// Vertex attribute semantic.
///
/// Each semantic has a fixed shader input location, independent of where the
/// attribute sits in memory.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Attribute {
    Position,
    Color,
    Normal,
    Uv,
    Tangent,
    Bitangent,
}

impl Attribute {
    /// `@location(n)` expected by vertex shaders.
    pub const fn location(self) -> u32 {
        match self {
            Attribute::Position => 0,
            Attribute::Color => 1,
            Attribute::Normal => 2,
            Attribute::Uv => 3,
            Attribute::Tangent => 4,
            Attribute::Bitangent => 5,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Attribute::Position => "position",
            Attribute::Color => "color",
            Attribute::Normal => "normal",
            Attribute::Uv => "uv",
            Attribute::Tangent => "tangent",
            Attribute::Bitangent => "bitangent",
        }
    }
}

/// One slot of a layout: either (part of) an attribute or alignment padding.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Field {
    /// The first `components` floats of `attribute`.
    Attr { attribute: Attribute, components: u32 },
    /// Unused floats, written as zero.
    Pad(u32),
}

impl Field {
    pub const fn floats(self) -> u32 {
        match self {
            Field::Attr { components, .. } => components,
            Field::Pad(n) => n,
        }
    }

    #[inline]
    pub const fn bytes(self) -> u64 {
        self.floats() as u64 * F32_SIZE
    }
}

const fn attr(attribute: Attribute, components: u32) -> Field {
    Field::Attr {
        attribute,
        components,
    }
}

const PACKED_RGB: [Field; 6] = [
    attr(Attribute::Position, 3),
    attr(Attribute::Color, 3),
    attr(Attribute::Uv, 2),
    attr(Attribute::Normal, 3),
    attr(Attribute::Tangent, 3),
    attr(Attribute::Bitangent, 3),
];

const PACKED_RGBA: [Field; 6] = [
    attr(Attribute::Position, 3),
    attr(Attribute::Color, 4),
    attr(Attribute::Uv, 2),
    attr(Attribute::Normal, 3),
    attr(Attribute::Tangent, 3),
    attr(Attribute::Bitangent, 3),
];

// Every vec3 rounded up to 16 bytes, vec2 followed by 8 bytes so the next
// vec3 starts on a 16-byte boundary.
const ALIGNED_PADDED: [Field; 12] = [
    attr(Attribute::Position, 3),
    Field::Pad(1),
    attr(Attribute::Color, 3),
    Field::Pad(1),
    attr(Attribute::Uv, 2),
    Field::Pad(2),
    attr(Attribute::Normal, 3),
    Field::Pad(1),
    attr(Attribute::Tangent, 3),
    Field::Pad(1),
    attr(Attribute::Bitangent, 3),
    Field::Pad(1),
];

/// Memory layout of a flattened vertex stream.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum VertexLayout {
    /// 17 floats, no padding, RGB color.
    #[default]
    PackedRgb,
    /// 18 floats, no padding, RGBA color.
    PackedRgba,
    /// 24 floats; matches a WGSL/std430 struct of vec3/vec2 members.
    /// Used for storage buffers read by compute shaders.
    AlignedPadded,
}

impl VertexLayout {
    pub const ALL: [VertexLayout; 3] = [
        VertexLayout::PackedRgb,
        VertexLayout::PackedRgba,
        VertexLayout::AlignedPadded,
    ];

    pub const fn fields(self) -> &'static [Field] {
        match self {
            VertexLayout::PackedRgb => &PACKED_RGB,
            VertexLayout::PackedRgba => &PACKED_RGBA,
            VertexLayout::AlignedPadded => &ALIGNED_PADDED,
        }
    }

    /// Floats occupied by one vertex.
    pub const fn stride_floats(self) -> usize {
        let fields = self.fields();
        let mut total = 0;
        let mut i = 0;
        while i < fields.len() {
            total += fields[i].floats() as usize;
            i += 1;
        }
        total
    }

    #[inline]
    pub const fn stride_bytes(self) -> u64 {
        self.stride_floats() as u64 * F32_SIZE
    }

    /// Fields paired with their byte offset inside one vertex.
    pub fn field_offsets(self) -> impl Iterator<Item = (Field, u64)> {
        self.fields().iter().scan(0u64, |offset, field| {
            let at = *offset;
            *offset += field.bytes();
            Some((*field, at))
        })
    }

    /// Byte offset of `attribute`, or `None` if the layout does not carry it.
    pub fn offset_of(self, attribute: Attribute) -> Option<u64> {
        self.field_offsets().find_map(|(field, offset)| match field {
            Field::Attr { attribute: a, .. } if a == attribute => Some(offset),
            _ => None,
        })
    }

    /// Attribute declarations for a vertex buffer using this layout.
    ///
    /// Offsets are running sums over [`fields`](Self::fields); locations come
    /// from [`Attribute::location`].
    pub fn attributes(self) -> Vec<wgpu::VertexAttribute> {
        self.field_offsets()
            .filter_map(|(field, offset)| match field {
                Field::Attr {
                    attribute,
                    components,
                } => Some(wgpu::VertexAttribute {
                    format: float_format(components),
                    offset,
                    shader_location: attribute.location(),
                }),
                Field::Pad(_) => None,
            })
            .collect()
    }

    /// Appends one vertex to `out`, field by field.
    pub fn write_vertex(self, vertex: &Vertex, out: &mut Vec<f32>) {
        for field in self.fields() {
            match *field {
                Field::Attr {
                    attribute,
                    components,
                } => {
                    let src = vertex.attribute(attribute);
                    out.extend_from_slice(&src[..components as usize]);
                }
                Field::Pad(n) => out.extend(std::iter::repeat_n(0.0, n as usize)),
            }
        }
    }

    /// Dense float stream for `vertices`: vertex-major, then field order.
    ///
    /// The result holds exactly `vertices.len() * stride_floats()` floats.
    pub fn flatten(self, vertices: &[Vertex]) -> Vec<f32> {
        let mut out = Vec::with_capacity(vertices.len() * self.stride_floats());
        for vertex in vertices {
            self.write_vertex(vertex, &mut out);
        }
        debug_assert_eq!(out.len(), vertices.len() * self.stride_floats());
        out
    }
}

fn float_format(components: u32) -> wgpu::VertexFormat {
    match components {
        1 => wgpu::VertexFormat::Float32,
        2 => wgpu::VertexFormat::Float32x2,
        3 => wgpu::VertexFormat::Float32x3,
        _ => wgpu::VertexFormat::Float32x4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(seed: f32) -> Vertex {
        Vertex::full(
            [seed, seed + 1.0, seed + 2.0],
            [seed + 3.0, seed + 4.0, seed + 5.0, seed + 6.0],
            [seed + 7.0, seed + 8.0, seed + 9.0],
            [seed + 10.0, seed + 11.0],
            [seed + 12.0, seed + 13.0, seed + 14.0],
            [seed + 15.0, seed + 16.0, seed + 17.0],
        )
    }

    // ── offsets / stride ──────────────────────────────────────────────────

    #[test]
    fn offsets_are_running_sums() {
        for layout in VertexLayout::ALL {
            let mut expected = 0;
            for (field, offset) in layout.field_offsets() {
                assert_eq!(offset, expected, "{layout:?} {field:?}");
                expected += field.bytes();
            }
            assert_eq!(expected, layout.stride_bytes(), "{layout:?}");
        }
    }

    #[test]
    fn strides() {
        assert_eq!(VertexLayout::PackedRgb.stride_floats(), 17);
        assert_eq!(VertexLayout::PackedRgba.stride_floats(), 18);
        assert_eq!(VertexLayout::AlignedPadded.stride_floats(), 24);

        for layout in VertexLayout::ALL {
            assert_eq!(layout.stride_bytes(), layout.stride_floats() as u64 * 4);
        }
    }

    #[test]
    fn packed_rgb_offsets() {
        let l = VertexLayout::PackedRgb;
        assert_eq!(l.offset_of(Attribute::Position), Some(0));
        assert_eq!(l.offset_of(Attribute::Color), Some(12));
        assert_eq!(l.offset_of(Attribute::Uv), Some(24));
        assert_eq!(l.offset_of(Attribute::Normal), Some(32));
        assert_eq!(l.offset_of(Attribute::Tangent), Some(44));
        assert_eq!(l.offset_of(Attribute::Bitangent), Some(56));
    }

    #[test]
    fn packed_rgba_shifts_everything_after_color() {
        let rgb = VertexLayout::PackedRgb;
        let rgba = VertexLayout::PackedRgba;
        assert_eq!(rgba.offset_of(Attribute::Color), rgb.offset_of(Attribute::Color));
        for a in [
            Attribute::Uv,
            Attribute::Normal,
            Attribute::Tangent,
            Attribute::Bitangent,
        ] {
            assert_eq!(
                rgba.offset_of(a).unwrap(),
                rgb.offset_of(a).unwrap() + 4,
                "{a:?}"
            );
        }
    }

    // ── WGSL agreement ────────────────────────────────────────────────────

    #[test]
    fn aligned_padded_matches_wgsl_struct() {
        let src = r#"
            struct Vertex {
                position: vec3<f32>,
                color: vec3<f32>,
                uv: vec2<f32>,
                normal: vec3<f32>,
                tangent: vec3<f32>,
                bitangent: vec3<f32>,
            }
            @group(0) @binding(0) var<storage, read> vertices: array<Vertex>;
            @compute @workgroup_size(1)
            fn main() {
                let v = vertices[0];
            }
        "#;
        let module = naga::front::wgsl::parse_str(src).expect("fixture parses");

        let (members, span) = module
            .types
            .iter()
            .find_map(|(_, ty)| match (&ty.name, &ty.inner) {
                (Some(name), naga::TypeInner::Struct { members, span }) if name == "Vertex" => {
                    Some((members.clone(), *span))
                }
                _ => None,
            })
            .expect("Vertex struct present");

        let layout = VertexLayout::AlignedPadded;
        assert_eq!(span as u64, layout.stride_bytes());

        for member in &members {
            let attribute = match member.name.as_deref() {
                Some("position") => Attribute::Position,
                Some("color") => Attribute::Color,
                Some("uv") => Attribute::Uv,
                Some("normal") => Attribute::Normal,
                Some("tangent") => Attribute::Tangent,
                Some("bitangent") => Attribute::Bitangent,
                other => panic!("unexpected member {other:?}"),
            };
            assert_eq!(
                layout.offset_of(attribute),
                Some(member.offset as u64),
                "{attribute:?}"
            );
        }
    }

    // ── attributes ────────────────────────────────────────────────────────

    #[test]
    fn attributes_use_semantic_locations() {
        for layout in VertexLayout::ALL {
            let attrs = layout.attributes();
            assert_eq!(attrs.len(), 6);
            let color = attrs
                .iter()
                .find(|a| a.shader_location == Attribute::Color.location())
                .unwrap();
            assert_eq!(Some(color.offset), layout.offset_of(Attribute::Color));
        }
    }

    #[test]
    fn color_format_follows_layout() {
        let rgb = VertexLayout::PackedRgb.attributes();
        let rgba = VertexLayout::PackedRgba.attributes();
        assert_eq!(rgb[1].format, wgpu::VertexFormat::Float32x3);
        assert_eq!(rgba[1].format, wgpu::VertexFormat::Float32x4);
        assert_eq!(rgb[2].format, wgpu::VertexFormat::Float32x2);
    }

    // ── flatten ───────────────────────────────────────────────────────────

    #[test]
    fn flatten_length_is_count_times_stride() {
        let vertices: Vec<Vertex> = (0..5).map(|i| sample(i as f32 * 100.0)).collect();
        for layout in VertexLayout::ALL {
            assert_eq!(
                layout.flatten(&vertices).len(),
                vertices.len() * layout.stride_floats()
            );
        }
    }

    #[test]
    fn flatten_is_vertex_major_in_field_order() {
        let vertices = [sample(0.0), sample(100.0)];
        let flat = VertexLayout::PackedRgb.flatten(&vertices);

        let first: Vec<f32> = vec![
            0.0, 1.0, 2.0, // position
            3.0, 4.0, 5.0, // color, alpha dropped
            10.0, 11.0, // uv
            7.0, 8.0, 9.0, // normal
            12.0, 13.0, 14.0, // tangent
            15.0, 16.0, 17.0, // bitangent
        ];
        assert_eq!(&flat[..17], first.as_slice());
        assert_eq!(flat[17], 100.0);
        assert_eq!(flat[17 + 16], 117.0);
    }

    #[test]
    fn flatten_rgba_keeps_alpha() {
        let flat = VertexLayout::PackedRgba.flatten(&[sample(0.0)]);
        assert_eq!(&flat[3..7], &[3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn aligned_padding_is_zero() {
        let flat = VertexLayout::AlignedPadded.flatten(&[sample(1.0)]);
        for (field, offset) in VertexLayout::AlignedPadded.field_offsets() {
            if let Field::Pad(n) = field {
                let start = (offset / 4) as usize;
                assert!(flat[start..start + n as usize].iter().all(|f| *f == 0.0));
            }
        }
        assert_eq!(flat[4], 4.0); // color.r after one pad float
    }

    #[test]
    fn flatten_empty_is_empty() {
        assert!(VertexLayout::AlignedPadded.flatten(&[]).is_empty());
    }
}
