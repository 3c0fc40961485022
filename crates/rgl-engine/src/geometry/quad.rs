//! Screen-space quad geometry.

use super::vertex::Vertex;

const WHITE: [f32; 4] = [1.0; 4];
const FACING: [f32; 3] = [0.0, 0.0, 1.0];

/// Four corners of the clip-space square, ordered for a triangle strip.
///
/// UVs map (0,0) to the bottom-left corner and (1,1) to the top-right.
pub const SCREEN_QUAD_STRIP: [Vertex; 4] = [
    Vertex::with_uv([-1.0, 1.0, 0.0], WHITE, FACING, [0.0, 1.0]),
    Vertex::with_uv([-1.0, -1.0, 0.0], WHITE, FACING, [0.0, 0.0]),
    Vertex::with_uv([1.0, 1.0, 0.0], WHITE, FACING, [1.0, 1.0]),
    Vertex::with_uv([1.0, -1.0, 0.0], WHITE, FACING, [1.0, 0.0]),
];

/// Indices splitting [`SCREEN_QUAD_STRIP`] into a two-triangle list.
pub const SCREEN_QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 1, 3];
