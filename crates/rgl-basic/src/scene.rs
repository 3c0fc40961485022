use std::path::Path;

use anyhow::{Context, Result, bail};
use glam::{Vec3, Vec4};
use rgl_engine::geometry::Vertex;

/// Depth the scene is placed at, in front of the camera at the origin.
const SCENE_DEPTH: f32 = -2.5;
/// Bounding radius a loaded model is scaled to.
const FIT_RADIUS: f32 = 1.0;

/// Triangle soup handed to the compute shader, plus an optional albedo image.
#[derive(Debug, Clone)]
pub struct Scene {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub base_color: Option<image::RgbaImage>,
}

impl Scene {
    /// One RGB triangle facing the camera.
    pub fn triangle() -> Self {
        Self {
            vertices: vec![
                Vertex::with_color([0.0, -0.5, SCENE_DEPTH], Vertex::rgb(1.0, 0.0, 0.0)),
                Vertex::with_color([0.5, 0.5, SCENE_DEPTH], Vertex::rgb(0.0, 1.0, 0.0)),
                Vertex::with_color([-0.5, 0.5, SCENE_DEPTH], Vertex::rgb(0.0, 0.0, 1.0)),
            ],
            indices: vec![0, 1, 2],
            base_color: None,
        }
    }

    /// Loads every primitive of every mesh into one vertex/index pair.
    ///
    /// Node transforms are ignored; the result is recentered with
    /// [`Scene::fit_to_view`]. The first base color texture found becomes the
    /// albedo.
    pub fn load_gltf(path: &Path) -> Result<Self> {
        let (document, buffers, images) =
            gltf::import(path).with_context(|| format!("failed to import {}", path.display()))?;

        let mut vertices = Vec::new();
        let mut indices = Vec::new();
        let mut base_color = None;

        for mesh in document.meshes() {
            for primitive in mesh.primitives() {
                if primitive.mode() != gltf::mesh::Mode::Triangles {
                    log::warn!(
                        "skipping {:?} primitive in mesh {:?}",
                        primitive.mode(),
                        mesh.name()
                    );
                    continue;
                }

                let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));
                let Some(positions) = reader.read_positions() else {
                    log::warn!("primitive without POSITION in mesh {:?}", mesh.name());
                    continue;
                };

                let positions: Vec<[f32; 3]> = positions.collect();
                let normals: Option<Vec<[f32; 3]>> = reader.read_normals().map(Iterator::collect);
                let uvs: Option<Vec<[f32; 2]>> =
                    reader.read_tex_coords(0).map(|uv| uv.into_f32().collect());
                let tangents: Option<Vec<[f32; 4]>> = reader.read_tangents().map(Iterator::collect);
                let colors: Option<Vec<[f32; 4]>> =
                    reader.read_colors(0).map(|c| c.into_rgba_f32().collect());

                let base = u32::try_from(vertices.len()).context("too many vertices")?;
                for (i, &position) in positions.iter().enumerate() {
                    let mut vertex = Vertex::new(position);
                    if let Some(c) = colors.as_ref().and_then(|c| c.get(i)) {
                        vertex.color = *c;
                    }
                    if let Some(n) = normals.as_ref().and_then(|n| n.get(i)) {
                        vertex.normal = *n;
                    }
                    if let Some(uv) = uvs.as_ref().and_then(|uv| uv.get(i)) {
                        vertex.uv = *uv;
                    }
                    if let Some(t) = tangents.as_ref().and_then(|t| t.get(i)) {
                        let tangent = Vec4::from_array(*t);
                        vertex.tangent = tangent.truncate().to_array();
                        let bitangent = Vec3::from_array(vertex.normal)
                            .cross(tangent.truncate())
                            * tangent.w;
                        vertex.bitangent = bitangent.to_array();
                    }
                    vertices.push(vertex);
                }

                append_indices(
                    &mut indices,
                    base,
                    positions.len(),
                    reader.read_indices().map(|read| read.into_u32()),
                )
                .with_context(|| format!("bad indices in mesh {:?}", mesh.name()))?;

                if base_color.is_none()
                    && let Some(info) = primitive
                        .material()
                        .pbr_metallic_roughness()
                        .base_color_texture()
                {
                    let source = info.texture().source().index();
                    base_color = images.get(source).and_then(to_rgba8);
                }
            }
        }

        if indices.is_empty() {
            bail!("{} contains no triangles", path.display());
        }

        log::info!(
            "loaded {}: {} vertices, {} triangles, albedo {}",
            path.display(),
            vertices.len(),
            indices.len() / 3,
            if base_color.is_some() { "yes" } else { "no" }
        );

        let mut scene = Self {
            vertices,
            indices,
            base_color,
        };
        scene.fit_to_view();
        Ok(scene)
    }

    /// Moves the bounding box center to the scene depth and scales the
    /// bounding sphere to a fixed radius.
    pub fn fit_to_view(&mut self) {
        let Some(first) = self.vertices.first() else {
            return;
        };
        let (min, max) = self.vertices.iter().fold(
            (Vec3::from_array(first.position), Vec3::from_array(first.position)),
            |(min, max), v| {
                let p = Vec3::from_array(v.position);
                (min.min(p), max.max(p))
            },
        );
        let center = (min + max) * 0.5;
        let radius = (max - min).length() * 0.5;
        let scale = if radius > f32::EPSILON {
            FIT_RADIUS / radius
        } else {
            1.0
        };
        let target = Vec3::new(0.0, 0.0, SCENE_DEPTH);

        for v in &mut self.vertices {
            let p = (Vec3::from_array(v.position) - center) * scale + target;
            v.position = p.to_array();
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Converts a decoded glTF image to RGBA8; formats other than 8-bit are skipped.
fn to_rgba8(data: &gltf::image::Data) -> Option<image::RgbaImage> {
    use gltf::image::Format;

    let pixels: Vec<u8> = match data.format {
        Format::R8G8B8A8 => data.pixels.clone(),
        Format::R8G8B8 => data
            .pixels
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        Format::R8G8 => data
            .pixels
            .chunks_exact(2)
            .flat_map(|p| [p[0], p[0], p[0], p[1]])
            .collect(),
        Format::R8 => data.pixels.iter().flat_map(|&p| [p, p, p, 255]).collect(),
        other => {
            log::warn!("unsupported base color format {other:?}, using white");
            return None;
        }
    };
    image::RgbaImage::from_raw(data.width, data.height, pixels)
}

/// Appends a primitive's indices rebased onto `base`, the scene's vertex count
/// before the primitive. Unindexed primitives draw their vertices in order.
fn append_indices(
    out: &mut Vec<u32>,
    base: u32,
    vertex_count: usize,
    read: Option<impl Iterator<Item = u32>>,
) -> Result<()> {
    let count = u32::try_from(vertex_count).context("primitive has too many vertices")?;
    let end = base
        .checked_add(count)
        .context("scene has too many vertices for u32 indices")?;
    match read {
        Some(read) => {
            for i in read {
                if i >= count {
                    bail!("index {i} out of range for {count} vertices");
                }
                out.push(base + i);
            }
        }
        None => out.extend(base..end),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── triangle ─────────────────────────────────────────────────────────

    #[test]
    fn triangle_is_rgb_at_depth() {
        let scene = Scene::triangle();
        assert_eq!(scene.indices, [0, 1, 2]);
        assert_eq!(scene.triangle_count(), 1);
        assert!(scene.vertices.iter().all(|v| v.position[2] == SCENE_DEPTH));
        assert_eq!(scene.vertices[0].color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(scene.vertices[1].color, [0.0, 1.0, 0.0, 1.0]);
        assert_eq!(scene.vertices[2].color, [0.0, 0.0, 1.0, 1.0]);
        assert!(scene.base_color.is_none());
    }

    // ── indices ──────────────────────────────────────────────────────────

    #[test]
    fn indices_rebased_onto_scene() {
        let mut out = vec![0, 1, 2];
        append_indices(&mut out, 3, 4, Some([0, 1, 2, 2, 1, 3].into_iter())).unwrap();
        assert_eq!(out, [0, 1, 2, 3, 4, 5, 5, 4, 6]);

        append_indices(&mut out, 7, 3, None::<std::iter::Empty<u32>>).unwrap();
        assert_eq!(&out[9..], [7, 8, 9]);
    }

    #[test]
    fn index_past_primitive_rejected() {
        let mut out = Vec::new();
        assert!(append_indices(&mut out, 0, 3, Some([0, 1, 3].into_iter())).is_err());
    }

    #[test]
    fn vertex_overflow_rejected() {
        let mut out = Vec::new();
        let none = None::<std::iter::Empty<u32>>;
        assert!(append_indices(&mut out, u32::MAX - 1, 3, none).is_err());
        assert!(out.is_empty());
    }

    // ── fit_to_view ──────────────────────────────────────────────────────

    #[test]
    fn fit_recenters_and_scales() {
        let mut scene = Scene {
            vertices: vec![
                Vertex::new([10.0, 10.0, 10.0]),
                Vertex::new([14.0, 10.0, 10.0]),
                Vertex::new([10.0, 13.0, 10.0]),
            ],
            indices: vec![0, 1, 2],
            base_color: None,
        };
        scene.fit_to_view();

        let min = scene
            .vertices
            .iter()
            .map(|v| Vec3::from_array(v.position))
            .fold(Vec3::splat(f32::MAX), Vec3::min);
        let max = scene
            .vertices
            .iter()
            .map(|v| Vec3::from_array(v.position))
            .fold(Vec3::splat(f32::MIN), Vec3::max);

        let center = (min + max) * 0.5;
        assert!((center - Vec3::new(0.0, 0.0, SCENE_DEPTH)).length() < 1e-5);
        assert!(((max - min).length() * 0.5 - FIT_RADIUS).abs() < 1e-5);
    }

    #[test]
    fn fit_handles_degenerate_input() {
        let mut empty = Scene {
            vertices: Vec::new(),
            indices: Vec::new(),
            base_color: None,
        };
        empty.fit_to_view();
        assert!(empty.vertices.is_empty());

        let mut point = Scene {
            vertices: vec![Vertex::new([3.0, 3.0, 3.0])],
            indices: vec![0],
            base_color: None,
        };
        point.fit_to_view();
        assert_eq!(point.vertices[0].position, [0.0, 0.0, SCENE_DEPTH]);
    }

    // ── image conversion ─────────────────────────────────────────────────

    #[test]
    fn rgb_images_gain_opaque_alpha() {
        let data = gltf::image::Data {
            pixels: vec![1, 2, 3, 4, 5, 6],
            format: gltf::image::Format::R8G8B8,
            width: 2,
            height: 1,
        };
        let rgba = to_rgba8(&data).unwrap();
        assert_eq!(rgba.as_raw(), &[1, 2, 3, 255, 4, 5, 6, 255]);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(Scene::load_gltf(Path::new("does/not/exist.gltf")).is_err());
    }
}
