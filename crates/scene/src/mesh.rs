use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use rubix_assets::cell_uv;
use rubix_common::Face;

/// Interleaved vertex as uploaded to the GPU.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// CPU-side mesh: vertices plus 16-bit triangle indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

impl MeshData {
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

/// Axis-aligned box centred on the origin with four vertices per side.
///
/// Triangles wind clockwise seen from outside, so back-face culling with a
/// clockwise front face removes the hidden sides. Each side's texture
/// coordinates map into that face's atlas cell.
pub fn build_box(width: f32, height: f32, depth: f32) -> MeshData {
    let (w, h, d) = (width * 0.5, height * 0.5, depth * 0.5);

    // Each side: the face it shows, its outward normal and four corners
    // ordered bottom-left, top-left, top-right, bottom-right as seen from
    // outside.
    let sides: [(Face, Vec3, [Vec3; 4]); 6] = [
        (
            Face::Front,
            Vec3::NEG_Z,
            [
                Vec3::new(-w, -h, -d),
                Vec3::new(-w, h, -d),
                Vec3::new(w, h, -d),
                Vec3::new(w, -h, -d),
            ],
        ),
        (
            Face::Back,
            Vec3::Z,
            [
                Vec3::new(w, -h, d),
                Vec3::new(w, h, d),
                Vec3::new(-w, h, d),
                Vec3::new(-w, -h, d),
            ],
        ),
        (
            Face::Top,
            Vec3::Y,
            [
                Vec3::new(-w, h, -d),
                Vec3::new(-w, h, d),
                Vec3::new(w, h, d),
                Vec3::new(w, h, -d),
            ],
        ),
        (
            Face::Bottom,
            Vec3::NEG_Y,
            [
                Vec3::new(-w, -h, d),
                Vec3::new(-w, -h, -d),
                Vec3::new(w, -h, -d),
                Vec3::new(w, -h, d),
            ],
        ),
        (
            Face::Left,
            Vec3::NEG_X,
            [
                Vec3::new(-w, -h, d),
                Vec3::new(-w, h, d),
                Vec3::new(-w, h, -d),
                Vec3::new(-w, -h, -d),
            ],
        ),
        (
            Face::Right,
            Vec3::X,
            [
                Vec3::new(w, -h, -d),
                Vec3::new(w, h, -d),
                Vec3::new(w, h, d),
                Vec3::new(w, -h, d),
            ],
        ),
    ];

    let mut mesh = MeshData::default();
    for (face, normal, corners) in sides {
        let (min, max) = cell_uv(face);
        let uvs = [
            Vec2::new(min.x, max.y),
            Vec2::new(min.x, min.y),
            Vec2::new(max.x, min.y),
            Vec2::new(max.x, max.y),
        ];
        let base = mesh.vertices.len() as u16;
        for (corner, uv) in corners.iter().zip(uvs) {
            mesh.vertices.push(Vertex {
                position: corner.to_array(),
                normal: normal.to_array(),
                uv: uv.to_array(),
            });
        }
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_has_24_vertices_and_36_indices() {
        let mesh = build_box(1.0, 1.0, 1.0);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.index_count(), 36);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
    }

    #[test]
    fn triangles_wind_clockwise_from_outside() {
        let mesh = build_box(2.0, 2.0, 2.0);
        for tri in mesh.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| {
                Vec3::from_array(mesh.vertices[i as usize].position)
            });
            let normal = Vec3::from_array(mesh.vertices[tri[0] as usize].normal);
            // Left-handed: clockwise seen from outside puts the edge cross
            // product along the outward normal.
            let winding = (b - a).cross(c - a);
            assert!(winding.dot(normal) > 0.0);
        }
    }

    #[test]
    fn uvs_stay_inside_their_cells() {
        let mesh = build_box(1.0, 1.0, 1.0);
        for (side, face) in [
            Face::Front,
            Face::Back,
            Face::Top,
            Face::Bottom,
            Face::Left,
            Face::Right,
        ]
        .into_iter()
        .enumerate()
        {
            let (min, max) = cell_uv(face);
            for v in &mesh.vertices[side * 4..side * 4 + 4] {
                let uv = Vec2::from_array(v.uv);
                assert!(uv.cmpge(min - 1e-6).all() && uv.cmple(max + 1e-6).all());
            }
        }
    }
}
