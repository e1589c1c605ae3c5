//! The fixed cube: eight corners and six quad faces.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use wgpu::{VertexBufferLayout, VertexStepMode};

/// Position-only vertex, attribute 0.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub pos: [f32; 3],
}

impl Vertex {
    pub const LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as u64,
        step_mode: VertexStepMode::Vertex,
        attributes: &wgpu::vertex_attr_array![0 => Float32x3],
    };
}

/// Corners of the unit cube spanning (0,0,0)..(1,1,1).
#[rustfmt::skip]
pub const CUBE_POSITIONS: [[f32; 3]; 8] = [
    [0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 1.0], [0.0, 0.0, 1.0],
    [0.0, 1.0, 0.0], [1.0, 1.0, 0.0], [1.0, 1.0, 1.0], [0.0, 1.0, 1.0],
];

/// Six faces, four corners each, listed around the face outline.
#[rustfmt::skip]
pub const CUBE_QUADS: [u16; 24] = [
    0, 1, 2, 3, // y = 0
    4, 5, 6, 7, // y = 1
    0, 3, 7, 4, // x = 0
    1, 2, 6, 5, // x = 1
    0, 1, 5, 4, // z = 0
    3, 2, 6, 7, // z = 1
];

pub const CUBE_INDEX_COUNT: usize = CUBE_QUADS.len() / 4 * 6;

pub fn cube_vertices() -> Vec<Vertex> {
    CUBE_POSITIONS.iter().map(|&pos| Vertex { pos }).collect()
}

/// Two triangles per quad, each wound counter-clockwise as seen from
/// outside the cube, so back-face culling keeps the outer surface.
pub fn cube_indices() -> [u16; CUBE_INDEX_COUNT] {
    let center = Vec3::splat(0.5);
    let mut out = [0u16; CUBE_INDEX_COUNT];
    for (quad, dst) in CUBE_QUADS.chunks_exact(4).zip(out.chunks_exact_mut(6)) {
        let first = outward([quad[0], quad[1], quad[2]], center);
        let second = outward([quad[0], quad[2], quad[3]], center);
        dst[..3].copy_from_slice(&first);
        dst[3..].copy_from_slice(&second);
    }
    out
}

fn corner(i: u16) -> Vec3 {
    Vec3::from(CUBE_POSITIONS[i as usize])
}

fn outward([a, b, c]: [u16; 3], center: Vec3) -> [u16; 3] {
    let normal = (corner(b) - corner(a)).cross(corner(c) - corner(a));
    let centroid = (corner(a) + corner(b) + corner(c)) / 3.0;
    if normal.dot(centroid - center) < 0.0 {
        [a, c, b]
    } else {
        [a, b, c]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twelve_triangles_over_eight_corners() {
        let idx = cube_indices();
        assert_eq!(idx.len(), 36);
        assert!(idx.iter().all(|&i| (i as usize) < CUBE_POSITIONS.len()));
        for i in 0..CUBE_POSITIONS.len() as u16 {
            assert!(idx.contains(&i), "corner {i} unused");
        }
    }

    #[test]
    fn every_triangle_faces_outward() {
        let center = Vec3::splat(0.5);
        for tri in cube_indices().chunks_exact(3) {
            let n = (corner(tri[1]) - corner(tri[0])).cross(corner(tri[2]) - corner(tri[0]));
            let centroid = (corner(tri[0]) + corner(tri[1]) + corner(tri[2])) / 3.0;
            assert!(n.dot(centroid - center) > 0.0, "{tri:?} faces inward");
        }
    }

    #[test]
    fn each_quad_keeps_its_four_corners() {
        let idx = cube_indices();
        for (quad, tris) in CUBE_QUADS.chunks_exact(4).zip(idx.chunks_exact(6)) {
            let mut used: Vec<u16> = tris.to_vec();
            used.sort_unstable();
            used.dedup();
            let mut expected = quad.to_vec();
            expected.sort_unstable();
            assert_eq!(used, expected);
        }
    }

    #[test]
    fn vertex_layout_is_tightly_packed_float3() {
        assert_eq!(Vertex::LAYOUT.array_stride, 12);
        assert_eq!(Vertex::LAYOUT.attributes.len(), 1);
        assert_eq!(Vertex::LAYOUT.attributes[0].shader_location, 0);
        assert_eq!(cube_vertices().len(), 8);
    }
}
