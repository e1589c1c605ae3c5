//! CPU-side mesh representation produced by the importers.

use bitflags::bitflags;

bitflags! {
    /// Kinds of primitives a mesh contains, by corner count.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PrimitiveTypes: u8 {
        const POINT = 1 << 0;
        const LINE = 1 << 1;
        const TRIANGLE = 1 << 2;
        const POLYGON = 1 << 3;
    }
}

impl PrimitiveTypes {
    /// Type of a face with `corners` corners. Empty faces have no type.
    pub fn of_face(corners: usize) -> Self {
        match corners {
            0 => Self::empty(),
            1 => Self::POINT,
            2 => Self::LINE,
            3 => Self::TRIANGLE,
            _ => Self::POLYGON,
        }
    }
}

/// Vertex in object space. Tangent and bitangent stay zero unless tangent
/// space was computed.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub tangent: [f32; 3],
    pub bitangent: [f32; 3],
}

impl MeshVertex {
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
            ..Self::default()
        }
    }
}

/// Named mesh: vertices plus faces given as corner index lists.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub name: String,
    pub vertices: Vec<MeshVertex>,
    pub faces: Vec<Vec<u32>>,
    pub primitive_types: PrimitiveTypes,
    pub has_normals: bool,
    pub has_uvs: bool,
    pub has_tangents: bool,
}

impl MeshData {
    pub fn new(name: impl Into<String>, vertices: Vec<MeshVertex>, faces: Vec<Vec<u32>>) -> Self {
        let mut mesh = Self {
            name: name.into(),
            vertices,
            faces,
            ..Self::default()
        };
        mesh.refresh_primitive_types();
        mesh
    }

    /// Recompute `primitive_types` from the current faces.
    pub fn refresh_primitive_types(&mut self) {
        self.primitive_types = self
            .faces
            .iter()
            .fold(PrimitiveTypes::empty(), |acc, f| acc | PrimitiveTypes::of_face(f.len()));
    }

    /// Returns `true` if there is at least one vertex and one face.
    pub fn is_valid(&self) -> bool {
        !self.vertices.is_empty() && !self.faces.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.faces.iter().filter(|f| f.len() == 3).count()
    }

    /// Copy of this mesh restricted to `faces`, with unused vertices dropped
    /// and indices remapped.
    pub fn subset(&self, faces: &[Vec<u32>]) -> MeshData {
        let mut remap: Vec<Option<u32>> = vec![None; self.vertices.len()];
        let mut vertices = Vec::new();
        let faces: Vec<Vec<u32>> = faces
            .iter()
            .map(|face| {
                face.iter()
                    .map(|&old| {
                        let slot = &mut remap[old as usize];
                        *slot.get_or_insert_with(|| {
                            vertices.push(self.vertices[old as usize]);
                            (vertices.len() - 1) as u32
                        })
                    })
                    .collect()
            })
            .collect();

        MeshData {
            has_normals: self.has_normals,
            has_uvs: self.has_uvs,
            has_tangents: self.has_tangents,
            ..MeshData::new(self.name.clone(), vertices, faces)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_and_point() -> MeshData {
        let v = |x: f32, y: f32| MeshVertex::new([x, y, 0.0], [0.0, 0.0, 1.0], [x, y]);
        MeshData::new(
            "mixed",
            vec![v(0.0, 0.0), v(1.0, 0.0), v(1.0, 1.0), v(0.0, 1.0), v(5.0, 5.0)],
            vec![vec![0, 1, 2, 3], vec![4]],
        )
    }

    #[test]
    fn mesh_data_validity() {
        assert!(quad_and_point().is_valid());
        assert!(!MeshData::default().is_valid());
    }

    #[test]
    fn primitive_types_follow_faces() {
        let mesh = quad_and_point();
        assert_eq!(
            mesh.primitive_types,
            PrimitiveTypes::POLYGON | PrimitiveTypes::POINT
        );
        assert_eq!(mesh.triangle_count(), 0);
    }

    #[test]
    fn subset_compacts_vertices() {
        let mesh = quad_and_point();
        let points = mesh.subset(&[vec![4]]);
        assert_eq!(points.vertices.len(), 1);
        assert_eq!(points.faces, vec![vec![0]]);
        assert_eq!(points.vertices[0].position, [5.0, 5.0, 0.0]);
        assert_eq!(points.primitive_types, PrimitiveTypes::POINT);
    }
}
