//! Post-processing steps applied after parsing. Each step works on one
//! mesh; `import` decides which ones run.

use std::collections::HashMap;

use glam::{Vec2, Vec3};

use crate::mesh::{MeshData, MeshVertex, PrimitiveTypes};
use crate::obj::{Corner, ObjDocument, ObjGroup};

const DEFAULT_NORMAL: [f32; 3] = [0.0, 0.0, 1.0];
const DEFAULT_UV: [f32; 2] = [0.0, 0.0];

/// Turn one OBJ group into a mesh. With `join_identical`, corners that
/// reference the same (position, uv, normal) triple share a vertex.
pub fn build_mesh(doc: &ObjDocument, group: &ObjGroup, join_identical: bool) -> MeshData {
    let mut unique: HashMap<Corner, u32> = HashMap::new();
    let mut vertices: Vec<MeshVertex> = Vec::new();
    let mut has_normals = false;
    let mut has_uvs = false;

    let mut make_vertex = |c: &Corner, vertices: &mut Vec<MeshVertex>| -> u32 {
        let uv = c.texcoord.map_or(DEFAULT_UV, |i| doc.texcoords[i]);
        let normal = c.normal.map_or(DEFAULT_NORMAL, |i| doc.normals[i]);
        has_uvs |= c.texcoord.is_some();
        has_normals |= c.normal.is_some();
        vertices.push(MeshVertex::new(doc.positions[c.position], normal, uv));
        (vertices.len() - 1) as u32
    };

    let faces: Vec<Vec<u32>> = group
        .faces
        .iter()
        .map(|face| {
            face.iter()
                .map(|corner| {
                    if !join_identical {
                        return make_vertex(corner, &mut vertices);
                    }
                    match unique.get(corner) {
                        Some(&idx) => idx,
                        None => {
                            let idx = make_vertex(corner, &mut vertices);
                            unique.insert(*corner, idx);
                            idx
                        }
                    }
                })
                .collect()
        })
        .collect();

    MeshData {
        has_normals,
        has_uvs,
        ..MeshData::new(group.name.clone(), vertices, faces)
    }
}

/// Split polygons into triangle fans. Points, lines and triangles pass
/// through unchanged.
pub fn triangulate(mesh: &mut MeshData) {
    if !mesh.primitive_types.contains(PrimitiveTypes::POLYGON) {
        return;
    }
    let mut faces = Vec::with_capacity(mesh.faces.len() * 2);
    for face in mesh.faces.drain(..) {
        if face.len() <= 3 {
            faces.push(face);
            continue;
        }
        for tri in 1..(face.len() - 1) {
            faces.push(vec![face[0], face[tri], face[tri + 1]]);
        }
    }
    mesh.faces = faces;
    mesh.refresh_primitive_types();
}

/// Split a mesh so each result holds a single primitive type. Output order
/// is point, line, triangle, polygon.
pub fn sort_by_primitive_type(mesh: MeshData) -> Vec<MeshData> {
    if mesh.primitive_types.bits().count_ones() <= 1 {
        return vec![mesh];
    }
    [
        PrimitiveTypes::POINT,
        PrimitiveTypes::LINE,
        PrimitiveTypes::TRIANGLE,
        PrimitiveTypes::POLYGON,
    ]
    .into_iter()
    .filter(|kind| mesh.primitive_types.contains(*kind))
    .map(|kind| {
        let faces: Vec<Vec<u32>> = mesh
            .faces
            .iter()
            .filter(|f| PrimitiveTypes::of_face(f.len()) == kind)
            .cloned()
            .collect();
        mesh.subset(&faces)
    })
    .collect()
}

/// Per-vertex tangent and bitangent from the triangles' UV gradients.
/// Needs texture coordinates; returns `false` and leaves the mesh alone
/// when there are none. Non-triangle faces do not contribute.
pub fn calc_tangent_space(mesh: &mut MeshData) -> bool {
    if !mesh.has_uvs {
        return false;
    }

    let mut tangents = vec![Vec3::ZERO; mesh.vertices.len()];
    let mut bitangents = vec![Vec3::ZERO; mesh.vertices.len()];

    for face in mesh.faces.iter().filter(|f| f.len() == 3) {
        let [a, b, c] = [face[0], face[1], face[2]].map(|i| i as usize);
        let (va, vb, vc) = (&mesh.vertices[a], &mesh.vertices[b], &mesh.vertices[c]);

        let e1 = Vec3::from(vb.position) - Vec3::from(va.position);
        let e2 = Vec3::from(vc.position) - Vec3::from(va.position);
        let d1 = Vec2::from(vb.uv) - Vec2::from(va.uv);
        let d2 = Vec2::from(vc.uv) - Vec2::from(va.uv);

        let det = d1.x * d2.y - d2.x * d1.y;
        if det.abs() < f32::EPSILON {
            continue;
        }
        let r = 1.0 / det;
        let t = (e1 * d2.y - e2 * d1.y) * r;
        let bt = (e2 * d1.x - e1 * d2.x) * r;

        for i in [a, b, c] {
            tangents[i] += t;
            bitangents[i] += bt;
        }
    }

    for ((vertex, t), bt) in mesh.vertices.iter_mut().zip(tangents).zip(bitangents) {
        let n = Vec3::from(vertex.normal).normalize_or(Vec3::Z);
        let mut tangent = (t - n * n.dot(t)).normalize_or_zero();
        if tangent == Vec3::ZERO {
            tangent = n.any_orthonormal_vector();
        }
        let mut bitangent = (bt - n * n.dot(bt) - tangent * tangent.dot(bt)).normalize_or_zero();
        if bitangent == Vec3::ZERO {
            bitangent = n.cross(tangent);
        }
        vertex.tangent = tangent.to_array();
        vertex.bitangent = bitangent.to_array();
    }

    mesh.has_tangents = true;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obj::parse_obj_str;

    const QUAD: &str = "\
        v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\n\
        vt 0 0\nvt 1 0\nvt 1 1\nvt 0 1\n\
        vn 0 0 1\n\
        f 1/1/1 2/2/1 3/3/1 4/4/1\n";

    fn quad_mesh(join: bool) -> MeshData {
        let doc = parse_obj_str(QUAD).unwrap();
        build_mesh(&doc, &doc.groups[0], join)
    }

    #[test]
    fn joining_shares_repeated_corners() {
        let src = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3\nf 1 3 4\n";
        let doc = parse_obj_str(src).unwrap();
        assert_eq!(build_mesh(&doc, &doc.groups[0], true).vertices.len(), 4);
        assert_eq!(build_mesh(&doc, &doc.groups[0], false).vertices.len(), 6);
    }

    #[test]
    fn missing_attributes_get_defaults() {
        let doc = parse_obj_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        let mesh = build_mesh(&doc, &doc.groups[0], true);
        assert!(!mesh.has_normals && !mesh.has_uvs);
        assert_eq!(mesh.vertices[0].normal, DEFAULT_NORMAL);
        assert_eq!(mesh.vertices[0].uv, DEFAULT_UV);
    }

    #[test]
    fn triangulate_fans_polygons() {
        let mut mesh = quad_mesh(true);
        assert_eq!(mesh.primitive_types, PrimitiveTypes::POLYGON);
        triangulate(&mut mesh);
        assert_eq!(mesh.faces, vec![vec![0, 1, 2], vec![0, 2, 3]]);
        assert_eq!(mesh.primitive_types, PrimitiveTypes::TRIANGLE);
    }

    #[test]
    fn sort_splits_mixed_meshes() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nv 5 5 5\nf 1 2 3\nl 1 2\np 4\n";
        let doc = parse_obj_str(src).unwrap();
        let mesh = build_mesh(&doc, &doc.groups[0], true);
        let parts = sort_by_primitive_type(mesh);
        let kinds: Vec<PrimitiveTypes> = parts.iter().map(|m| m.primitive_types).collect();
        assert_eq!(
            kinds,
            vec![
                PrimitiveTypes::POINT,
                PrimitiveTypes::LINE,
                PrimitiveTypes::TRIANGLE
            ]
        );
        assert_eq!(parts[0].vertices.len(), 1);
        assert_eq!(parts[2].vertices.len(), 3);
    }

    #[test]
    fn sort_keeps_single_type_mesh_whole() {
        let mesh = quad_mesh(true);
        assert_eq!(sort_by_primitive_type(mesh.clone()), vec![mesh]);
    }

    #[test]
    fn tangents_follow_uv_axes() {
        let mut mesh = quad_mesh(true);
        triangulate(&mut mesh);
        assert!(calc_tangent_space(&mut mesh));
        for v in &mesh.vertices {
            assert!((Vec3::from(v.tangent) - Vec3::X).length() < 1e-5);
            assert!((Vec3::from(v.bitangent) - Vec3::Y).length() < 1e-5);
        }
    }

    #[test]
    fn tangents_need_uvs() {
        let doc = parse_obj_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        let mut mesh = build_mesh(&doc, &doc.groups[0], true);
        assert!(!calc_tangent_space(&mut mesh));
        assert!(!mesh.has_tangents);
    }
}
