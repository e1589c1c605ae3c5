//! Importer front door: format dispatch, post-processing flags, the owned
//! `Scene` result and the error-reporting `load_mesh` wrapper.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
};

use bitflags::bitflags;
use thiserror::Error;

use crate::{mesh::MeshData, obj, postprocess};

bitflags! {
    /// Post-processing steps to run after parsing.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ImportFlags: u32 {
        const CALC_TANGENT_SPACE = 1 << 0;
        const JOIN_IDENTICAL_VERTICES = 1 << 1;
        const TRIANGULATE = 1 << 2;
        const SORT_BY_PTYPE = 1 << 3;

        /// Everything above; what `load_mesh` uses.
        const PRESET = Self::CALC_TANGENT_SPACE.bits()
            | Self::JOIN_IDENTICAL_VERTICES.bits()
            | Self::TRIANGULATE.bits()
            | Self::SORT_BY_PTYPE.bits();
    }
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("unable to open file \"{}\": {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("read failed at line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: io::Error,
    },
    #[error("no suitable importer for extension '{0}'")]
    UnsupportedFormat(String),
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("file contains no usable geometry")]
    EmptyScene,
}

impl ImportError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

/// Imported model. The caller owns it; dropping it frees all mesh data.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    pub source: Option<PathBuf>,
    pub meshes: Vec<MeshData>,
}

impl Scene {
    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(|m| m.vertices.len()).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(MeshData::triangle_count).sum()
    }
}

/// Import a model file, choosing the parser by extension.
pub fn import_file(path: impl AsRef<Path>, flags: ImportFlags) -> Result<Scene, ImportError> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    // Open before the format check so a missing file reports as missing.
    let file = File::open(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut scene = match ext.as_str() {
        "obj" => import_obj_reader(BufReader::new(file), flags)?,
        _ => return Err(ImportError::UnsupportedFormat(ext)),
    };
    scene.source = Some(path.to_path_buf());

    log::debug!(
        "Imported {}: {} meshes, {} vertices, {} triangles",
        path.display(),
        scene.meshes.len(),
        scene.vertex_count(),
        scene.triangle_count()
    );
    Ok(scene)
}

pub fn import_obj_reader<R: BufRead>(reader: R, flags: ImportFlags) -> Result<Scene, ImportError> {
    let doc = obj::parse_obj(reader)?;
    process(&doc, flags)
}

pub fn import_obj_str(contents: &str, flags: ImportFlags) -> Result<Scene, ImportError> {
    let doc = obj::parse_obj_str(contents)?;
    process(&doc, flags)
}

fn process(doc: &obj::ObjDocument, flags: ImportFlags) -> Result<Scene, ImportError> {
    let mut meshes = Vec::new();

    for group in &doc.groups {
        let mut mesh = postprocess::build_mesh(
            doc,
            group,
            flags.contains(ImportFlags::JOIN_IDENTICAL_VERTICES),
        );
        if flags.contains(ImportFlags::TRIANGULATE) {
            postprocess::triangulate(&mut mesh);
        }
        let parts = if flags.contains(ImportFlags::SORT_BY_PTYPE) {
            postprocess::sort_by_primitive_type(mesh)
        } else {
            vec![mesh]
        };
        meshes.extend(parts);
    }

    meshes.retain(MeshData::is_valid);
    if meshes.is_empty() {
        return Err(ImportError::EmptyScene);
    }

    if flags.contains(ImportFlags::CALC_TANGENT_SPACE) {
        for mesh in &mut meshes {
            if !postprocess::calc_tangent_space(mesh) {
                log::warn!("Mesh '{}' has no texture coordinates; tangents skipped", mesh.name);
            }
        }
    }

    Ok(Scene {
        source: None,
        meshes,
    })
}

/// Text written to stderr when `load_mesh` fails.
pub fn load_error_message(err: &ImportError) -> String {
    format!("Error during mesh loading: {err}")
}

/// Import with [`ImportFlags::PRESET`]. On failure the importer message goes
/// to stderr and `None` comes back.
pub fn load_mesh(path: impl AsRef<Path>) -> Option<Scene> {
    match import_file(path.as_ref(), ImportFlags::PRESET) {
        Ok(scene) => Some(scene),
        Err(err) => {
            log::debug!("load_mesh({}) failed: {err:?}", path.as_ref().display());
            eprintln!("{}", load_error_message(&err));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::PrimitiveTypes;

    const CUBE: &str = "\
        # unit cube, quad faces
        o cube
        v 0 0 0\nv 1 0 0\nv 1 0 1\nv 0 0 1\n\
        v 0 1 0\nv 1 1 0\nv 1 1 1\nv 0 1 1\n\
        f 1 2 3 4\nf 5 6 7 8\nf 1 4 8 5\n\
        f 2 3 7 6\nf 1 2 6 5\nf 4 3 7 8\n";

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("glcube-{}-{name}", std::process::id()))
    }

    #[test]
    fn preset_turns_quad_cube_into_triangles() {
        let scene = import_obj_str(CUBE, ImportFlags::PRESET).unwrap();
        assert_eq!(scene.meshes.len(), 1);
        let mesh = &scene.meshes[0];
        assert_eq!(mesh.name, "cube");
        assert_eq!(mesh.vertices.len(), 8);
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(mesh.primitive_types, PrimitiveTypes::TRIANGLE);
        assert_eq!(mesh.faces.iter().flatten().count(), 36);
    }

    #[test]
    fn no_flags_keeps_quads_and_unshared_corners() {
        let scene = import_obj_str(CUBE, ImportFlags::empty()).unwrap();
        let mesh = &scene.meshes[0];
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.faces.len(), 6);
        assert_eq!(mesh.primitive_types, PrimitiveTypes::POLYGON);
        assert!(!mesh.has_tangents);
    }

    #[test]
    fn object_without_faces_is_an_empty_scene() {
        let err = import_obj_str("v 0 0 0\nv 1 0 0\n", ImportFlags::PRESET).unwrap_err();
        assert!(matches!(err, ImportError::EmptyScene));
    }

    #[test]
    fn missing_file_reports_io_error_with_path() {
        let path = temp_path("does-not-exist.obj");
        let err = import_file(&path, ImportFlags::PRESET).unwrap_err();
        assert!(matches!(err, ImportError::Io { .. }));
        let message = load_error_message(&err);
        assert!(message.starts_with("Error during mesh loading: "));
        assert!(message.contains("does-not-exist.obj"));
    }

    #[test]
    fn load_mesh_on_missing_file_returns_none() {
        assert!(load_mesh(temp_path("missing.obj")).is_none());
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let path = temp_path("model.xyz");
        std::fs::write(&path, "not a model").unwrap();
        let err = import_file(&path, ImportFlags::PRESET).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, ImportError::UnsupportedFormat(ref e) if e == "xyz"));
    }

    #[test]
    fn load_mesh_reads_obj_from_disk() {
        let path = temp_path("cube.OBJ");
        std::fs::write(&path, CUBE).unwrap();
        let scene = load_mesh(&path);
        std::fs::remove_file(&path).ok();
        let scene = scene.expect("cube should import");
        assert_eq!(scene.source.as_deref(), Some(path.as_path()));
        assert_eq!(scene.triangle_count(), 12);
    }
}
