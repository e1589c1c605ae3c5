//! Mesh import: OBJ parsing plus optional post-processing steps.
//!
//! Standalone utility. The render loop never calls into this crate; the
//! `mesh-info` binary and the tests do.

pub mod import;
pub mod mesh;
pub mod obj;
pub mod postprocess;

pub use import::{ImportError, ImportFlags, Scene, import_file, import_obj_str, load_mesh};
pub use mesh::{MeshData, MeshVertex, PrimitiveTypes};
