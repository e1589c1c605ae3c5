//! `mesh-info <file>`: import a model with the standard post-processing
//! preset and print what came out. Independent of the render loop.

use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let Some(path) = std::env::args_os().nth(1) else {
        eprintln!("usage: mesh-info <model-file>");
        return ExitCode::from(1);
    };

    // load_mesh reports its own failure on stderr
    let Some(scene) = asset::load_mesh(&path) else {
        return ExitCode::from(1);
    };

    for mesh in &scene.meshes {
        let attributes: Vec<&str> = [
            (mesh.has_normals, "normals"),
            (mesh.has_uvs, "uvs"),
            (mesh.has_tangents, "tangents"),
        ]
        .into_iter()
        .filter_map(|(present, name)| present.then_some(name))
        .collect();
        println!(
            "{}: {} vertices, {} faces, {:?} [{}]",
            mesh.name,
            mesh.vertices.len(),
            mesh.faces.len(),
            mesh.primitive_types,
            attributes.join(", ")
        );
    }
    println!(
        "total: {} meshes, {} vertices, {} triangles",
        scene.meshes.len(),
        scene.vertex_count(),
        scene.triangle_count()
    );
    ExitCode::SUCCESS
}
