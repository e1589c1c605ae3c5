//! Core types: math re-exports, camera, projection and model transform.
//! Nothing in here touches the GPU.

pub use glam::{Mat4, Quat, Vec3, vec3};

pub mod camera;
pub mod transform;

#[cfg(test)]
mod tests {
    use super::*;
    use camera::{Camera, Projection};
    use transform::Transform;

    #[test]
    fn default_frame_matrices_are_finite() {
        let pv = Projection::default().matrix() * Camera::default().view();
        let model = Transform::from_translation(vec3(0.0, 0.0, -5.0)).matrix();
        assert!((pv * model).to_cols_array().iter().all(|f| f.is_finite()));
    }

    #[test]
    fn translated_corner_lands_in_front_of_the_eye() {
        let model = Transform::from_translation(vec3(0.0, 0.0, -5.0)).matrix();
        let clip = Projection::default().matrix() * model * glam::Vec4::new(1.0, 1.0, 1.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        // (1,1,1) moves to (1,1,-4): w = 4, x = y = 0.25.
        assert!((clip.w - 4.0).abs() < 1e-5);
        assert!((ndc.x - 0.25).abs() < 1e-5);
        assert!((ndc.y - 0.25).abs() < 1e-5);
        assert!(ndc.z > -1.0 && ndc.z < 1.0);
    }
}
