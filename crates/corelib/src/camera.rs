use crate::{Mat4, Vec3};

const DEGENERATE_EPS: f32 = 1e-12;

/// Look-at camera (right-handed). Nothing drives it at runtime; it keeps
/// whatever it was built with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

impl Camera {
    pub const fn new(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        Self { eye, target, up }
    }

    /// `true` when no view basis can be built: eye on the target, or `up`
    /// parallel to the viewing direction.
    pub fn is_degenerate(&self) -> bool {
        let forward = self.target - self.eye;
        forward.length_squared() <= DEGENERATE_EPS
            || forward.cross(self.up).length_squared() <= DEGENERATE_EPS
    }

    /// World-to-view matrix. A degenerate camera contributes nothing, so the
    /// view is the identity.
    #[inline]
    pub fn view(&self) -> Mat4 {
        if self.is_degenerate() {
            return Mat4::IDENTITY;
        }
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }
}

impl Default for Camera {
    /// Eye and target both at the origin, `+Y` up.
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::ZERO, Vec3::Y)
    }
}

/// Symmetric perspective frustum.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    pub fov_y_rad: f32,
    pub aspect: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Projection {
    /// OpenGL-style clip space (z in [-1,1]).
    /// The renderer multiplies by OPENGL_TO_WGPU to get z in [0,1].
    #[inline]
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y_rad, self.aspect, self.z_near, self.z_far)
    }
}

impl Default for Projection {
    /// 90 degree vertical FOV, square aspect, near 1, far 500.
    fn default() -> Self {
        Self {
            fov_y_rad: std::f32::consts::FRAC_PI_2,
            aspect: 1.0,
            z_near: 1.0,
            z_far: 500.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec3;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn default_camera_is_degenerate_and_views_through_identity() {
        let cam = Camera::default();
        assert!(cam.is_degenerate());
        assert_eq!(cam.view(), Mat4::IDENTITY);
    }

    #[test]
    fn up_parallel_to_forward_is_degenerate() {
        let cam = Camera::new(Vec3::ZERO, vec3(0.0, 5.0, 0.0), Vec3::Y);
        assert!(cam.is_degenerate());
    }

    #[test]
    fn regular_camera_moves_target_onto_negative_z() {
        let cam = Camera::new(vec3(0.0, 0.0, 4.0), Vec3::ZERO, Vec3::Y);
        let p = cam.view().transform_point3(Vec3::ZERO);
        assert!(close(p.x, 0.0) && close(p.y, 0.0) && close(p.z, -4.0));
    }

    #[test]
    fn default_projection_matches_glu_perspective() {
        // gluPerspective(90, 1, 1, 500)
        let m = Projection::default().matrix().to_cols_array();
        assert!(close(m[0], 1.0));
        assert!(close(m[5], 1.0));
        assert!(close(m[10], -501.0 / 499.0));
        assert!(close(m[11], -1.0));
        assert!(close(m[14], -1000.0 / 499.0));
        assert!(close(m[15], 0.0));
    }
}
