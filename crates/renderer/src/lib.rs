//! Renderer: wgpu device setup and the cube draw.
//! wgpu = 23.x, winit = 0.30.x
//!
//! Transforms come in as plain matrices ([`FrameParams`]); nothing here keeps
//! a global matrix stack.

pub mod geometry;
pub mod gpu;
pub mod offscreen;
pub mod pipeline;

use corelib::{
    Mat4, vec3,
    camera::{Camera, Projection},
    transform::Transform,
};
use thiserror::Error;

pub use gpu::GpuState;
pub use offscreen::{FrameCapture, OffscreenRenderer};

#[derive(Debug, Error)]
pub enum RendererError {
    #[error("no suitable GPU adapter for backends {0:?}")]
    NoAdapter(wgpu::Backends),
    #[error("surface creation failed")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("device request failed")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no usable format")]
    UnsupportedSurface,
    #[error("frame readback failed: {0}")]
    Readback(String),
    #[error("frame buffer could not be mapped")]
    BufferMap(#[from] wgpu::BufferAsyncError),
}

/// Remaps OpenGL clip depth (z in [-1,1]) to wgpu's (z in [0,1]).
#[rustfmt::skip]
pub const OPENGL_TO_WGPU: Mat4 = Mat4::from_cols_array(&[
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
]);

/// Everything that feeds one frame's MVP.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameParams {
    pub projection: Projection,
    pub camera: Camera,
    pub model: Transform,
}

impl FrameParams {
    pub fn mvp(&self) -> Mat4 {
        OPENGL_TO_WGPU * self.projection.matrix() * self.camera.view() * self.model.matrix()
    }
}

impl Default for FrameParams {
    /// 90 degree square frustum, default camera, cube pushed 5 units away.
    fn default() -> Self {
        Self {
            projection: Projection::default(),
            camera: Camera::default(),
            model: Transform::from_translation(vec3(0.0, 0.0, -5.0)),
        }
    }
}
