//! Platform layer: window, event loop and the render loop driving the
//! renderer.
//!
//! - One window, fixed size, created on the event-loop thread.
//! - A redraw is requested after every batch of events, so the loop runs
//!   at present rate (vsync).
//! - The window close request is the only input that changes anything.

mod runner;
pub mod state;
pub mod stats;

use renderer::RendererError;
use thiserror::Error;
use winit::{
    error::EventLoopError,
    event_loop::{ControlFlow, EventLoop},
};

pub use state::{LoopEvent, LoopState};

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("event loop could not be created")]
    EventLoopInit(#[source] EventLoopError),
    #[error("event loop failed")]
    EventLoop(#[source] EventLoopError),
    #[error("window creation failed")]
    Window(#[from] winit::error::OsError),
    #[error(transparent)]
    GraphicsInit(#[from] RendererError),
    #[error("GPU ran out of memory while acquiring a frame")]
    OutOfMemory,
}

impl PlatformError {
    /// Failed before the loop reached `Running`: no window or no GPU context.
    pub fn is_init_failure(&self) -> bool {
        matches!(
            self,
            PlatformError::EventLoopInit(_) | PlatformError::Window(_) | PlatformError::GraphicsInit(_)
        )
    }
}

/// Window attributes. Defaults: "OpenGL", 800x600, not resizable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WindowOptions {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            title: "OpenGL".to_owned(),
            width: 800,
            height: 600,
            resizable: false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct RunConfig {
    pub window: WindowOptions,
    pub backends: wgpu::Backends,
    pub show_fps: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            window: WindowOptions::default(),
            backends: wgpu::Backends::GL,
            show_fps: false,
        }
    }
}

/// Open the cube window and render until it is closed.
/// Returns once the window is gone and GPU resources are released.
pub fn run_cube_window(config: RunConfig) -> Result<(), PlatformError> {
    let event_loop = EventLoop::new().map_err(PlatformError::EventLoopInit)?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = runner::CubeApp::new(config);
    event_loop
        .run_app(&mut app)
        .map_err(PlatformError::EventLoop)?;
    app.finish()
}
