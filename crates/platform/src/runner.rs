use std::sync::Arc;
use std::time::Instant;

use renderer::{FrameParams, GpuState};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::ActiveEventLoop,
    window::{Window, WindowId},
};

use crate::state::{LoopEvent, LoopState};
use crate::stats::FrameStats;
use crate::{PlatformError, RunConfig};

pub(crate) struct CubeApp {
    config: RunConfig,
    state: LoopState,
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    frame: FrameParams,
    stats: Option<FrameStats>,
    error: Option<PlatformError>,
}

impl CubeApp {
    pub(crate) fn new(config: RunConfig) -> Self {
        Self {
            config,
            state: LoopState::Uninitialized,
            window: None,
            gpu: None,
            frame: FrameParams::default(),
            stats: None,
            error: None,
        }
    }

    /// Outcome after the event loop returned.
    pub(crate) fn finish(mut self) -> Result<(), PlatformError> {
        self.release_gpu();
        match self.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), PlatformError> {
        let opts = &self.config.window;
        let attributes = Window::default_attributes()
            .with_title(opts.title.as_str())
            .with_resizable(opts.resizable)
            .with_inner_size(PhysicalSize::new(opts.width, opts.height));
        let window = Arc::new(event_loop.create_window(attributes)?);
        log::info!(
            "Window created: {}x{}",
            window.inner_size().width,
            window.inner_size().height
        );

        let gpu = pollster::block_on(GpuState::new(window.clone(), self.config.backends))?;

        self.stats = self.config.show_fps.then(|| FrameStats::new(Instant::now()));
        self.window = Some(window);
        self.gpu = Some(gpu);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: PlatformError) {
        log::error!("{err}");
        self.error = Some(err);
        self.release_gpu();
        self.window = None;
        event_loop.exit();
    }

    fn close(&mut self, event_loop: &ActiveEventLoop) {
        log::info!("Close requested. Exiting event loop.");
        self.release_gpu();
        self.window = None;
        event_loop.exit();
    }

    fn release_gpu(&mut self) {
        if let Some(gpu) = self.gpu.take() {
            gpu.release();
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        if !self.state.is_running() {
            return;
        }
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };

        // View first, then draw.
        let mvp = self.frame.mvp();
        match gpu.render(mvp) {
            Ok(()) => {
                if let Some(stats) = self.stats.as_mut() {
                    if let Some(fps) = stats.tick(Instant::now()) {
                        log::info!("FPS: {fps:.1} ({} frames total)", stats.total_frames());
                    }
                }
            }
            Err(e) if GpuState::is_surface_lost(&e) => {
                log::warn!("Surface {e:?}; reconfiguring");
                gpu.recreate_surface();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                self.state = LoopState::Closed;
                self.fail(event_loop, PlatformError::OutOfMemory);
            }
            Err(e) => log::warn!("Frame skipped: {e:?}"),
        }
    }
}

impl ApplicationHandler for CubeApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state != LoopState::Uninitialized {
            return;
        }
        match self.init(event_loop) {
            Ok(()) => {
                self.state = self.state.started();
                log::info!("Render loop running");
            }
            Err(err) => {
                self.state = self.state.failed();
                self.fail(event_loop, err);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let WindowEvent::RedrawRequested = event {
            self.redraw(event_loop);
            return;
        }

        let event = LoopEvent::classify(&event);
        if event == LoopEvent::KeyPressed {
            log::debug!("Key pressed (no binding)");
        }

        let was_running = self.state.is_running();
        self.state = self.state.on_event(event);
        if was_running && self.state == LoopState::Closed {
            self.close(event_loop);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if !self.state.is_running() {
            return;
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
