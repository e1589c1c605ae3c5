//! Windowed GPU state: instance, surface, device, depth target and the cube.

use std::sync::Arc;

use glam::Mat4;
use wgpu::{
    Adapter, CommandEncoderDescriptor, Device, DeviceDescriptor, Features, Instance,
    InstanceDescriptor, Limits, PowerPreference, PresentMode, Queue, Surface,
    SurfaceConfiguration, SurfaceError, TextureUsages, TextureView,
};
use winit::{dpi::PhysicalSize, window::Window};

use crate::RendererError;
use crate::pipeline::{CubePipeline, create_depth_view};

pub(crate) fn create_instance(backends: wgpu::Backends) -> Instance {
    Instance::new(InstanceDescriptor {
        backends,
        ..Default::default()
    })
}

pub(crate) async fn request_adapter(
    instance: &Instance,
    backends: wgpu::Backends,
    surface: Option<&Surface<'_>>,
) -> Result<Adapter, RendererError> {
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: PowerPreference::HighPerformance,
            compatible_surface: surface,
            force_fallback_adapter: false,
        })
        .await
        .ok_or(RendererError::NoAdapter(backends))?;

    let info = adapter.get_info();
    log::info!(
        "Adapter: {} ({:?}, driver {})",
        info.name,
        info.backend,
        info.driver
    );
    Ok(adapter)
}

pub(crate) async fn request_device(
    adapter: &Adapter,
    label: &str,
) -> Result<(Device, Queue), RendererError> {
    let (device, queue) = adapter
        .request_device(
            &DeviceDescriptor {
                label: Some(label),
                required_features: Features::empty(),
                required_limits: Limits::downlevel_webgl2_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: Default::default(),
            },
            None,
        )
        .await?;
    Ok((device, queue))
}

pub struct GpuState {
    surface: Surface<'static>,
    surface_config: SurfaceConfiguration,
    device: Device,
    queue: Queue,
    cube: CubePipeline,
    depth_view: TextureView,
}

impl GpuState {
    /// Create GPU state bound to an `Arc<Window>`, using only `backends`.
    pub async fn new(window: Arc<Window>, backends: wgpu::Backends) -> Result<Self, RendererError> {
        let PhysicalSize { width, height } = window.inner_size();
        let width = width.max(1);
        let height = height.max(1);

        let instance = create_instance(backends);
        let surface: Surface<'static> = instance.create_surface(window.clone())?;
        let adapter = request_adapter(&instance, backends, Some(&surface)).await?;
        let (device, queue) = request_device(&adapter, "glcube Device").await?;

        // Surface format (prefer sRGB)
        let caps = surface.get_capabilities(&adapter);
        let surface_format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or(RendererError::UnsupportedSurface)?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .ok_or(RendererError::UnsupportedSurface)?;

        let surface_config = SurfaceConfiguration {
            usage: TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);
        log::info!("Surface configured: {width}x{height}, {surface_format:?}");

        let depth_view = create_depth_view(&device, width, height);
        let cube = CubePipeline::new(&device, surface_format);

        Ok(Self {
            surface,
            surface_config,
            device,
            queue,
            cube,
            depth_view,
        })
    }

    /// Render one frame with the given MVP and present it.
    pub fn render(&mut self, mvp: Mat4) -> Result<(), SurfaceError> {
        self.cube.write_mvp(&self.queue, mvp);

        let frame = self.surface.get_current_texture()?;
        let view = frame.texture.create_view(&Default::default());
        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("MainEncoder"),
            });
        self.cube.record(&mut encoder, &view, &self.depth_view);

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    pub fn is_surface_lost(err: &SurfaceError) -> bool {
        matches!(err, SurfaceError::Lost | SurfaceError::Outdated)
    }

    /// Reconfigure the surface at its current size.
    pub fn recreate_surface(&mut self) {
        self.surface.configure(&self.device, &self.surface_config);
        self.depth_view =
            create_depth_view(&self.device, self.surface_config.width, self.surface_config.height);
    }

    /// Destroy the cube's buffers, then drop the device and surface.
    pub fn release(self) {
        self.cube.release();
        log::info!("GPU resources released");
    }
}
