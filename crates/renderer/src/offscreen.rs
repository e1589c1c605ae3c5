//! Headless rendering into a texture, with CPU readback.

use glam::Mat4;
use wgpu::{
    Buffer, BufferDescriptor, BufferUsages, CommandEncoderDescriptor, Device, Extent3d, Queue,
    Texture, TextureDescriptor, TextureDimension, TextureFormat, TextureUsages, TextureView,
};

use crate::RendererError;
use crate::gpu::{create_instance, request_adapter, request_device};
use crate::pipeline::{CubePipeline, create_depth_view};

const COLOR_FORMAT: TextureFormat = TextureFormat::Rgba8Unorm;
const BYTES_PER_PIXEL: u32 = 4;

/// Tightly packed RGBA8 rows, top row first.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameCapture {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl FrameCapture {
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * BYTES_PER_PIXEL) as usize;
        self.pixels.get(i..i + 4)?.try_into().ok()
    }

    /// Pixels something was drawn over; the clear color has zero alpha.
    pub fn covered_pixels(&self) -> usize {
        self.pixels.chunks_exact(4).filter(|px| px[3] != 0).count()
    }
}

pub struct OffscreenRenderer {
    device: Device,
    queue: Queue,
    cube: CubePipeline,
    target: Texture,
    target_view: TextureView,
    depth_view: TextureView,
    readback: Buffer,
    width: u32,
    height: u32,
    padded_bytes_per_row: u32,
}

impl OffscreenRenderer {
    pub async fn new(
        backends: wgpu::Backends,
        width: u32,
        height: u32,
    ) -> Result<Self, RendererError> {
        let width = width.max(1);
        let height = height.max(1);

        let instance = create_instance(backends);
        let adapter = request_adapter(&instance, backends, None).await?;
        let (device, queue) = request_device(&adapter, "glcube Offscreen Device").await?;

        let target = device.create_texture(&TextureDescriptor {
            label: Some("Offscreen Color"),
            size: Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format: COLOR_FORMAT,
            usage: TextureUsages::RENDER_ATTACHMENT | TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let target_view = target.create_view(&Default::default());
        let depth_view = create_depth_view(&device, width, height);

        let padded_bytes_per_row = padded_row_bytes(width);
        let readback = device.create_buffer(&BufferDescriptor {
            label: Some("Offscreen Readback"),
            size: u64::from(padded_bytes_per_row) * u64::from(height),
            usage: BufferUsages::COPY_DST | BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let cube = CubePipeline::new(&device, COLOR_FORMAT);

        Ok(Self {
            device,
            queue,
            cube,
            target,
            target_view,
            depth_view,
            readback,
            width,
            height,
            padded_bytes_per_row,
        })
    }

    /// Draw one frame and copy it back to the CPU.
    pub fn render_frame(&mut self, mvp: Mat4) -> Result<FrameCapture, RendererError> {
        self.cube.write_mvp(&self.queue, mvp);

        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("OffscreenEncoder"),
            });
        self.cube
            .record(&mut encoder, &self.target_view, &self.depth_view);
        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture: &self.target,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: &self.readback,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(self.padded_bytes_per_row),
                    rows_per_image: Some(self.height),
                },
            },
            Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
        self.queue.submit(Some(encoder.finish()));

        let slice = self.readback.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |res| {
            let _ = tx.send(res);
        });
        let _ = self.device.poll(wgpu::Maintain::Wait);
        rx.recv()
            .map_err(|_| RendererError::Readback("map callback never ran".to_owned()))??;

        let row_bytes = (self.width * BYTES_PER_PIXEL) as usize;
        let mut pixels = Vec::with_capacity(row_bytes * self.height as usize);
        {
            let data = slice.get_mapped_range();
            for row in data.chunks_exact(self.padded_bytes_per_row as usize) {
                pixels.extend_from_slice(&row[..row_bytes]);
            }
        }
        self.readback.unmap();

        Ok(FrameCapture {
            width: self.width,
            height: self.height,
            pixels,
        })
    }
}

fn padded_row_bytes(width: u32) -> u32 {
    let unpadded = width * BYTES_PER_PIXEL;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}
