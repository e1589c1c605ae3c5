//! Cube pipeline: shader, uniform, geometry buffers and the one render pass.
//! Shared by the windowed and the offscreen paths.

use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::{
    BindGroup, BindGroupLayoutDescriptor, BindGroupLayoutEntry, BindingType, BlendState, Buffer,
    BufferBindingType, BufferUsages, ColorTargetState, ColorWrites, CommandEncoder,
    DepthBiasState, DepthStencilState, Device, Extent3d, FragmentState, LoadOp, Operations,
    PipelineLayoutDescriptor, Queue, RenderPassColorAttachment, RenderPassDescriptor,
    RenderPipeline, RenderPipelineDescriptor, ShaderModuleDescriptor, ShaderSource, ShaderStages,
    StoreOp, TextureDescriptor, TextureDimension, TextureFormat, TextureUsages, TextureView,
    TextureViewDescriptor, VertexState, util::DeviceExt,
};

use crate::geometry::{Vertex, cube_indices, cube_vertices};

pub const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth32Float;

/// Fully transparent black.
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color::TRANSPARENT;

/// Opaque white, what the fixed-function pipeline draws with no color set.
pub const CUBE_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Uniform block (16-byte aligned).
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct Transforms {
    mvp: [[f32; 4]; 4],
    color: [f32; 4],
}

impl Transforms {
    fn new(mvp: Mat4) -> Self {
        Self {
            mvp: mvp.to_cols_array_2d(),
            color: CUBE_COLOR,
        }
    }
}

pub struct CubePipeline {
    pipeline: RenderPipeline,
    bind_group: BindGroup,
    uniform_buf: Buffer,
    vertex_buf: Buffer,
    index_buf: Buffer,
    index_count: u32,
}

impl CubePipeline {
    /// Compile the shader and upload the cube once.
    pub fn new(device: &Device, color_format: TextureFormat) -> Self {
        let shader = device.create_shader_module(ShaderModuleDescriptor {
            label: Some("Cube WGSL"),
            source: ShaderSource::Wgsl(include_str!("shaders/cube.wgsl").into()),
        });

        let bgl = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("Transforms BGL"),
            entries: &[BindGroupLayoutEntry {
                binding: 0,
                visibility: ShaderStages::VERTEX | ShaderStages::FRAGMENT,
                ty: BindingType::Buffer {
                    ty: BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: NonZeroU64::new(std::mem::size_of::<Transforms>() as u64),
                },
                count: None,
            }],
        });

        let uniform_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Transforms UBO"),
            contents: bytemuck::bytes_of(&Transforms::new(Mat4::IDENTITY)),
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Transforms BG"),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buf.as_entire_binding(),
            }],
        });

        let layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("Cube PipelineLayout"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some("Cube Pipeline"),
            layout: Some(&layout),
            vertex: VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::LAYOUT],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(ColorTargetState {
                    format: color_format,
                    blend: Some(BlendState::REPLACE),
                    write_mask: ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let vertices = cube_vertices();
        let indices = cube_indices();
        let vertex_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube VB"),
            contents: bytemuck::cast_slice(&vertices),
            usage: BufferUsages::VERTEX,
        });
        let index_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube IB"),
            contents: bytemuck::cast_slice(&indices),
            usage: BufferUsages::INDEX,
        });
        log::debug!(
            "Cube uploaded: {} vertices, {} indices",
            vertices.len(),
            indices.len()
        );

        Self {
            pipeline,
            bind_group,
            uniform_buf,
            vertex_buf,
            index_buf,
            index_count: indices.len() as u32,
        }
    }

    pub fn write_mvp(&self, queue: &Queue, mvp: Mat4) {
        queue.write_buffer(&self.uniform_buf, 0, bytemuck::bytes_of(&Transforms::new(mvp)));
    }

    /// Clear color + depth, then draw the cube.
    pub fn record(&self, encoder: &mut CommandEncoder, color: &TextureView, depth: &TextureView) {
        let mut rpass = encoder.begin_render_pass(&RenderPassDescriptor {
            label: Some("CubePass"),
            color_attachments: &[Some(RenderPassColorAttachment {
                view: color,
                resolve_target: None,
                ops: Operations {
                    load: LoadOp::Clear(CLEAR_COLOR),
                    store: StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth,
                depth_ops: Some(Operations {
                    load: LoadOp::Clear(1.0),
                    store: StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.vertex_buf.slice(..));
        rpass.set_index_buffer(self.index_buf.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..self.index_count, 0, 0..1);
    }

    /// Free the GPU buffers now instead of whenever the device gets to it.
    pub fn release(self) {
        self.vertex_buf.destroy();
        self.index_buf.destroy();
        self.uniform_buf.destroy();
        log::debug!("Cube buffers released");
    }
}

/// Depth texture view of the given size.
pub fn create_depth_view(device: &Device, width: u32, height: u32) -> TextureView {
    let tex = device.create_texture(&TextureDescriptor {
        label: Some("DepthTex"),
        size: Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    tex.create_view(&TextureViewDescriptor::default())
}
