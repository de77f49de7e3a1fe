use crate::shaders;
use crate::tessellate::{ColorVertex, Tessellation};
use bytemuck::{Pod, Zeroable};
use framelab_common::{OrthoCamera, Rgba};
use glam::Mat4;
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
}

/// Smallest vertex buffer allocated, in vertices.
const MIN_VERTEX_CAPACITY: usize = 1024;

/// Capacity to allocate for `needed` vertices: the next power of two, at least
/// [`MIN_VERTEX_CAPACITY`].
fn grown_capacity(needed: usize) -> usize {
    needed.max(MIN_VERTEX_CAPACITY).next_power_of_two()
}

/// Vertex buffer reused across frames. Grows on demand and skips the upload
/// when the vertices match what the GPU already holds.
struct VertexBuffer {
    label: &'static str,
    buffer: Option<wgpu::Buffer>,
    capacity: usize,
    uploaded: Vec<ColorVertex>,
}

impl VertexBuffer {
    fn new(label: &'static str) -> Self {
        Self {
            label,
            buffer: None,
            capacity: 0,
            uploaded: Vec::new(),
        }
    }

    /// Make `vertices` resident and return the buffer to draw from, if any.
    fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        vertices: &[ColorVertex],
    ) -> Option<&wgpu::Buffer> {
        if vertices.is_empty() {
            return None;
        }
        if self.buffer.is_none() || vertices.len() > self.capacity {
            self.capacity = grown_capacity(vertices.len());
            self.buffer = Some(device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(self.label),
                size: (self.capacity * std::mem::size_of::<ColorVertex>()) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.uploaded.clear();
            tracing::debug!(label = self.label, capacity = self.capacity, "vertex buffer grown");
        }
        let buffer = self.buffer.as_ref()?;
        if self.uploaded != vertices {
            queue.write_buffer(buffer, 0, bytemuck::cast_slice(vertices));
            self.uploaded.clear();
            self.uploaded.extend_from_slice(vertices);
        }
        Some(buffer)
    }
}

/// wgpu-based 2D renderer for tessellated draw lists.
///
/// Text runs are not drawn here; the caller paints them in an overlay.
pub struct WgpuRenderer {
    line_pipeline: wgpu::RenderPipeline,
    triangle_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    triangle_vertices: VertexBuffer,
    line_vertices: VertexBuffer,
    surface_format: wgpu::TextureFormat,
}

fn shape_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    surface_format: wgpu::TextureFormat,
    topology: wgpu::PrimitiveTopology,
    label: &str,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_shape"),
            compilation_options: Default::default(),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<ColorVertex>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &wgpu::vertex_attr_array![
                    0 => Float32x2,
                    1 => Float32x4,
                ],
            }],
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_shape"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: Default::default(),
        multiview: None,
        cache: None,
    })
}

impl WgpuRenderer {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("uniform_buffer"),
            contents: bytemuck::bytes_of(&Uniforms {
                view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniform_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shape_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::SHAPE_SHADER.into()),
        });

        let line_pipeline = shape_pipeline(
            device,
            &pipeline_layout,
            &shader,
            surface_format,
            wgpu::PrimitiveTopology::LineList,
            "line_pipeline",
        );
        let triangle_pipeline = shape_pipeline(
            device,
            &pipeline_layout,
            &shader,
            surface_format,
            wgpu::PrimitiveTopology::TriangleList,
            "triangle_pipeline",
        );

        Self {
            line_pipeline,
            triangle_pipeline,
            uniform_buffer,
            uniform_bind_group,
            triangle_vertices: VertexBuffer::new("triangle_vertex_buffer"),
            line_vertices: VertexBuffer::new("line_vertex_buffer"),
            surface_format,
        }
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// Render one frame: clear, sprites, then wireframes on top.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        clear_color: Rgba,
        camera: &OrthoCamera,
        geometry: &Tessellation,
    ) {
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms {
                view_proj: camera.combined().to_cols_array_2d(),
            }),
        );

        let triangles = self
            .triangle_vertices
            .upload(device, queue, &geometry.triangles);
        let lines = self.line_vertices.upload(device, queue, &geometry.lines);

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: clear_color.r as f64,
                            g: clear_color.g as f64,
                            b: clear_color.b as f64,
                            a: clear_color.a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            pass.set_bind_group(0, &self.uniform_bind_group, &[]);

            if let Some(buffer) = &triangles {
                pass.set_pipeline(&self.triangle_pipeline);
                pass.set_vertex_buffer(0, buffer.slice(..));
                pass.draw(0..geometry.triangles.len() as u32, 0..1);
            }

            if let Some(buffer) = &lines {
                pass.set_pipeline(&self.line_pipeline);
                pass.set_vertex_buffer(0, buffer.slice(..));
                pass.draw(0..geometry.lines.len() as u32, 0..1);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
        tracing::trace!(
            lines = geometry.lines.len() / 2,
            triangles = geometry.triangles.len() / 3,
            "frame submitted"
        );
    }
}
