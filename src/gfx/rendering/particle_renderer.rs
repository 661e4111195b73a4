//! GPU particle batch renderer
//!
//! Uploads the frame's particle triangle list into a growable vertex buffer
//! and draws it with one alpha-blended call, no depth test.

use std::sync::Arc;
use wgpu::*;

use crate::particles::{ParticleBatchTarget, ParticleVertex};

/// Vertices the buffer holds before its first growth
const INITIAL_VERTEX_CAPACITY: usize = 1024;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct ViewUniform {
    aspect: f32,
    _padding: [f32; 3],
}

impl ViewUniform {
    fn new(aspect: f32) -> Self {
        Self {
            aspect,
            _padding: [0.0; 3],
        }
    }
}

/// Draws particle batches into the current color target
pub struct ParticleRenderer {
    device: Arc<Device>,
    queue: Arc<Queue>,
    pipeline: RenderPipeline,
    view_buffer: Buffer,
    view_bind_group: BindGroup,
    vertex_buffer: Buffer,
    vertex_capacity: usize,
    vertex_count: u32,
    draw_calls: u32,
}

impl ParticleRenderer {
    pub fn new(device: Arc<Device>, queue: Arc<Queue>, surface_format: TextureFormat) -> Self {
        let shader = device.create_shader_module(ShaderModuleDescriptor {
            label: Some("Particle Shader"),
            source: ShaderSource::Wgsl(include_str!("shaders/particle.wgsl").into()),
        });

        let view_buffer = device.create_buffer(&BufferDescriptor {
            label: Some("Particle View Buffer"),
            size: std::mem::size_of::<ViewUniform>() as BufferAddress,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        queue.write_buffer(&view_buffer, 0, bytemuck::cast_slice(&[ViewUniform::new(1.0)]));

        let view_bind_group_layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("Particle View Layout"),
            entries: &[BindGroupLayoutEntry {
                binding: 0,
                visibility: ShaderStages::VERTEX,
                ty: BindingType::Buffer {
                    ty: BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let view_bind_group = device.create_bind_group(&BindGroupDescriptor {
            label: Some("Particle View Bind Group"),
            layout: &view_bind_group_layout,
            entries: &[BindGroupEntry {
                binding: 0,
                resource: view_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("Particle Pipeline Layout"),
            bind_group_layouts: &[&view_bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some("Particle Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[ParticleVertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(ColorTargetState {
                    format: surface_format,
                    blend: Some(BlendState::ALPHA_BLENDING),
                    write_mask: ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: PrimitiveState {
                topology: PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: FrontFace::Ccw,
                // Rotated quads may flip winding
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: None,
            multisample: MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let vertex_buffer = Self::create_vertex_buffer(&device, INITIAL_VERTEX_CAPACITY);

        Self {
            device,
            queue,
            pipeline,
            view_buffer,
            view_bind_group,
            vertex_buffer,
            vertex_capacity: INITIAL_VERTEX_CAPACITY,
            vertex_count: 0,
            draw_calls: 0,
        }
    }

    fn create_vertex_buffer(device: &Device, capacity: usize) -> Buffer {
        device.create_buffer(&BufferDescriptor {
            label: Some("Particle Vertex Buffer"),
            size: (capacity * std::mem::size_of::<ParticleVertex>()) as BufferAddress,
            usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Width over height of the render target
    pub fn set_aspect(&self, aspect: f32) {
        self.queue
            .write_buffer(&self.view_buffer, 0, bytemuck::cast_slice(&[ViewUniform::new(aspect)]));
    }

    /// Forgets the previous frame's batch
    pub fn begin_frame(&mut self) {
        self.vertex_count = 0;
        self.draw_calls = 0;
    }

    /// Records the uploaded batch into `render_pass`
    pub fn record(&self, render_pass: &mut RenderPass<'_>) {
        if self.vertex_count == 0 {
            return;
        }

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.view_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.draw(0..self.vertex_count, 0..1);
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn draw_calls(&self) -> u32 {
        self.draw_calls
    }

    pub fn vertex_capacity(&self) -> usize {
        self.vertex_capacity
    }
}

impl ParticleBatchTarget for ParticleRenderer {
    fn draw_triangle_list(&mut self, vertices: &[ParticleVertex]) {
        let capacity = grown_capacity(self.vertex_capacity, vertices.len());
        if capacity != self.vertex_capacity {
            log::debug!(
                "Growing particle vertex buffer from {} to {} vertices",
                self.vertex_capacity,
                capacity
            );
            self.vertex_buffer = Self::create_vertex_buffer(&self.device, capacity);
            self.vertex_capacity = capacity;
        }

        self.queue
            .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(vertices));
        self.vertex_count = vertices.len() as u32;
        self.draw_calls = 1;
    }
}

/// Capacity able to hold `needed` vertices, growing to the next power of two
fn grown_capacity(current: usize, needed: usize) -> usize {
    if needed <= current {
        current
    } else {
        needed.next_power_of_two()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_only_grows_when_needed() {
        assert_eq!(grown_capacity(1024, 600), 1024);
        assert_eq!(grown_capacity(1024, 1024), 1024);
        assert_eq!(grown_capacity(1024, 1025), 2048);
        assert_eq!(grown_capacity(1024, 5000), 8192);
    }

    #[test]
    fn test_view_uniform_is_16_bytes() {
        assert_eq!(std::mem::size_of::<ViewUniform>(), 16);
    }
}
