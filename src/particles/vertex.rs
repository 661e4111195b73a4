//! # Particle Vertex Data
//!
//! Every live particle becomes one camera-facing quad expanded on the CPU into
//! two triangles. The whole frame is submitted as a single triangle list.

use wgpu::{BufferAddress, VertexAttribute, VertexBufferLayout, VertexFormat, VertexStepMode};

use super::particle::Particle;

/// Vertices emitted per particle quad
pub const VERTICES_PER_PARTICLE: usize = 6;

/// A colored vertex in simulation space.
///
/// `#[repr(C)]` keeps the layout GPU compatible so a slice of vertices can be
/// uploaded with [`bytemuck::cast_slice`].
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleVertex {
    /// Position [x, y, z], z is always 0
    pub position: [f32; 3],
    /// Linear RGBA color
    pub color: [f32; 4],
}

impl ParticleVertex {
    const ATTRIBUTES: [VertexAttribute; 2] = [
        VertexAttribute {
            offset: 0,
            shader_location: 0,
            format: VertexFormat::Float32x3,
        },
        VertexAttribute {
            offset: std::mem::size_of::<[f32; 3]>() as BufferAddress,
            shader_location: 1,
            format: VertexFormat::Float32x4,
        },
    ];

    /// Vertex buffer layout: position at location 0, color at location 1
    pub fn desc<'a>() -> VertexBufferLayout<'a> {
        VertexBufferLayout {
            array_stride: std::mem::size_of::<ParticleVertex>() as BufferAddress,
            step_mode: VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Anything that can draw a batch of particle triangles
///
/// The GPU renderer implements this; tests substitute a recorder.
pub trait ParticleBatchTarget {
    /// Draws `vertices` as a triangle list in one call
    fn draw_triangle_list(&mut self, vertices: &[ParticleVertex]);
}

/// Appends the two triangles of `particle`'s rotated quad
///
/// Corner order is bottom-left, bottom-right, top-left, then bottom-right,
/// top-right, top-left.
pub fn append_particle_quad(vertices: &mut Vec<ParticleVertex>, particle: &Particle) {
    let half = particle.size() * 0.5;
    let (sin, cos) = particle.rotation().sin_cos();
    let center = particle.position();
    let color: [f32; 4] = particle.color().into();

    let corner = |x: f32, y: f32| ParticleVertex {
        position: [
            center.x + x * cos - y * sin,
            center.y + x * sin + y * cos,
            0.0,
        ],
        color,
    };

    let bottom_left = corner(-half, -half);
    let bottom_right = corner(half, -half);
    let top_left = corner(-half, half);
    let top_right = corner(half, half);

    vertices.extend_from_slice(&[
        bottom_left,
        bottom_right,
        top_left,
        bottom_right,
        top_right,
        top_left,
    ]);
}

/// Builds the triangle list for every live, active particle
pub fn build_particle_vertices<'a, I>(particles: I) -> Vec<ParticleVertex>
where
    I: IntoIterator<Item = &'a Particle>,
{
    let mut vertices = Vec::new();
    extend_particle_vertices(&mut vertices, particles);
    vertices
}

/// Like [`build_particle_vertices`] but appends into an existing buffer
pub fn extend_particle_vertices<'a, I>(vertices: &mut Vec<ParticleVertex>, particles: I)
where
    I: IntoIterator<Item = &'a Particle>,
{
    for particle in particles {
        if particle.is_active() && !particle.is_dead() {
            append_particle_quad(vertices, particle);
        }
    }
}
