//! # Graphics Module
//!
//! GPU side of Embers: the wgpu render engine and the particle batch renderer.
//!
//! ## Architecture Overview
//!
//! - **Render Engine** ([`RenderEngine`]) - surface, device and frame submission
//! - **Particle Renderer** ([`ParticleRenderer`]) - alpha-blended triangle-list
//!   pipeline fed by the CPU particle system
//!
//! ```no_run
//! // The render engine is created by EmbersApp once the window exists
//! // let engine = pollster::block_on(RenderEngine::new(window, width, height, true))?;
//! // demo.render(engine.particle_renderer_mut());
//! // engine.render_frame(None::<fn(&_, &_, &mut _, &_) -> Result<(), _>>)?;
//! ```

pub mod rendering;

// Re-export commonly used types
pub use rendering::particle_renderer::ParticleRenderer;
pub use rendering::render_engine::RenderEngine;
