// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! Handles the particle pipeline, GPU buffer management, and frame rendering.

pub mod particle_renderer;
pub mod render_engine;

// Re-export main types
pub use particle_renderer::ParticleRenderer;
pub use render_engine::RenderEngine;
