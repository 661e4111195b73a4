//! Particle system
//!
//! Drives a set of shared emitters and batches their particles into a single
//! draw per frame.

use std::cell::RefCell;
use std::rc::Rc;

use super::emitter::ParticleEmitter;
use super::vertex::{extend_particle_vertices, ParticleBatchTarget, ParticleVertex, VERTICES_PER_PARTICLE};

/// Emitter handle shared between the system and whoever tunes it
pub type SharedEmitter = Rc<RefCell<dyn ParticleEmitter>>;

/// Frames between render statistics log lines
const STATS_LOG_INTERVAL: u64 = 60;

/// Owns the emitter list and the per-frame vertex batch
pub struct ParticleSystem {
    emitters: Vec<SharedEmitter>,
    vertices: Vec<ParticleVertex>,
    rendered_frames: u64,
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self {
            emitters: Vec::new(),
            vertices: Vec::new(),
            rendered_frames: 0,
        }
    }

    /// Adds an emitter; it is updated after every emitter already present
    pub fn add_emitter(&mut self, emitter: SharedEmitter) {
        log::debug!("Adding emitter '{}'", emitter.borrow().name());
        self.emitters.push(emitter);
    }

    /// Removes the emitter sharing `emitter`'s allocation
    ///
    /// Returns whether one was removed.
    pub fn remove_emitter(&mut self, emitter: &SharedEmitter) -> bool {
        let before = self.emitters.len();
        self.emitters.retain(|existing| !Rc::ptr_eq(existing, emitter));
        before != self.emitters.len()
    }

    pub fn clear_emitters(&mut self) {
        self.emitters.clear();
    }

    pub fn emitters(&self) -> &[SharedEmitter] {
        &self.emitters
    }

    /// Updates every emitter in insertion order
    pub fn update(&mut self, delta_time: f32) {
        for emitter in &self.emitters {
            emitter.borrow_mut().update(delta_time);
        }
    }

    /// Rebuilds the frame's triangle list from every emitter
    pub fn build_vertices(&mut self) -> &[ParticleVertex] {
        self.vertices.clear();
        for emitter in &self.emitters {
            let emitter = emitter.borrow();
            extend_particle_vertices(&mut self.vertices, emitter.particles());
        }
        &self.vertices
    }

    /// Submits the current particles to `target` as one batch
    ///
    /// Returns the number of vertices drawn; an empty frame issues no draw.
    pub fn render(&mut self, target: &mut dyn ParticleBatchTarget) -> usize {
        self.build_vertices();
        self.rendered_frames += 1;

        let vertex_count = self.vertices.len();
        if self.rendered_frames % STATS_LOG_INTERVAL == 0 {
            log::debug!(
                "Particle batch: {} vertices, {} particles across {} emitters",
                vertex_count,
                vertex_count / VERTICES_PER_PARTICLE,
                self.emitters.len()
            );
        }

        if vertex_count == 0 {
            return 0;
        }

        target.draw_triangle_list(&self.vertices);
        vertex_count
    }

    /// Number of pooled particles across all emitters
    pub fn active_particle_count(&self) -> usize {
        self.emitters
            .iter()
            .map(|emitter| emitter.borrow().particles().len())
            .sum()
    }
}
