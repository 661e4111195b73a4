//! # Particle Effects
//!
//! CPU particle simulation for the Embers demo. Particles live in a normalized
//! 2D simulation space and are turned into one batched triangle list per frame.
//!
//! ## Architecture
//!
//! - [`Particle`] - a single point-sprite with kinematic, visual and lifecycle state.
//!   Per-effect behavior is carried by [`ParticleKind`].
//! - [`EmitterCore`] - the capacity-bounded particle pool every emitter owns,
//!   together with its position, active flag and random source.
//! - [`ParticleEmitter`] - the object-safe emitter interface driven by the system.
//!   Implemented by [`FireEmitter`], [`ElectricSparkEmitter`],
//!   [`ShootingStarEmitter`] and [`SnowEmitter`].
//! - [`ParticleSystem`] - updates shared emitters and batches their live
//!   particles into [`ParticleVertex`] quads for a [`ParticleBatchTarget`].
//!
//! ## Usage
//!
//! ```no_run
//! use embers::particles::{shared, EmitterRng, FireEmitter, FireSettings, ParticleEmitter, ParticleSystem};
//! use cgmath::Vector2;
//!
//! let fire = shared(FireEmitter::new(150, FireSettings::default(), EmitterRng::seeded(7)));
//! fire.borrow_mut().set_position(Vector2::new(0.0, -0.6));
//!
//! let mut system = ParticleSystem::new();
//! system.add_emitter(fire.clone());
//! system.update(1.0 / 60.0);
//! ```

pub mod electric_spark;
pub mod emitter;
pub mod fire;
pub mod particle;
pub mod shooting_star;
pub mod snow;
pub mod system;
pub mod vertex;

use cgmath::{Vector2, Vector4};
use std::cell::RefCell;
use std::rc::Rc;

/// 2D vector in simulation space
pub type Vec2 = Vector2<f32>;

/// Linear RGBA color
pub type Color = Vector4<f32>;

/// Builds a [`Color`] in const context
pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Color {
    Color { x: r, y: g, z: b, w: a }
}

// Re-export main types
pub use electric_spark::{ElectricSparkEmitter, SparkSettings};
pub use emitter::{EmitterCore, EmitterRng, ParticleEmitter, ParticleFactory};
pub use fire::{FireEmitter, FireSettings};
pub use particle::{Particle, ParticleKind};
pub use shooting_star::{ShootingStarEmitter, StarHead, StarSettings};
pub use snow::{SnowEmitter, SnowSettings};
pub use system::{ParticleSystem, SharedEmitter};
pub use vertex::{build_particle_vertices, ParticleBatchTarget, ParticleVertex};

/// Wraps an emitter for sharing between the system and the code that tunes it
pub fn shared<E: ParticleEmitter>(emitter: E) -> Rc<RefCell<E>> {
    Rc::new(RefCell::new(emitter))
}
