//! Emitter pool, spawn plumbing and the emitter interface
//!
//! Every emitter owns an [`EmitterCore`]: a dense, capacity-bounded pool of
//! particles plus the emitter position, active flag and random source. The
//! variant-specific part of spawning lives behind [`ParticleFactory`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

use super::particle::Particle;
use super::Vec2;

/// Seedable random source owned by one emitter
///
/// Emitters receive their random source at construction so tests can pin the
/// sequence with [`EmitterRng::seeded`].
#[derive(Clone, Debug)]
pub struct EmitterRng {
    rng: StdRng,
}

impl EmitterRng {
    /// Deterministic source for tests and reproducible demos
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Source seeded from the operating system
    pub fn from_os() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Seeded when `seed` is given, OS entropy otherwise
    pub fn from_seed_or_os(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_os(),
        }
    }

    /// Derives an independent source, used to hand one seed to several emitters
    pub fn fork(&mut self) -> Self {
        Self::seeded(self.rng.random())
    }

    /// Uniform float in `[min, max)`; also accepts `min > max`
    pub fn random_float(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.rng.random::<f32>()
    }

    /// Unit vector at a uniform random angle in `[0, 2π)`
    pub fn random_direction(&mut self) -> Vec2 {
        let angle = self.random_float(0.0, TAU);
        Vec2::new(angle.cos(), angle.sin())
    }
}

impl Default for EmitterRng {
    fn default() -> Self {
        Self::from_os()
    }
}

/// Variant-specific particle construction
pub trait ParticleFactory {
    /// Builds an inactive particle with effect defaults
    fn create_particle(&self) -> Particle;

    /// Samples per-particle parameters and arms the particle at `emit_position`
    fn initialize_particle(&mut self, particle: &mut Particle, emit_position: Vec2, rng: &mut EmitterRng);
}

/// Particle pool shared by every emitter kind
///
/// Particles are kept in spawn order in a vector reserved up front for
/// `max_particles`. Dead particles are compacted out after each update.
#[derive(Debug)]
pub struct EmitterCore {
    particles: Vec<Particle>,
    max_particles: usize,
    position: Vec2,
    active: bool,
    rng: EmitterRng,
}

impl EmitterCore {
    pub fn new(max_particles: usize, rng: EmitterRng) -> Self {
        Self {
            particles: Vec::with_capacity(max_particles),
            max_particles,
            position: Vec2::new(0.0, 0.0),
            active: true,
            rng,
        }
    }

    /// Advances every live particle, then prunes the dead ones
    pub fn update(&mut self, delta_time: f32) {
        for particle in &mut self.particles {
            if particle.is_active() {
                particle.update(delta_time);
            }
        }

        self.particles.retain(|particle| !particle.is_dead());
    }

    /// Spawns up to `count` particles unless the emitter is inactive
    ///
    /// Returns how many particles were actually added.
    pub fn emit<F>(&mut self, factory: &mut F, position: Vec2, count: usize) -> usize
    where
        F: ParticleFactory + ?Sized,
    {
        if !self.active {
            return 0;
        }

        let mut spawned = 0;
        for _ in 0..count {
            if self.particles.len() >= self.max_particles {
                break;
            }

            let mut particle = factory.create_particle();
            factory.initialize_particle(&mut particle, position, &mut self.rng);
            self.particles.push(particle);
            spawned += 1;
        }
        spawned
    }

    /// Drops every pooled particle immediately
    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.particles.len() >= self.max_particles
    }

    pub fn max_particles(&self) -> usize {
        self.max_particles
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn rng_mut(&mut self) -> &mut EmitterRng {
        &mut self.rng
    }
}

/// Interface the particle system drives every frame
///
/// Implementors expose their [`EmitterCore`]; the pool accessors are provided.
pub trait ParticleEmitter {
    /// Display name for diagnostics
    fn name(&self) -> &str;

    /// Ages and prunes the pool, then applies the emitter's spawn policy
    fn update(&mut self, delta_time: f32);

    /// Spawns up to `count` particles at `position`, returns how many were added
    fn emit(&mut self, position: Vec2, count: usize) -> usize;

    fn core(&self) -> &EmitterCore;

    fn core_mut(&mut self) -> &mut EmitterCore;

    /// Read-only view of the live pool
    fn particles(&self) -> &[Particle] {
        self.core().particles()
    }

    fn is_active(&self) -> bool {
        self.core().is_active()
    }

    /// Gates new spawns; particles already in flight keep aging
    fn set_active(&mut self, active: bool) {
        self.core_mut().set_active(active);
    }

    fn position(&self) -> Vec2 {
        self.core().position()
    }

    fn set_position(&mut self, position: Vec2) {
        self.core_mut().set_position(position);
    }

    fn max_particles(&self) -> usize {
        self.core().max_particles()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::InnerSpace;

    /// Counts spawns and tags each particle with its spawn order through its size
    struct CountingFactory {
        lifetime: f32,
        spawned: usize,
    }

    impl ParticleFactory for CountingFactory {
        fn create_particle(&self) -> Particle {
            Particle::new()
        }

        fn initialize_particle(&mut self, particle: &mut Particle, emit_position: Vec2, _rng: &mut EmitterRng) {
            particle.set_lifetime(self.lifetime);
            particle.set_size_range(self.spawned as f32, self.spawned as f32);
            particle.reset(emit_position, Vec2::new(0.0, 0.0));
            self.spawned += 1;
        }
    }

    fn factory(lifetime: f32) -> CountingFactory {
        CountingFactory { lifetime, spawned: 0 }
    }

    #[test]
    fn test_emit_respects_capacity() {
        let mut core = EmitterCore::new(5, EmitterRng::seeded(1));
        let mut factory = factory(1.0);

        assert_eq!(core.emit(&mut factory, Vec2::new(0.0, 0.0), 3), 3);
        assert_eq!(core.emit(&mut factory, Vec2::new(0.0, 0.0), 3), 2);
        assert_eq!(core.emit(&mut factory, Vec2::new(0.0, 0.0), 3), 0);
        assert_eq!(core.len(), 5);
        assert!(core.is_full());
    }

    #[test]
    fn test_inactive_emitter_does_not_spawn() {
        let mut core = EmitterCore::new(10, EmitterRng::seeded(1));
        core.set_active(false);

        assert_eq!(core.emit(&mut factory(1.0), Vec2::new(0.0, 0.0), 4), 0);
        assert!(core.is_empty());
    }

    #[test]
    fn test_inactive_emitter_still_ages_particles() {
        let mut core = EmitterCore::new(10, EmitterRng::seeded(1));
        core.emit(&mut factory(0.5), Vec2::new(0.0, 0.0), 4);
        core.set_active(false);

        core.update(0.25);
        assert_eq!(core.len(), 4);
        assert!(core.particles().iter().all(|p| p.life() < 0.5));

        core.update(0.5);
        assert!(core.is_empty());
    }

    #[test]
    fn test_update_prunes_dead_and_keeps_survivor_order() {
        let mut core = EmitterCore::new(10, EmitterRng::seeded(1));
        let mut short = factory(0.1);
        let mut long = factory(5.0);
        long.spawned = 100;

        core.emit(&mut long, Vec2::new(0.0, 0.0), 1);
        core.emit(&mut short, Vec2::new(0.0, 0.0), 2);
        core.emit(&mut long, Vec2::new(0.0, 0.0), 2);

        core.update(0.2);

        assert_eq!(core.len(), 3);
        assert!(core.particles().iter().all(|p| !p.is_dead()));
        let order: Vec<f32> = core.particles().iter().map(|p| p.size_range().0).collect();
        assert_eq!(order, vec![100.0, 101.0, 102.0]);
    }

    #[test]
    fn test_capacity_holds_across_emit_and_update() {
        let mut core = EmitterCore::new(8, EmitterRng::seeded(3));
        let mut factory = factory(0.3);

        for _ in 0..40 {
            core.emit(&mut factory, Vec2::new(0.0, 0.0), 3);
            assert!(core.len() <= core.max_particles());
            core.update(0.05);
            assert!(core.len() <= core.max_particles());
        }
    }

    #[test]
    fn test_clear_empties_pool() {
        let mut core = EmitterCore::new(4, EmitterRng::seeded(1));
        core.emit(&mut factory(1.0), Vec2::new(0.0, 0.0), 4);
        core.clear();
        assert!(core.is_empty());
    }

    #[test]
    fn test_random_direction_is_unit_length() {
        let mut rng = EmitterRng::seeded(42);
        for _ in 0..100 {
            let direction = rng.random_direction();
            assert!((direction.magnitude() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_random_float_stays_in_range() {
        let mut rng = EmitterRng::seeded(9);
        for _ in 0..200 {
            let value = rng.random_float(-0.5, 2.0);
            assert!((-0.5..2.0).contains(&value));
        }
    }

    #[test]
    fn test_seeded_sources_repeat() {
        let mut a = EmitterRng::seeded(5);
        let mut b = EmitterRng::seeded(5);
        for _ in 0..10 {
            assert_eq!(a.random_float(0.0, 1.0), b.random_float(0.0, 1.0));
        }
    }
}
