//! Shooting star effect
//!
//! A single moving head that is not part of the pool. While it lives it drops
//! sparkling trail particles behind it, which shrink along the trail and sag
//! slightly as they fade.

use cgmath::{InnerSpace, Zero};

use super::emitter::{EmitterCore, EmitterRng, ParticleEmitter, ParticleFactory};
use super::particle::{Particle, ParticleKind};
use super::{rgba, Color, Vec2};

const TRAIL_START: Color = rgba(1.0, 1.0, 0.8, 1.0);
const TRAIL_END: Color = rgba(0.4, 0.6, 1.0, 0.0);

/// Trail-only particle state
#[derive(Clone, Debug, PartialEq)]
pub struct TrailParticle {
    /// Spawn order along the current trail
    pub trail_index: u32,
    pub sparkle: f32,
}

impl Default for TrailParticle {
    fn default() -> Self {
        Self {
            trail_index: 0,
            sparkle: 1.0,
        }
    }
}

impl TrailParticle {
    pub(crate) fn apply(&mut self, particle: &mut Particle, delta_time: f32) {
        let life_ratio = particle.life_ratio();

        self.sparkle = 0.5 + 0.5 * (particle.life * 20.0).sin();
        particle.color.w = particle.start_color.w * life_ratio * (0.7 + 0.3 * self.sparkle);
        particle.velocity.y -= (1.0 - life_ratio) * 0.1 * delta_time;
    }

    pub(crate) fn rearm(&mut self) {
        self.sparkle = 1.0;
    }
}

impl Particle {
    /// Inactive trail particle with trail defaults
    pub fn star_trail() -> Self {
        let mut particle = Particle::with_kind(ParticleKind::StarTrail(TrailParticle::default()));
        particle.max_life = 1.0;
        particle.life = 1.0;
        particle.fade_speed = 2.0;
        particle.start_color = TRAIL_START;
        particle.end_color = TRAIL_END;
        particle.color = TRAIL_START;
        particle.start_size = 0.06;
        particle.end_size = 0.01;
        particle.size = 0.06;
        particle
    }
}

/// The star itself
#[derive(Clone, Debug, PartialEq)]
pub struct StarHead {
    pub position: Vec2,
    pub velocity: Vec2,
    pub active: bool,
    pub life: f32,
    pub max_life: f32,
}

impl StarHead {
    pub const DEFAULT_LIFETIME: f32 = 2.0;

    /// Remaining life as a fraction of the total
    pub fn life_ratio(&self) -> f32 {
        if self.max_life > 0.0 {
            (self.life / self.max_life).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

impl Default for StarHead {
    fn default() -> Self {
        Self {
            position: Vec2::zero(),
            velocity: Vec2::zero(),
            active: false,
            life: 0.0,
            max_life: Self::DEFAULT_LIFETIME,
        }
    }
}

/// Tuning for the shooting star emitter
#[derive(Clone, Debug, PartialEq)]
pub struct StarSettings {
    /// Period of the size taper along the trail, at least 1
    pub trail_length: u32,
    pub star_size: f32,
    /// Seconds between trail drops
    pub trail_emission_rate: f32,
    pub particles_per_emission: usize,
}

impl Default for StarSettings {
    fn default() -> Self {
        Self {
            trail_length: 10,
            star_size: 0.08,
            trail_emission_rate: 0.005,
            particles_per_emission: 3,
        }
    }
}

impl StarSettings {
    pub fn with_trail_length(mut self, length: u32) -> Self {
        self.trail_length = length.max(1);
        self
    }

    pub fn with_star_size(mut self, size: f32) -> Self {
        self.star_size = size;
        self
    }

    pub fn with_trail_emission_rate(mut self, seconds: f32) -> Self {
        self.trail_emission_rate = seconds;
        self
    }

    pub fn with_particles_per_emission(mut self, count: usize) -> Self {
        self.particles_per_emission = count;
        self
    }
}

/// Spawns trail particles relative to the current head
struct TrailFactory<'a> {
    head: &'a StarHead,
    settings: &'a StarSettings,
    next_index: &'a mut u32,
}

impl ParticleFactory for TrailFactory<'_> {
    fn create_particle(&self) -> Particle {
        Particle::star_trail()
    }

    fn initialize_particle(&mut self, particle: &mut Particle, emit_position: Vec2, rng: &mut EmitterRng) {
        let offset = rng.random_direction() * rng.random_float(0.0, 0.02);

        let perpendicular = Vec2::new(-self.head.velocity.y, self.head.velocity.x);
        let perpendicular = if perpendicular.magnitude2() > 0.0 {
            perpendicular.normalize()
        } else {
            perpendicular
        };
        let velocity =
            self.head.velocity * rng.random_float(0.05, 0.15) + perpendicular * rng.random_float(-0.1, 0.1);

        // Later trail drops live shorter as the head burns out
        let age_factor = 1.0 - 0.5 * (1.0 - self.head.life_ratio());
        particle.set_lifetime(rng.random_float(0.5, 1.2) * age_factor);
        particle.reset(emit_position + offset, velocity);

        let trail_index = *self.next_index;
        *self.next_index = self.next_index.wrapping_add(1);

        let trail_length = self.settings.trail_length.max(1);
        let size_factor = 1.0 - (trail_index % trail_length) as f32 / trail_length as f32;
        let start_size = self.settings.star_size * rng.random_float(0.6, 1.0) * size_factor;
        particle.set_size_range(start_size, start_size * 0.1);
        particle.set_rotation_speed(rng.random_float(-1.0, 1.0));

        if let ParticleKind::StarTrail(trail) = particle.kind_mut() {
            trail.trail_index = trail_index;
        }
    }
}

/// Emitter for one shooting star at a time
#[derive(Debug)]
pub struct ShootingStarEmitter {
    core: EmitterCore,
    settings: StarSettings,
    head: StarHead,
    trail_timer: f32,
    next_trail_index: u32,
}

impl ShootingStarEmitter {
    pub const DEFAULT_CAPACITY: usize = 50;

    pub fn new(max_particles: usize, settings: StarSettings, rng: EmitterRng) -> Self {
        log::info!(
            "Creating shooting star emitter (capacity {}, trail length {})",
            max_particles,
            settings.trail_length
        );
        Self {
            core: EmitterCore::new(max_particles, rng),
            settings,
            head: StarHead::default(),
            trail_timer: 0.0,
            next_trail_index: 0,
        }
    }

    /// Launches a new star, discarding any trail still in flight
    pub fn launch_star(&mut self, start: Vec2, direction: Vec2, speed: f32) {
        let direction = if direction.magnitude2() > 0.0 {
            direction.normalize()
        } else {
            Vec2::zero()
        };

        self.head.position = start;
        self.head.velocity = direction * speed;
        self.head.life = self.head.max_life;
        self.head.active = true;

        self.trail_timer = 0.0;
        self.next_trail_index = 0;
        self.core.clear();

        log::debug!(
            "Launching shooting star from ({:.2}, {:.2}) at speed {:.2}",
            start.x,
            start.y,
            speed
        );
    }

    pub fn head(&self) -> &StarHead {
        &self.head
    }

    pub fn is_star_active(&self) -> bool {
        self.head.active
    }

    pub fn settings(&self) -> &StarSettings {
        &self.settings
    }

    pub fn set_trail_length(&mut self, length: u32) {
        self.settings.trail_length = length.max(1);
    }

    pub fn set_star_size(&mut self, size: f32) {
        self.settings.star_size = size;
    }

    fn emit_trail(&mut self, position: Vec2, count: usize) -> usize {
        let mut factory = TrailFactory {
            head: &self.head,
            settings: &self.settings,
            next_index: &mut self.next_trail_index,
        };
        self.core.emit(&mut factory, position, count)
    }
}

impl ParticleEmitter for ShootingStarEmitter {
    fn name(&self) -> &str {
        "Shooting Star"
    }

    fn update(&mut self, delta_time: f32) {
        self.core.update(delta_time);

        if !self.head.active {
            return;
        }

        self.head.life -= delta_time;
        if self.head.life <= 0.0 {
            self.head.life = 0.0;
            self.head.active = false;
            return;
        }

        self.head.position += self.head.velocity * delta_time;

        if self.settings.trail_emission_rate <= 0.0 {
            return;
        }

        self.trail_timer += delta_time;
        let position = self.head.position;
        let count = self.settings.particles_per_emission;
        while self.trail_timer >= self.settings.trail_emission_rate {
            self.trail_timer -= self.settings.trail_emission_rate;
            self.emit_trail(position, count);
        }
    }

    fn emit(&mut self, position: Vec2, count: usize) -> usize {
        self.emit_trail(position, count)
    }

    fn core(&self) -> &EmitterCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EmitterCore {
        &mut self.core
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emitter() -> ShootingStarEmitter {
        ShootingStarEmitter::new(
            ShootingStarEmitter::DEFAULT_CAPACITY,
            StarSettings::default(),
            EmitterRng::seeded(33),
        )
    }

    fn trail_index(particle: &Particle) -> u32 {
        match particle.kind() {
            ParticleKind::StarTrail(trail) => trail.trail_index,
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_launch_arms_head_and_clears_pool() {
        let mut star = emitter();
        star.emit(Vec2::new(0.0, 0.0), 10);
        assert_eq!(star.particles().len(), 10);

        star.launch_star(Vec2::new(-0.8, 0.8), Vec2::new(3.0, -1.0), 1.5);

        assert!(star.particles().is_empty());
        assert!(star.head().active);
        assert_eq!(star.head().life, star.head().max_life);
        assert!((star.head().velocity.magnitude() - 1.5).abs() < 1e-5);
    }

    #[test]
    fn test_zero_direction_stays_put() {
        let mut star = emitter();

        star.launch_star(Vec2::new(0.1, 0.2), Vec2::zero(), 2.0);
        star.update(0.1);

        assert_eq!(star.head().velocity, Vec2::zero());
        assert_eq!(star.head().position, Vec2::new(0.1, 0.2));
        assert!(star.particles().iter().all(|p| !p.position().x.is_nan()));
    }

    #[test]
    fn test_head_moves_and_leaves_trail() {
        let mut star = emitter();
        star.launch_star(Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), 1.0);

        star.update(0.012);

        assert!((star.head().position.x - 0.012).abs() < 1e-5);
        assert_eq!(star.particles().len(), 6);
    }

    #[test]
    fn test_head_expires_and_trail_stops() {
        let mut star = emitter();
        star.launch_star(Vec2::new(0.0, 0.0), Vec2::new(1.0, -1.0), 0.5);

        let mut elapsed = 0.0;
        while elapsed < StarHead::DEFAULT_LIFETIME + 0.05 {
            star.update(0.016);
            elapsed += 0.016;
        }
        assert!(!star.head().active);

        let position = star.head().position;
        let before = star.particles().len();
        star.update(0.016);
        assert!(star.particles().len() <= before);
        assert_eq!(star.head().position, position);

        // Leftover trail fades out within its lifetime
        for _ in 0..100 {
            star.update(0.016);
        }
        assert!(star.particles().is_empty());
    }

    #[test]
    fn test_head_expires_in_one_long_tick() {
        let mut star = emitter();
        star.launch_star(Vec2::new(0.0, 0.0), Vec2::new(1.0, -1.0), 0.5);

        star.update(star.head().max_life + 0.01);
        assert!(!star.head().active);
        assert!(star.particles().is_empty());

        star.update(0.1);
        assert!(star.particles().is_empty());
    }

    #[test]
    fn test_trail_indices_increase_in_spawn_order() {
        let mut star = ShootingStarEmitter::new(500, StarSettings::default(), EmitterRng::seeded(4));
        star.launch_star(Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), 1.0);

        star.update(0.05);

        let indices: Vec<u32> = star.particles().iter().map(trail_index).collect();
        assert!(!indices.is_empty());
        assert!(indices.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(indices[0], 0);
    }

    #[test]
    fn test_trail_taper_follows_index() {
        let mut star = ShootingStarEmitter::new(
            500,
            StarSettings::default().with_trail_length(4),
            EmitterRng::seeded(8),
        );
        star.launch_star(Vec2::new(0.0, 0.0), Vec2::new(0.0, 1.0), 1.0);

        star.emit(star.head().position, 8);

        for particle in star.particles() {
            let index = trail_index(particle);
            let factor = 1.0 - (index % 4) as f32 / 4.0;
            let (start, end) = particle.size_range();
            assert!(start <= 0.08 * factor + 1e-6);
            assert!(start >= 0.08 * 0.6 * factor - 1e-6);
            assert!((end - start * 0.1).abs() < 1e-6);
        }
    }

    #[test]
    fn test_trail_length_never_drops_below_one() {
        let mut star = emitter();
        star.set_trail_length(0);
        assert_eq!(star.settings().trail_length, 1);
    }

    #[test]
    fn test_trail_particles_sag_and_fade() {
        let mut particle = Particle::star_trail();
        particle.reset(Vec2::new(0.0, 0.0), Vec2::new(0.0, 0.0));

        particle.update(0.2);

        assert!(particle.velocity().y < 0.0);
        assert!(particle.color().w < 1.0);
    }
}
