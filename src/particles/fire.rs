//! Fire effect
//!
//! A continuously dripping emitter whose particles rise, wobble sideways and
//! cool through a three-band color ramp from white-hot core to dark smoke.

use cgmath::VectorSpace;

use super::emitter::{EmitterCore, EmitterRng, ParticleEmitter, ParticleFactory};
use super::particle::{Particle, ParticleKind};
use super::{rgba, Color, Vec2};

const CORE_WHITE: Color = rgba(1.0, 1.0, 0.9, 1.0);
const FLAME_YELLOW: Color = rgba(1.0, 0.8, 0.2, 1.0);
const FLAME_ORANGE: Color = rgba(1.0, 0.4, 0.1, 0.8);
const SMOKE: Color = rgba(0.1, 0.1, 0.1, 0.0);

/// Flame height the rise speed ranges are tuned for
const REFERENCE_FLAME_HEIGHT: f32 = 0.5;

/// Fire-only particle state
#[derive(Clone, Debug, PartialEq)]
pub struct FireParticle {
    pub turbulence: f32,
    pub rise_speed: f32,
}

impl Default for FireParticle {
    fn default() -> Self {
        Self {
            turbulence: 0.5,
            rise_speed: 0.8,
        }
    }
}

impl FireParticle {
    /// Overrides the values `reset` restores
    pub fn initialize(&mut self, turbulence: f32, rise_speed: f32) {
        self.turbulence = turbulence;
        self.rise_speed = rise_speed;
    }

    pub(crate) fn apply(&mut self, particle: &mut Particle, delta_time: f32) {
        let life_ratio = particle.life_ratio();

        let turbulence_amount = (1.0 - life_ratio) * self.turbulence;
        particle.velocity.x += (particle.life * 10.0).sin() * turbulence_amount * delta_time;
        particle.velocity.y += self.rise_speed * delta_time;

        particle.color = fire_ramp(life_ratio);
    }

    pub(crate) fn rearm(&mut self) {
        *self = Self::default();
    }
}

/// Color of a flame particle at the given life ratio
pub fn fire_ramp(life_ratio: f32) -> Color {
    if life_ratio > 0.7 {
        let t = (life_ratio - 0.7) / 0.3;
        FLAME_YELLOW.lerp(CORE_WHITE, t)
    } else if life_ratio > 0.4 {
        let t = (life_ratio - 0.4) / 0.3;
        FLAME_ORANGE.lerp(FLAME_YELLOW, t)
    } else {
        let t = life_ratio / 0.4;
        SMOKE.lerp(FLAME_ORANGE, t)
    }
}

impl Particle {
    /// Inactive flame particle with fire defaults
    pub fn fire() -> Self {
        let mut particle = Particle::with_kind(ParticleKind::Fire(FireParticle::default()));
        particle.max_life = 1.5;
        particle.life = 1.5;
        particle.fade_speed = 1.0;
        particle.start_color = FLAME_YELLOW;
        particle.end_color = Color::new(0.2, 0.0, 0.0, 0.0);
        particle.color = particle.start_color;
        particle.start_size = 0.08;
        particle.end_size = 0.02;
        particle.size = particle.start_size;
        particle
    }
}

/// Tuning for the fire emitter
#[derive(Clone, Debug, PartialEq)]
pub struct FireSettings {
    /// Scales rise speed; 0.5 is the neutral height
    pub flame_height: f32,
    /// Width of the flame base particles spawn across
    pub flame_width: f32,
    /// Scales spawn count per drip, launch speed, size and rise
    pub intensity: f32,
    /// Seconds between drips
    pub emission_rate: f32,
}

impl Default for FireSettings {
    fn default() -> Self {
        Self {
            flame_height: 0.5,
            flame_width: 0.2,
            intensity: 1.0,
            emission_rate: 0.01,
        }
    }
}

impl FireSettings {
    pub fn with_flame_height(mut self, height: f32) -> Self {
        self.flame_height = height;
        self
    }

    pub fn with_flame_width(mut self, width: f32) -> Self {
        self.flame_width = width;
        self
    }

    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn with_emission_rate(mut self, seconds: f32) -> Self {
        self.emission_rate = seconds;
        self
    }

    /// Particles spawned per drip
    pub fn particles_per_emission(&self) -> usize {
        (self.intensity * 2.0).max(0.0) as usize
    }
}

impl ParticleFactory for FireSettings {
    fn create_particle(&self) -> Particle {
        Particle::fire()
    }

    fn initialize_particle(&mut self, particle: &mut Particle, emit_position: Vec2, rng: &mut EmitterRng) {
        let half_width = self.flame_width * 0.5;
        let offset_x = rng.random_float(-half_width, half_width);
        let position = emit_position + Vec2::new(offset_x, 0.0);

        let up_speed = rng.random_float(0.3, 0.6) * self.intensity;
        let side_speed = rng.random_float(-0.1, 0.1);

        particle.reset(position, Vec2::new(side_speed, up_speed));
        particle.set_lifetime(rng.random_float(1.0, 2.0));

        let start_size = rng.random_float(0.05, 0.1) * self.intensity;
        particle.set_size_range(start_size, start_size * 0.2);
        particle.set_rotation_speed(rng.random_float(-2.0, 2.0));

        let height_scale = self.flame_height / REFERENCE_FLAME_HEIGHT;
        let rise_speed = rng.random_float(0.6, 1.0) * self.intensity * height_scale;
        let turbulence = rng.random_float(0.3, 0.7);
        if let ParticleKind::Fire(fire) = particle.kind_mut() {
            fire.initialize(turbulence, rise_speed);
        }
    }
}

/// Continuous flame emitter
///
/// Emission is a fixed-rate drip with catch-up: a long frame emits every drip
/// it owes, bounded only by the pool capacity.
#[derive(Debug)]
pub struct FireEmitter {
    core: EmitterCore,
    settings: FireSettings,
    emission_timer: f32,
}

impl FireEmitter {
    pub const DEFAULT_CAPACITY: usize = 150;

    pub fn new(max_particles: usize, settings: FireSettings, rng: EmitterRng) -> Self {
        log::info!(
            "Creating fire emitter (capacity {}, drip every {:.3}s)",
            max_particles,
            settings.emission_rate
        );
        Self {
            core: EmitterCore::new(max_particles, rng),
            settings,
            emission_timer: 0.0,
        }
    }

    pub fn settings(&self) -> &FireSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut FireSettings {
        &mut self.settings
    }

    pub fn set_flame_height(&mut self, height: f32) {
        self.settings.flame_height = height;
    }

    pub fn set_flame_width(&mut self, width: f32) {
        self.settings.flame_width = width;
    }

    pub fn set_intensity(&mut self, intensity: f32) {
        self.settings.intensity = intensity;
    }

    pub fn set_emission_rate(&mut self, seconds: f32) {
        self.settings.emission_rate = seconds;
    }
}

impl ParticleEmitter for FireEmitter {
    fn name(&self) -> &str {
        "Fire"
    }

    fn update(&mut self, delta_time: f32) {
        self.core.update(delta_time);

        if !self.core.is_active() || self.settings.emission_rate <= 0.0 {
            return;
        }

        self.emission_timer += delta_time;
        let position = self.core.position();
        let count = self.settings.particles_per_emission();

        while self.emission_timer >= self.settings.emission_rate {
            self.emission_timer -= self.settings.emission_rate;
            self.core.emit(&mut self.settings, position, count);
        }
    }

    fn emit(&mut self, position: Vec2, count: usize) -> usize {
        self.core.emit(&mut self.settings, position, count)
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

    const EPS: f32 = 1e-5;

    fn emitter(max_particles: usize) -> FireEmitter {
        FireEmitter::new(max_particles, FireSettings::default(), EmitterRng::seeded(11))
    }

    #[test]
    fn test_long_frame_catches_up_until_capacity() {
        let mut fire = emitter(150);

        fire.update(1.0);

        assert_eq!(fire.particles().len(), 150);
    }

    #[test]
    fn test_drip_emits_intensity_times_two() {
        let mut fire = FireEmitter::new(
            500,
            FireSettings::default().with_emission_rate(0.1),
            EmitterRng::seeded(2),
        );

        fire.update(0.15);
        assert_eq!(fire.particles().len(), 2);

        fire.set_intensity(2.0);
        fire.update(0.1);
        assert_eq!(fire.particles().len(), 6);
    }

    #[test]
    fn test_inactive_fire_stops_dripping() {
        let mut fire = emitter(150);
        fire.set_active(false);

        fire.update(0.5);

        assert!(fire.particles().is_empty());
    }

    #[test]
    fn test_spawned_particles_sit_on_flame_base() {
        let mut fire = emitter(150);
        fire.set_position(Vec2::new(0.2, -0.5));

        fire.emit(Vec2::new(0.2, -0.5), 20);

        for particle in fire.particles() {
            assert!((particle.position().x - 0.2).abs() <= 0.1 + EPS);
            assert_eq!(particle.position().y, -0.5);
            assert!(particle.velocity().y >= 0.3 && particle.velocity().y <= 0.6);
            assert!(particle.max_life() >= 1.0 && particle.max_life() <= 2.0);
            let (start, end) = particle.size_range();
            assert!((end - start * 0.2).abs() < EPS);
        }
    }

    #[test]
    fn test_particles_rise() {
        let mut fire = emitter(150);
        fire.emit(Vec2::new(0.0, 0.0), 10);
        let before: Vec<f32> = fire.particles().iter().map(|p| p.velocity().y).collect();

        fire.core_mut().update(0.1);

        for (particle, initial) in fire.particles().iter().zip(before) {
            assert!(particle.velocity().y > initial);
        }
    }

    fn assert_color_near(actual: Color, expected: Color) {
        for i in 0..4 {
            assert!(
                (actual[i] - expected[i]).abs() < EPS,
                "{:?} != {:?}",
                actual,
                expected
            );
        }
    }

    #[test]
    fn test_color_ramp_bands() {
        assert_color_near(fire_ramp(1.0), CORE_WHITE);
        assert_color_near(fire_ramp(0.85), FLAME_YELLOW.lerp(CORE_WHITE, 0.5));
        assert_color_near(fire_ramp(0.7), FLAME_YELLOW);
        assert_color_near(fire_ramp(0.55), FLAME_ORANGE.lerp(FLAME_YELLOW, 0.5));
        assert_color_near(fire_ramp(0.4), FLAME_ORANGE);
        assert_color_near(fire_ramp(0.2), SMOKE.lerp(FLAME_ORANGE, 0.5));
        assert_color_near(fire_ramp(0.0), SMOKE);
    }

    #[test]
    fn test_ramp_replaces_base_interpolation() {
        let mut particle = Particle::fire();
        particle.reset(Vec2::new(0.0, 0.0), Vec2::new(0.0, 0.0));

        particle.update(0.9);

        let ratio = particle.life_ratio();
        assert!(ratio > 0.3 && ratio < 0.5);
        assert_eq!(particle.color(), fire_ramp(ratio));
    }

    #[test]
    fn test_reset_restores_fire_defaults() {
        let mut particle = Particle::fire();
        if let ParticleKind::Fire(fire) = particle.kind_mut() {
            fire.initialize(0.1, 3.0);
        }

        particle.reset(Vec2::new(0.0, 0.0), Vec2::new(0.0, 0.0));

        assert_eq!(particle.kind(), &ParticleKind::Fire(FireParticle::default()));
    }
}
