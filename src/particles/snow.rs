//! Snow effect
//!
//! A steady drizzle of flakes spread along a horizontal line that drift down
//! while swaying side to side.

use std::f32::consts::TAU;

use super::emitter::{EmitterCore, EmitterRng, ParticleEmitter, ParticleFactory};
use super::particle::{Particle, ParticleKind};
use super::{rgba, Color, Vec2};

const FLAKE_WHITE: Color = rgba(1.0, 1.0, 1.0, 0.9);
const FLAKE_FADE: Color = rgba(0.85, 0.9, 1.0, 0.0);

/// Snow-only particle state
#[derive(Clone, Debug, PartialEq)]
pub struct SnowParticle {
    pub sway_amount: f32,
    pub sway_speed: f32,
    pub sway_phase: f32,
}

impl Default for SnowParticle {
    fn default() -> Self {
        Self {
            sway_amount: 0.05,
            sway_speed: 2.0,
            sway_phase: 0.0,
        }
    }
}

impl SnowParticle {
    pub(crate) fn apply(&mut self, particle: &mut Particle, delta_time: f32) {
        self.sway_phase += self.sway_speed * delta_time;
        particle.position.x += self.sway_phase.sin() * self.sway_amount * delta_time;
    }

    pub(crate) fn rearm(&mut self) {
        self.sway_phase = 0.0;
    }
}

impl Particle {
    /// Inactive snowflake with snow defaults
    pub fn snow() -> Self {
        let mut particle = Particle::with_kind(ParticleKind::Snow(SnowParticle::default()));
        particle.max_life = 6.0;
        particle.life = 6.0;
        particle.start_color = FLAKE_WHITE;
        particle.end_color = FLAKE_FADE;
        particle.color = FLAKE_WHITE;
        particle.start_size = 0.02;
        particle.end_size = 0.015;
        particle.size = 0.02;
        particle
    }
}

/// Tuning for the snow emitter
#[derive(Clone, Debug, PartialEq)]
pub struct SnowSettings {
    /// Seconds between flakes
    pub emission_interval: f32,
    /// Width of the line flakes spawn along, centered on the emitter
    pub spawn_width: f32,
    pub fall_speed: f32,
    pub flake_size: f32,
    /// Upper bound of a flake lifetime in seconds
    pub lifetime: f32,
}

impl Default for SnowSettings {
    fn default() -> Self {
        Self {
            emission_interval: 0.02,
            spawn_width: 2.0,
            fall_speed: 0.35,
            flake_size: 0.02,
            lifetime: 6.0,
        }
    }
}

impl SnowSettings {
    pub fn with_emission_interval(mut self, seconds: f32) -> Self {
        self.emission_interval = seconds;
        self
    }

    pub fn with_spawn_width(mut self, width: f32) -> Self {
        self.spawn_width = width;
        self
    }

    pub fn with_fall_speed(mut self, speed: f32) -> Self {
        self.fall_speed = speed;
        self
    }

    pub fn with_flake_size(mut self, size: f32) -> Self {
        self.flake_size = size;
        self
    }

    pub fn with_lifetime(mut self, seconds: f32) -> Self {
        self.lifetime = seconds;
        self
    }
}

impl ParticleFactory for SnowSettings {
    fn create_particle(&self) -> Particle {
        Particle::snow()
    }

    fn initialize_particle(&mut self, particle: &mut Particle, emit_position: Vec2, rng: &mut EmitterRng) {
        let half_width = self.spawn_width * 0.5;
        let position = emit_position + Vec2::new(rng.random_float(-half_width, half_width), 0.0);
        let velocity = Vec2::new(
            rng.random_float(-0.02, 0.02),
            -self.fall_speed * rng.random_float(0.5, 1.0),
        );

        particle.set_lifetime(rng.random_float(0.8, 1.0) * self.lifetime);
        particle.reset(position, velocity);

        let size = self.flake_size * rng.random_float(0.6, 1.2);
        particle.set_size_range(size, size * 0.75);
        particle.set_rotation_speed(rng.random_float(-1.0, 1.0));

        let sway_amount = rng.random_float(0.03, 0.07);
        let sway_speed = rng.random_float(1.5, 3.5);
        let sway_phase = rng.random_float(0.0, TAU);
        if let ParticleKind::Snow(snow) = particle.kind_mut() {
            snow.sway_amount = sway_amount;
            snow.sway_speed = sway_speed;
            snow.sway_phase = sway_phase;
        }
    }
}

/// Continuous snowfall emitter
#[derive(Debug)]
pub struct SnowEmitter {
    core: EmitterCore,
    settings: SnowSettings,
    emission_timer: f32,
}

impl SnowEmitter {
    pub const DEFAULT_CAPACITY: usize = 400;

    pub fn new(max_particles: usize, settings: SnowSettings, rng: EmitterRng) -> Self {
        log::info!(
            "Creating snow emitter (capacity {}, flake every {:.3}s)",
            max_particles,
            settings.emission_interval
        );
        Self {
            core: EmitterCore::new(max_particles, rng),
            settings,
            emission_timer: 0.0,
        }
    }

    pub fn settings(&self) -> &SnowSettings {
        &self.settings
    }

    pub fn set_spawn_width(&mut self, width: f32) {
        self.settings.spawn_width = width.max(0.0);
    }

    pub fn set_fall_speed(&mut self, speed: f32) {
        self.settings.fall_speed = speed;
    }

    pub fn set_emission_interval(&mut self, seconds: f32) {
        self.settings.emission_interval = seconds;
    }
}

impl ParticleEmitter for SnowEmitter {
    fn name(&self) -> &str {
        "Snow"
    }

    fn update(&mut self, delta_time: f32) {
        self.core.update(delta_time);

        if !self.core.is_active() || self.settings.emission_interval <= 0.0 {
            return;
        }

        self.emission_timer += delta_time;
        let position = self.core.position();
        while self.emission_timer >= self.settings.emission_interval {
            self.emission_timer -= self.settings.emission_interval;
            self.core.emit(&mut self.settings, position, 1);
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

    fn emitter(settings: SnowSettings) -> SnowEmitter {
        SnowEmitter::new(SnowEmitter::DEFAULT_CAPACITY, settings, EmitterRng::seeded(17))
    }

    #[test]
    fn test_one_flake_per_interval() {
        let mut snow = emitter(SnowSettings::default().with_emission_interval(0.1));

        snow.update(0.35);

        assert_eq!(snow.particles().len(), 3);
    }

    #[test]
    fn test_flakes_spawn_across_width_and_fall() {
        let mut snow = emitter(SnowSettings::default().with_spawn_width(1.0));
        snow.set_position(Vec2::new(0.5, 1.0));

        snow.emit(Vec2::new(0.5, 1.0), 50);

        for flake in snow.particles() {
            assert!(flake.position().x >= 0.0 && flake.position().x <= 1.0);
            assert_eq!(flake.position().y, 1.0);
            assert!(flake.velocity().y < 0.0);
        }

        snow.core_mut().update(0.5);
        assert!(snow.particles().iter().all(|flake| flake.position().y < 1.0));
    }

    #[test]
    fn test_flake_lifetime_scales_with_settings() {
        let mut snow = emitter(SnowSettings::default().with_lifetime(2.0));

        snow.emit(Vec2::new(0.0, 0.0), 20);

        for flake in snow.particles() {
            assert!(flake.max_life() >= 1.6 - 1e-5 && flake.max_life() <= 2.0);
        }
    }

    #[test]
    fn test_inactive_snow_stops_but_drains() {
        let mut snow = emitter(SnowSettings::default().with_lifetime(1.0));
        snow.update(0.2);
        assert!(!snow.particles().is_empty());

        snow.set_active(false);
        for _ in 0..20 {
            snow.update(0.1);
        }

        assert!(snow.particles().is_empty());
    }

    #[test]
    fn test_sway_moves_flake_sideways() {
        let mut flake = Particle::snow();
        if let ParticleKind::Snow(state) = flake.kind_mut() {
            state.sway_amount = 0.05;
            state.sway_speed = 2.0;
        }
        flake.reset(Vec2::new(0.0, 0.0), Vec2::new(0.0, -0.1));

        flake.update(0.5);

        // Phase 1.0 after the step, so sway pushes right
        assert!(flake.position().x > 0.0);
    }
}
