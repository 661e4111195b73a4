//! Electric spark effect
//!
//! Bursts of fast, short-lived particles that flicker in brightness and jitter
//! in place while they bleed off speed.

use cgmath::Zero;

use super::emitter::{EmitterCore, EmitterRng, ParticleEmitter, ParticleFactory};
use super::particle::{Particle, ParticleKind};
use super::{rgba, Color, Vec2};

const SPARK_BLUE: Color = rgba(0.7, 0.9, 1.0, 1.0);
const SPARK_FADE: Color = rgba(0.2, 0.4, 1.0, 0.0);
const WHITE_BAND_START: Color = rgba(0.9, 0.95, 1.0, 1.0);
const WHITE_BAND_END: Color = rgba(0.4, 0.6, 1.0, 0.0);
const BLUE_BAND_START: Color = rgba(0.5, 0.8, 1.0, 1.0);

/// Sparks spawned per unit of burst intensity
const SPARKS_PER_INTENSITY: f32 = 20.0;

/// Spark-only particle state
#[derive(Clone, Debug, PartialEq)]
pub struct SparkParticle {
    pub flicker_timer: f32,
    pub flicker_rate: f32,
    pub brightness: f32,
    pub jitter: Vec2,
}

impl Default for SparkParticle {
    fn default() -> Self {
        Self {
            flicker_timer: 0.0,
            flicker_rate: 0.02,
            brightness: 1.0,
            jitter: Vec2::zero(),
        }
    }
}

impl SparkParticle {
    pub(crate) fn apply(&mut self, particle: &mut Particle, delta_time: f32) {
        self.flicker_timer += delta_time;
        if self.flicker_timer >= self.flicker_rate {
            self.flicker_timer = 0.0;
            self.brightness = 0.5 + 0.5 * (particle.life * 20.0).sin();
            self.jitter = Vec2::new((particle.life * 30.0).sin(), (particle.life * 25.0).cos()) * 0.01;
        }

        let start = particle.start_color;
        particle.color.w = start.w * self.brightness * particle.life_ratio();
        particle.color.x = start.x + (1.0 - start.x) * self.brightness * 0.5;
        particle.color.y = start.y + (1.0 - start.y) * self.brightness * 0.5;

        particle.position += self.jitter;
        particle.velocity *= 1.0 - 2.0 * delta_time;
    }

    // flicker_rate is sampled per spawn and survives reset
    pub(crate) fn rearm(&mut self) {
        self.flicker_timer = 0.0;
        self.brightness = 1.0;
        self.jitter = Vec2::zero();
    }
}

impl Particle {
    /// Inactive spark particle with spark defaults
    pub fn electric_spark() -> Self {
        let mut particle = Particle::with_kind(ParticleKind::ElectricSpark(SparkParticle::default()));
        particle.max_life = 0.3;
        particle.life = 0.3;
        particle.fade_speed = 3.0;
        particle.start_color = SPARK_BLUE;
        particle.end_color = SPARK_FADE;
        particle.color = SPARK_BLUE;
        particle.start_size = 0.04;
        particle.end_size = 0.01;
        particle.size = 0.04;
        particle
    }
}

/// Tuning for the spark emitter
#[derive(Clone, Debug, PartialEq)]
pub struct SparkSettings {
    /// Radius of the spawn disc is a tenth of this
    pub spark_radius: f32,
    /// Scales launch speed and size, and the burst size of continuous mode
    pub spark_intensity: f32,
    /// Fire a burst every `continuous_rate` seconds on its own
    pub continuous: bool,
    pub continuous_rate: f32,
}

impl Default for SparkSettings {
    fn default() -> Self {
        Self {
            spark_radius: 0.2,
            spark_intensity: 1.0,
            continuous: false,
            continuous_rate: 0.1,
        }
    }
}

impl SparkSettings {
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.spark_radius = radius;
        self
    }

    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.spark_intensity = intensity;
        self
    }

    pub fn with_continuous(mut self, continuous: bool) -> Self {
        self.continuous = continuous;
        self
    }

    pub fn with_continuous_rate(mut self, seconds: f32) -> Self {
        self.continuous_rate = seconds;
        self
    }
}

impl ParticleFactory for SparkSettings {
    fn create_particle(&self) -> Particle {
        Particle::electric_spark()
    }

    fn initialize_particle(&mut self, particle: &mut Particle, emit_position: Vec2, rng: &mut EmitterRng) {
        let speed = rng.random_float(0.5, 2.0) * self.spark_intensity;
        let velocity = rng.random_direction() * speed;

        let offset_distance = rng.random_float(0.0, self.spark_radius * 0.1);
        let position = emit_position + rng.random_direction() * offset_distance;

        particle.set_lifetime(rng.random_float(0.1, 0.4));
        particle.reset(position, velocity);

        let start_size = rng.random_float(0.02, 0.06) * self.spark_intensity;
        particle.set_size_range(start_size, start_size * 0.2);

        if rng.random_float(0.0, 1.0) > 0.7 {
            particle.set_color_range(WHITE_BAND_START, WHITE_BAND_END);
        } else {
            particle.set_color_range(BLUE_BAND_START, SPARK_FADE);
        }

        let flicker_rate = rng.random_float(0.01, 0.03);
        if let ParticleKind::ElectricSpark(spark) = particle.kind_mut() {
            spark.flicker_rate = flicker_rate;
        }
    }
}

/// Burst emitter for electric sparks
#[derive(Debug)]
pub struct ElectricSparkEmitter {
    core: EmitterCore,
    settings: SparkSettings,
    continuous_timer: f32,
}

impl ElectricSparkEmitter {
    pub const DEFAULT_CAPACITY: usize = 100;

    pub fn new(max_particles: usize, settings: SparkSettings, rng: EmitterRng) -> Self {
        log::info!(
            "Creating electric spark emitter (capacity {}, continuous: {})",
            max_particles,
            settings.continuous
        );
        Self {
            core: EmitterCore::new(max_particles, rng),
            settings,
            continuous_timer: 0.0,
        }
    }

    /// Fires a burst of `20 * intensity` sparks at `position`
    ///
    /// Returns how many sparks fit in the pool.
    pub fn spark(&mut self, position: Vec2, intensity: f32) -> usize {
        let count = (SPARKS_PER_INTENSITY * intensity).max(0.0) as usize;
        let spawned = self.core.emit(&mut self.settings, position, count);
        log::debug!(
            "Spark burst at ({:.2}, {:.2}): {}/{} spawned",
            position.x,
            position.y,
            spawned,
            count
        );
        spawned
    }

    pub fn settings(&self) -> &SparkSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut SparkSettings {
        &mut self.settings
    }

    pub fn set_spark_radius(&mut self, radius: f32) {
        self.settings.spark_radius = radius;
    }

    pub fn set_spark_intensity(&mut self, intensity: f32) {
        self.settings.spark_intensity = intensity;
    }

    pub fn set_continuous(&mut self, continuous: bool) {
        self.settings.continuous = continuous;
        if !continuous {
            self.continuous_timer = 0.0;
        }
    }

    pub fn is_continuous(&self) -> bool {
        self.settings.continuous
    }
}

impl ParticleEmitter for ElectricSparkEmitter {
    fn name(&self) -> &str {
        "Electric Spark"
    }

    fn update(&mut self, delta_time: f32) {
        self.core.update(delta_time);

        if !self.settings.continuous || !self.core.is_active() || self.settings.continuous_rate <= 0.0 {
            return;
        }

        self.continuous_timer += delta_time;
        let position = self.core.position();
        while self.continuous_timer >= self.settings.continuous_rate {
            self.continuous_timer -= self.settings.continuous_rate;
            self.spark(position, self.settings.spark_intensity);
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
    use cgmath::InnerSpace;

    fn emitter(max_particles: usize) -> ElectricSparkEmitter {
        ElectricSparkEmitter::new(max_particles, SparkSettings::default(), EmitterRng::seeded(21))
    }

    #[test]
    fn test_spark_bursts_scale_with_intensity() {
        let mut sparks = emitter(ElectricSparkEmitter::DEFAULT_CAPACITY);

        assert_eq!(sparks.spark(Vec2::new(0.0, 0.0), 1.0), 20);
        assert_eq!(sparks.particles().len(), 20);

        assert_eq!(sparks.spark(Vec2::new(0.0, 0.0), 2.0), 40);
        assert_eq!(sparks.particles().len(), 60);
    }

    #[test]
    fn test_repeated_bursts_fill_pool_then_truncate() {
        let mut sparks = emitter(150);

        let counts: Vec<usize> = (0..9)
            .map(|_| {
                sparks.spark(Vec2::new(0.0, 0.0), 1.0);
                sparks.particles().len()
            })
            .collect();

        assert_eq!(counts, vec![20, 40, 60, 80, 100, 120, 140, 150, 150]);
    }

    #[test]
    fn test_spark_burst_truncates_at_capacity() {
        let mut sparks = emitter(30);

        assert_eq!(sparks.spark(Vec2::new(0.0, 0.0), 2.0), 30);
        assert_eq!(sparks.spark(Vec2::new(0.0, 0.0), 1.0), 0);
    }

    #[test]
    fn test_inactive_emitter_ignores_bursts() {
        let mut sparks = emitter(100);
        sparks.set_active(false);

        assert_eq!(sparks.spark(Vec2::new(0.0, 0.0), 1.0), 0);
    }

    #[test]
    fn test_continuous_mode_fires_on_its_own() {
        let mut sparks = emitter(500);
        sparks.update(0.5);
        assert!(sparks.particles().is_empty());

        sparks.set_continuous(true);
        sparks.update(0.05);
        assert!(sparks.particles().is_empty());

        sparks.update(0.06);
        assert_eq!(sparks.particles().len(), 20);
    }

    #[test]
    fn test_sparks_spawn_near_emit_point() {
        let mut sparks = emitter(100);
        let origin = Vec2::new(0.3, -0.2);

        sparks.spark(origin, 1.0);

        for particle in sparks.particles() {
            assert!((particle.position() - origin).magnitude() <= 0.02 + 1e-5);
            let speed = particle.velocity().magnitude();
            assert!(speed >= 0.5 - 1e-4 && speed <= 2.0 + 1e-4);
            assert!(particle.max_life() >= 0.1 && particle.max_life() <= 0.4);
            match particle.kind() {
                ParticleKind::ElectricSpark(spark) => {
                    assert!(spark.flicker_rate >= 0.01 && spark.flicker_rate <= 0.03)
                }
                other => panic!("unexpected kind {:?}", other),
            }
        }
    }

    #[test]
    fn test_sparks_slow_down() {
        let mut particle = Particle::electric_spark();
        particle.reset(Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0));

        particle.update(0.01);

        assert!(particle.velocity().x < 1.0);
        assert!(particle.is_active());
    }

    #[test]
    fn test_sparks_die_quickly() {
        let mut sparks = emitter(100);
        sparks.spark(Vec2::new(0.0, 0.0), 1.0);

        // Fade speed 3 on a lifetime of at most 0.4 s
        for _ in 0..10 {
            sparks.update(0.02);
        }

        assert!(sparks.particles().is_empty());
    }

    #[test]
    fn test_reset_keeps_sampled_flicker_rate() {
        let mut particle = Particle::electric_spark();
        if let ParticleKind::ElectricSpark(spark) = particle.kind_mut() {
            spark.flicker_rate = 0.015;
            spark.brightness = 0.2;
        }

        particle.reset(Vec2::new(0.0, 0.0), Vec2::new(0.0, 0.0));

        match particle.kind() {
            ParticleKind::ElectricSpark(spark) => {
                assert_eq!(spark.flicker_rate, 0.015);
                assert_eq!(spark.brightness, 1.0);
                assert_eq!(spark.jitter, Vec2::zero());
            }
            other => panic!("unexpected kind {:?}", other),
        }
    }
}
