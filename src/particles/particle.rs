//! Particle state and lifecycle
//!
//! A [`Particle`] owns its kinematic, visual and lifecycle state and knows how
//! to age itself. Effect-specific behavior is a tagged variant ([`ParticleKind`])
//! applied after the shared integration step.

use cgmath::{VectorSpace, Zero};

use super::electric_spark::SparkParticle;
use super::fire::FireParticle;
use super::shooting_star::TrailParticle;
use super::snow::SnowParticle;
use super::{Color, Vec2};

/// Per-effect particle behavior and the state it needs
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ParticleKind {
    /// Plain interpolated particle with no extra behavior
    #[default]
    Basic,
    /// Rising flame with turbulence and a hand-authored color ramp
    Fire(FireParticle),
    /// Short-lived flickering electric spark
    ElectricSpark(SparkParticle),
    /// Trail segment left behind by a shooting star
    StarTrail(TrailParticle),
    /// Slowly falling, swaying snowflake
    Snow(SnowParticle),
}

impl ParticleKind {
    fn apply(&mut self, particle: &mut Particle, delta_time: f32) {
        match self {
            ParticleKind::Basic => {}
            ParticleKind::Fire(fire) => fire.apply(particle, delta_time),
            ParticleKind::ElectricSpark(spark) => spark.apply(particle, delta_time),
            ParticleKind::StarTrail(trail) => trail.apply(particle, delta_time),
            ParticleKind::Snow(snow) => snow.apply(particle, delta_time),
        }
    }

    fn rearm(&mut self) {
        match self {
            ParticleKind::Basic => {}
            ParticleKind::Fire(fire) => fire.rearm(),
            ParticleKind::ElectricSpark(spark) => spark.rearm(),
            ParticleKind::StarTrail(trail) => trail.rearm(),
            ParticleKind::Snow(snow) => snow.rearm(),
        }
    }
}

/// A single simulated point-sprite
///
/// Particles are created inactive with effect-specific defaults and armed by
/// [`Particle::reset`]. Once `life` reaches zero the particle stays frozen
/// until it is reset again.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub(crate) position: Vec2,
    pub(crate) velocity: Vec2,
    pub(crate) acceleration: Vec2,

    pub(crate) color: Color,
    pub(crate) start_color: Color,
    pub(crate) end_color: Color,
    pub(crate) size: f32,
    pub(crate) start_size: f32,
    pub(crate) end_size: f32,
    pub(crate) rotation: f32,
    pub(crate) rotation_speed: f32,

    pub(crate) life: f32,
    pub(crate) max_life: f32,
    pub(crate) fade_speed: f32,
    pub(crate) active: bool,

    kind: ParticleKind,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            position: Vec2::zero(),
            velocity: Vec2::zero(),
            acceleration: Vec2::zero(),
            color: Color::new(1.0, 1.0, 1.0, 1.0),
            start_color: Color::new(1.0, 1.0, 1.0, 1.0),
            end_color: Color::new(1.0, 1.0, 1.0, 0.0),
            size: 0.05,
            start_size: 0.05,
            end_size: 0.01,
            rotation: 0.0,
            rotation_speed: 0.0,
            life: 1.0,
            max_life: 1.0,
            fade_speed: 1.0,
            active: false,
            kind: ParticleKind::Basic,
        }
    }
}

impl Particle {
    /// Creates an inactive basic particle with default ranges
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an inactive particle of the given kind with base defaults
    pub fn with_kind(kind: ParticleKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Advances the particle by one tick
    ///
    /// Life is depleted by `delta_time * fade_speed`. The tick on which life
    /// crosses zero clamps it, deactivates the particle and applies nothing else.
    pub fn update(&mut self, delta_time: f32) {
        if !self.integrate(delta_time) {
            return;
        }

        let mut kind = std::mem::take(&mut self.kind);
        kind.apply(self, delta_time);
        self.kind = kind;
    }

    /// Shared integration step, returns false once the particle is dead
    fn integrate(&mut self, delta_time: f32) -> bool {
        if !self.active || self.life <= 0.0 {
            return false;
        }

        self.life -= delta_time * self.fade_speed;
        if self.life <= 0.0 {
            self.life = 0.0;
            self.active = false;
            return false;
        }

        let life_ratio = self.life_ratio();

        self.velocity += self.acceleration * delta_time;
        self.position += self.velocity * delta_time;
        self.rotation += self.rotation_speed * delta_time;

        self.size = self.start_size + (self.end_size - self.start_size) * (1.0 - life_ratio);
        self.color = self.end_color.lerp(self.start_color, life_ratio);

        true
    }

    /// Re-arms a pooled particle at `position` moving with `velocity`
    pub fn reset(&mut self, position: Vec2, velocity: Vec2) {
        self.position = position;
        self.velocity = velocity;
        self.acceleration = Vec2::zero();

        self.life = self.max_life;
        self.size = self.start_size;
        self.color = self.start_color;
        self.rotation = 0.0;

        self.active = true;
        self.kind.rearm();
    }

    /// True once life is exhausted or the particle was never armed
    pub fn is_dead(&self) -> bool {
        self.life <= 0.0 || !self.active
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn acceleration(&self) -> Vec2 {
        self.acceleration
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn rotation_speed(&self) -> f32 {
        self.rotation_speed
    }

    pub fn life(&self) -> f32 {
        self.life
    }

    pub fn max_life(&self) -> f32 {
        self.max_life
    }

    pub fn fade_speed(&self) -> f32 {
        self.fade_speed
    }

    /// Remaining life as a fraction of the total, zero for degenerate lifetimes
    pub fn life_ratio(&self) -> f32 {
        if self.max_life > 0.0 {
            self.life / self.max_life
        } else {
            0.0
        }
    }

    pub fn start_color(&self) -> Color {
        self.start_color
    }

    pub fn end_color(&self) -> Color {
        self.end_color
    }

    pub fn size_range(&self) -> (f32, f32) {
        (self.start_size, self.end_size)
    }

    pub fn kind(&self) -> &ParticleKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut ParticleKind {
        &mut self.kind
    }

    /// Sets total lifetime and refills remaining life
    pub fn set_lifetime(&mut self, max_life: f32) {
        self.max_life = max_life;
        self.life = max_life;
    }

    pub fn set_size_range(&mut self, start_size: f32, end_size: f32) {
        self.start_size = start_size;
        self.end_size = end_size;
        self.size = start_size;
    }

    pub fn set_color_range(&mut self, start_color: Color, end_color: Color) {
        self.start_color = start_color;
        self.end_color = end_color;
        self.color = start_color;
    }

    pub fn set_rotation_speed(&mut self, speed: f32) {
        self.rotation_speed = speed;
    }

    pub fn set_acceleration(&mut self, acceleration: Vec2) {
        self.acceleration = acceleration;
    }

    pub fn set_fade_speed(&mut self, speed: f32) {
        self.fade_speed = speed;
    }
}
