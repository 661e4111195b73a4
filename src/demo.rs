//! Demo scene
//!
//! One emitter of each kind wired into a [`ParticleSystem`], plus the game-level
//! timers that launch shooting stars and fire spark bursts on their own.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::DemoConfig;
use crate::particles::{
    shared, ElectricSparkEmitter, EmitterRng, FireEmitter, ParticleBatchTarget, ParticleEmitter,
    ParticleSystem, ShootingStarEmitter, SnowEmitter, Vec2,
};

/// Height above the top edge where snowflakes appear
const SNOW_SPAWN_HEIGHT: f32 = 1.05;
/// Extra width either side of the view so flakes drift in from the edges
const SNOW_SPAWN_MARGIN: f32 = 0.2;

pub struct DemoScene {
    system: ParticleSystem,
    fire: Rc<RefCell<FireEmitter>>,
    sparks: Rc<RefCell<ElectricSparkEmitter>>,
    star: Rc<RefCell<ShootingStarEmitter>>,
    snow: Rc<RefCell<SnowEmitter>>,
    rng: EmitterRng,

    pub auto_launch_stars: bool,
    pub auto_sparks: bool,
    pub star_interval: f32,
    pub spark_interval: f32,
    pub star_speed: f32,

    star_timer: f32,
    spark_timer: f32,
    aspect: f32,
}

impl DemoScene {
    pub fn new(config: &DemoConfig) -> Self {
        let mut rng = EmitterRng::from_seed_or_os(config.seed);
        if let Some(seed) = config.seed {
            log::info!("Seeding particle effects with {}", seed);
        }

        let snow = shared(SnowEmitter::new(config.snow_capacity, config.snow.clone(), rng.fork()));
        let fire = shared(FireEmitter::new(config.fire_capacity, config.fire.clone(), rng.fork()));
        let star = shared(ShootingStarEmitter::new(config.star_capacity, config.star.clone(), rng.fork()));
        let sparks = shared(ElectricSparkEmitter::new(
            config.spark_capacity,
            config.spark.clone(),
            rng.fork(),
        ));

        fire.borrow_mut().set_position(config.fire_position);
        sparks.borrow_mut().set_position(config.spark_position);
        snow.borrow_mut().set_active(config.snow_enabled);

        // Draw order follows insertion: snow at the back, sparks in front
        let mut system = ParticleSystem::new();
        system.add_emitter(snow.clone());
        system.add_emitter(fire.clone());
        system.add_emitter(star.clone());
        system.add_emitter(sparks.clone());

        let mut scene = Self {
            system,
            fire,
            sparks,
            star,
            snow,
            rng,
            auto_launch_stars: config.auto_launch_stars,
            auto_sparks: config.auto_sparks,
            star_interval: config.star_interval,
            spark_interval: config.spark_interval,
            star_speed: config.star_speed,
            star_timer: 0.0,
            spark_timer: 0.0,
            aspect: 1.0,
        };
        scene.set_viewport_aspect(1.0);
        scene
    }

    /// Advances the trigger timers and every emitter by `delta_time`
    pub fn update(&mut self, delta_time: f32) {
        if self.auto_launch_stars && self.star_interval > 0.0 {
            self.star_timer += delta_time;
            if self.star_timer >= self.star_interval {
                self.star_timer = 0.0;
                self.launch_random_star();
            }
        }

        if self.auto_sparks && self.spark_interval > 0.0 {
            self.spark_timer += delta_time;
            if self.spark_timer >= self.spark_interval {
                self.spark_timer = 0.0;
                self.spark_at_random_point();
            }
        }

        self.system.update(delta_time);
    }

    pub fn render(&mut self, target: &mut dyn ParticleBatchTarget) -> usize {
        self.system.render(target)
    }

    /// Keeps the snow line spanning the visible width
    ///
    /// Simulation space is `[-aspect, aspect] x [-1, 1]`.
    pub fn set_viewport_aspect(&mut self, aspect: f32) {
        if !aspect.is_finite() || aspect <= 0.0 {
            return;
        }
        self.aspect = aspect;

        let mut snow = self.snow.borrow_mut();
        snow.set_position(Vec2::new(0.0, SNOW_SPAWN_HEIGHT));
        snow.set_spawn_width(2.0 * (aspect + SNOW_SPAWN_MARGIN));
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Launches a star from the upper left heading down and to the right
    pub fn launch_random_star(&mut self) {
        let start = Vec2::new(
            self.rng.random_float(-self.aspect, -0.3 * self.aspect),
            self.rng.random_float(0.5, 0.9),
        );
        let direction = Vec2::new(self.rng.random_float(0.5, 1.0), self.rng.random_float(-0.6, -0.2));
        self.star.borrow_mut().launch_star(start, direction, self.star_speed);
    }

    /// Fires a spark burst somewhere in the view at the configured intensity
    pub fn spark_at_random_point(&mut self) -> usize {
        let position = Vec2::new(
            self.rng.random_float(-0.8, 0.8) * self.aspect,
            self.rng.random_float(-0.3, 0.7),
        );
        let mut sparks = self.sparks.borrow_mut();
        let intensity = sparks.settings().spark_intensity;
        sparks.spark(position, intensity)
    }

    /// Fires a spark burst at the spark emitter's own position
    pub fn spark_at_emitter(&mut self) -> usize {
        let mut sparks = self.sparks.borrow_mut();
        let position = sparks.position();
        let intensity = sparks.settings().spark_intensity;
        sparks.spark(position, intensity)
    }

    pub fn system(&self) -> &ParticleSystem {
        &self.system
    }

    pub fn fire(&self) -> &Rc<RefCell<FireEmitter>> {
        &self.fire
    }

    pub fn sparks(&self) -> &Rc<RefCell<ElectricSparkEmitter>> {
        &self.sparks
    }

    pub fn star(&self) -> &Rc<RefCell<ShootingStarEmitter>> {
        &self.star
    }

    pub fn snow(&self) -> &Rc<RefCell<SnowEmitter>> {
        &self.snow
    }

    pub fn particle_count(&self) -> usize {
        self.system.active_particle_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particles::ParticleVertex;

    struct CountingTarget {
        draws: usize,
        vertices: usize,
    }

    impl ParticleBatchTarget for CountingTarget {
        fn draw_triangle_list(&mut self, vertices: &[ParticleVertex]) {
            self.draws += 1;
            self.vertices += vertices.len();
        }
    }

    fn quiet_config() -> DemoConfig {
        DemoConfig::default()
            .with_seed(99)
            .with_auto_triggers(false, false)
            .with_snow_enabled(false)
    }

    #[test]
    fn test_fire_burns_from_the_start() {
        let mut scene = DemoScene::new(&quiet_config());

        for _ in 0..30 {
            scene.update(1.0 / 60.0);
        }

        assert!(!scene.fire().borrow().particles().is_empty());
        assert!(scene.star().borrow().particles().is_empty());
        assert!(scene.sparks().borrow().particles().is_empty());
        assert!(scene.snow().borrow().particles().is_empty());
    }

    #[test]
    fn test_auto_star_launches_after_interval() {
        let config = quiet_config().with_auto_triggers(true, false).with_star_interval(0.5);
        let mut scene = DemoScene::new(&config);

        scene.update(0.3);
        assert!(!scene.star().borrow().is_star_active());

        scene.update(0.3);
        assert!(scene.star().borrow().is_star_active());
    }

    #[test]
    fn test_auto_sparks_fire_bursts() {
        let config = quiet_config().with_auto_triggers(false, true).with_spark_interval(0.2);
        let mut scene = DemoScene::new(&config);

        scene.update(0.19);
        assert!(scene.sparks().borrow().particles().is_empty());

        // The burst lands before the emitters age, so a short tick keeps every spark alive
        scene.update(0.02);
        assert_eq!(scene.sparks().borrow().particles().len(), 20);
    }

    #[test]
    fn test_manual_spark_at_emitter() {
        let mut scene = DemoScene::new(&quiet_config());

        assert_eq!(scene.spark_at_emitter(), 20);
        let position = scene.sparks().borrow().position();
        for particle in scene.sparks().borrow().particles() {
            assert!((particle.position().x - position.x).abs() <= 0.02 + 1e-5);
        }
    }

    #[test]
    fn test_viewport_aspect_widens_snow_line() {
        let mut scene = DemoScene::new(&quiet_config());

        scene.set_viewport_aspect(2.0);
        assert!((scene.snow().borrow().settings().spawn_width - 4.4).abs() < 1e-5);

        scene.set_viewport_aspect(0.0);
        assert_eq!(scene.aspect(), 2.0);
    }

    #[test]
    fn test_render_draws_whole_scene_once() {
        let mut scene = DemoScene::new(&quiet_config());
        scene.spark_at_emitter();
        scene.update(0.05);

        let mut target = CountingTarget { draws: 0, vertices: 0 };
        let drawn = scene.render(&mut target);

        assert_eq!(target.draws, 1);
        assert_eq!(drawn, target.vertices);
        assert_eq!(drawn, scene.particle_count() * 6);
    }

    #[test]
    fn test_same_seed_same_scene() {
        let mut a = DemoScene::new(&quiet_config());
        let mut b = DemoScene::new(&quiet_config());

        for _ in 0..20 {
            a.update(1.0 / 60.0);
            b.update(1.0 / 60.0);
        }

        let positions = |scene: &DemoScene| -> Vec<Vec2> {
            scene.fire().borrow().particles().iter().map(|p| p.position()).collect()
        };
        assert_eq!(positions(&a), positions(&b));
    }
}
