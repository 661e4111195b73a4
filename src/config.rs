//! Application and demo configuration
//!
//! Plain in-memory settings with builder-style `with_*` setters. A couple of
//! knobs can be overridden from the environment through [`AppConfig::from_env`].

use crate::particles::{
    ElectricSparkEmitter, FireEmitter, FireSettings, ShootingStarEmitter, SnowEmitter, SnowSettings,
    SparkSettings, StarSettings, Vec2,
};

/// Seeds every emitter's random source when set
pub const SEED_ENV: &str = "EMBERS_SEED";
/// `0`/`1` or `false`/`true`
pub const VSYNC_ENV: &str = "EMBERS_VSYNC";

/// Scene layout, trigger timers and per-emitter tuning
#[derive(Clone, Debug, PartialEq)]
pub struct DemoConfig {
    pub fire_capacity: usize,
    pub spark_capacity: usize,
    pub star_capacity: usize,
    pub snow_capacity: usize,

    pub fire_position: Vec2,
    pub spark_position: Vec2,

    pub fire: FireSettings,
    pub spark: SparkSettings,
    pub star: StarSettings,
    pub snow: SnowSettings,

    /// Seconds between automatic star launches
    pub star_interval: f32,
    pub star_speed: f32,
    /// Seconds between automatic spark bursts
    pub spark_interval: f32,
    pub auto_launch_stars: bool,
    pub auto_sparks: bool,
    pub snow_enabled: bool,

    /// Fixed seed for reproducible runs, OS entropy otherwise
    pub seed: Option<u64>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            fire_capacity: FireEmitter::DEFAULT_CAPACITY,
            spark_capacity: ElectricSparkEmitter::DEFAULT_CAPACITY,
            star_capacity: ShootingStarEmitter::DEFAULT_CAPACITY,
            snow_capacity: SnowEmitter::DEFAULT_CAPACITY,
            fire_position: Vec2::new(0.0, -0.6),
            spark_position: Vec2::new(0.5, 0.0),
            fire: FireSettings::default(),
            spark: SparkSettings::default(),
            star: StarSettings::default(),
            snow: SnowSettings::default(),
            star_interval: 3.0,
            star_speed: 1.2,
            spark_interval: 1.5,
            auto_launch_stars: true,
            auto_sparks: true,
            snow_enabled: true,
            seed: None,
        }
    }
}

impl DemoConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_fire(mut self, settings: FireSettings) -> Self {
        self.fire = settings;
        self
    }

    pub fn with_spark(mut self, settings: SparkSettings) -> Self {
        self.spark = settings;
        self
    }

    pub fn with_star(mut self, settings: StarSettings) -> Self {
        self.star = settings;
        self
    }

    pub fn with_snow(mut self, settings: SnowSettings) -> Self {
        self.snow = settings;
        self
    }

    pub fn with_fire_position(mut self, position: Vec2) -> Self {
        self.fire_position = position;
        self
    }

    pub fn with_star_interval(mut self, seconds: f32) -> Self {
        self.star_interval = seconds;
        self
    }

    pub fn with_spark_interval(mut self, seconds: f32) -> Self {
        self.spark_interval = seconds;
        self
    }

    pub fn with_auto_triggers(mut self, stars: bool, sparks: bool) -> Self {
        self.auto_launch_stars = stars;
        self.auto_sparks = sparks;
        self
    }

    pub fn with_snow_enabled(mut self, enabled: bool) -> Self {
        self.snow_enabled = enabled;
        self
    }
}

/// Window and frame loop settings
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub clear_color: [f64; 4],
    /// Upper bound on the simulation step, in seconds
    pub max_frame_time: f32,
    pub vsync: bool,
    pub show_performance: bool,
    pub demo: DemoConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Embers".to_string(),
            width: 1200,
            height: 800,
            clear_color: [0.02, 0.02, 0.05, 1.0],
            max_frame_time: 0.033,
            vsync: true,
            show_performance: true,
            demo: DemoConfig::default(),
        }
    }
}

impl AppConfig {
    /// Defaults overridden by `EMBERS_SEED` and `EMBERS_VSYNC`
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from any key lookup; unparsable values are ignored
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(SEED_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(seed) => self.demo.seed = Some(seed),
                Err(_) => log::warn!("Ignoring {}={:?}: expected an unsigned integer", SEED_ENV, raw),
            }
        }

        if let Some(raw) = lookup(VSYNC_ENV) {
            match parse_flag(&raw) {
                Some(vsync) => self.vsync = vsync,
                None => log::warn!("Ignoring {}={:?}: expected 0/1 or true/false", VSYNC_ENV, raw),
            }
        }

        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    pub fn with_max_frame_time(mut self, seconds: f32) -> Self {
        self.max_frame_time = seconds;
        self
    }

    pub fn with_demo(mut self, demo: DemoConfig) -> Self {
        self.demo = demo;
        self
    }

    /// Clamps a wall-clock frame delta to the simulation step bound
    pub fn clamp_delta(&self, delta_time: f32) -> f32 {
        delta_time.clamp(0.0, self.max_frame_time)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}
