//! # Embers Prelude
//!
//! Commonly used types in one import.
//!
//! ```no_run
//! use embers::prelude::*;
//!
//! fn main() -> Result<(), AppError> {
//!     let config = AppConfig::default().with_demo(DemoConfig::default().with_seed(7));
//!     EmbersApp::new(config)?.run()
//! }
//! ```

// Re-export core application types
pub use crate::app::EmbersApp;
pub use crate::config::{AppConfig, DemoConfig};
pub use crate::demo::DemoScene;
pub use crate::error::{AppError, RenderError};

// Re-export particle types
pub use crate::particles::{
    shared, ElectricSparkEmitter, EmitterRng, FireEmitter, FireSettings, Particle, ParticleBatchTarget,
    ParticleEmitter, ParticleKind, ParticleSystem, ParticleVertex, SharedEmitter, ShootingStarEmitter,
    SnowEmitter, SnowSettings, SparkSettings, StarSettings, Vec2,
};
