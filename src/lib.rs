// src/lib.rs
//! Embers
//!
//! Real-time 2D particle effects (fire, electric sparks, shooting stars and
//! snow) simulated on the CPU, batched into one draw per frame with wgpu and
//! tuned live through an ImGui overlay.

pub mod app;
pub mod config;
pub mod demo;
pub mod error;
pub mod gfx;
pub mod particles;
pub mod performance;
pub mod prelude;
pub mod ui;

// Re-export main types for convenience
pub use app::EmbersApp;
pub use config::{AppConfig, DemoConfig};
pub use error::{AppError, RenderError};

/// Creates an application configured from defaults and the environment
pub fn default() -> Result<EmbersApp, AppError> {
    EmbersApp::new(AppConfig::from_env())
}
