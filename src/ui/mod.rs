//! # User Interface Module
//!
//! Dear ImGui diagnostics overlay for Embers.
//!
//! ## Key Components
//!
//! - [`UiManager`] - ImGui integration with winit and wgpu, input capture and
//!   overlay rendering
//! - [`particle_editor_panel`] - live emitter tuning and manual triggers
//!
//! ## Input Handling
//!
//! Window events are offered to the UI first. Keyboard shortcuts of the demo
//! are ignored while ImGui wants keyboard input.

pub mod manager;
pub mod panel;

// Re-export main types
pub use manager::UiManager;
pub use panel::particle_editor_panel;
