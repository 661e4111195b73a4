//! Error types for Embers.
//!
//! The particle simulation itself cannot fail; these cover GPU setup, frame
//! presentation and the window/event loop around it.

use thiserror::Error;

/// Errors raised while setting up or driving the GPU.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Failed to create a surface for the window.
    #[error("Failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    #[error("No compatible GPU adapter found: {0}")]
    NoAdapter(#[from] wgpu::RequestAdapterError),
    /// Failed to create the GPU device.
    #[error("Failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
    /// The surface reported no usable texture format.
    #[error("Surface exposes no supported texture format")]
    NoSurfaceFormat,
    /// Acquiring the next swapchain texture failed for good.
    #[error("Failed to acquire surface texture: {0}")]
    SurfaceTexture(#[from] wgpu::SurfaceError),
    /// The ImGui overlay could not be prepared or drawn.
    #[error("UI overlay failed: {0}")]
    Ui(String),
}

impl From<imgui_wgpu::RendererError> for RenderError {
    fn from(e: imgui_wgpu::RendererError) -> Self {
        RenderError::Ui(format!("{:?}", e))
    }
}

/// Errors that end the application.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("Failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_error_messages() {
        assert_eq!(
            RenderError::NoSurfaceFormat.to_string(),
            "Surface exposes no supported texture format"
        );
        assert_eq!(
            RenderError::Ui("font atlas".into()).to_string(),
            "UI overlay failed: font atlas"
        );
    }

    #[test]
    fn test_app_error_is_transparent_over_render_errors() {
        let error: AppError = RenderError::SurfaceTexture(wgpu::SurfaceError::OutOfMemory).into();
        assert!(error.to_string().starts_with("Failed to acquire surface texture"));
    }
}
