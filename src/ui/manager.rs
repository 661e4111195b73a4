// src/ui/manager.rs
//! ImGui overlay for the particle editor
//!
//! Owns the imgui context with its winit and wgpu backends. Window events are
//! offered here before the demo sees them, the editor is built once per frame
//! with [`UiManager::prepare_frame`] and drawn over the particles with
//! [`UiManager::render_overlay`].

use imgui::{Context, FontConfig, FontSource, MouseCursor};
use imgui_wgpu::{Renderer, RendererConfig};
use imgui_winit_support::{HiDpiMode, WinitPlatform};
use std::time::Instant;
use wgpu::{CommandEncoder, Device, Queue, TextureFormat, TextureView};
use winit::{
    event::{Event, WindowEvent},
    window::{Window, WindowId},
};

use crate::error::RenderError;

const FONT_SIZE: f32 = 18.0;

pub struct UiManager {
    context: Context,
    platform: WinitPlatform,
    renderer: Renderer,
    last_frame: Instant,
    last_cursor: Option<MouseCursor>,
}

/// Window events imgui consumes; the rest go straight to the demo
fn routes_to_ui(event: &WindowEvent) -> bool {
    matches!(
        event,
        WindowEvent::CursorMoved { .. }
            | WindowEvent::MouseInput { .. }
            | WindowEvent::MouseWheel { .. }
            | WindowEvent::KeyboardInput { .. }
            | WindowEvent::Focused(_)
    )
}

impl UiManager {
    /// Creates the overlay for `window`, rendering into `output_format` targets
    pub fn new(
        device: &Device,
        queue: &Queue,
        output_format: TextureFormat,
        window: &Window,
    ) -> Self {
        let mut context = Context::create();
        context.set_ini_filename(None);

        // Display size is set from physical pixels, so DPI scaling stays locked
        let mut platform = WinitPlatform::new(&mut context);
        platform.attach_window(context.io_mut(), window, HiDpiMode::Locked(1.0));

        context.fonts().add_font(&[FontSource::DefaultFontData {
            config: Some(FontConfig {
                oversample_h: 1,
                pixel_snap_h: true,
                size_pixels: FONT_SIZE,
                ..Default::default()
            }),
        }]);

        let renderer = Renderer::new(
            &mut context,
            device,
            queue,
            RendererConfig {
                texture_format: output_format,
                ..Default::default()
            },
        );
        log::info!("ImGui overlay ready ({:?})", output_format);

        Self {
            context,
            platform,
            renderer,
            last_frame: Instant::now(),
            last_cursor: None,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.context.io_mut().display_size = [width as f32, height as f32];
    }

    /// Offers a window event to imgui
    ///
    /// Returns `true` when imgui wants the mouse or keyboard, in which case
    /// the demo should not act on the event.
    pub fn handle_window_event(
        &mut self,
        window: &Window,
        window_id: WindowId,
        event: &WindowEvent,
    ) -> bool {
        if !routes_to_ui(event) {
            return false;
        }

        let event: Event<()> = Event::WindowEvent {
            window_id,
            event: event.clone(),
        };
        self.platform
            .handle_event(self.context.io_mut(), window, &event);

        let io = self.context.io();
        io.want_capture_mouse || io.want_capture_keyboard
    }

    /// Starts an imgui frame and lets `build` lay out the windows
    pub fn prepare_frame<F>(&mut self, window: &Window, build: F) -> Result<(), RenderError>
    where
        F: FnOnce(&imgui::Ui),
    {
        let now = Instant::now();
        self.context
            .io_mut()
            .update_delta_time(now - self.last_frame);
        self.last_frame = now;

        self.platform
            .prepare_frame(self.context.io_mut(), window)
            .map_err(|e| RenderError::Ui(format!("failed to prepare frame: {}", e)))?;

        let ui = self.context.frame();
        build(ui);

        let cursor = ui.mouse_cursor();
        if self.last_cursor != cursor {
            self.last_cursor = cursor;
            self.platform.prepare_render(ui, window);
        }
        Ok(())
    }

    /// Draws the frame built by [`UiManager::prepare_frame`] on top of `target`
    ///
    /// The target is loaded, not cleared, so the particle pass stays visible.
    pub fn render_overlay(
        &mut self,
        device: &Device,
        queue: &Queue,
        encoder: &mut CommandEncoder,
        target: &TextureView,
    ) -> Result<(), RenderError> {
        let draw_data = self.context.render();
        if draw_data.display_size[0] <= 0.0 || draw_data.display_size[1] <= 0.0 {
            return Ok(());
        }

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("UI Overlay Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        self.renderer
            .render(draw_data, queue, device, &mut render_pass)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalSize;

    #[test]
    fn test_focus_changes_route_to_ui() {
        assert!(routes_to_ui(&WindowEvent::Focused(true)));
        assert!(routes_to_ui(&WindowEvent::Focused(false)));
    }

    #[test]
    fn test_window_lifecycle_events_skip_ui() {
        assert!(!routes_to_ui(&WindowEvent::CloseRequested));
        assert!(!routes_to_ui(&WindowEvent::RedrawRequested));
        assert!(!routes_to_ui(&WindowEvent::Resized(PhysicalSize::new(800, 600))));
    }
}
